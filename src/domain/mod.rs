pub mod entities;
pub mod list_helper;
pub mod ownership;
pub mod use_cases;
