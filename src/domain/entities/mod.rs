pub mod blog;
pub mod token;
pub mod user;
