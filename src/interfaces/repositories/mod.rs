pub mod blog;
pub mod memory;
pub mod sqlx_repo;
pub mod token;
pub mod user;
