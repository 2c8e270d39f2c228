pub mod blogs;
pub mod home;
pub mod json_error;
pub mod login;
pub mod system;
pub mod users;
