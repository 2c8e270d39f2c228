use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const DEFAULT_LIKES: i64 = 0;
pub const MIN_USERNAME_LENGTH: u64 = 3;
pub const MIN_PASSWORD_LENGTH: u64 = 3;
