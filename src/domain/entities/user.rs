use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use uuid::Uuid;

use crate::constants::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::entities::blog::Blog;

/// Stored account. Not `Serialize`: the password hash never leaves the service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[serde(default)]
    #[validate(length(
        min = MIN_USERNAME_LENGTH,
        message = "username must exist and be at least 3 characters long"
    ))]
    pub username: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "password must exist and be at least 3 characters long"
    ))]
    pub password: String,
}

impl NewUser {
    /// Strips surrounding whitespace from the username so validation sees
    /// exactly what will be stored.
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }

    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        let now = Utc::now();
        UserInsert {
            username: self.username.trim().to_string(),
            name: self.name.clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: String,

    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

impl LoginUser {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }
}

/// Blog summary embedded in a user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBlog {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
}

impl From<&Blog> for UserBlog {
    fn from(blog: &Blog) -> Self {
        UserBlog {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<UserBlog>,
}

impl UserResponse {
    pub fn with_blogs(user: User, blogs: Vec<UserBlog>) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            name: user.name,
            blogs,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::with_blogs(user, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_username_and_password_are_rejected_with_messages() {
        let user = NewUser {
            username: "ab".into(),
            name: None,
            password: "pw".into(),
        };

        let errors = user.validate().unwrap_err();
        let fields = errors.field_errors();
        let username = fields.get("username").unwrap();
        assert_eq!(
            username[0].message.as_deref(),
            Some("username must exist and be at least 3 characters long")
        );
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn missing_fields_fail_validation_instead_of_parsing() {
        let user: NewUser = serde_json::from_str(r#"{"name": "Nobody"}"#).unwrap();
        assert!(user.validate().is_err());
    }

    #[test]
    fn normalized_username_is_validated_as_stored() {
        let user = NewUser {
            username: "  ab ".into(),
            name: None,
            password: "salainen".into(),
        }
        .normalized();

        assert_eq!(user.username, "ab");
        assert!(user.validate().unwrap_err().field_errors().contains_key("username"));
    }
}
