use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::DEFAULT_LIKES;
use crate::entities::user::User;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written when a blog is created. The owner is always the caller.
#[derive(Debug, Clone)]
pub struct BlogInsert {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replacement values for an existing blog. Ownership is not part of an update.
#[derive(Debug, Clone)]
pub struct BlogUpdate {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BlogRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "likes must be a non-negative integer"))]
    pub likes: Option<i64>,
}

pub type NewBlogRequest = BlogRequest;
pub type UpdateBlogRequest = BlogRequest;

impl BlogRequest {
    pub fn likes_or_default(&self) -> i64 {
        self.likes.unwrap_or(DEFAULT_LIKES)
    }

    pub fn prepare_for_insert(&self, owner: &Uuid) -> BlogInsert {
        let now = Utc::now();
        BlogInsert {
            title: self.title.clone(),
            author: self.author.clone(),
            url: self.url.clone(),
            likes: self.likes_or_default(),
            user_id: *owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// A missing `likes` resets the counter, matching a full replace.
    pub fn prepare_for_update(&self) -> BlogUpdate {
        BlogUpdate {
            title: self.title.clone(),
            author: self.author.clone(),
            url: self.url.clone(),
            likes: self.likes_or_default(),
            updated_at: Utc::now(),
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogOwner {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

impl From<&User> for BlogOwner {
    fn from(user: &User) -> Self {
        BlogOwner {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user: Option<BlogOwner>,
}

impl BlogResponse {
    pub fn with_owner(blog: Blog, owner: Option<BlogOwner>) -> Self {
        BlogResponse {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, url: &str, likes: Option<i64>) -> BlogRequest {
        BlogRequest {
            title: title.into(),
            author: "Jest Test".into(),
            url: url.into(),
            likes,
        }
    }

    #[test]
    fn missing_likes_default_to_zero() {
        let body: BlogRequest = serde_json::from_str(
            r#"{"title": "Test Post", "author": "Jest Test", "url": "https://example.com/"}"#,
        ).unwrap();

        assert!(body.validate().is_ok());
        assert_eq!(body.prepare_for_insert(&Uuid::new_v4()).likes, 0);
        assert_eq!(body.prepare_for_update().likes, 0);
    }

    #[test]
    fn title_and_url_are_required() {
        let errors = request("", "", None).validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("url"));
    }

    #[test]
    fn negative_likes_are_rejected() {
        assert!(request("Title", "https://example.com/", Some(-1)).validate().is_err());
        assert!(request("Title", "https://example.com/", Some(3)).validate().is_ok());
    }

    #[test]
    fn insert_is_owned_by_the_caller() {
        let owner = Uuid::new_v4();
        let insert = request("Title", "https://example.com/", Some(4)).prepare_for_insert(&owner);

        assert_eq!(insert.user_id, owner);
        assert_eq!(insert.likes, 4);
    }
}
