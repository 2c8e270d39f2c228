use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    entities::{
        blog::{Blog, BlogInsert, BlogUpdate},
        user::{User, UserInsert},
    },
    errors::AppError,
    repositories::{blog::BlogRepository, user::UserRepository},
};

/// Process-local user table, kept in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryUserRepo {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().clone())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().iter().find(|u| u.id == *id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        let mut users = self.users.write();

        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("username must be unique".to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        users.push(created.clone());

        Ok(created)
    }
}

/// Process-local blog table, kept in insertion order.
///
/// Owners are checked against the user table given at construction, the way a
/// foreign key would be.
#[derive(Clone)]
pub struct InMemoryBlogRepo {
    blogs: Arc<RwLock<Vec<Blog>>>,
    users: InMemoryUserRepo,
}

impl InMemoryBlogRepo {
    pub fn new(users: InMemoryUserRepo) -> Self {
        InMemoryBlogRepo {
            blogs: Arc::new(RwLock::new(Vec::new())),
            users,
        }
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        Ok(self.blogs.read().clone())
    }

    async fn get_blog_by_id(&self, id: &Uuid) -> Result<Option<Blog>, AppError> {
        Ok(self.blogs.read().iter().find(|b| b.id == *id).cloned())
    }

    async fn create_blog(&self, blog: &BlogInsert) -> Result<Blog, AppError> {
        if self.users.get_user_by_id(&blog.user_id).await?.is_none() {
            return Err(AppError::NotFound("user not found".into()));
        }

        let created = Blog {
            id: Uuid::new_v4(),
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user_id: blog.user_id,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        };
        self.blogs.write().push(created.clone());

        Ok(created)
    }

    async fn update_blog(&self, id: &Uuid, update: &BlogUpdate) -> Result<Option<Blog>, AppError> {
        let mut blogs = self.blogs.write();

        let updated = blogs.iter_mut().find(|b| b.id == *id).map(|blog| {
            blog.title = update.title.clone();
            blog.author = update.author.clone();
            blog.url = update.url.clone();
            blog.likes = update.likes;
            blog.updated_at = update.updated_at;
            blog.clone()
        });

        Ok(updated)
    }

    async fn delete_blog(&self, id: &Uuid) -> Result<bool, AppError> {
        let mut blogs = self.blogs.write();
        let before = blogs.len();
        blogs.retain(|b| b.id != *id);
        Ok(blogs.len() < before)
    }
}
