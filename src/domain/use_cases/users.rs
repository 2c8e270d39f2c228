use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    entities::user::{UserBlog, UserResponse},
    errors::AppError,
    repositories::{blog::BlogRepository, user::UserRepository},
};

pub struct UserHandler<U, B>
where
    U: UserRepository,
    B: BlogRepository,
{
    pub user_repo: U,
    pub blog_repo: B,
}

impl<U, B> UserHandler<U, B>
where
    U: UserRepository,
    B: BlogRepository,
{
    pub fn new(user_repo: U, blog_repo: B) -> Self {
        UserHandler { user_repo, blog_repo }
    }

    /// Lists every user together with the blogs they own
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.user_repo.list_users().await?;
        let blogs = self.blog_repo.list_blogs().await?;

        let mut owned: HashMap<Uuid, Vec<UserBlog>> = HashMap::new();
        for blog in &blogs {
            owned.entry(blog.user_id).or_default().push(UserBlog::from(blog));
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let blogs = owned.remove(&user.id).unwrap_or_default();
                UserResponse::with_blogs(user, blogs)
            })
            .collect())
    }
}
