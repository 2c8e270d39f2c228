use std::collections::HashMap;

use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::jwt::AuthenticatedUser,
    entities::blog::{BlogOwner, BlogResponse, NewBlogRequest, UpdateBlogRequest},
    errors::{AppError, AuthError},
    ownership::check_ownership,
    repositories::{blog::BlogRepository, user::UserRepository},
    utils::valid_uuid::valid_uuid,
};

pub struct BlogHandler<B, U>
where
    B: BlogRepository,
    U: UserRepository,
{
    pub blog_repo: B,
    pub user_repo: U,
}

impl<B, U> BlogHandler<B, U>
where
    B: BlogRepository,
    U: UserRepository,
{
    pub fn new(blog_repo: B, user_repo: U) -> Self {
        BlogHandler { blog_repo, user_repo }
    }

    /// Retrieves all blogs with their owner attached
    pub async fn list_blogs(&self) -> Result<Vec<BlogResponse>, AppError> {
        let blogs = self.blog_repo.list_blogs().await?;
        let owners: HashMap<Uuid, BlogOwner> = self.user_repo
            .list_users()
            .await?
            .iter()
            .map(|user| (user.id, BlogOwner::from(user)))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let owner = owners.get(&blog.user_id).cloned();
                BlogResponse::with_owner(blog, owner)
            })
            .collect())
    }

    /// Creates a blog owned by the caller
    pub async fn create_blog(
        &self,
        caller: &AuthenticatedUser,
        request: NewBlogRequest,
    ) -> Result<BlogResponse, AppError> {
        request.validate()?;

        // A valid token can outlive its account
        let owner = self.user_repo
            .get_user_by_id(&caller.id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let blog = self.blog_repo
            .create_blog(&request.prepare_for_insert(&owner.id))
            .await?;

        tracing::info!(blog_id = %blog.id, owner = %owner.username, "Blog created");
        Ok(BlogResponse::with_owner(blog, Some(BlogOwner::from(&owner))))
    }

    /// Replaces the fields of a blog. Any authenticated caller may update any blog.
    pub async fn update_blog(
        &self,
        id: &str,
        request: UpdateBlogRequest,
    ) -> Result<BlogResponse, AppError> {
        request.validate()?;
        let valid_id = valid_uuid(id)?;

        let blog = self.blog_repo
            .update_blog(&valid_id, &request.prepare_for_update())
            .await?
            .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

        let owner = self.user_repo
            .get_user_by_id(&blog.user_id)
            .await?
            .map(|user| BlogOwner::from(&user));

        Ok(BlogResponse::with_owner(blog, owner))
    }

    /// Deletes a blog, provided the caller owns it
    pub async fn delete_blog(
        &self,
        id: &str,
        caller: &AuthenticatedUser,
    ) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        let blog = self.blog_repo.get_blog_by_id(&valid_id).await?;
        let outcome = check_ownership(blog.as_ref(), &caller.id);
        if !outcome.is_allowed() {
            tracing::warn!(blog_id = %valid_id, caller = %caller.username, ?outcome, "Blog deletion refused");
            return outcome.into_result();
        }

        if !self.blog_repo.delete_blog(&valid_id).await? {
            return Err(AppError::NotFound("blog not found".to_string()));
        }

        tracing::info!(blog_id = %valid_id, caller = %caller.username, "Blog deleted");
        Ok(())
    }
}
