use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{self, PgPool};
use std::sync::Arc;

use crate::{
    entities::blog::{Blog, BlogInsert, BlogUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxBlogRepo,
};

/// Storage for blog records. Lookups return `None` rather than an error for unknown ids.
#[async_trait]
pub trait BlogRepository: Sync + Send {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError>;
    async fn get_blog_by_id(&self, id: &Uuid) -> Result<Option<Blog>, AppError>;
    async fn create_blog(&self, blog: &BlogInsert) -> Result<Blog, AppError>;
    async fn update_blog(&self, id: &Uuid, blog: &BlogUpdate) -> Result<Option<Blog>, AppError>;
    /// Returns whether a record was removed.
    async fn delete_blog(&self, id: &Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl<R> BlogRepository for Arc<R>
where
    R: BlogRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        (**self).list_blogs().await
    }

    async fn get_blog_by_id(&self, id: &Uuid) -> Result<Option<Blog>, AppError> {
        (**self).get_blog_by_id(id).await
    }

    async fn create_blog(&self, blog: &BlogInsert) -> Result<Blog, AppError> {
        (**self).create_blog(blog).await
    }

    async fn update_blog(&self, id: &Uuid, blog: &BlogUpdate) -> Result<Option<Blog>, AppError> {
        (**self).update_blog(id, blog).await
    }

    async fn delete_blog(&self, id: &Uuid) -> Result<bool, AppError> {
        (**self).delete_blog(id).await
    }
}

impl SqlxBlogRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogRepo { pool }
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1 FROM blogs LIMIT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        let blogs = sqlx::query_as::<_, Blog>(
            "SELECT * FROM blogs ORDER BY created_at, id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    async fn get_blog_by_id(&self, id: &Uuid) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn create_blog(&self, blog: &BlogInsert) -> Result<Blog, AppError> {
        let created = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (title, author, url, likes, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.user_id)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("blogs_user_id_fkey") {
                    return AppError::NotFound("user not found".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn update_blog(&self, id: &Uuid, blog: &BlogUpdate) -> Result<Option<Blog>, AppError> {
        let updated = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs SET
                title = $1,
                author = $2,
                url = $3,
                likes = $4,
                updated_at = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.updated_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_blog(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
