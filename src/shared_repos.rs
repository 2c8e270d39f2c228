use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    repositories::{
        blog::BlogRepository,
        memory::{InMemoryBlogRepo, InMemoryUserRepo},
        sqlx_repo::{SqlxBlogRepo, SqlxUserRepo},
        user::UserRepository,
    },
    settings::StorageBackend,
};

pub type DynUserRepo = Arc<dyn UserRepository>;
pub type DynBlogRepo = Arc<dyn BlogRepository>;

/// One handle per table, shared by every use case.
#[derive(Clone)]
pub struct SharedRepositories {
    pub storage: StorageBackend,
    pub user_repo: DynUserRepo,
    pub blog_repo: DynBlogRepo,
}

impl SharedRepositories {
    pub fn postgres(pool: PgPool) -> Self {
        SharedRepositories {
            storage: StorageBackend::Postgres,
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            blog_repo: Arc::new(SqlxBlogRepo::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let users = InMemoryUserRepo::new();
        let blogs = InMemoryBlogRepo::new(users.clone());

        SharedRepositories {
            storage: StorageBackend::Memory,
            user_repo: Arc::new(users),
            blog_repo: Arc::new(blogs),
        }
    }
}
