mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;
pub mod telemetry;

pub use domain::{entities, list_helper, ownership, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, utils};

use auth::jwt::JwtService;
use settings::{AppConfig, StorageBackend};
use shared_repos::{DynBlogRepo, DynUserRepo, SharedRepositories};
use use_cases::{auth::AuthHandler, blog::BlogHandler, users::UserHandler};

pub struct AppState {
    pub storage: StorageBackend,
    pub auth_handler: AppAuthHandler,
    pub blog_handler: AppBlogHandler,
    pub user_handler: AppUserHandler,
}

pub type AppAuthHandler = AuthHandler<DynUserRepo, JwtService>;
pub type AppBlogHandler = BlogHandler<DynBlogRepo, DynUserRepo>;
pub type AppUserHandler = UserHandler<DynUserRepo, DynBlogRepo>;

impl AppState {
    pub fn new(config: &settings::AppConfig, repos: SharedRepositories) -> Self {
        let jwt_service = JwtService::new(config);

        AppState {
            storage: repos.storage,
            auth_handler: AuthHandler::new(repos.user_repo.clone(), jwt_service),
            blog_handler: BlogHandler::new(repos.blog_repo.clone(), repos.user_repo.clone()),
            user_handler: UserHandler::new(repos.user_repo, repos.blog_repo),
        }
    }
}

/// Opens the configured storage, migrating the schema when it is Postgres.
pub async fn connect_storage(config: &AppConfig) -> anyhow::Result<SharedRepositories> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = db::postgres::create_pool(&config.database_url).await?;
            db::postgres::run_migrations(&pool).await?;
            Ok(SharedRepositories::postgres(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on shutdown");
            Ok(SharedRepositories::in_memory())
        }
    }
}
