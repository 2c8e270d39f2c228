use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::user::NewUser, errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn get_all_users(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let users = state.user_handler.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    let created = state.auth_handler.register(user.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}
