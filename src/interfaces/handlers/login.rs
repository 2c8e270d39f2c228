use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::user::LoginUser, errors::AuthError, AppState};

#[instrument(skip(state, credentials), fields(username = %credentials.username))]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginUser>,
) -> Result<impl Responder, AuthError> {
    let response = state.auth_handler.login(credentials.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
