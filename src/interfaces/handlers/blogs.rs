use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::blog::{NewBlogRequest, UpdateBlogRequest},
    errors::AppError,
    use_cases::extractors::AuthUser,
    AppState,
};

#[instrument(skip(state))]
pub async fn get_all_blogs(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let blogs = state.blog_handler.list_blogs().await?;
    Ok(HttpResponse::Ok().json(blogs))
}

#[instrument(skip(caller, state, data), fields(caller = %caller.0.username))]
pub async fn create_blog(
    caller: AuthUser,
    state: web::Data<AppState>,
    data: web::Json<NewBlogRequest>,
) -> Result<impl Responder, AppError> {
    let blog = state.blog_handler
        .create_blog(&caller.0, data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(blog))
}

#[instrument(skip(_caller, blog_id, state, data), fields(blog_id = %blog_id))]
pub async fn update_blog(
    _caller: AuthUser,
    blog_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogRequest>,
) -> Result<impl Responder, AppError> {
    let blog = state.blog_handler
        .update_blog(&blog_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(blog))
}

#[instrument(skip(caller, blog_id, state), fields(blog_id = %blog_id))]
pub async fn delete_blog(
    caller: AuthUser,
    blog_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.blog_handler.delete_blog(&blog_id, &caller.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
