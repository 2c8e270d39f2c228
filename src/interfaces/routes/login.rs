use actix_web::web;

use crate::handlers::login;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::post().to(login::login))
    );
}
