use actix_web::web;

use crate::handlers::blogs;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blogs")
            .service(
                web::resource("")
                    .route(web::get().to(blogs::get_all_blogs))
                    .route(web::post().to(blogs::create_blog))
            )
            .service(
                web::resource("/{blog_id}")
                    .route(web::put().to(blogs::update_blog))
                    .route(web::delete().to(blogs::delete_blog))
            )
    );
}
