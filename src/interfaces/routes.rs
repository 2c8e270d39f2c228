use actix_web::web;

use crate::handlers::home::home;

mod blogs;
mod json_error;
mod login;
mod system;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .configure(blogs::config_routes)
            .configure(users::config_routes)
            .configure(login::config_routes)
            .configure(system::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
