// Route exports
pub mod matches;
pub mod properties;

use actix_web::web;

pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(properties::configure),
    );
}
