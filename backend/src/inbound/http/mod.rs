//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod allocations;
pub mod auth;
pub mod error;
pub mod health;
pub mod inventory;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` route together with the extractor configuration
/// that renders malformed bodies and query strings as JSON errors.
///
/// Callers supply `web::Data<HttpState>` and the session middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use inventory_backend::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .service(users::status)
            .service(users::register)
            .service(users::login)
            .service(users::logout)
            .service(users::list_users)
            .service(inventory::summary)
            .service(inventory::list_inventory)
            .service(inventory::my_inventory)
            .service(inventory::add_item)
            .service(inventory::update_item)
            .service(inventory::delete_item)
            .service(allocations::find_allocation)
            .service(allocations::create_allocation),
    );
}
