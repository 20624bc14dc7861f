//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod tasks;
pub mod tasks_dto;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler plus the extractor error handlers.
///
/// Mount it under the versioned scope:
///
/// ```
/// use actix_web::{App, web};
/// use taskdeck::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// # let _ = app;
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::register)
        .service(users::login)
        .service(users::update_settings)
        .service(tasks::task_stats)
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::update_task)
        .service(tasks::delete_task);
}
