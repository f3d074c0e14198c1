//! HTTP route handlers. Handlers stay thin: extract inputs, call the
//! matching service function, translate the outcome into a JSON response.

use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod categories;
pub mod misc;
pub mod products;

/// Maps a service error onto an HTTP response. `context` names the failed
/// operation for the error log; clients only ever see a generic message for
/// upstream failures.
pub fn error_response(err: ServiceError, context: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::InvalidInput(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        err => {
            log::error!("{context}: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal server error" }))
        }
    }
}
