use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::cache::{CacheGroup, CacheStore};
use crate::models::config::ServerConfig;
use crate::repository::ErpRepository;
use crate::routes::error_response;
use crate::services::ribbons::list_ribbons;

#[get("/api/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[get("/api/ribbons")]
pub async fn show_ribbons(
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_ribbons(repo.get_ref(), cache.get_ref(), config.cache.ribbons()).await {
        Ok(ribbons) => HttpResponse::Ok().json(ribbons),
        Err(err) => error_response(err, "Failed to list ribbons"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearCacheRequest {
    pub resource: Option<CacheGroup>,
}

/// Drops cached entries. Without a body (or without `resource`) the whole
/// cache is cleared; otherwise only the named group.
#[post("/api/cache/clear")]
pub async fn clear_cache(
    body: Option<web::Json<ClearCacheRequest>>,
    cache: web::Data<CacheStore>,
) -> impl Responder {
    let group = body
        .map(|b| b.into_inner().resource)
        .unwrap_or_default()
        .unwrap_or(CacheGroup::All);
    let cleared = cache.clear(group);
    log::info!("cache clear ({group:?}): {cleared} entries dropped");
    HttpResponse::Ok().json(json!({ "success": true, "cleared": cleared }))
}

#[get("/api/cache-status")]
pub async fn cache_status(cache: web::Data<CacheStore>) -> impl Responder {
    HttpResponse::Ok().json(cache.stats())
}
