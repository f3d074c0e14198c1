use actix_web::{HttpResponse, Responder, get, web};

use crate::cache::CacheStore;
use crate::domain::category::CategoryScope;
use crate::dto::categories::{CategoryDto, CategoryTreeDto};
use crate::models::config::ServerConfig;
use crate::repository::ErpRepository;
use crate::routes::error_response;
use crate::services::categories::{category_tree, list_categories};

async fn categories_response(
    scope: CategoryScope,
    repo: &ErpRepository,
    cache: &CacheStore,
    config: &ServerConfig,
) -> HttpResponse {
    match list_categories(scope, repo, cache, config.cache.categories()).await {
        Ok(categories) => HttpResponse::Ok().json(
            categories
                .into_iter()
                .map(CategoryDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err, &format!("Failed to list {scope} categories")),
    }
}

async fn tree_response(
    scope: CategoryScope,
    repo: &ErpRepository,
    cache: &CacheStore,
    config: &ServerConfig,
) -> HttpResponse {
    match category_tree(scope, repo, cache, config.cache.categories()).await {
        Ok(tree) => HttpResponse::Ok().json(
            tree.into_iter()
                .map(CategoryTreeDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err, &format!("Failed to build {scope} category tree")),
    }
}

#[get("/api/categories")]
pub async fn show_categories(
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    categories_response(
        CategoryScope::Internal,
        repo.get_ref(),
        cache.get_ref(),
        config.get_ref(),
    )
    .await
}

#[get("/api/categories/tree")]
pub async fn show_category_tree(
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    tree_response(
        CategoryScope::Internal,
        repo.get_ref(),
        cache.get_ref(),
        config.get_ref(),
    )
    .await
}

#[get("/api/categories/public")]
pub async fn show_public_categories(
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    categories_response(
        CategoryScope::Public,
        repo.get_ref(),
        cache.get_ref(),
        config.get_ref(),
    )
    .await
}

#[get("/api/categories/public/tree")]
pub async fn show_public_category_tree(
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    tree_response(
        CategoryScope::Public,
        repo.get_ref(),
        cache.get_ref(),
        config.get_ref(),
    )
    .await
}
