use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::cache::CacheStore;
use crate::domain::category::CategoryScope;
use crate::domain::product::ProductListQuery;
use crate::domain::types::CategoryId;
use crate::dto::products::ProductDto;
use crate::models::config::ServerConfig;
use crate::repository::ErpRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::products::{
    get_product, get_product_by_slug, list_bestsellers, list_new_arrivals, list_products,
    list_products_by_category,
};

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<u32>,
}

fn product_list_response(
    result: Result<Vec<crate::domain::product::Product>, ServiceError>,
    context: &str,
) -> HttpResponse {
    match result {
        Ok(products) => HttpResponse::Ok().json(
            products
                .into_iter()
                .map(ProductDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err, context),
    }
}

#[get("/api/products")]
pub async fn show_products(
    params: web::Query<ProductListParams>,
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let query = ProductListQuery::new(params.limit, params.offset);
    let result = list_products(query, repo.get_ref(), cache.get_ref(), config.cache.products())
        .await;
    product_list_response(result, "Failed to list products")
}

async fn category_products_response(
    scope: CategoryScope,
    id: i64,
    repo: &ErpRepository,
    cache: &CacheStore,
    config: &ServerConfig,
) -> HttpResponse {
    let id = match CategoryId::new(id) {
        Ok(id) => id,
        Err(err) => {
            return error_response(
                ServiceError::InvalidInput(err.to_string()),
                "Rejected category id",
            );
        }
    };
    let result =
        list_products_by_category(scope, id, repo, cache, config.cache.products()).await;
    product_list_response(result, &format!("Failed to list products for {scope} category"))
}

#[get("/api/products/category/{id}")]
pub async fn show_products_by_category(
    path: web::Path<i64>,
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    category_products_response(
        CategoryScope::Internal,
        path.into_inner(),
        repo.get_ref(),
        cache.get_ref(),
        config.get_ref(),
    )
    .await
}

#[get("/api/products/public-category/{id}")]
pub async fn show_products_by_public_category(
    path: web::Path<i64>,
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    category_products_response(
        CategoryScope::Public,
        path.into_inner(),
        repo.get_ref(),
        cache.get_ref(),
        config.get_ref(),
    )
    .await
}

#[get("/api/products/popular/bestsellers")]
pub async fn show_bestsellers(
    params: web::Query<PopularParams>,
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let result = list_bestsellers(
        params.limit,
        repo.get_ref(),
        cache.get_ref(),
        config.cache.products(),
    )
    .await;
    product_list_response(result, "Failed to list bestsellers")
}

#[get("/api/products/popular/new-arrivals")]
pub async fn show_new_arrivals(
    params: web::Query<PopularParams>,
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let result = list_new_arrivals(
        params.limit,
        repo.get_ref(),
        cache.get_ref(),
        config.cache.products(),
    )
    .await;
    product_list_response(result, "Failed to list new arrivals")
}

#[get("/api/products/{id}")]
pub async fn show_product(path: web::Path<i64>, repo: web::Data<ErpRepository>) -> impl Responder {
    match get_product(path.into_inner(), repo.get_ref()).await {
        Ok(product) => HttpResponse::Ok().json(ProductDto::from(product)),
        Err(err) => error_response(err, "Failed to fetch product"),
    }
}

#[get("/api/product/by-slug/{slug}")]
pub async fn show_product_by_slug(
    path: web::Path<String>,
    repo: web::Data<ErpRepository>,
    cache: web::Data<CacheStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let slug = path.into_inner();
    match get_product_by_slug(&slug, repo.get_ref(), cache.get_ref(), config.cache.products())
        .await
    {
        Ok(product) => HttpResponse::Ok().json(ProductDto::from(product)),
        Err(err) => error_response(err, "Failed to fetch product by slug"),
    }
}
