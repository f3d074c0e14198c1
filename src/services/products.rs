//! Product listing services. Thin orchestration over the repository with
//! cache-aside reads for the listings the storefront hammers.

use std::time::Duration;

use crate::cache::{CacheKey, CacheStore, Clock, get_cached_or_fetch};
use crate::domain::category::CategoryScope;
use crate::domain::product::{Product, ProductListQuery, product_id_from_slug};
use crate::domain::types::{CategoryId, ProductId};
use crate::repository::ProductReader;

use super::{ServiceError, ServiceResult};

/// Default page size for the popular-product listings (bestsellers and new
/// arrivals). Only default-size requests are cached so a trimmed request
/// never serves an oversized cached page.
pub const DEFAULT_POPULAR_LIMIT: u32 = 8;

/// Published product listing. Only the full catalog listing is cached;
/// explicit pagination always reads through to the ERP.
pub async fn list_products<R, C>(
    query: ProductListQuery,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
    C: Clock,
{
    if !query.is_full_listing() {
        return Ok(repo.list_products(query).await?);
    }

    get_cached_or_fetch(cache, CacheKey::Products, ttl, || async move {
        Ok(repo.list_products(query).await?)
    })
    .await
}

/// Published products for one category, cached per category id.
pub async fn list_products_by_category<R, C>(
    scope: CategoryScope,
    id: CategoryId,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
    C: Clock,
{
    get_cached_or_fetch(
        cache,
        CacheKey::ProductsByCategory(scope, id),
        ttl,
        || async move { Ok(repo.list_products_by_category(scope, id).await?) },
    )
    .await
}

/// Recently moved in-stock products for the landing page.
pub async fn list_bestsellers<R, C>(
    limit: Option<u32>,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
    C: Clock,
{
    let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    if limit != DEFAULT_POPULAR_LIMIT {
        return Ok(repo.list_bestsellers(limit).await?);
    }

    get_cached_or_fetch(cache, CacheKey::Bestsellers, ttl, || async move {
        Ok(repo.list_bestsellers(limit).await?)
    })
    .await
}

/// Most recently created published products for the landing page.
pub async fn list_new_arrivals<R, C>(
    limit: Option<u32>,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
    C: Clock,
{
    let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    if limit != DEFAULT_POPULAR_LIMIT {
        return Ok(repo.list_new_arrivals(limit).await?);
    }

    get_cached_or_fetch(cache, CacheKey::NewArrivals, ttl, || async move {
        Ok(repo.list_new_arrivals(limit).await?)
    })
    .await
}

/// Single product by id; uncached.
pub async fn get_product<R>(id: i64, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let id = ProductId::new(id).map_err(|_| ServiceError::NotFound)?;
    repo.get_product_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Single product resolved from a storefront slug such as
/// `ceramic-basin-42`, cached per slug. Missing products are not cached, so
/// a product published later becomes visible immediately.
pub async fn get_product_by_slug<R, C>(
    slug: &str,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Product>
where
    R: ProductReader,
    C: Clock,
{
    let id = product_id_from_slug(slug)
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid product slug: {slug}")))?;

    get_cached_or_fetch(
        cache,
        CacheKey::ProductBySlug(slug.to_string()),
        ttl,
        || async move {
            repo.get_product_by_id(id)
                .await?
                .ok_or(ServiceError::NotFound)
        },
    )
    .await
}
