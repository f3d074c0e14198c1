//! Category aggregation: per-category counts, recursive rollups, filtering
//! and ordering, plus the cached entry points used by the route layer.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::cache::{CacheKey, CacheStore, Clock, get_cached_or_fetch};
use crate::domain::category::{Category, CategoryScope, CategoryTree, build_tree, slugify};
use crate::domain::types::{CategoryId, ProductCount};
use crate::repository::CategoryReader;

use super::ServiceResult;

/// Fetches the flat category list for a scope and aggregates product counts.
///
/// One `search_count` query is issued per category, sequentially. This is a
/// known O(n) remote-call boundary; the first failure aborts the whole run
/// and no partial result escapes.
///
/// The returned list contains only categories whose rolled-up total is
/// non-zero, stably sorted by `sequence` ascending. For the public scope the
/// ERP already orders the input `sequence asc, name asc`, so equal-sequence
/// entries come out name-ordered.
pub async fn fetch_categories_with_counts<R>(
    scope: CategoryScope,
    repo: &R,
) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    let raw = repo.list_categories(scope).await?;

    let mut categories = Vec::with_capacity(raw.len());
    for record in raw {
        let count = repo.count_published_products(scope, record.id).await?;
        let (parent_id, parent_name) = record.parent.unzip();
        categories.push(Category {
            slug: slugify(record.name.as_str()),
            id: record.id,
            name: record.name,
            parent_id,
            parent_name,
            child_ids: record.child_ids,
            sequence: record.sequence,
            count,
            total_count: ProductCount::ZERO,
        });
    }

    let by_id: HashMap<CategoryId, &Category> =
        categories.iter().map(|c| (c.id, c)).collect();
    let totals: Vec<ProductCount> = categories
        .iter()
        .map(|c| rollup(c.id, &by_id, &mut HashSet::new()))
        .collect();
    drop(by_id);

    for (category, total) in categories.iter_mut().zip(totals) {
        category.total_count = total;
    }

    categories.retain(|c| !c.total_count.is_zero());
    categories.sort_by_key(|c| c.sequence);

    Ok(categories)
}

/// Recursive total over a category and everything reachable via `child_ids`.
/// Ids absent from the index contribute zero; the visiting set guards
/// against cycles the source system should never produce.
fn rollup(
    id: CategoryId,
    by_id: &HashMap<CategoryId, &Category>,
    visiting: &mut HashSet<CategoryId>,
) -> ProductCount {
    let Some(category) = by_id.get(&id) else {
        return ProductCount::ZERO;
    };
    if !visiting.insert(id) {
        return ProductCount::ZERO;
    }

    let mut total = category.count;
    for child in &category.child_ids {
        total = total.saturating_add(rollup(*child, by_id, visiting));
    }
    visiting.remove(&id);
    total
}

/// Cached flat category list for a scope.
pub async fn list_categories<R, C>(
    scope: CategoryScope,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
    C: Clock,
{
    get_cached_or_fetch(cache, CacheKey::Categories(scope), ttl, || {
        fetch_categories_with_counts(scope, repo)
    })
    .await
}

/// Nested category tree for a scope, rebuilt per call from the cached flat
/// list. The tree itself is intentionally not cached.
pub async fn category_tree<R, C>(
    scope: CategoryScope,
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<CategoryTree>>
where
    R: CategoryReader,
    C: Clock,
{
    let flat = list_categories(scope, repo, cache, ttl).await?;
    Ok(build_tree(&flat))
}
