use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use storefront_gateway::cache::{CacheGroup, CacheStore, ManualClock};
use storefront_gateway::domain::category::CategoryScope;
use storefront_gateway::domain::types::{CategoryId, CategoryName, ProductCount};
use storefront_gateway::repository::{
    CategoryReader, RawCategory, RepositoryResult,
};
use storefront_gateway::services::categories::{category_tree, list_categories};

const TTL: Duration = Duration::from_secs(1800);

/// In-memory category source counting how many calls reach it.
struct FakeCategorySource {
    categories: Vec<RawCategory>,
    counts: HashMap<i64, u32>,
    calls: AtomicUsize,
}

impl FakeCategorySource {
    fn new(categories: Vec<RawCategory>, counts: &[(i64, u32)]) -> Self {
        Self {
            categories,
            counts: counts.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CategoryReader for FakeCategorySource {
    async fn list_categories(&self, _scope: CategoryScope) -> RepositoryResult<Vec<RawCategory>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.categories.clone())
    }

    async fn count_published_products(
        &self,
        _scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<ProductCount> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProductCount::new(
            self.counts.get(&id.get()).copied().unwrap_or(0),
        ))
    }
}

fn raw(id: i64, parent: Option<i64>, child_ids: &[i64], sequence: i64) -> RawCategory {
    RawCategory {
        id: CategoryId::new(id).expect("valid category id"),
        name: CategoryName::new(format!("Category {id}")).expect("valid category name"),
        parent: parent.map(|p| (CategoryId::new(p).expect("valid parent id"), format!("Category {p}"))),
        child_ids: child_ids
            .iter()
            .map(|&c| CategoryId::new(c).expect("valid child id"))
            .collect(),
        sequence,
    }
}

fn storefront_source() -> FakeCategorySource {
    // Root 1 holds empty child 2 and populated child 3; root 4 is empty.
    FakeCategorySource::new(
        vec![
            raw(1, None, &[2, 3], 1),
            raw(2, Some(1), &[], 2),
            raw(3, Some(1), &[], 3),
            raw(4, None, &[], 4),
        ],
        &[(1, 2), (3, 5)],
    )
}

#[actix_rt::test]
async fn aggregated_listing_rolls_up_filters_and_sorts() {
    let source = storefront_source();
    let cache = CacheStore::new();

    let categories = list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("listing should succeed");

    let summary: Vec<(i64, u32, u32)> = categories
        .iter()
        .map(|c| (c.id.get(), c.count.get(), c.total_count.get()))
        .collect();
    assert_eq!(summary, vec![(1, 2, 7), (3, 5, 5)]);
    assert_eq!(categories[0].slug, "category-1");
    assert_eq!(categories[1].parent_name.as_deref(), Some("Category 1"));
}

#[actix_rt::test]
async fn listing_is_cached_until_cleared() {
    let source = storefront_source();
    let cache = CacheStore::new();

    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("first listing should succeed");
    let cold_calls = source.calls();
    // One list call plus one count per category.
    assert_eq!(cold_calls, 5);

    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("cached listing should succeed");
    assert_eq!(source.calls(), cold_calls);

    assert_eq!(cache.clear(CacheGroup::Categories), 1);
    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("refetched listing should succeed");
    assert_eq!(source.calls(), cold_calls * 2);
}

#[actix_rt::test]
async fn listing_expires_with_the_clock() {
    let source = storefront_source();
    let clock = ManualClock::new();
    let cache = CacheStore::with_clock(clock.clone());

    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("first listing should succeed");
    let cold_calls = source.calls();

    clock.advance(TTL - Duration::from_millis(1));
    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("still-fresh listing should succeed");
    assert_eq!(source.calls(), cold_calls);

    clock.advance(Duration::from_millis(1));
    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("expired listing should refetch");
    assert_eq!(source.calls(), cold_calls * 2);
}

#[actix_rt::test]
async fn tree_is_rebuilt_from_the_cached_flat_list() {
    let source = storefront_source();
    let cache = CacheStore::new();

    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("listing should succeed");
    let calls_after_list = source.calls();

    let tree = category_tree(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("tree should build from cache");
    // The tree reuses the cached flat list without extra source calls.
    assert_eq!(source.calls(), calls_after_list);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].category.id.get(), 1);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].category.id.get(), 3);
}

#[actix_rt::test]
async fn scopes_use_distinct_cache_entries() {
    let source = storefront_source();
    let cache = CacheStore::new();

    list_categories(CategoryScope::Public, &source, &cache, TTL)
        .await
        .expect("public listing should succeed");
    let after_public = source.calls();

    list_categories(CategoryScope::Internal, &source, &cache, TTL)
        .await
        .expect("internal listing should succeed");
    assert_eq!(source.calls(), after_public * 2);
}
