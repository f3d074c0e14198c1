//! Simple in-memory repository used for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::category::CategoryScope;
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::ribbon::Ribbon;
use crate::domain::types::{CategoryId, ProductCount, ProductId};
use crate::erp::ErpError;
use crate::repository::{
    CategoryReader, ProductReader, RawCategory, RepositoryResult, RibbonReader,
};

/// In-memory fake with optional failure injection. Counts ERP-style calls so
/// tests can assert how often the data source was hit.
#[derive(Default)]
pub struct TestRepository {
    categories: HashMap<CategoryScope, Vec<RawCategory>>,
    counts: HashMap<(CategoryScope, CategoryId), ProductCount>,
    products: Vec<Product>,
    ribbons: Vec<Ribbon>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, scope: CategoryScope, categories: Vec<RawCategory>) -> Self {
        self.categories.insert(scope, categories);
        self
    }

    pub fn with_count(mut self, scope: CategoryScope, id: CategoryId, count: u32) -> Self {
        self.counts.insert((scope, id), ProductCount::new(count));
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_ribbons(mut self, ribbons: Vec<Ribbon>) -> Self {
        self.ribbons = ribbons;
        self
    }

    /// Every subsequent call fails with a remote error carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(ErpError::Remote(message.clone()).into()),
            None => Ok(()),
        }
    }
}

impl CategoryReader for TestRepository {
    async fn list_categories(&self, scope: CategoryScope) -> RepositoryResult<Vec<RawCategory>> {
        self.record_call()?;
        Ok(self.categories.get(&scope).cloned().unwrap_or_default())
    }

    async fn count_published_products(
        &self,
        scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<ProductCount> {
        self.record_call()?;
        Ok(self
            .counts
            .get(&(scope, id))
            .copied()
            .unwrap_or(ProductCount::ZERO))
    }
}

impl ProductReader for TestRepository {
    async fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        self.record_call()?;
        Ok(self
            .products
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_products_by_category(
        &self,
        scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<Vec<Product>> {
        self.record_call()?;
        Ok(self
            .products
            .iter()
            .filter(|p| match scope {
                CategoryScope::Internal => p.category_id == Some(id),
                CategoryScope::Public => p.public_category_ids.contains(&id),
            })
            .cloned()
            .collect())
    }

    async fn list_bestsellers(&self, limit: u32) -> RepositoryResult<Vec<Product>> {
        self.record_call()?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.in_stock)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_new_arrivals(&self, limit: u32) -> RepositoryResult<Vec<Product>> {
        self.record_call()?;
        // Newest first: last inserted product comes out first.
        Ok(self
            .products
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        self.record_call()?;
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

impl RibbonReader for TestRepository {
    async fn list_ribbons(&self) -> RepositoryResult<Vec<Ribbon>> {
        self.record_call()?;
        Ok(self.ribbons.clone())
    }
}
