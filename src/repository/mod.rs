//! Data-access layer backed by the ERP JSON-RPC client.
//!
//! Services depend on the reader traits; `ErpRepository` is the production
//! implementation and `test::TestRepository` the in-memory fake.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::category::CategoryScope;
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::ribbon::Ribbon;
use crate::domain::types::{CategoryId, CategoryName, ProductCount, ProductId};
use crate::erp::{ErpError, JsonRpcClient};

pub mod category;
pub mod product;
pub mod ribbon;
#[cfg(test)]
pub mod test;

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Erp(#[from] ErpError),
    /// The ERP answered successfully but the payload did not have the
    /// expected shape.
    #[error("unexpected erp payload: {0}")]
    UnexpectedPayload(String),
}

/// Convenient alias for results returned from repository methods.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository implementation issuing JSON-RPC calls against the ERP.
///
/// The wrapped client is connection-pooled and cheap to clone, allowing the
/// repository to be passed around freely between handlers.
#[derive(Clone)]
pub struct ErpRepository {
    client: JsonRpcClient,
}

impl ErpRepository {
    pub fn new(client: JsonRpcClient) -> Self {
        Self { client }
    }

    fn client(&self) -> &JsonRpcClient {
        &self.client
    }
}

/// A category record as fetched from the ERP, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCategory {
    pub id: CategoryId,
    pub name: CategoryName,
    /// Parent id and denormalized parent name, when the category has one.
    pub parent: Option<(CategoryId, String)>,
    pub child_ids: Vec<CategoryId>,
    pub sequence: i64,
}

/// Read operations for category records.
pub trait CategoryReader {
    /// Fetch the flat category list for a scope. The public scope is ordered
    /// `sequence asc, name asc` by the ERP; the internal scope carries no
    /// explicit secondary order.
    async fn list_categories(&self, scope: CategoryScope) -> RepositoryResult<Vec<RawCategory>>;

    /// Number of published products assigned directly to the category.
    async fn count_published_products(
        &self,
        scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<ProductCount>;
}

/// Read operations for product templates.
pub trait ProductReader {
    /// List published products ordered by name.
    async fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;

    /// List published products assigned to one category.
    async fn list_products_by_category(
        &self,
        scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<Vec<Product>>;

    /// Recently moved published, in-stock products.
    async fn list_bestsellers(&self, limit: u32) -> RepositoryResult<Vec<Product>>;

    /// Most recently created published products.
    async fn list_new_arrivals(&self, limit: u32) -> RepositoryResult<Vec<Product>>;

    /// Retrieve a single product by its identifier.
    async fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Read operations for ribbons.
pub trait RibbonReader {
    async fn list_ribbons(&self) -> RepositoryResult<Vec<Ribbon>>;
}

fn decode<T: DeserializeOwned>(value: Value, what: &'static str) -> RepositoryResult<T> {
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::UnexpectedPayload(format!("{what}: {e}")))
}

/// An ERP many-to-one reference: `false` when unset, `[id, display_name]`
/// when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Many2One {
    Unset(bool),
    Set(i64, String),
}

impl Many2One {
    fn into_pair(self) -> Option<(i64, String)> {
        match self {
            Self::Set(id, name) => Some((id, name)),
            Self::Unset(_) => None,
        }
    }
}

impl Default for Many2One {
    fn default() -> Self {
        Self::Unset(false)
    }
}

/// An ERP text field: `false` when unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum TextOrFalse {
    Text(String),
    Unset(bool),
}

impl TextOrFalse {
    fn into_option(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Unset(_) => None,
        }
    }

    fn unwrap_or_default(self) -> String {
        self.into_option().unwrap_or_default()
    }
}

impl Default for TextOrFalse {
    fn default() -> Self {
        Self::Unset(false)
    }
}
