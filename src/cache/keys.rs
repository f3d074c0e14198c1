//! Cache key scheme, mirrored from the storefront's Redis-era key layout so
//! operators see familiar names in logs and the status endpoint.

use serde::Deserialize;
use std::fmt::{Display, Formatter};

use crate::domain::category::CategoryScope;
use crate::domain::types::CategoryId;

/// Identifies one cached resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full published-product listing.
    Products,
    /// Flat category list with rollup counts, per scope.
    Categories(CategoryScope),
    Ribbons,
    Bestsellers,
    NewArrivals,
    /// Published products filtered by one category.
    ProductsByCategory(CategoryScope, CategoryId),
    /// A single product resolved from its storefront slug.
    ProductBySlug(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Products => write!(f, "erp:products:all"),
            Self::Categories(CategoryScope::Internal) => write!(f, "erp:categories"),
            Self::Categories(CategoryScope::Public) => write!(f, "erp:categories:public"),
            Self::Ribbons => write!(f, "erp:ribbons"),
            Self::Bestsellers => write!(f, "erp:products:bestsellers"),
            Self::NewArrivals => write!(f, "erp:products:new-arrivals"),
            Self::ProductsByCategory(CategoryScope::Internal, id) => {
                write!(f, "erp:products:category:{id}")
            }
            Self::ProductsByCategory(CategoryScope::Public, id) => {
                write!(f, "erp:products:public-category:{id}")
            }
            Self::ProductBySlug(slug) => write!(f, "erp:product:slug:{slug}"),
        }
    }
}

/// Resource families an operator can clear in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheGroup {
    Products,
    Categories,
    Ribbons,
    All,
}

impl CacheGroup {
    /// Whether a stored key belongs to this family.
    pub fn matches(self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Products => {
                key.starts_with("erp:products:") || key.starts_with("erp:product:")
            }
            Self::Categories => key.starts_with("erp:categories"),
            Self::Ribbons => key == "erp:ribbons",
        }
    }
}

impl Display for CacheGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Products => write!(f, "products"),
            Self::Categories => write!(f, "categories"),
            Self::Ribbons => write!(f, "ribbons"),
            Self::All => write!(f, "all"),
        }
    }
}
