//! Product entities in the shape the storefront consumes.

use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, ProductId, ProductName, RibbonId};

/// A published product template, flattened from the ERP representation.
///
/// Image URLs are absolute (derived from the ERP base URL at fetch time) and
/// `slug` comes from the ERP's own website URL so storefront links match the
/// ERP's SEO routing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub price: f64,
    /// Internal category display name; "Uncategorized" when unset.
    pub category: String,
    pub category_id: Option<CategoryId>,
    pub public_category_ids: Vec<CategoryId>,
    pub image: String,
    pub thumbnail: String,
    pub description: String,
    pub sku: String,
    pub in_stock: bool,
    pub qty_available: f64,
    pub ribbon_id: Option<RibbonId>,
    pub ribbon_name: Option<String>,
    pub url: String,
    pub slug: String,
    pub variant_ids: Vec<i64>,
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Copy)]
pub struct ProductListQuery {
    pub limit: u32,
    pub offset: u32,
}

impl ProductListQuery {
    /// Listing size at and above which a full listing is assumed and the
    /// result becomes cacheable.
    pub const FULL_LISTING_LIMIT: u32 = 500;

    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::FULL_LISTING_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    /// Whether this query covers the full catalog listing. Only full
    /// listings are cached; partial pages always go to the ERP.
    pub fn is_full_listing(self) -> bool {
        self.offset == 0 && self.limit >= Self::FULL_LISTING_LIMIT
    }
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Extracts the trailing product id from a storefront slug such as
/// `ceramic-basin-white-42`.
pub fn product_id_from_slug(slug: &str) -> Option<ProductId> {
    let digits = slug.rsplit('-').next()?;
    let id: i64 = digits.parse().ok()?;
    ProductId::new(id).ok()
}
