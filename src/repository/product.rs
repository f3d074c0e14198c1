//! Product reads against the ERP `product.template` model.

use serde::Deserialize;
use serde_json::json;

use crate::domain::category::CategoryScope;
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::types::{CategoryId, ProductId, ProductName, RibbonId};
use crate::repository::{
    ErpRepository, Many2One, ProductReader, RepositoryError, RepositoryResult, TextOrFalse, decode,
};

const PRODUCT_FIELDS: &[&str] = &[
    "id",
    "name",
    "list_price",
    "categ_id",
    "description_sale",
    "default_code",
    "qty_available",
    "website_url",
    "public_categ_ids",
    "website_ribbon_id",
    "allow_out_of_stock_order",
    "product_variant_ids",
];

const CATEGORY_LISTING_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct ErpProductRow {
    id: i64,
    name: String,
    #[serde(default)]
    list_price: f64,
    #[serde(default)]
    categ_id: Many2One,
    #[serde(default)]
    description_sale: TextOrFalse,
    #[serde(default)]
    default_code: TextOrFalse,
    #[serde(default)]
    qty_available: f64,
    #[serde(default)]
    website_url: TextOrFalse,
    #[serde(default)]
    public_categ_ids: Vec<i64>,
    #[serde(default)]
    website_ribbon_id: Many2One,
    #[serde(default)]
    allow_out_of_stock_order: bool,
    #[serde(default)]
    product_variant_ids: Vec<i64>,
}

impl ErpRepository {
    fn product_from_row(&self, row: ErpProductRow) -> RepositoryResult<Product> {
        let id = ProductId::new(row.id)
            .map_err(|e| RepositoryError::UnexpectedPayload(e.to_string()))?;
        let name = ProductName::new(row.name)
            .map_err(|e| RepositoryError::UnexpectedPayload(format!("product {id}: {e}")))?;

        let (category_id, category) = match row.categ_id.into_pair() {
            Some((cid, cname)) => {
                let cid = CategoryId::new(cid).map_err(|e| {
                    RepositoryError::UnexpectedPayload(format!("product {id}: {e}"))
                })?;
                (Some(cid), cname)
            }
            None => (None, "Uncategorized".to_string()),
        };

        let (ribbon_id, ribbon_name) = match row.website_ribbon_id.into_pair() {
            Some((rid, rname)) => (RibbonId::new(rid).ok(), Some(rname)),
            None => (None, None),
        };

        let public_category_ids = row
            .public_categ_ids
            .into_iter()
            .filter_map(|cid| CategoryId::new(cid).ok())
            .collect();

        let base = self.client().base_url();
        // The ERP's website URL is the SEO source of truth; fall back to a
        // name-derived slug only when it is missing.
        let url = row.website_url.into_option().unwrap_or_else(|| {
            format!(
                "/shop/{}-{}",
                name.as_str().to_lowercase().split_whitespace().collect::<Vec<_>>().join("-"),
                id
            )
        });
        let slug = url.trim_start_matches("/shop/").to_string();

        Ok(Product {
            image: format!("{base}/web/image/product.template/{id}/image_1920"),
            thumbnail: format!("{base}/web/image/product.template/{id}/image_512"),
            id,
            name,
            price: row.list_price,
            category,
            category_id,
            public_category_ids,
            description: row.description_sale.unwrap_or_default(),
            sku: row.default_code.unwrap_or_default(),
            in_stock: row.qty_available > 0.0 || row.allow_out_of_stock_order,
            qty_available: row.qty_available,
            ribbon_id,
            ribbon_name,
            url,
            slug,
            variant_ids: row.product_variant_ids,
        })
    }

    async fn search_products(
        &self,
        domain: serde_json::Value,
        kwargs: serde_json::Value,
    ) -> RepositoryResult<Vec<Product>> {
        let result = self
            .client()
            .call("product.template", "search_read", domain, kwargs)
            .await?;
        let rows: Vec<ErpProductRow> = decode(result, "product rows")?;
        rows.into_iter()
            .map(|row| self.product_from_row(row))
            .collect()
    }
}

impl ProductReader for ErpRepository {
    async fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        self.search_products(
            json!([[["is_published", "=", true]]]),
            json!({
                "fields": PRODUCT_FIELDS,
                "limit": query.limit,
                "offset": query.offset,
                "order": "name asc",
            }),
        )
        .await
    }

    async fn list_products_by_category(
        &self,
        scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<Vec<Product>> {
        let domain = match scope {
            CategoryScope::Internal => json!([[
                ["categ_id", "=", id.get()],
                ["is_published", "=", true],
            ]]),
            CategoryScope::Public => json!([[
                ["public_categ_ids", "in", [id.get()]],
                ["is_published", "=", true],
            ]]),
        };

        self.search_products(
            domain,
            json!({
                "fields": PRODUCT_FIELDS,
                "limit": CATEGORY_LISTING_LIMIT,
            }),
        )
        .await
    }

    async fn list_bestsellers(&self, limit: u32) -> RepositoryResult<Vec<Product>> {
        self.search_products(
            json!([[
                ["is_published", "=", true],
                ["qty_available", ">", 0],
            ]]),
            json!({
                "fields": PRODUCT_FIELDS,
                "limit": limit,
                "order": "write_date desc",
            }),
        )
        .await
    }

    async fn list_new_arrivals(&self, limit: u32) -> RepositoryResult<Vec<Product>> {
        self.search_products(
            json!([[["is_published", "=", true]]]),
            json!({
                "fields": PRODUCT_FIELDS,
                "limit": limit,
                "order": "create_date desc",
            }),
        )
        .await
    }

    async fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut products = self
            .search_products(
                json!([[["id", "=", id.get()]]]),
                json!({ "fields": PRODUCT_FIELDS }),
            )
            .await?;

        Ok(if products.is_empty() {
            None
        } else {
            Some(products.swap_remove(0))
        })
    }
}
