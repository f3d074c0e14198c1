use serde::Serialize;

use crate::domain::product::Product;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub category_id: Option<i64>,
    pub public_category_ids: Vec<i64>,
    pub image: String,
    pub thumbnail: String,
    pub description: String,
    pub sku: String,
    pub in_stock: bool,
    pub qty_available: f64,
    pub ribbon_id: Option<i64>,
    pub ribbon_name: Option<String>,
    pub url: String,
    pub slug: String,
    pub variant_ids: Vec<i64>,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            price: value.price,
            category: value.category,
            category_id: value.category_id.map(|id| id.get()),
            public_category_ids: value
                .public_category_ids
                .iter()
                .map(|id| id.get())
                .collect(),
            image: value.image,
            thumbnail: value.thumbnail,
            description: value.description,
            sku: value.sku,
            in_stock: value.in_stock,
            qty_available: value.qty_available,
            ribbon_id: value.ribbon_id.map(|id| id.get()),
            ribbon_name: value.ribbon_name,
            url: value.url,
            slug: value.slug,
            variant_ids: value.variant_ids,
        }
    }
}
