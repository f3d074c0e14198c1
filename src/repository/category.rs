//! Category reads against the ERP `product.category` and
//! `product.public.category` models.

use serde::Deserialize;
use serde_json::json;

use crate::domain::category::CategoryScope;
use crate::domain::types::{CategoryId, CategoryName, ProductCount};
use crate::repository::{
    CategoryReader, ErpRepository, Many2One, RawCategory, RepositoryError, RepositoryResult,
    decode,
};

#[derive(Debug, Deserialize)]
struct ErpCategoryRow {
    id: i64,
    name: String,
    #[serde(default)]
    parent_id: Many2One,
    #[serde(default)]
    child_id: Vec<i64>,
    #[serde(default)]
    sequence: Option<i64>,
}

impl TryFrom<ErpCategoryRow> for RawCategory {
    type Error = RepositoryError;

    fn try_from(row: ErpCategoryRow) -> Result<Self, Self::Error> {
        let id = CategoryId::new(row.id)
            .map_err(|e| RepositoryError::UnexpectedPayload(e.to_string()))?;
        let name = CategoryName::new(row.name)
            .map_err(|e| RepositoryError::UnexpectedPayload(format!("category {id}: {e}")))?;
        let parent = row
            .parent_id
            .into_pair()
            .map(|(pid, pname)| CategoryId::new(pid).map(|pid| (pid, pname)))
            .transpose()
            .map_err(|e| RepositoryError::UnexpectedPayload(format!("category {id}: {e}")))?;
        let child_ids = row
            .child_id
            .into_iter()
            .map(CategoryId::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::UnexpectedPayload(format!("category {id}: {e}")))?;

        Ok(RawCategory {
            id,
            name,
            parent,
            child_ids,
            // Internal categories carry no native sequence; they sort as
            // equals and keep the ERP's reported order.
            sequence: row.sequence.unwrap_or(0),
        })
    }
}

impl CategoryReader for ErpRepository {
    async fn list_categories(&self, scope: CategoryScope) -> RepositoryResult<Vec<RawCategory>> {
        let kwargs = match scope {
            CategoryScope::Internal => json!({
                "fields": ["id", "name", "parent_id", "child_id"],
            }),
            CategoryScope::Public => json!({
                "fields": ["id", "name", "parent_id", "child_id", "sequence"],
                "order": "sequence asc, name asc",
            }),
        };

        let result = self
            .client()
            .call(scope.erp_model(), "search_read", json!([[]]), kwargs)
            .await?;

        let rows: Vec<ErpCategoryRow> = decode(result, "category rows")?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_published_products(
        &self,
        scope: CategoryScope,
        id: CategoryId,
    ) -> RepositoryResult<ProductCount> {
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

        let result = self
            .client()
            .call("product.template", "search_count", domain, json!({}))
            .await?;

        let count = result.as_u64().ok_or_else(|| {
            RepositoryError::UnexpectedPayload(format!(
                "search_count for category {id} returned {result}"
            ))
        })?;

        Ok(ProductCount::new(count.min(u32::MAX as u64) as u32))
    }
}
