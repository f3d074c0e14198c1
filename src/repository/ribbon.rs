//! Ribbon reads against the ERP `product.ribbon` model.

use serde::Deserialize;
use serde_json::json;

use crate::domain::ribbon::Ribbon;
use crate::domain::types::RibbonId;
use crate::repository::{
    ErpRepository, RepositoryError, RepositoryResult, RibbonReader, TextOrFalse, decode,
};

#[derive(Debug, Deserialize)]
struct ErpRibbonRow {
    id: i64,
    #[serde(default)]
    name: TextOrFalse,
    #[serde(default)]
    html: TextOrFalse,
    #[serde(default)]
    bg_color: TextOrFalse,
    #[serde(default)]
    text_color: TextOrFalse,
}

impl TryFrom<ErpRibbonRow> for Ribbon {
    type Error = RepositoryError;

    fn try_from(row: ErpRibbonRow) -> Result<Self, Self::Error> {
        let id = RibbonId::new(row.id)
            .map_err(|e| RepositoryError::UnexpectedPayload(e.to_string()))?;
        Ok(Ribbon {
            id,
            name: row.name.unwrap_or_default(),
            html: row.html.unwrap_or_default(),
            bg_color: row.bg_color.unwrap_or_default(),
            text_color: row.text_color.unwrap_or_default(),
        })
    }
}

impl RibbonReader for ErpRepository {
    async fn list_ribbons(&self) -> RepositoryResult<Vec<Ribbon>> {
        let result = self
            .client()
            .call(
                "product.ribbon",
                "search_read",
                json!([[]]),
                json!({ "fields": ["id", "name", "html", "bg_color", "text_color"] }),
            )
            .await?;

        let rows: Vec<ErpRibbonRow> = decode(result, "ribbon rows")?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ribbons_with_falsy_colors() {
        let row: ErpRibbonRow = serde_json::from_value(json!({
            "id": 2,
            "name": "Sale",
            "html": "<span>Sale</span>",
            "bg_color": false,
            "text_color": "#ffffff",
        }))
        .unwrap();

        let ribbon = Ribbon::try_from(row).unwrap();
        assert_eq!(ribbon.name, "Sale");
        assert_eq!(ribbon.bg_color, "");
        assert_eq!(ribbon.text_color, "#ffffff");
    }
}
