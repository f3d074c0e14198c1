use serde::Serialize;

use crate::domain::category::{Category, CategoryTree};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub parent_name: Option<String>,
    pub child_ids: Vec<i64>,
    pub sequence: i64,
    pub count: u32,
    pub total_count: u32,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            slug: value.slug,
            parent_id: value.parent_id.map(|id| id.get()),
            parent_name: value.parent_name,
            child_ids: value.child_ids.iter().map(|id| id.get()).collect(),
            sequence: value.sequence,
            count: value.count.get(),
            total_count: value.total_count.get(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTreeDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub children: Vec<CategoryTreeDto>,
}

impl From<CategoryTree> for CategoryTreeDto {
    fn from(value: CategoryTree) -> Self {
        Self {
            category: value.category.into(),
            children: value.children.into_iter().map(Into::into).collect(),
        }
    }
}
