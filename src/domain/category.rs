//! Category entities: the flat aggregated record and its nested tree form.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::domain::types::{CategoryId, CategoryName, ProductCount};

/// Which ERP taxonomy a category query targets.
///
/// The internal (back-office) and public (storefront) category sets are
/// disjoint in the ERP and live in different models.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    Internal,
    Public,
}

impl CategoryScope {
    /// ERP model holding categories for this scope.
    pub const fn erp_model(self) -> &'static str {
        match self {
            Self::Internal => "product.category",
            Self::Public => "product.public.category",
        }
    }
}

impl Display for CategoryScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// Flat category record with per-category and rolled-up product counts.
///
/// `total_count` is computed by the aggregator, never source-provided:
/// `total_count == count + Σ total_count(children)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    /// Derived purely from `name`; not guaranteed globally unique.
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    /// Denormalized copy of the parent's name at fetch time.
    pub parent_name: Option<String>,
    /// Direct child ids as reported by the ERP; may reference categories
    /// that were filtered out of the final set.
    pub child_ids: Vec<CategoryId>,
    pub sequence: i64,
    /// Published products assigned directly to this category.
    pub count: ProductCount,
    /// `count` plus the recursive total of all children.
    pub total_count: ProductCount,
}

/// A category plus its recursively built children.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryTree>,
}

/// Derives a URL slug from a display name: lower-cased, runs of
/// non-alphanumeric characters collapsed to a single hyphen, leading and
/// trailing hyphens stripped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Builds the nested tree form from a flat category list.
///
/// Roots are categories without a parent. Children are selected by matching
/// `parent_id`, built recursively and sorted by `sequence` (stable, so
/// equal-sequence siblings keep their input order). Categories whose parent
/// id is not present in the input are omitted entirely: they are neither
/// roots nor reachable as children.
///
/// Pure function over its input; calling it twice yields identical trees.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryTree> {
    let mut roots: Vec<CategoryTree> = categories
        .iter()
        .filter(|c| c.parent_id.is_none())
        .map(|c| build_node(c, categories))
        .collect();
    roots.sort_by_key(|node| node.category.sequence);
    roots
}

fn build_node(category: &Category, all: &[Category]) -> CategoryTree {
    let mut children: Vec<CategoryTree> = all
        .iter()
        .filter(|c| c.parent_id == Some(category.id))
        .map(|c| build_node(c, all))
        .collect();
    children.sort_by_key(|node| node.category.sequence);
    CategoryTree {
        category: category.clone(),
        children,
    }
}
