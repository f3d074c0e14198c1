//! Domain entities and value objects shared across layers.

pub mod category;
pub mod product;
pub mod ribbon;
pub mod types;
