pub mod categories;
pub mod errors;
pub mod products;
pub mod ribbons;

pub use errors::{ServiceError, ServiceResult};
