//! Wire-format structs returned by the HTTP routes. Domain types stay
//! snake_case internally; these carry the camelCase shape the storefront
//! frontend expects.

pub mod categories;
pub mod products;
