//! Promotional ribbons shown on product cards ("Sale", "New!", "Sold out").

use serde::{Deserialize, Serialize};

use crate::domain::types::RibbonId;

/// A product ribbon as configured in the ERP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ribbon {
    pub id: RibbonId,
    pub name: String,
    pub html: String,
    pub bg_color: String,
    pub text_color: String,
}
