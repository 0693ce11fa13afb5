use serde::{Deserialize, Serialize};

/// Stock state shown on a product tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out Of Stock")]
    OutOfStock,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "In Stock"),
            StockStatus::OutOfStock => write!(f, "Out Of Stock"),
        }
    }
}

/// Text read from one product tile during a single extraction pass.
///
/// Every field degrades to an empty string (or the default flag) when the
/// tile lacks the corresponding sub-element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProductNode {
    /// Rendered heading text; may carry brand and title on separate lines.
    pub name: String,
    pub current_price: String,
    pub original_price: String,
    pub stock: StockStatus,
    pub sponsored: bool,
}

/// Site-independent product record as it appears under `data.products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_name: String,
    pub brand_name: String,
    /// Price text with the currency glyph removed, e.g. `"50"`.
    pub price: String,
    /// Integer percentage with a `%` suffix, `"0%"` when not computable.
    pub discount: String,
    pub stock: StockStatus,
}

/// A normalized product that still carries its sponsorship flag.
///
/// Sponsored entries keep this shape when they are moved into `data.ads`;
/// organic entries are reduced to [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    #[serde(flatten)]
    pub product: Product,
    pub sponsored: bool,
}

impl CanonicalProduct {
    /// Drops the sponsorship flag.
    #[must_use]
    pub fn into_product(self) -> Product {
        self.product
    }
}
