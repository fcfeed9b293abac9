use serde::Serialize;

/// Name given to records that arrive without one.
pub const UNNAMED_PRODUCT: &str = "unnamed product";

/// Model given to records with neither a `model` nor a `category`.
pub const DEFAULT_MODEL: &str = "product";

/// A catalog entry in canonical form.
///
/// Only [`crate::normalize`] builds these from raw records, so every field is
/// always populated with either source data or its documented default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    /// Product line or category, e.g. `"vase"`.
    pub model: String,
    pub size: String,
    pub stock: i64,
    /// Decorative pattern name. Only present in document-store exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
}

impl Product {
    /// A product with the given id and every other field at its default.
    #[must_use]
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            name: UNNAMED_PRODUCT.to_string(),
            price: 0.0,
            description: String::new(),
            image_url: String::new(),
            model: DEFAULT_MODEL.to_string(),
            size: String::new(),
            stock: 0,
            design: None,
        }
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
