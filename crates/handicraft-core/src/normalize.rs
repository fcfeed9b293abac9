//! Normalization from loosely-shaped JSON records to [`Product`].
//!
//! Every canonical field has an ordered list of accepted source field names
//! (see [`aliases`]). The first alias whose value can be read wins; when none
//! can, the field takes its default. Only the id is mandatory.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::coerce;
use crate::product::{Product, DEFAULT_MODEL, UNNAMED_PRODUCT};

/// Accepted source field names per canonical field, highest priority first.
pub mod aliases {
    pub const ID: &[&str] = &["id"];
    pub const NAME: &[&str] = &["name"];
    pub const PRICE: &[&str] = &["price"];
    pub const DESCRIPTION: &[&str] = &["description"];
    pub const IMAGE_URL: &[&str] = &["image_url", "image"];
    pub const MODEL: &[&str] = &["model", "category"];
    pub const SIZE: &[&str] = &["size", "sizes"];
    /// `stok` is the field name older exports use; it takes precedence.
    pub const STOCK: &[&str] = &["stok", "stock"];
    pub const DESIGN: &[&str] = &["design"];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no id")]
    MissingId,

    #[error("record id {raw} is not an integer")]
    InvalidId { raw: String },
}

/// Normalizes one raw record into a [`Product`].
///
/// # Errors
///
/// Returns [`NormalizeError`] when the record is not an object or its id
/// cannot be read as an integer. All other fields fall back to defaults.
pub fn normalize(raw: &Value) -> Result<Product, NormalizeError> {
    let record = raw.as_object().ok_or(NormalizeError::NotAnObject)?;
    let id = read_id(record)?;

    Ok(Product {
        id,
        name: first(record, aliases::NAME, coerce::text)
            .unwrap_or_else(|| UNNAMED_PRODUCT.to_string()),
        price: first(record, aliases::PRICE, coerce::number).unwrap_or(0.0),
        description: first(record, aliases::DESCRIPTION, coerce::text).unwrap_or_default(),
        image_url: first(record, aliases::IMAGE_URL, coerce::text).unwrap_or_default(),
        model: first(record, aliases::MODEL, coerce::text)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        size: first(record, aliases::SIZE, coerce::text).unwrap_or_default(),
        stock: first(record, aliases::STOCK, coerce::count).unwrap_or(0),
        design: first(record, aliases::DESIGN, coerce::text),
    })
}

fn read_id(record: &Map<String, Value>) -> Result<i64, NormalizeError> {
    let raw = aliases::ID
        .iter()
        .filter_map(|name| record.get(*name))
        .find(|value| !value.is_null())
        .ok_or(NormalizeError::MissingId)?;

    coerce::integer(raw).ok_or_else(|| NormalizeError::InvalidId {
        raw: raw.to_string(),
    })
}

/// Returns the first alias whose value is non-null and readable by `read`.
fn first<T>(
    record: &Map<String, Value>,
    names: &[&str],
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .filter(|value| !value.is_null())
        .find_map(read)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
