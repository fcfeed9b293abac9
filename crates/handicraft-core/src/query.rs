//! Filtering, text search, and ordering over the in-memory catalog.

use std::collections::HashSet;

use crate::coerce;
use crate::product::Product;

/// A product field the text query can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    Model,
    Description,
    Design,
}

impl SearchField {
    fn value(self, product: &Product) -> Option<&str> {
        match self {
            SearchField::Name => Some(&product.name),
            SearchField::Model => Some(&product.model),
            SearchField::Description => Some(&product.description),
            SearchField::Design => product.design.as_deref(),
        }
    }
}

/// Deployment-level search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub fields: Vec<SearchField>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fields: vec![
                SearchField::Name,
                SearchField::Model,
                SearchField::Description,
            ],
        }
    }
}

impl SearchOptions {
    /// Default fields, plus [`SearchField::Design`] when `include_design` is set.
    #[must_use]
    pub fn with_design(include_design: bool) -> Self {
        let mut options = Self::default();
        if include_design {
            options.fields.push(SearchField::Design);
        }
        options
    }
}

/// Per-request criteria. Empty criteria select the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Free text, trimmed and case-folded before matching.
    pub query: Option<String>,
    /// Raw id tokens; tokens that are not integers are ignored.
    pub ids: Vec<String>,
}

impl SearchCriteria {
    /// Builds criteria from the `q` and comma-separated `ids` query parameters.
    #[must_use]
    pub fn from_params(query: Option<&str>, ids: Option<&str>) -> Self {
        Self {
            query: query.map(ToOwned::to_owned),
            ids: ids
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| raw.split(',').map(ToOwned::to_owned).collect())
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.ids = ids.into_iter().map(|id| id.to_string()).collect();
        self
    }

    fn allowed_ids(&self) -> Option<HashSet<i64>> {
        if self.ids.is_empty() {
            return None;
        }
        Some(self.ids.iter().filter_map(|t| coerce::id_token(t)).collect())
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// Ordering applied to the id listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdOrder {
    /// The order records were loaded in.
    #[default]
    LoadOrder,
    Ascending,
}

impl IdOrder {
    pub fn apply(self, ids: &mut [i64]) {
        if self == IdOrder::Ascending {
            ids.sort_unstable();
        }
    }
}

/// Returns the products matching `criteria`, ascending by id.
///
/// The id allow-list narrows first, then the text query. A non-empty id list
/// whose tokens are all malformed matches nothing.
#[must_use]
pub fn search(
    products: &[Product],
    criteria: &SearchCriteria,
    options: &SearchOptions,
) -> Vec<Product> {
    let allowed = criteria.allowed_ids();
    let needle = criteria.needle();

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| allowed.as_ref().is_none_or(|ids| ids.contains(&p.id)))
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|q| matches_text(p, q, &options.fields))
        })
        .cloned()
        .collect();

    matched.sort_by_key(|p| p.id);
    matched
}

fn matches_text(product: &Product, needle: &str, fields: &[SearchField]) -> bool {
    fields
        .iter()
        .filter_map(|field| field.value(product))
        .any(|value| value.to_lowercase().contains(needle))
}
