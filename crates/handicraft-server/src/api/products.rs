use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use handicraft_core::{Product, SearchCriteria};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_source_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub q: Option<String>,
    /// Comma-separated product ids.
    pub ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductList {
    items: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductIdList {
    ids: Vec<i64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductList>, ApiError> {
    let criteria = SearchCriteria::from_params(query.q.as_deref(), query.ids.as_deref());
    let items = state
        .store
        .search(&criteria, &state.search)
        .await
        .map_err(|e| map_source_error(req_id.0, &e))?;

    Ok(Json(ProductList { items }))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let Ok(id) = raw_id.parse::<i64>() else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("product id must be an integer, got \"{raw_id}\""),
        ));
    };

    let product = state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| map_source_error(req_id.0.clone(), &e))?;

    product
        .map(Json)
        .ok_or_else(|| ApiError::new(req_id.0, "not_found", format!("product {id} not found")))
}

pub(super) async fn list_product_ids(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ProductIdList>, ApiError> {
    let mut ids = state
        .store
        .list_ids()
        .await
        .map_err(|e| map_source_error(req_id.0, &e))?;
    state.id_order.apply(&mut ids);

    Ok(Json(ProductIdList { ids }))
}
