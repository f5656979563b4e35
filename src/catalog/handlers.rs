use super::store::WineCatalog;
use super::types::{ErrorResponse, ListParams, Wine, WineFilter, WineStats};
use crate::model::types::ItemId;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_list_wines(
    Query(params): Query<ListParams>,
    Extension(catalog): Extension<Arc<WineCatalog>>,
) -> Json<Vec<Wine>> {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);
    Json(catalog.list(skip, limit))
}

pub async fn handle_get_wine(
    Path(wine_id): Path<ItemId>,
    Extension(catalog): Extension<Arc<WineCatalog>>,
) -> Response {
    match catalog.get(wine_id) {
        Some(wine) => (StatusCode::OK, Json(wine)).into_response(),
        None => {
            tracing::debug!("Wine {} not found", wine_id);
            wine_not_found().into_response()
        }
    }
}

pub async fn handle_search_wines(
    Query(filter): Query<WineFilter>,
    Extension(catalog): Extension<Arc<WineCatalog>>,
) -> Json<Vec<Wine>> {
    let wines = catalog.search(&filter);
    tracing::debug!("Search {:?} matched {} wines", filter, wines.len());
    Json(wines)
}

pub async fn handle_wine_stats(Extension(catalog): Extension<Arc<WineCatalog>>) -> Json<WineStats> {
    Json(catalog.stats())
}

pub(crate) fn wine_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: "wine not found".to_string(),
        }),
    )
}
