use super::engine::{DEFAULT_TOP_K, RecommendationEngine};
use super::types::{ItemId, ModelStatus};
use crate::catalog::handlers::wine_not_found;
use crate::catalog::store::WineCatalog;
use crate::catalog::types::{ErrorResponse, Wine};

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub top_k: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub wine_id: ItemId,
    pub count: usize,
    pub recommendations: Vec<Wine>,
}

pub async fn handle_model_status(
    Extension(engine): Extension<Arc<RecommendationEngine>>,
) -> Json<ModelStatus> {
    Json(engine.status())
}

pub async fn handle_recommendations(
    Path(wine_id): Path<ItemId>,
    Query(params): Query<RecommendParams>,
    Extension(engine): Extension<Arc<RecommendationEngine>>,
    Extension(catalog): Extension<Arc<WineCatalog>>,
) -> Response {
    if !catalog.contains(wine_id) {
        return wine_not_found().into_response();
    }

    let top_k = params.top_k.unwrap_or(DEFAULT_TOP_K);
    let ids = match engine.recommend(wine_id, top_k) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::debug!("Rejected recommendation request for {}: {}", wine_id, e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    if ids.is_empty() && !engine.is_loaded() {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "recommendation model is not loaded".to_string(),
        );
    }

    // Ids reflect the catalog at training time; drop the ones that have since disappeared.
    let recommendations = catalog.hydrate(&ids);
    if recommendations.len() < ids.len() {
        tracing::debug!(
            "{} recommended ids for {} are no longer in the catalog",
            ids.len() - recommendations.len(),
            wine_id
        );
    }

    (
        StatusCode::OK,
        Json(RecommendationResponse {
            wine_id,
            count: recommendations.len(),
            recommendations,
        }),
    )
        .into_response()
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { detail })).into_response()
}
