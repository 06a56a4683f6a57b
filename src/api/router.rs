use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::service::{ServiceError, TransactionService};
use crate::upstream::UpstreamClient;

#[derive(Debug, Default, Deserialize)]
struct AnalyticsQuery {
    account_id: Option<String>
}

/// Binds the boundary handlers to their routes. The body of `POST /process` is taken as raw
/// text so that malformed JSON and a missing id share one `422` path.
pub fn router<U: UpstreamClient>(service: Arc<TransactionService<U>>) -> Router {
    Router::new()
        .route("/process", post(submit::<U>))
        .route("/process/batch", post(trigger_batch::<U>))
        .route("/analytics", get(analytics::<U>))
        .route("/health", get(health::<U>))
        .with_state(service)
}

async fn submit<U: UpstreamClient>(State(service): State<Arc<TransactionService<U>>>, body: String) -> Result<impl IntoResponse, ServiceError> {
    let response = service.submit_json(&body).await?;

    Ok((StatusCode::ACCEPTED, Json(response)))
}

async fn trigger_batch<U: UpstreamClient>(State(service): State<Arc<TransactionService<U>>>) -> impl IntoResponse {
    Json(service.trigger_batch().await)
}

async fn analytics<U: UpstreamClient>(State(service): State<Arc<TransactionService<U>>>, Query(query): Query<AnalyticsQuery>) -> impl IntoResponse {
    Json(service.analytics(query.account_id.as_deref()).await)
}

async fn health<U: UpstreamClient>(State(service): State<Arc<TransactionService<U>>>) -> impl IntoResponse {
    Json(service.health())
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        warn!("Rejected submission: {self}");

        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
