// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Local JSON API for presentation layers (camera app, dashboard)

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis::Analysis;
use crate::app::PlantVision;
use crate::catalog::PlantRecord;
use crate::history::HistoryStats;
use crate::PlantVisionError;

/// Shared application state
pub type AppState = Arc<PlantVision>;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps crate errors onto HTTP statuses
pub struct ApiError(PlantVisionError);

impl From<PlantVisionError> for ApiError {
    fn from(e: PlantVisionError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(api_status))
        .route("/api/catalog", get(api_catalog))
        .route("/api/analyze", post(api_analyze))
        .route("/api/history", get(api_list_history).delete(api_clear_history))
        .route("/api/history/export", get(api_export_history))
        .route("/api/history/import", post(api_import_history))
        .route("/api/history/:id", delete(api_delete_entry))
        .route("/api/stats", get(api_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub analyzer: String,
    pub catalog_size: usize,
    pub history_count: usize,
}

async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        analyzer: state.analyzer.name().to_string(),
        catalog_size: state.catalog.len(),
        history_count: state.history.list().len(),
    })
}

async fn api_catalog(State(state): State<AppState>) -> Json<Vec<PlantRecord>> {
    Json(state.catalog.records().to_vec())
}

#[derive(Deserialize)]
struct AnalyzeQuery {
    #[serde(default)]
    save: bool,
}

/// Body is the raw image, or a `data:` URI when sent as text
async fn api_analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
    body: Bytes,
) -> ApiResult<Json<Analysis>> {
    let analysis = match std::str::from_utf8(&body) {
        Ok(text) if text.trim_start().starts_with("data:") => {
            state.analyzer.analyze_data_url(text).await
        }
        _ => state.analyzer.analyze(&body).await,
    };
    if query.save {
        state.history.save(&analysis)?;
    }
    Ok(Json(analysis))
}

async fn api_list_history(State(state): State<AppState>) -> Json<Vec<Analysis>> {
    Json(state.history.list())
}

async fn api_clear_history(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.history.clear()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn api_delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.history.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn api_export_history(State(state): State<AppState>) -> ApiResult<Response> {
    let text = state.history.export_as_text()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"plant-vision-history.json\"",
            ),
        ],
        text,
    )
        .into_response())
}

#[derive(Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
}

async fn api_import_history(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<ImportResponse>> {
    let imported = state.history.try_import(&body)?;
    info!("Imported {} history entries via API", imported);
    Ok(Json(ImportResponse { imported }))
}

async fn api_stats(State(state): State<AppState>) -> Json<HistoryStats> {
    Json(state.history.statistics())
}

/// Start the API server
pub async fn start_server(app: PlantVision) -> crate::Result<()> {
    let addr = format!("{}:{}", app.config.web.host, app.config.web.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API available at http://{}", addr);

    let router = create_router(Arc::new(app));
    axum::serve(listener, router)
        .await
        .map_err(|e| crate::PlantVisionError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn state() -> AppState {
        Arc::new(PlantVision::in_memory(Arc::new(SequenceRandom::new([
            0.0, 0.1, 0.5,
        ]))))
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Body) -> Response {
        create_router(state.clone())
            .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_and_save() {
        let state = state();
        let response = send(&state, Method::POST, "/api/analyze?save=true", Body::from("AB")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let analysis: Analysis = json(response).await;
        assert_eq!(analysis.common_name, "Flamingo Flower");

        let response = send(&state, Method::GET, "/api/history", Body::empty()).await;
        let history: Vec<Analysis> = json(response).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, analysis.id);
    }

    #[tokio::test]
    async fn test_analyze_without_save_leaves_history() {
        let state = state();
        send(&state, Method::POST, "/api/analyze", Body::from("AB")).await;
        assert!(state.history.list().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let state = state();
        let response = send(&state, Method::POST, "/api/analyze?save=true", Body::from("x")).await;
        let a: Analysis = json(response).await;
        send(&state, Method::POST, "/api/analyze?save=true", Body::from("y")).await;

        let uri = format!("/api/history/{}", a.id);
        let response = send(&state, Method::DELETE, &uri, Body::empty()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.history.list().len(), 1);

        let response = send(&state, Method::DELETE, "/api/history/unknown", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&state, Method::DELETE, "/api/history", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.history.list().is_empty());
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let source = state();
        send(&source, Method::POST, "/api/analyze?save=true", Body::from("AB")).await;
        let response = send(&source, Method::GET, "/api/history/export", Body::empty()).await;
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let target = state();
        let response = send(&target, Method::POST, "/api/history/import", Body::from(text)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: ImportResponse = json(response).await;
        assert_eq!(body.imported, 1);
        assert_eq!(target.history.list(), source.history.list());
    }

    #[tokio::test]
    async fn test_import_rejection_is_bad_request() {
        let state = state();
        let response = send(
            &state,
            Method::POST,
            "/api/history/import",
            Body::from(r#"[{"id": "1"}]"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = json(response).await;
        assert!(body.error.starts_with("Validation error"));
    }

    #[tokio::test]
    async fn test_status_and_stats() {
        let state = state();
        send(&state, Method::POST, "/api/analyze?save=true", Body::from("AB")).await;

        let response = send(&state, Method::GET, "/api/status", Body::empty()).await;
        let status: StatusResponse = json(response).await;
        assert_eq!(status.catalog_size, 28);
        assert_eq!(status.history_count, 1);
        assert_eq!(status.analyzer, "hash-bucket");

        let response = send(&state, Method::GET, "/api/stats", Body::empty()).await;
        let stats: HistoryStats = json(response).await;
        assert_eq!(stats.total, 1);
        assert_eq!(stats.healthy_count, 1);
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let state = state();
        let response = send(&state, Method::GET, "/api/catalog", Body::empty()).await;
        let records: Vec<PlantRecord> = json(response).await;
        assert_eq!(records.len(), 28);
    }

    #[tokio::test]
    async fn test_analyze_accepts_data_url_body() {
        let state = state();
        let url = "data:image/jpeg;base64,QUI=";
        let response = send(&state, Method::POST, "/api/analyze", Body::from(url)).await;
        let analysis: Analysis = json(response).await;
        assert_eq!(analysis.photo, url);
        assert_eq!(analysis.common_name, "Flamingo Flower");
    }
}
