use axum::{
    body::{self, Body},
    extract::State,
    routing::post,
    Router,
    Json,
    http::Method,
};
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::ReconciliationReport,
    services::file_processor,
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/receivables/analyze", post(analyze_receivables))
        .layer(cors)
}

/// Accepts the raw `.xlsx` bytes as the request body and answers with the
/// reconciled report. Each upload is processed from scratch.
///
/// The body is buffered up to `max_file_size`; anything larger is refused
/// as invalid input without reading the rest.
async fn analyze_receivables(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<Json<ReconciliationReport>, AppError> {
    let start = std::time::Instant::now();
    let max_file_size = state.config.max_file_size;

    let file_data = body::to_bytes(body, max_file_size).await.map_err(|e| {
        tracing::error!("Rejected upload over {} bytes: {}", max_file_size, e);
        AppError::InvalidInput(format!(
            "File exceeds the {} byte limit or could not be read",
            max_file_size
        ))
    })?;

    if file_data.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()));
    }

    tracing::info!("Received workbook upload, size: {}KB", file_data.len() / 1024);

    let layout = state.config.layout.clone();
    let report = tokio::task::spawn_blocking(move || {
        file_processor::process_workbook(file_data, &layout)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Workbook processing task failed: {}", e)))??;

    tracing::info!(
        "Analysis completed in {:?}: {} customers, {} warnings",
        start.elapsed(),
        report.rows.len(),
        report.warnings.len()
    );

    Ok(Json(report))
}
