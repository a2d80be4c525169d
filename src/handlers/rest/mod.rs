//! REST API for the dashboard.
//!
//! Thin JSON adapter over [`DashboardService`]. Endpoints:
//! - `GET /api/health`: liveness
//! - `GET /api/revenue`: revenue series
//! - `GET /api/invoices/latest`: five newest invoices
//! - `GET /api/cards`: summary cards
//! - `GET /api/invoices?query=&page=`: one page of matching invoices
//! - `GET /api/invoices/pages?query=`: page count for a search
//! - `GET /api/invoices/{id}`: invoice for the edit form
//! - `GET /api/customers`: customer id/name list
//! - `GET /api/customers/table?query=`: customers with rollups

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::model::{
    CardData, CustomerField, CustomerTableRow, InvoiceForm, InvoiceTableRow, LatestInvoice,
    Revenue,
};
use crate::services::{DashboardService, QueryError};

/// Shared state for axum handlers.
type AppState = Arc<DashboardService>;

/// Start the REST server on the configured address.
///
/// When the port is 0, the OS assigns an ephemeral port. The actual bound
/// port is always logged so it can be discovered.
pub async fn serve(
    service: Arc<DashboardService>,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let actual_port = listener.local_addr()?.port();
    info!(host = %config.host, port = actual_port, "dashboard REST API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            // A failed signal handler leaves the server running until killed
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(service: Arc<DashboardService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/revenue", get(revenue))
        .route("/api/cards", get(cards))
        .route("/api/invoices", get(invoices))
        .route("/api/invoices/latest", get(latest_invoices))
        .route("/api/invoices/pages", get(invoice_pages))
        .route("/api/invoices/{id}", get(invoice_by_id))
        .route("/api/customers", get(customers))
        .route("/api/customers/table", get(customer_table))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn revenue(State(service): State<AppState>) -> Result<Json<Vec<Revenue>>, ApiError> {
    Ok(Json(service.fetch_revenue().await?))
}

async fn latest_invoices(
    State(service): State<AppState>,
) -> Result<Json<Vec<LatestInvoice>>, ApiError> {
    Ok(Json(service.fetch_latest_invoices().await?))
}

async fn cards(State(service): State<AppState>) -> Result<Json<CardData>, ApiError> {
    Ok(Json(service.fetch_card_data().await?))
}

async fn invoices(
    State(service): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<InvoiceTableRow>>, ApiError> {
    let rows = service
        .fetch_filtered_invoices(&params.query, params.page())
        .await?;
    Ok(Json(rows))
}

async fn invoice_pages(
    State(service): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PagesResponse>, ApiError> {
    let total_pages = service.fetch_invoices_pages(&params.query).await?;
    Ok(Json(PagesResponse { total_pages }))
}

async fn invoice_by_id(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceForm>, ApiError> {
    Ok(Json(service.fetch_invoice_by_id(&id).await?))
}

async fn customers(State(service): State<AppState>) -> Result<Json<Vec<CustomerField>>, ApiError> {
    Ok(Json(service.fetch_customers().await?))
}

async fn customer_table(
    State(service): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CustomerTableRow>>, ApiError> {
    Ok(Json(service.fetch_filtered_customers(&params.query).await?))
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Search string and page number from the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchParams {
    query: String,
    page: Option<String>,
}

impl SearchParams {
    /// Requested page; anything missing or non-numeric reads as page 1.
    fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Serialize)]
struct PagesResponse {
    total_pages: u64,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`QueryError`] onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QueryError::InvoiceNotFound { .. } => StatusCode::NOT_FOUND,
            QueryError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
