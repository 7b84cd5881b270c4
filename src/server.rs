//! HTTP surface for the dashboard.
//!
//! ## Routes
//!
//! - `GET /`: the single-page dashboard.
//! - `GET /api/controls`: slider bounds, step and rating options.
//! - `GET /api/views?price_min=..&price_max=..&min_rating=..&seq=..`: all
//!   three views for one input, as a single JSON document.
//! - `GET /health`: `{ "ok": true, "records": n }`.
//!
//! The page tags each request with an increasing `seq`, which comes back as
//! `generation`; responses older than the newest request are discarded, so
//! the display always reflects the latest input.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::state::{Dashboard, FilterInput};

const DASHBOARD_PAGE: &str = include_str!("../assets/dashboard.html");

/// Query string of `GET /api/views`. Missing bounds default to the full
/// price range; a missing rating means "all ratings".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub min_rating: Option<f64>,
    pub seq: Option<u64>,
}

impl ViewQuery {
    fn to_input(&self, dashboard: &Dashboard) -> FilterInput {
        let full = dashboard.initial_input();
        FilterInput {
            price_range: (
                self.price_min.unwrap_or(full.price_range.0),
                self.price_max.unwrap_or(full.price_range.1),
            ),
            min_rating: self.min_rating.unwrap_or(0.0),
        }
    }
}

/// Build the axum `Router` over a loaded dashboard.
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/health", get(health_handler))
        .route("/api/controls", get(controls_handler))
        .route("/api/views", get(views_handler))
        .with_state(dashboard)
}

/// Serve the dashboard until Ctrl-C.
pub async fn serve(dashboard: Arc<Dashboard>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

async fn page_handler() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

async fn health_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    Json(json!({ "ok": true, "records": dashboard.table().len() }))
}

async fn controls_handler(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    Json(dashboard.controls())
}

async fn views_handler(
    State(dashboard): State<Arc<Dashboard>>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let input = query.to_input(&dashboard);
    match input.to_criteria() {
        Ok(criteria) => {
            let views = dashboard.render(&criteria, query.seq.unwrap_or(0));
            log::debug!(
                "views seq={} matched={} for {criteria:?}",
                views.generation,
                views.matched
            );
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => {
            log::warn!("Rejected view request {query:?}: {e}");
            let views = dashboard.render_empty(query.seq.unwrap_or(0));
            let body = json!({ "error": e.to_string(), "seq": query.seq, "views": views });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
    }
}
