//! HTTP server for the dashboard.
//!
//! The dataset is loaded once at start-up and shared read-only with every
//! handler; tables and charts are recomputed per request.
//!
//! # API Endpoints
//!
//! | Method | Path                          | Description                        |
//! |--------|-------------------------------|------------------------------------|
//! | GET    | `/`                           | Dashboard page                     |
//! | GET    | `/health`                     | Health check                       |
//! | GET    | `/api/charts/demographic`     | Survival comparison (Plotly JSON)  |
//! | GET    | `/api/charts/families`        | Family-size comparison (Plotly JSON) |
//! | GET    | `/api/tables/survival`        | Survival summary rows              |
//! | GET    | `/api/tables/family-groups`   | Fare statistics by family size     |
//! | GET    | `/api/tables/family-size`     | Passengers with family size        |
//! | GET    | `/api/tables/last-names`      | Passengers per surname             |
//! | GET    | `/api/logs`                   | SSE stream for real-time logs      |

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, Json, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde::Serialize;
use serde_json::Value;
use std::{convert::Infallible, fmt::Display, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::page::index_html;
use super::types::{error_response, HealthResponse, TableResponse};
use crate::chart::{demographic_chart, family_chart, ChartRenderer, PlotlyRenderer};
use crate::dataset::Dataset;
use crate::error::DashboardResult;
use crate::transform::{family_groups, family_size, last_names, survival_demographics};

type ApiError = (StatusCode, Json<Value>);

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub renderer: PlotlyRenderer,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            renderer: PlotlyRenderer,
        }
    }
}

/// Build the router over an already-loaded dataset.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/charts/demographic", get(chart_demographic))
        .route("/api/charts/families", get(chart_families))
        .route("/api/tables/survival", get(table_survival))
        .route("/api/tables/family-groups", get(table_family_groups))
        .route("/api/tables/family-size", get(table_family_size))
        .route("/api/tables/last-names", get(table_last_names))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Serve an already-loaded dataset until the process is stopped.
pub async fn serve(dataset: Arc<Dataset>, port: u16) -> DashboardResult<()> {
    let app = router(AppState::new(dataset));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_success(format!("Dashboard running on http://localhost:{}", port));
    log_info("GET  /                  - Dashboard page");
    log_info("GET  /api/charts/*      - Plotly figures");
    log_info("GET  /api/tables/*      - Summary tables");
    log_info("GET  /api/logs          - SSE log stream");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<String> {
    Html(index_html())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "titanic-eda",
        version: env!("CARGO_PKG_VERSION"),
        passengers: state.dataset.len(),
        source: state.dataset.info().clone(),
    })
}

async fn chart_demographic(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows = survival_demographics(&state.dataset);
    let figure = state
        .renderer
        .render(&demographic_chart(&rows))
        .map_err(internal_error)?;
    Ok(Json(figure))
}

async fn chart_families(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let surnames = last_names(&state.dataset);
    let sizes = family_size(&state.dataset);
    let figure = state
        .renderer
        .render(&family_chart(&surnames, &sizes))
        .map_err(internal_error)?;
    Ok(Json(figure))
}

async fn table_survival(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table("survival", survival_demographics(&state.dataset))
}

async fn table_family_groups(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table("family-groups", family_groups(&state.dataset))
}

async fn table_family_size(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table("family-size", family_size(&state.dataset))
}

async fn table_last_names(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table("last-names", last_names(&state.dataset))
}

/// Tables borrow from the dataset, so they are serialized before the handler returns.
fn table<T: Serialize>(name: &str, rows: Vec<T>) -> Result<Json<Value>, ApiError> {
    let body = serde_json::to_value(TableResponse::new(name, rows)).map_err(internal_error)?;
    Ok(Json(body))
}

fn internal_error(err: impl Display) -> ApiError {
    log_error(format!("Request failed: {}", err));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&err.to_string())))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
