use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

pub use services::excel::{summarize, AnalysisResult, ColumnSummary, SummaryError};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self { config }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::analyze::routes(state.config.max_file_size))
        .with_state(state)
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
}
