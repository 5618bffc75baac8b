//! Web server for the rendered map.
//!
//! The feed is fetched once at startup; the page is rendered from that
//! snapshot and served as-is. Axum owns connection handling, the
//! encoder is never re-entered.

use std::sync::Arc;

use axum::{Json, Router, extract::State, response::Html, routing::get};

use crate::map::{MapOptions, render_page};
use crate::models::FeatureCollection;
use crate::output::EncodedEvent;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub options: MapOptions,
}

/// Shared application state: the pre-rendered page and the encoded
/// event snapshot behind it.
#[derive(Clone)]
pub struct AppState {
    page: Arc<String>,
    events: Arc<Vec<EncodedEvent>>,
}

impl AppState {
    /// Render the page and encode the events for serving.
    #[must_use]
    pub fn new(collection: &FeatureCollection, options: &MapOptions) -> Self {
        let page = render_page(&collection.features, options);
        let events: Vec<EncodedEvent> =
            collection.features.iter().map(EncodedEvent::from).collect();
        Self {
            page: Arc::new(page),
            events: Arc::new(events),
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/events.json", get(events_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound.
pub async fn run_server(
    config: ServerConfig,
    collection: FeatureCollection,
) -> anyhow::Result<()> {
    let state = AppState::new(&collection, &config.options);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "serving map of {} events at http://{}",
        collection.features.len(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Main page handler - serves the rendered map.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.as_ref().clone())
}

/// Encoded-events endpoint for programmatic consumers.
async fn events_handler(State(state): State<AppState>) -> Json<Vec<EncodedEvent>> {
    Json(state.events.as_ref().clone())
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}
