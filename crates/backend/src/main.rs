mod assets;
mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use assets::PartnerData;
use config::ServerConfig;

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
/// The data file is read once at startup. Browsers revalidate on every load so a
/// restart with new data is picked up without waiting out a cached copy.
const CACHE_REVALIDATE: &str = "no-cache";

#[derive(Clone)]
struct AppState {
    data: Option<Arc<PartnerData>>,
    index_path: PathBuf,
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

async fn partner_orgs(State(state): State<AppState>) -> Response {
    match state.data {
        Some(data) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, CACHE_REVALIDATE),
            ],
            data.bytes.clone(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "partner data unavailable").into_response(),
    }
}

async fn serve_index(State(state): State<AppState>) -> Html<String> {
    // Try to serve the built frontend, fall back to a simple message
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Partner Organizations</title></head>
<body>
<h1>Partner Organizations</h1>
<p>Frontend not built yet. Run <code>dx bundle</code> in <code>crates/frontend</code>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

/// Build the full application router.
fn build_app(dist_dir: &Path, data: Option<Arc<PartnerData>>) -> Router {
    let state = AppState {
        data,
        index_path: dist_dir.join("index.html"),
    };

    // Hashed bundle assets never change; everything else in dist revalidates daily
    let static_files = Router::new()
        .nest(
            "/assets",
            cached_static_router(&dist_dir.join("assets"), CACHE_IMMUTABLE),
        )
        .fallback_service(cached_static_router(dist_dir, CACHE_1DAY));

    Router::new()
        .route("/", get(serve_index))
        .route("/partner_orgs.json", get(partner_orgs))
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // A bad data file is not fatal: the page loads and logs the failed fetch.
    let data = match PartnerData::load(&config.data_path) {
        Ok(data) => {
            tracing::info!(
                records = data.records,
                categories = data.categories,
                path = %config.data_path.display(),
                "Loaded partner data"
            );
            Some(Arc::new(data))
        }
        Err(e) => {
            tracing::error!(error = %e, "Partner data unavailable");
            None
        }
    };

    let app = build_app(&config.dist_dir, data);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        port = config.port,
        dist = %config.dist_dir.display(),
        "Server running at http://localhost:{}",
        config.port
    );
    axum::serve(listener, app).await
}
