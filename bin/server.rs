// Museum Representation Dashboard - Web Server
// JSON page views + CSV downloads with Axum

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use museum_representation::{
    export_filtered, write_words_csv, Column, Dashboard, DashboardConfig, Dataset, Page, PageParams,
    SubstringFilter, EXPORT_FILE_NAME, VERSION,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

/// Entry of GET /api/pages
#[derive(Serialize)]
struct PageSummary {
    slug: &'static str,
    title: &'static str,
}

/// Query string of GET /api/pages/:page
#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    word_count: Option<usize>,
    min_count: Option<usize>,
    search: Option<String>,
    highlights: Option<bool>,
}

impl PageQuery {
    fn into_params(self, defaults: PageParams) -> PageParams {
        PageParams {
            word_count: self.word_count.unwrap_or(defaults.word_count),
            min_count: self.min_count.unwrap_or(defaults.min_count),
            search: self.search.unwrap_or(defaults.search),
            show_highlights: self.highlights.unwrap_or(defaults.show_highlights),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExportQuery {
    search: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/pages - Navigation list
async fn list_pages() -> impl IntoResponse {
    let pages: Vec<PageSummary> = Page::ALL
        .iter()
        .map(|p| PageSummary {
            slug: p.slug(),
            title: p.title(),
        })
        .collect();

    Json(ApiResponse::ok(pages))
}

/// GET /api/pages/:page - One rendered page
async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let Some(page) = Page::from_slug(&slug) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(format!("Unknown page: {}", slug))),
        )
            .into_response();
    };

    let params = query.into_params(state.dashboard.default_params());
    let dashboard = Arc::clone(&state.dashboard);

    // Loading and aggregation are blocking work
    match tokio::task::spawn_blocking(move || dashboard.render(page, &params)).await {
        Ok(view) => {
            let failed = view.is_error();
            let body = ApiResponse {
                success: !failed,
                data: view,
                error: failed.then(|| "Page dataset could not be loaded".to_string()),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(page = %slug, error = %e, "render task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure("Render task failed")),
            )
                .into_response()
        }
    }
}

/// GET /api/export/:dataset - CSV download of a dataset, optionally filtered
async fn export_dataset(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ExportQuery>,
    headers: HeaderMap,
) -> Response {
    // Decode URL-encoded dataset name
    let decoded = urlencoding::decode(&name)
        .unwrap_or_else(|_| name.clone().into())
        .into_owned();

    let Some(dataset) = Dataset::from_slug(&decoded) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(format!("Unknown dataset: {}", decoded))),
        )
            .into_response();
    };

    let dashboard = Arc::clone(&state.dashboard);
    let search = query.search.unwrap_or_default();
    let result = tokio::task::spawn_blocking(move || build_export(&dashboard, dataset, &search)).await;

    let (fingerprint, bytes) = match result {
        Ok(Ok(export)) => export,
        Ok(Err(e)) => {
            error!(dataset = dataset.slug(), error = %e, "export failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::failure(format!("{:#}", e))),
            )
                .into_response();
        }
        Err(e) => {
            error!(dataset = dataset.slug(), error = %e, "export task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure("Export task failed")),
            )
                .into_response();
        }
    };

    let etag = format!("\"{}\"", fingerprint);
    if headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == etag)
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let mut response = (StatusCode::OK, bytes).into_response();
    let response_headers = response.headers_mut();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8"));
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME)) {
        response_headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response_headers.insert(header::ETAG, value);
    }
    response
}

/// Fingerprint + CSV bytes for one dataset
fn build_export(dashboard: &Dashboard, dataset: Dataset, search: &str) -> Result<(String, Vec<u8>)> {
    match dashboard.artist_dataset(dataset) {
        Some(table) => {
            let table = table.with_context(|| format!("Failed to load {}", dataset.title()))?;
            let filter = SubstringFilter::new(search, &[Column::Name, Column::Nationality]);
            Ok((table.fingerprint.clone(), export_filtered(&table, &filter)?))
        }
        None => {
            let words = dashboard.words().context("Failed to load word frequencies")?;
            let mut buffer = Vec::new();
            write_words_csv(&words, &mut buffer)?;
            Ok((words.fingerprint.clone(), buffer))
        }
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

fn router(state: AppState) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/pages", get(list_pages))
        .route("/pages/:page", get(get_page))
        .route("/export/:dataset", get(export_dataset))
        .with_state(state);

    // Build main router
    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    println!("🌐 Museum Representation Dashboard - Web Server v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let args: Vec<String> = env::args().collect();
    let config = match args.iter().position(|a| a == "--config").and_then(|i| args.get(i + 1)) {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => DashboardConfig::default(),
    };
    println!("✓ Data directory: {}", config.data_dir.display());

    let addr = config.server_addr.clone();
    let dashboard = Dashboard::new(config).context("Failed to build dashboard")?;

    // Create shared state
    let state = AppState {
        dashboard: Arc::new(dashboard),
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "listening");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/pages", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state))
        .await
        .context("Server terminated")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tower::ServiceExt;

    fn state_with(dir: &std::path::Path) -> AppState {
        let dashboard = Dashboard::new(DashboardConfig::with_data_dir(dir)).unwrap();
        AppState {
            dashboard: Arc::new(dashboard),
        }
    }

    async fn send(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_page_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(router(state_with(dir.path())), "/api/pages/about").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_dataset_reported_in_page() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(router(state_with(dir.path())), "/api/pages/large-institutions").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["sections"][0]["type"], "notice");
    }

    #[tokio::test]
    async fn test_export_sets_download_headers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("combinedSmallandLargeFinal.csv"),
            "DisplayName,Nationality,Ethnicity,BeginDate\nEl Anatsui,Ghanaian,African,1944\nAndy Warhol,American,,1928\n",
        )
        .unwrap();
        let app = router(state_with(dir.path()));

        let response = send(app.clone(), "/api/export/combined?search=ghana").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(EXPORT_FILE_NAME));
        let etag = response.headers()[header::ETAG].clone();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "DisplayName,Nationality,Ethnicity,BeginDate\nEl Anatsui,Ghanaian,African,1944\n"
        );

        let cached = app
            .oneshot(
                Request::builder()
                    .uri("/api/export/combined?search=ghana")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);
    }
}
