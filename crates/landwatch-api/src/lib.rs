//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::search: Filter form, price slider, results and pagination
//! - routes::regions: Legal-dong typeahead
//! - routes::keywords: Per-user watch keywords
//! - routes::auth: Sign-in page
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;
pub mod session;

use axum::{
    http::{HeaderMap, Method},
    routing::{get, post},
    Router,
};
use landwatch_config::Config;
use landwatch_core::{KeywordSessions, RegionIndex, SourceRef, StoreRef};
use landwatch_utils::escape_html;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;
pub use session::Identity;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub regions: Arc<RegionIndex>,
    pub source: SourceRef,
    pub keywords: Arc<KeywordSessions>,
}

impl AppState {
    pub fn new(config: Config, regions: RegionIndex, source: SourceRef, store: StoreRef) -> Self {
        Self {
            config,
            regions: Arc::new(regions),
            source,
            keywords: Arc::new(KeywordSessions::new(store)),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::auth::page_signin;
    use routes::keywords::{
        api_keyword_add, api_keyword_delete, api_keywords, htmx_keyword_add, htmx_keyword_remove,
        htmx_keywords_list, page_dashboard,
    };
    use routes::regions::{api_regions, htmx_region_select, htmx_region_suggest};
    use routes::search::{api_search, htmx_search_example, htmx_search_price, htmx_search_results, page_search};
    use routes::settings::{api_settings, page_settings};

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/search", get(api_search))
        .route("/api/regions", get(api_regions))
        .route("/api/keywords", get(api_keywords).post(api_keyword_add).delete(api_keyword_delete))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_search))
        .route("/dashboard", get(page_dashboard))
        .route("/settings", get(page_settings))
        .route("/auth/signin", get(page_signin))
        // HTMX partial routes
        .route("/search/results", get(htmx_search_results))
        .route("/search/price", get(htmx_search_price))
        .route("/search/example", get(htmx_search_example))
        .route("/regions/suggest", get(htmx_region_suggest))
        .route("/regions/select", get(htmx_region_select))
        .route("/dashboard/keywords", get(htmx_keywords_list).post(htmx_keyword_add))
        .route("/dashboard/keywords/delete", post(htmx_keyword_remove))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Landwatch</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
    <script>
        document.addEventListener('mousedown', function (e) {{
            var list = document.getElementById('region-suggest');
            if (list && !e.target.closest('#region-picker')) {{ list.innerHTML = ''; }}
        }});
    </script>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str, identity: Option<&str>) -> String {
    let links = [
        ("/", "실거래 검색", "🔎"),
        ("/dashboard", "관심 키워드", "⭐"),
        ("/settings", "설정", "⚙️"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-blue-600'>Landwatch</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, icon) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-blue-50 text-blue-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul>");

    match identity {
        Some(email) => nav.push_str(&format!(
            "<div class='p-4 border-t text-sm text-gray-500 truncate'>{}</div>",
            escape_html(email)
        )),
        None => nav.push_str(&format!(
            "<div class='p-4 border-t'><a href='{}' class='text-sm text-blue-600 hover:underline'>로그인</a></div>",
            session::SIGN_IN_PATH
        )),
    }
    nav.push_str("</div>");
    nav
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(
    headers: &HeaderMap,
    title: &str,
    current_path: &str,
    identity: Option<&str>,
    inner_content: &str,
) -> String {
    if is_htmx_request(headers) {
        format!(
            "<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>",
            inner_content
        )
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path, identity), inner_content))
    }
}

/// Start the HTTP server
///
/// Binds `server.host:server.port` and serves until the process stops.
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_addr();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Landwatch server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Transaction search)");
    log::info!("  - /dashboard (Watch keywords)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}
