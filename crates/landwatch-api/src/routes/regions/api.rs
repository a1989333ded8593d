//! Region API endpoints - JSON API and HTMX partials

use crate::routes::search::page::{render_region_picker, render_suggestions};
use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use landwatch_core::{LegalDongCode, SearchState};
use std::collections::HashMap;

/// Suggestion list for the text typed so far
pub async fn htmx_region_suggest(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let query = params.get("region_query").map(String::as_str).unwrap_or("");
    let mut search = SearchState::default();
    search.search_regions(&state.regions, query);
    Html(render_suggestions(search.suggestions()))
}

/// Region picker after a suggestion was chosen
pub async fn htmx_region_select(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let code = params.get("code").map(String::as_str).unwrap_or("");
    let region = state.regions.find_by_code(code).ok_or_else(|| ApiError::NotFound {
        resource: format!("region {}", code),
    })?;

    let mut search = SearchState::default();
    search.select_region(region);
    Ok(Html(render_region_picker(
        &search.filter().region_code,
        search.region_query(),
        search.suggestions(),
    )))
}

/// Matching regions as JSON (`?q=`)
pub async fn api_regions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<LegalDongCode>> {
    let query = params.get("q").map(String::as_str).unwrap_or("");
    Json(state.regions.search(query))
}
