//! Search API endpoints - JSON API and HTMX partials

use crate::error::status_for_code;
use crate::routes::{param_u32, param_u64};
use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use landwatch_core::{Bound, FilterField, SearchFilter, SearchOutcome, SearchState};
use serde_json::json;
use std::collections::HashMap;

use super::page::{render_filter_form, render_price_control, render_results};

/// Rebuild the search state from submitted form values
///
/// Date inputs arrive as `YYYY-MM-DD` and are normalized to `YYYYMMDD`.
pub fn state_from_params(params: &HashMap<String, String>) -> SearchState {
    let mut search = SearchState::new(SearchFilter::from_params(params));
    for field in [FilterField::StartDate, FilterField::EndDate] {
        let value = search.filter().get(field).to_string();
        search.update_field(field, &value);
    }
    search
}

/// Run the search the request asks for
///
/// A request carrying `total_pages` is a page change and is range-checked
/// against it; `Ok(None)` means the page was out of range.
async fn run_search(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Option<SearchState>, ApiError> {
    let mut search = state_from_params(params);
    let page = param_u32(params, "page").unwrap_or(1);

    match param_u32(params, "total_pages") {
        Some(total_pages) => {
            search.restore_pagination(
                param_u32(params, "current_page").unwrap_or(1),
                total_pages,
                param_u64(params, "total_size").unwrap_or(0),
            );
            if search.change_page(state.source.as_ref(), page).await?.is_none() {
                log::debug!("Ignoring page {} outside 1..={}", page, total_pages);
                return Ok(None);
            }
        }
        None => {
            search.search(state.source.as_ref(), page.max(1)).await?;
        }
    }
    Ok(Some(search))
}

/// Results table and pagination for the submitted filter
pub async fn htmx_search_results(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    Ok(match run_search(&state, &params).await? {
        Some(search) => Html(render_results(&search)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Apply one slider move and re-render the price control
pub async fn htmx_search_price(Query(params): Query<HashMap<String, String>>) -> Result<Html<String>, ApiError> {
    let bound: Bound = params
        .get("bound")
        .ok_or_else(|| ApiError::BadRequest {
            message: "bound is required".to_string(),
        })?
        .parse()
        .map_err(|message| ApiError::BadRequest { message })?;
    let value_name = match bound {
        Bound::Min => "min_step",
        Bound::Max => "max_step",
    };
    let value = param_u32(&params, value_name).ok_or_else(|| ApiError::BadRequest {
        message: format!("{} must be a number", value_name),
    })?;

    let mut search = state_from_params(&params);
    search.move_price(bound, value);
    Ok(Html(render_price_control(search.price_range())))
}

/// Filter form filled with the example query
pub async fn htmx_search_example(State(state): State<AppState>) -> Html<String> {
    let mut search = SearchState::default();
    search.load_example(chrono::Local::now().date_naive());
    let region_query = state
        .regions
        .find_by_code(&search.filter().region_code)
        .map(|dong| dong.full_name.as_str())
        .unwrap_or_default();
    Html(render_filter_form(search.filter(), region_query))
}

/// Search as JSON: outcome, page and pagination
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let search = match run_search(&state, &params).await? {
        Some(search) => search,
        None => {
            return Err(ApiError::BadRequest {
                message: "page is out of range".to_string(),
            })
        }
    };
    let status = match search.outcome() {
        Some(SearchOutcome::Failed { code, .. }) => status_for_code(*code),
        _ => StatusCode::OK,
    };
    let body = json!({
        "outcome": search.outcome(),
        "filter": search.filter(),
        "page": search.page(),
        "pagination": {
            "current": search.pagination().current,
            "total_pages": search.pagination().total_pages,
            "total_size": search.pagination().total_size,
            "window": search.pagination().window(),
        },
    });
    Ok((status, Json(body)).into_response())
}
