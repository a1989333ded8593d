//! Keyword API endpoints - JSON API and HTMX partials

use crate::{ApiError, AppState, Identity};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::page::{render_keyword_panel, render_sign_in_prompt};

/// Form and JSON body for add / remove
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordForm {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordList {
    pub keywords: Vec<String>,
}

/// Current keyword panel
pub async fn htmx_keywords_list(State(state): State<AppState>, identity: Identity) -> Result<Html<String>, ApiError> {
    let Some(email) = identity.email() else {
        return Ok(Html(render_sign_in_prompt()));
    };
    let manager = state.keywords.acquire(email).await?;
    Ok(Html(render_keyword_panel(&manager)))
}

/// Add the submitted keyword and re-render the panel
///
/// A failed insert keeps the typed text and shows the error in the panel.
pub async fn htmx_keyword_add(
    State(state): State<AppState>,
    identity: Identity,
    Form(form): Form<KeywordForm>,
) -> Result<Html<String>, ApiError> {
    let Some(email) = identity.email() else {
        return Ok(Html(render_sign_in_prompt()));
    };
    let mut manager = state.keywords.acquire(email).await?;
    if let Err(e) = manager.add_keyword(&form.keyword).await {
        log::debug!("Keyword add for {} failed: {}", email, e);
    }
    Ok(Html(render_keyword_panel(&manager)))
}

/// Remove one keyword and re-render the panel
pub async fn htmx_keyword_remove(
    State(state): State<AppState>,
    identity: Identity,
    Form(form): Form<KeywordForm>,
) -> Result<Html<String>, ApiError> {
    let Some(email) = identity.email() else {
        return Ok(Html(render_sign_in_prompt()));
    };
    let mut manager = state.keywords.acquire(email).await?;
    if let Err(e) = manager.remove(&form.keyword).await {
        log::debug!("Keyword remove for {} failed: {}", email, e);
    }
    Ok(Html(render_keyword_panel(&manager)))
}

pub async fn api_keywords(State(state): State<AppState>, identity: Identity) -> Result<Json<KeywordList>, ApiError> {
    let email = identity.require()?;
    let mut manager = state.keywords.acquire(email).await?;
    if !manager.is_loaded() {
        manager.load().await?;
    }
    Ok(Json(KeywordList {
        keywords: manager.keywords().to_vec(),
    }))
}

pub async fn api_keyword_add(
    State(state): State<AppState>,
    identity: Identity,
    Json(form): Json<KeywordForm>,
) -> Result<(StatusCode, Json<KeywordList>), ApiError> {
    let email = identity.require()?;
    let mut manager = state.keywords.acquire(email).await?;
    if !manager.add_keyword(&form.keyword).await? {
        return Err(ApiError::BadRequest {
            message: "keyword is empty".to_string(),
        });
    }
    Ok((
        StatusCode::CREATED,
        Json(KeywordList {
            keywords: manager.keywords().to_vec(),
        }),
    ))
}

/// `DELETE /api/keywords?keyword=...`
pub async fn api_keyword_delete(
    State(state): State<AppState>,
    identity: Identity,
    Query(form): Query<KeywordForm>,
) -> Result<Json<KeywordList>, ApiError> {
    let email = identity.require()?;
    let mut manager = state.keywords.acquire(email).await?;
    manager.remove(&form.keyword).await?;
    Ok(Json(KeywordList {
        keywords: manager.keywords().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;
    use landwatch_core::{KeywordStore, MemoryKeywordStore};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_appends_and_clears_input() {
        let store = Arc::new(MemoryKeywordStore::with_rows(vec![(USER.to_string(), "서초".to_string())]));
        let state = state_with(Arc::new(FixedSource), store.clone());

        let body = format!("keyword={}", encode("강남"));
        let response = send(state.clone(), post_form("/dashboard/keywords", Some(USER), &body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.find("<span>서초</span>").unwrap() < html.find("<span>강남</span>").unwrap());
        assert!(html.contains("name='keyword' value='' placeholder"));

        assert_eq!(store.list(USER).await.unwrap(), vec!["서초", "강남"]);
        let manager = state.keywords.acquire(USER).await.unwrap();
        assert_eq!(manager.keywords(), ["서초", "강남"]);
        assert_eq!(manager.input(), "");
    }

    #[tokio::test]
    async fn test_failed_add_keeps_input_and_shows_error() {
        let state = state_with(Arc::new(FixedSource), Arc::new(BrokenStore));
        let body = format!("keyword={}", encode("강남"));
        let html = body_text(send(state, post_form("/dashboard/keywords", Some(USER), &body)).await).await;
        assert!(html.contains("키워드 저장소 요청이 실패했습니다."));
        assert!(html.contains("name='keyword' value='강남' placeholder"));
        assert!(!html.contains("<span>강남</span>"));
    }

    #[tokio::test]
    async fn test_remove_keyword() {
        let store = Arc::new(MemoryKeywordStore::with_rows(vec![
            (USER.to_string(), "서초".to_string()),
            (USER.to_string(), "강남".to_string()),
        ]));
        let state = state_with(Arc::new(FixedSource), store.clone());
        let body = format!("keyword={}", encode("서초"));
        let html = body_text(send(state, post_form("/dashboard/keywords/delete", Some(USER), &body)).await).await;
        assert!(!html.contains("<span>서초</span>"));
        assert!(html.contains("<span>강남</span>"));
        assert_eq!(store.list(USER).await.unwrap(), vec!["강남"]);
    }

    #[tokio::test]
    async fn test_partials_without_identity_show_prompt() {
        let response = send(test_state(), get("/dashboard/keywords", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("로그인 후 키워드를 관리할 수 있습니다."));

        let html = body_text(send(test_state(), post_form("/dashboard/keywords", None, "keyword=x")).await).await;
        assert!(html.contains("로그인 후 키워드를 관리할 수 있습니다."));
    }

    #[tokio::test]
    async fn test_concurrent_request_is_busy() {
        let state = test_state();
        let _held = state.keywords.acquire(USER).await.unwrap();
        let response = send(state.clone(), post_form("/dashboard/keywords", Some(USER), "keyword=x")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BUSY");
    }

    #[tokio::test]
    async fn test_json_keyword_api() {
        let state = test_state();

        let response = send(state.clone(), get("/api/keywords", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            state.clone(),
            json_request("POST", "/api/keywords", Some(USER), json!({ "keyword": " 분당 " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["keywords"], json!(["분당"]));

        let response = send(
            state.clone(),
            json_request("POST", "/api/keywords", Some(USER), json!({ "keyword": "  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/keywords?keyword={}", encode("분당"));
        let response = send(state.clone(), json_request("DELETE", &uri, Some(USER), json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["keywords"], json!([]));

        let body = body_json(send(state, get("/api/keywords", Some(USER))).await).await;
        assert_eq!(body["keywords"], json!([]));
    }

    #[tokio::test]
    async fn test_json_add_store_failure() {
        let state = state_with(Arc::new(FixedSource), Arc::new(BrokenStore));
        let response = send(
            state,
            json_request("POST", "/api/keywords", Some(USER), json!({ "keyword": "강남" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["code"], "STORE_ERROR");
    }
}
