//! Sign-in page rendering

use crate::{AppState, Identity};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use landwatch_utils::escape_html;

/// Email form for the session provider, or straight to the dashboard
pub async fn page_signin(State(state): State<AppState>, identity: Identity, headers: HeaderMap) -> Response {
    if identity.email().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let inner_content = format!(
        r#"<div class='max-w-sm mx-auto mt-16 bg-white rounded-lg shadow-md p-6'>
        <h2 class='text-2xl font-bold mb-4'>로그인</h2>
        <form method='post' action='{}' class='space-y-3'>
            <input type='email' name='email' required placeholder='이메일 주소' class='w-full px-3 py-2 border border-gray-300 rounded-lg'>
            <button type='submit' class='w-full bg-blue-600 text-white px-4 py-2 rounded-lg hover:bg-blue-700'>로그인 링크 받기</button>
        </form>
    </div>"#,
        escape_html(&state.config.auth.sign_in_url)
    );
    Html(crate::page_response(&headers, "로그인", "/auth/signin", None, &inner_content)).into_response()
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_signin_redirects_when_signed_in() {
        let response = send(test_state(), get("/auth/signin", Some(USER))).await;
        assert_redirect(&response, "/dashboard");
    }

    #[tokio::test]
    async fn test_signin_form_posts_to_provider() {
        let response = send(test_state(), get("/auth/signin", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("action='/oauth2/sign_in'"));
        assert!(html.contains("placeholder='이메일 주소'"));
        assert!(html.contains("로그인 링크 받기"));
    }
}
