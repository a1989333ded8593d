//! Dashboard page rendering

use crate::session::sign_in_redirect;
use crate::{AppState, Identity};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use landwatch_core::{KeywordManager, SIGN_IN_PROMPT};
use landwatch_utils::escape_html;

pub async fn page_dashboard(State(state): State<AppState>, identity: Identity, headers: HeaderMap) -> Response {
    let Some(email) = identity.email() else {
        return sign_in_redirect();
    };

    let panel = match state.keywords.acquire(email).await {
        Ok(manager) => render_keyword_panel(&manager),
        Err(e) => format!(
            "<div id='keyword-panel' class='bg-white rounded-lg shadow-md p-6 max-w-xl text-gray-500'>{}</div>",
            escape_html(&e.user_message())
        ),
    };

    let inner_content = format!(
        "<div class='mb-6'><h2 class='text-2xl font-bold'>대시보드</h2><p class='text-gray-500'>로그인한 사용자만 볼 수 있는 페이지입니다.</p></div>{}",
        panel
    );
    Html(crate::page_response(&headers, "대시보드", "/dashboard", Some(email), &inner_content)).into_response()
}

/// Fixed prompt shown in place of the panel when nobody is signed in
pub fn render_sign_in_prompt() -> String {
    format!("<div id='keyword-panel'>{}</div>", SIGN_IN_PROMPT)
}

/// Input form plus the keyword list, each with a delete button
pub fn render_keyword_panel(manager: &KeywordManager) -> String {
    if !manager.is_authenticated() {
        return render_sign_in_prompt();
    }

    let error = match manager.last_error() {
        Some(message) => format!(
            "<div class='bg-red-50 border border-red-200 text-red-700 rounded-lg p-3 mb-3 text-sm'>{}</div>",
            escape_html(message)
        ),
        None => String::new(),
    };

    let items: String = manager
        .keywords()
        .iter()
        .map(|keyword| {
            format!(
                r#"<li class='flex justify-between items-center py-2 border-b last:border-0'>
                    <span>{}</span>
                    <form hx-post='/dashboard/keywords/delete' hx-target='#keyword-panel' hx-swap='outerHTML' hx-sync='closest #keyword-panel:drop'>
                        <input type='hidden' name='keyword' value='{}'>
                        <button type='submit' class='text-sm text-red-600 hover:underline'>삭제</button>
                    </form>
                </li>"#,
                escape_html(keyword),
                escape_html(keyword)
            )
        })
        .collect();
    let list = if items.is_empty() {
        "<p class='text-sm text-gray-500'>등록된 키워드가 없습니다.</p>".to_string()
    } else {
        format!("<ul>{}</ul>", items)
    };

    format!(
        r#"<div id='keyword-panel' class='bg-white rounded-lg shadow-md p-6 max-w-xl'>
        <h2 class='text-xl font-bold mb-2'>관심 키워드</h2>
        {}
        <form hx-post='/dashboard/keywords' hx-target='#keyword-panel' hx-swap='outerHTML' hx-sync='closest #keyword-panel:drop' class='flex gap-2 mb-4'>
            <input type='text' name='keyword' value='{}' placeholder='키워드 입력' class='flex-1 px-3 py-2 border border-gray-300 rounded-lg'>
            <button type='submit' class='bg-blue-600 text-white px-4 py-2 rounded-lg hover:bg-blue-700'>추가</button>
        </form>
        {}
    </div>"#,
        error,
        escape_html(manager.input()),
        list
    )
}
