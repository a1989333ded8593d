//! Settings page rendering - Full page endpoints

use crate::session::sign_in_redirect;
use crate::{AppState, Identity};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use landwatch_utils::escape_html;

fn item(label: &str, value: &str) -> String {
    format!(
        "<div><p class='text-sm text-gray-500'>{}</p><p class='font-medium break-all'>{}</p></div>",
        label,
        escape_html(value)
    )
}

fn section(title: &str, items: &[String]) -> String {
    format!(
        "<div class='bg-white rounded-xl shadow-sm p-6 mb-6'><h3 class='text-lg font-semibold mb-4'>{}</h3><div class='grid grid-cols-2 gap-4'>{}</div></div>",
        title,
        items.concat()
    )
}

pub async fn page_settings(State(state): State<AppState>, identity: Identity, headers: HeaderMap) -> Response {
    let Some(email) = identity.email() else {
        return sign_in_redirect();
    };
    let config = &state.config;

    let timeout = match config.upstream.timeout_secs {
        Some(secs) => format!("{}초", secs),
        None => "제한 없음".to_string(),
    };
    let store_target = if config.store.url.is_empty() {
        config.store.table.clone()
    } else {
        format!("{}/{}", config.store.url.trim_end_matches('/'), config.store.table)
    };

    let inner_content = [
        "<div class='mb-6'><h2 class='text-2xl font-bold'>설정</h2></div>".to_string(),
        section(
            "서버",
            &[
                item("호스트", &config.server.host),
                item("포트", &config.server.port.to_string()),
                item("인증 헤더", &config.auth.identity_header),
                item("로그인 URL", &config.auth.sign_in_url),
            ],
        ),
        section(
            "실거래 API",
            &[item("검색 URL", &config.upstream.search_url()), item("타임아웃", &timeout)],
        ),
        section(
            "키워드 저장소",
            &[item("백엔드", &config.store.backend.to_string()), item("테이블", &store_target)],
        ),
        section(
            "법정동코드",
            &[
                item("파일", &config.regions.path.display().to_string()),
                item("지역 수", &state.regions.len().to_string()),
            ],
        ),
        section("로그", &[item("레벨", &config.logging.level)]),
    ]
    .concat();

    Html(crate::page_response(&headers, "설정", "/settings", Some(email), &inner_content)).into_response()
}
