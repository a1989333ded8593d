//! Signed-in identity, as forwarded by the session provider

use crate::{ApiError, AppState};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use std::convert::Infallible;

pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Email of the signed-in user, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub Option<String>);

impl Identity {
    pub fn email(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The email, or `Unauthorized` for JSON callers
    pub fn require(&self) -> Result<&str, ApiError> {
        self.email().ok_or(ApiError::Unauthorized)
    }
}

/// Read `header` from the request; blank values count as absent
pub fn identity_from_headers(headers: &HeaderMap, header: &str) -> Option<String> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn sign_in_redirect() -> Response {
    Redirect::to(SIGN_IN_PATH).into_response()
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Identity(identity_from_headers(
            &parts.headers,
            &state.config.auth.identity_header,
        )))
    }
}
