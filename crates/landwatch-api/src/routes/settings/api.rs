//! Settings API endpoints - JSON API

use crate::{ApiError, AppState, Identity};
use axum::extract::State;
use axum::Json;
use landwatch_config::Config;

pub(crate) const REDACTED: &str = "********";

/// Copy of the config that is safe to show
pub(crate) fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if !config.store.api_key.is_empty() {
        config.store.api_key = REDACTED.to_string();
    }
    config
}

/// Running configuration, signed-in users only
pub async fn api_settings(State(state): State<AppState>, identity: Identity) -> Result<Json<Config>, ApiError> {
    identity.require()?;
    Ok(Json(redacted(&state.config)))
}
