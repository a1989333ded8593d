//! HTTP clients for the transaction API and the hosted keyword table

pub mod error;
pub mod kbland;
pub mod rest_store;

pub use error::{ClientError, ClientResult};
pub use kbland::KbLandClient;
pub use rest_store::RestKeywordStore;

use std::time::Duration;

/// Shared reqwest client with an optional timeout
pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!("landwatch/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| ClientError::Build(e.to_string()))
}
