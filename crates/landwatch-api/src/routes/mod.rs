//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API and HTMX partial endpoints
//! - page.rs: Full page rendering

pub mod auth;
pub mod keywords;
pub mod regions;
pub mod search;
pub mod settings;

use std::collections::HashMap;

/// Parse an unsigned query parameter, ignoring blanks and junk
pub(crate) fn param_u32(params: &HashMap<String, String>, name: &str) -> Option<u32> {
    params.get(name).and_then(|v| v.trim().parse().ok())
}

pub(crate) fn param_u64(params: &HashMap<String, String>, name: &str) -> Option<u64> {
    params.get(name).and_then(|v| v.trim().parse().ok())
}
