//! Keyword routes - Per-user watch keywords
//!
//! Every request reads the identity's keywords from the store. A request
//! that finds another one in flight for the same identity is answered
//! with 409 instead of waiting.
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Dashboard page and keyword panel rendering

pub mod api;
pub mod page;

pub use api::{
    api_keyword_add, api_keyword_delete, api_keywords, htmx_keyword_add, htmx_keyword_remove, htmx_keywords_list,
    KeywordForm,
};
pub use page::{page_dashboard, render_keyword_panel, render_sign_in_prompt};
