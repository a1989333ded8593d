//! Search routes - Filter form, price slider, results and pagination
//!
//! The server keeps no search state between requests. Every request
//! rebuilds a `SearchState` from the submitted form, and pagination
//! buttons carry the page counts of the response that rendered them.
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{api_search, htmx_search_example, htmx_search_price, htmx_search_results, state_from_params};
pub use page::{
    page_search, render_filter_form, render_pagination, render_price_control, render_region_picker,
    render_results,
};
