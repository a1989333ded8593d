//! Region routes - Legal-dong typeahead

pub mod api;

pub use api::{api_regions, htmx_region_select, htmx_region_suggest};
