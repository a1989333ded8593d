//! Search filter state, result formatting, region lookup and keyword management

pub mod error;
pub mod filter;
pub mod format;
pub mod keywords;
pub mod models;
pub mod pagination;
pub mod price;
pub mod region;
pub mod search;
pub mod types;

use landwatch_config::Config;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use filter::{FilterField, SearchFilter, NO_BOUND};
pub use keywords::{
    KeywordManager, KeywordSession, KeywordSessions, KeywordStore, MemoryKeywordStore, StoreRef, SIGN_IN_PROMPT,
};
pub use models::{SearchPage, SearchResult};
pub use pagination::Pagination;
pub use price::{Bound, PriceRange};
pub use region::{LegalDongCode, RegionIndex};
pub use search::{SearchOutcome, SearchState, SearchStatus, SourceRef, TransactionSource};
pub use types::{BuildingType, DealType, SortOrder, PAGE_SIZE_OPTIONS};

/// Load the configured region dataset, or an empty index if it can't be read
pub fn load_regions(config: &Config) -> RegionIndex {
    match RegionIndex::load(&config.regions.path) {
        Ok(index) => index,
        Err(e) => {
            log::warn!("Region lookup disabled: {}", e);
            RegionIndex::default()
        }
    }
}
