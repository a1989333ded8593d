//! Transaction search state and the actions that change it
//!
//! `SearchState` owns the filter, the price slider, the region typeahead
//! and the last loaded page. It changes only through the methods below.

use crate::error::{CoreError, CoreResult, ErrorCode};
use crate::filter::{FilterField, SearchFilter};
use crate::format::date_from_input;
use crate::models::{parse_envelope, SearchPage};
use crate::pagination::Pagination;
use crate::price::{Bound, PriceRange};
use crate::region::{LegalDongCode, RegionIndex};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Where transaction pages come from
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Issue one GET with these query parameters and return the JSON body
    ///
    /// Non-2xx statuses and undecodable bodies are errors.
    async fn fetch(&self, query: &[(&'static str, String)]) -> CoreResult<serde_json::Value>;
}

/// Shared source reference
pub type SourceRef = Arc<dyn TransactionSource>;

/// Idle or waiting for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Searching,
}

/// How the last search ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// The API returned a result list (possibly with zero rows)
    Loaded,
    /// The API answered but without a result list
    Empty,
    /// The request failed
    Failed { code: ErrorCode, message: String },
}

impl SearchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchOutcome::Failed { .. })
    }
}

/// Page-scoped search state
#[derive(Debug, Clone)]
pub struct SearchState {
    filter: SearchFilter,
    price_range: PriceRange,
    region_query: String,
    suggestions: Vec<LegalDongCode>,
    show_suggestions: bool,
    page: SearchPage,
    status: SearchStatus,
    outcome: Option<SearchOutcome>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(SearchFilter::default())
    }
}

impl SearchState {
    pub fn new(filter: SearchFilter) -> Self {
        let price_range = PriceRange::from_filter(&filter);
        Self {
            filter,
            price_range,
            region_query: String::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            page: SearchPage::empty(),
            status: SearchStatus::Idle,
            outcome: None,
        }
    }

    // ==================== Accessors ====================

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }

    pub fn region_query(&self) -> &str {
        &self.region_query
    }

    /// Suggestions currently on screen; empty when the list is closed
    pub fn suggestions(&self) -> &[LegalDongCode] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }

    pub fn page(&self) -> &SearchPage {
        &self.page
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.current_page, self.page.total_pages, self.page.total_size)
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Gates the submit button
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    // ==================== Filter actions ====================

    /// Set one filter field; price fields also move the slider
    pub fn update_field(&mut self, field: FilterField, value: &str) {
        let value = match field {
            FilterField::StartDate | FilterField::EndDate => date_from_input(value),
            _ => value.trim().to_string(),
        };
        self.filter.set(field, &value);
        if matches!(field, FilterField::MinPrice | FilterField::MaxPrice) {
            self.price_range = PriceRange::from_filter(&self.filter);
        }
    }

    /// Move one slider handle and rewrite both price fields
    pub fn move_price(&mut self, bound: Bound, value: u32) {
        self.price_range = self.price_range.with_bound(bound, value);
        self.price_range.apply_to(&mut self.filter);
    }

    /// Replace the filter with the example query
    pub fn load_example(&mut self, today: NaiveDate) {
        self.filter = SearchFilter::example(today);
        self.price_range = PriceRange::from_filter(&self.filter);
    }

    // ==================== Region typeahead ====================

    /// Typing in the region box
    pub fn search_regions(&mut self, index: &RegionIndex, query: &str) {
        self.region_query = query.to_string();
        self.suggestions = index.search(query);
        self.show_suggestions = true;
    }

    /// Picking a suggestion
    pub fn select_region(&mut self, region: &LegalDongCode) {
        self.filter.region_code = region.code.clone();
        self.region_query = region.full_name.clone();
        self.suggestions.clear();
        self.show_suggestions = false;
    }

    /// Click outside the control
    pub fn close_suggestions(&mut self) {
        self.show_suggestions = false;
    }

    // ==================== Searching ====================

    /// Restore pagination metadata rendered by a previous response
    pub fn restore_pagination(&mut self, current_page: u32, total_pages: u32, total_size: u64) {
        self.page.current_page = current_page.max(1);
        self.page.total_pages = total_pages;
        self.page.total_size = total_size;
    }

    /// Enter Searching and return the query for `page`
    ///
    /// `None` while a search is already outstanding.
    pub fn begin_search(&mut self, page: u32) -> Option<Vec<(&'static str, String)>> {
        if self.is_loading() {
            return None;
        }
        self.status = SearchStatus::Searching;
        Some(self.filter.query_pairs(page))
    }

    /// Settle a search started with `begin_search`
    ///
    /// Anything but a result list resets the page to the empty state; the
    /// outcome says whether that was "no data" or a failure.
    pub fn finish_search(&mut self, page: u32, response: CoreResult<serde_json::Value>) -> &SearchOutcome {
        let parsed = response.and_then(|body| parse_envelope(&body, page, self.filter.page_size()));
        let outcome = match parsed {
            Ok(Some(loaded)) => {
                self.page = loaded;
                SearchOutcome::Loaded
            }
            Ok(None) => {
                self.page = SearchPage::empty();
                SearchOutcome::Empty
            }
            Err(error) => {
                log::warn!("Search for page {} failed: {}", page, error);
                self.page = SearchPage::empty();
                SearchOutcome::Failed {
                    code: error.code(),
                    message: error.user_message(),
                }
            }
        };
        self.status = SearchStatus::Idle;
        self.outcome.insert(outcome)
    }

    /// Fetch `page` with the current filter
    pub async fn search(&mut self, source: &dyn TransactionSource, page: u32) -> CoreResult<&SearchOutcome> {
        let query = self.begin_search(page).ok_or(CoreError::Busy)?;
        log::debug!("Searching page {} with {} parameters", page, query.len());
        let response = source.fetch(&query).await;
        Ok(self.finish_search(page, response))
    }

    /// Go to another page; `None` when `page` is outside `1..=total_pages`
    pub async fn change_page(
        &mut self,
        source: &dyn TransactionSource,
        page: u32,
    ) -> CoreResult<Option<&SearchOutcome>> {
        if !self.pagination().contains(page) {
            return Ok(None);
        }
        self.search(source, page).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    /// Records every query and answers with a fixed response
    struct FakeSource {
        response: fn() -> CoreResult<Value>,
        queries: Mutex<Vec<Vec<(&'static str, String)>>>,
    }

    impl FakeSource {
        fn new(response: fn() -> CoreResult<Value>) -> Self {
            Self {
                response,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TransactionSource for FakeSource {
        async fn fetch(&self, query: &[(&'static str, String)]) -> CoreResult<Value> {
            self.queries.lock().await.push(query.to_vec());
            (self.response)()
        }
    }

    fn three_pages() -> CoreResult<Value> {
        Ok(json!({
            "dataBody": { "data": {
                "list": [{ "순위": 1, "단지명": "잠실엘스", "거래금액": 235000 }],
                "size": 45,
                "업데이트일자": "2025.06.28"
            }}
        }))
    }

    fn no_list() -> CoreResult<Value> {
        Ok(json!({}))
    }

    fn server_error() -> CoreResult<Value> {
        Err(CoreError::UpstreamStatus { status: 500 })
    }

    fn sample_index() -> RegionIndex {
        RegionIndex::new(vec![
            LegalDongCode::new("1171010100", "서울특별시 송파구 잠실동"),
            LegalDongCode::new("1168010100", "서울특별시 강남구 역삼동"),
        ])
    }

    #[tokio::test]
    async fn test_search_loads_page() {
        let source = FakeSource::new(three_pages);
        let mut state = SearchState::default();

        let outcome = state.search(&source, 1).await.unwrap().clone();
        assert_eq!(outcome, SearchOutcome::Loaded);
        assert_eq!(state.page().results.len(), 1);
        assert_eq!(state.page().total_size, 45);
        assert_eq!(state.page().total_pages, 3);
        assert_eq!(state.page().current_page, 1);
        assert_eq!(state.page().update_date, "2025.06.28");
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_search_never_sends_empty_params() {
        let source = FakeSource::new(three_pages);
        let mut state = SearchState::default();
        state.update_field(FilterField::MinArea, "");
        state.update_field(FilterField::SortOrder, "  ");

        state.search(&source, 2).await.unwrap();
        let queries = source.queries.lock().await;
        let sent = &queries[0];
        assert!(sent.iter().all(|(_, v)| !v.is_empty()));
        assert!(!sent.iter().any(|(k, _)| *k == "최소전용면적" || *k == "정렬구분"));
        assert!(sent.contains(&("페이지번호", "2".to_string())));
    }

    #[tokio::test]
    async fn test_search_without_list_resets_to_empty() {
        let mut state = SearchState::default();
        state.search(&FakeSource::new(three_pages), 2).await.unwrap();

        let outcome = state.search(&FakeSource::new(no_list), 3).await.unwrap().clone();
        assert_eq!(outcome, SearchOutcome::Empty);
        assert!(state.page().results.is_empty());
        assert_eq!(state.page().total_pages, 0);
        assert_eq!(state.page().current_page, 1);
        assert_eq!(state.page().update_date, "");
    }

    #[tokio::test]
    async fn test_failure_is_distinguishable_from_empty() {
        let mut state = SearchState::default();
        state.search(&FakeSource::new(three_pages), 1).await.unwrap();

        let outcome = state.search(&FakeSource::new(server_error), 2).await.unwrap().clone();
        assert!(outcome.is_failure());
        assert!(matches!(outcome, SearchOutcome::Failed { code: ErrorCode::UpstreamStatus, .. }));
        assert_eq!(*state.page(), SearchPage::empty());
    }

    #[tokio::test]
    async fn test_change_page_out_of_range_is_noop() {
        let source = FakeSource::new(three_pages);
        let mut state = SearchState::default();
        state.search(&source, 1).await.unwrap();

        assert!(state.change_page(&source, 0).await.unwrap().is_none());
        assert!(state.change_page(&source, 4).await.unwrap().is_none());
        assert_eq!(source.queries.lock().await.len(), 1);

        assert!(state.change_page(&source, 3).await.unwrap().is_some());
        assert_eq!(state.page().current_page, 3);
        assert_eq!(source.queries.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_change_page_before_any_search_is_noop() {
        let source = FakeSource::new(three_pages);
        let mut state = SearchState::default();
        assert!(state.change_page(&source, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restored_pagination_allows_change_page() {
        let source = FakeSource::new(three_pages);
        let mut state = SearchState::default();
        state.restore_pagination(1, 3, 45);
        assert!(state.change_page(&source, 2).await.unwrap().is_some());
        assert_eq!(state.page().current_page, 2);
    }

    #[test]
    fn test_begin_search_gates_resubmission() {
        let mut state = SearchState::default();
        assert!(state.begin_search(1).is_some());
        assert!(state.is_loading());
        assert!(state.begin_search(1).is_none());

        state.finish_search(1, no_list());
        assert!(!state.is_loading());
        assert!(state.begin_search(1).is_some());
    }

    #[test]
    fn test_page_untouched_while_searching() {
        let mut state = SearchState::default();
        state.finish_search(2, three_pages());
        let before = state.page().clone();
        state.begin_search(3);
        assert_eq!(*state.page(), before);
    }

    #[test]
    fn test_move_price_updates_filter() {
        let mut state = SearchState::default();
        state.move_price(Bound::Min, 10);
        assert_eq!(state.filter().min_price, "100000");
        assert_eq!(state.filter().max_price, "-1");

        state.move_price(Bound::Max, 5);
        assert_eq!(state.price_range(), PriceRange::new(5, 5));
        assert_eq!(state.filter().min_price, "50000");
        assert_eq!(state.filter().max_price, "50000");

        state.move_price(Bound::Min, 0);
        state.move_price(Bound::Max, 50);
        assert_eq!(state.filter().min_price, "-1");
        assert_eq!(state.filter().max_price, "-1");
    }

    #[test]
    fn test_update_price_field_syncs_slider() {
        let mut state = SearchState::default();
        state.update_field(FilterField::MaxPrice, "200000");
        assert_eq!(state.price_range(), PriceRange::new(0, 20));
    }

    #[test]
    fn test_update_date_field_strips_dashes() {
        let mut state = SearchState::default();
        state.update_field(FilterField::StartDate, "2025-07-01");
        assert_eq!(state.filter().start_date, "20250701");
    }

    #[test]
    fn test_region_select_round_trip() {
        let index = sample_index();
        let mut state = SearchState::default();

        state.search_regions(&index, "잠실");
        assert_eq!(state.suggestions().len(), 1);
        let picked = state.suggestions()[0].clone();

        state.select_region(&picked);
        assert_eq!(state.filter().region_code, picked.code);
        assert_eq!(state.region_query(), "서울특별시 송파구 잠실동");
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn test_close_suggestions() {
        let index = sample_index();
        let mut state = SearchState::default();
        state.search_regions(&index, "서울");
        assert_eq!(state.suggestions().len(), 2);
        state.close_suggestions();
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn test_load_example() {
        let mut state = SearchState::default();
        state.move_price(Bound::Min, 3);
        state.load_example(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(state.filter().start_date, "20261016");
        assert_eq!(state.filter().region_code, "1171010100");
        assert_eq!(state.price_range(), PriceRange::default());
    }
}
