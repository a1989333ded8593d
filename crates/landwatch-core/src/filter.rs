//! The search filter record sent to the transaction API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel meaning "no bound" for the price fields
pub const NO_BOUND: &str = "-1";

/// One named query parameter of the transaction API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    ReportPriceKind,
    StartDate,
    EndDate,
    RegionCode,
    BuildingType,
    DealType,
    MinPrice,
    MaxPrice,
    PageSize,
    PageNumber,
    SortOrder,
    RegionLevel,
    MinArea,
    MaxArea,
}

impl FilterField {
    /// All fields, in the order they are sent upstream
    pub const ALL: [FilterField; 14] = [
        FilterField::ReportPriceKind,
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::RegionCode,
        FilterField::BuildingType,
        FilterField::DealType,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::PageSize,
        FilterField::PageNumber,
        FilterField::SortOrder,
        FilterField::RegionLevel,
        FilterField::MinArea,
        FilterField::MaxArea,
    ];

    /// Query parameter name understood by the API
    pub fn param_name(&self) -> &'static str {
        match self {
            FilterField::ReportPriceKind => "신고가구분",
            FilterField::StartDate => "검색시작년월일",
            FilterField::EndDate => "검색종료년월일",
            FilterField::RegionCode => "법정동코드",
            FilterField::BuildingType => "건물유형구분",
            FilterField::DealType => "거래구분",
            FilterField::MinPrice => "최소금액",
            FilterField::MaxPrice => "최대금액",
            FilterField::PageSize => "페이지목록수",
            FilterField::PageNumber => "페이지번호",
            FilterField::SortOrder => "정렬구분",
            FilterField::RegionLevel => "법정동레벨",
            FilterField::MinArea => "최소전용면적",
            FilterField::MaxArea => "최대전용면적",
        }
    }

    pub fn from_param_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.param_name() == name)
    }
}

impl std::str::FromStr for FilterField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_param_name(s).ok_or_else(|| format!("Unknown filter field: {}", s))
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.param_name())
    }
}

/// Filter parameters for a transaction search
///
/// Every field is always present. Values are kept as the strings the API
/// expects; an empty string means "leave this parameter out".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(rename = "신고가구분")]
    pub report_price_kind: String,
    /// YYYYMMDD
    #[serde(rename = "검색시작년월일")]
    pub start_date: String,
    /// YYYYMMDD
    #[serde(rename = "검색종료년월일")]
    pub end_date: String,
    #[serde(rename = "법정동코드")]
    pub region_code: String,
    #[serde(rename = "건물유형구분")]
    pub building_type: String,
    #[serde(rename = "거래구분")]
    pub deal_type: String,
    /// 만원, or `-1`
    #[serde(rename = "최소금액")]
    pub min_price: String,
    /// 만원, or `-1`
    #[serde(rename = "최대금액")]
    pub max_price: String,
    #[serde(rename = "페이지목록수")]
    pub page_size: String,
    #[serde(rename = "페이지번호")]
    pub page_number: String,
    #[serde(rename = "정렬구분")]
    pub sort_order: String,
    #[serde(rename = "법정동레벨")]
    pub region_level: String,
    #[serde(rename = "최소전용면적")]
    pub min_area: String,
    #[serde(rename = "최대전용면적")]
    pub max_area: String,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            report_price_kind: "05".to_string(),
            start_date: "20250628".to_string(),
            end_date: "20250628".to_string(),
            region_code: "4113510900".to_string(),
            building_type: "01".to_string(),
            deal_type: "01".to_string(),
            min_price: NO_BOUND.to_string(),
            max_price: NO_BOUND.to_string(),
            page_size: "20".to_string(),
            page_number: "1".to_string(),
            sort_order: "MD".to_string(),
            region_level: "01".to_string(),
            min_area: "56".to_string(),
            max_area: "90".to_string(),
        }
    }
}

impl SearchFilter {
    /// The example query: today's transactions in 잠실동
    pub fn example(today: NaiveDate) -> Self {
        let today = today.format("%Y%m%d").to_string();
        Self {
            start_date: today.clone(),
            end_date: today,
            region_code: "1171010100".to_string(),
            ..Self::default()
        }
    }

    /// Build a filter from submitted form values
    ///
    /// Fields missing from `params` keep their default; fields present but
    /// empty stay empty.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut filter = Self::default();
        for field in FilterField::ALL {
            if let Some(value) = params.get(field.param_name()) {
                filter.set(field, value.trim());
            }
        }
        filter
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::ReportPriceKind => &self.report_price_kind,
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::RegionCode => &self.region_code,
            FilterField::BuildingType => &self.building_type,
            FilterField::DealType => &self.deal_type,
            FilterField::MinPrice => &self.min_price,
            FilterField::MaxPrice => &self.max_price,
            FilterField::PageSize => &self.page_size,
            FilterField::PageNumber => &self.page_number,
            FilterField::SortOrder => &self.sort_order,
            FilterField::RegionLevel => &self.region_level,
            FilterField::MinArea => &self.min_area,
            FilterField::MaxArea => &self.max_area,
        }
    }

    pub fn set(&mut self, field: FilterField, value: &str) {
        let slot = match field {
            FilterField::ReportPriceKind => &mut self.report_price_kind,
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::RegionCode => &mut self.region_code,
            FilterField::BuildingType => &mut self.building_type,
            FilterField::DealType => &mut self.deal_type,
            FilterField::MinPrice => &mut self.min_price,
            FilterField::MaxPrice => &mut self.max_price,
            FilterField::PageSize => &mut self.page_size,
            FilterField::PageNumber => &mut self.page_number,
            FilterField::SortOrder => &mut self.sort_order,
            FilterField::RegionLevel => &mut self.region_level,
            FilterField::MinArea => &mut self.min_area,
            FilterField::MaxArea => &mut self.max_area,
        };
        *slot = value.to_string();
    }

    /// Parsed page size, when it is a positive integer
    pub fn page_size(&self) -> Option<u32> {
        self.page_size.trim().parse::<u32>().ok().filter(|n| *n > 0)
    }

    /// Query parameters for fetching `page`
    ///
    /// The page number is replaced by `page`; empty fields are left out.
    pub fn query_pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| {
                let value = match field {
                    FilterField::PageNumber => page.to_string(),
                    _ => self.get(field).to_string(),
                };
                if value.is_empty() {
                    None
                } else {
                    Some((field.param_name(), value))
                }
            })
            .collect()
    }

    /// URL-encoded query string for fetching `page`
    pub fn query_string(&self, page: u32) -> String {
        self.query_pairs(page)
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filter = SearchFilter::default();
        assert_eq!(filter.report_price_kind, "05");
        assert_eq!(filter.region_code, "4113510900");
        assert_eq!(filter.min_price, NO_BOUND);
        assert_eq!(filter.max_price, NO_BOUND);
        assert_eq!(filter.page_size(), Some(20));
        for field in FilterField::ALL {
            assert!(!filter.get(field).is_empty(), "{} should have a default", field);
        }
    }

    #[test]
    fn test_example_uses_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let filter = SearchFilter::example(today);
        assert_eq!(filter.start_date, "20261016");
        assert_eq!(filter.end_date, "20261016");
        assert_eq!(filter.region_code, "1171010100");
        assert_eq!(filter.sort_order, "MD");
        assert_eq!(filter.min_area, "56");
    }

    #[test]
    fn test_param_names_are_unique() {
        let names: std::collections::HashSet<_> =
            FilterField::ALL.iter().map(|f| f.param_name()).collect();
        assert_eq!(names.len(), 14);
        assert_eq!("법정동코드".parse::<FilterField>(), Ok(FilterField::RegionCode));
        assert!("regionCode".parse::<FilterField>().is_err());
    }

    #[test]
    fn test_query_pairs_skip_empty_fields() {
        let mut filter = SearchFilter::default();
        filter.set(FilterField::MinArea, "");
        filter.set(FilterField::RegionCode, "");

        let pairs = filter.query_pairs(1);
        assert_eq!(pairs.len(), 12);
        assert!(pairs.iter().all(|(_, v)| !v.is_empty()));
        assert!(!pairs.iter().any(|(k, _)| *k == "최소전용면적"));
    }

    #[test]
    fn test_query_pairs_substitute_page() {
        let filter = SearchFilter::default();
        let pairs = filter.query_pairs(3);
        let page = pairs.iter().find(|(k, _)| *k == "페이지번호").unwrap();
        assert_eq!(page.1, "3");
        assert_eq!(filter.page_number, "1");
    }

    #[test]
    fn test_query_string_is_encoded() {
        let filter = SearchFilter::default();
        let qs = filter.query_string(2);
        assert!(qs.contains(&format!("{}=2", urlencoding::encode("페이지번호"))));
        assert!(qs.contains(&format!("{}=-1", urlencoding::encode("최소금액"))));
        assert!(!qs.contains("페이지"));
    }

    #[test]
    fn test_from_params() {
        let mut params = HashMap::new();
        params.insert("법정동코드".to_string(), "1168010100".to_string());
        params.insert("최대전용면적".to_string(), "".to_string());
        params.insert("unrelated".to_string(), "x".to_string());

        let filter = SearchFilter::from_params(&params);
        assert_eq!(filter.region_code, "1168010100");
        assert_eq!(filter.max_area, "");
        assert_eq!(filter.min_area, "56");
    }

    #[test]
    fn test_page_size_rejects_non_positive() {
        let mut filter = SearchFilter::default();
        filter.set(FilterField::PageSize, "0");
        assert_eq!(filter.page_size(), None);
        filter.set(FilterField::PageSize, "abc");
        assert_eq!(filter.page_size(), None);
        filter.set(FilterField::PageSize, "50");
        assert_eq!(filter.page_size(), Some(50));
    }

    #[test]
    fn test_serde_uses_api_names() {
        let json = serde_json::to_value(SearchFilter::default()).unwrap();
        assert_eq!(json["정렬구분"], "MD");
        assert_eq!(json["최소금액"], "-1");
    }
}
