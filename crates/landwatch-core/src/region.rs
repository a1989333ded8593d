//! Legal-dong code lookup for the region typeahead

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Value of `폐지여부` for codes still in use
pub const EXISTS_FLAG: &str = "존재";

/// Most suggestions returned for one query
pub const SUGGESTION_LIMIT: usize = 10;

/// An administrative region code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDongCode {
    pub code: String,
    /// Last word of the full name, e.g. `잠실동`
    pub name: String,
    /// e.g. `서울특별시 송파구 잠실동`
    pub full_name: String,
}

impl LegalDongCode {
    pub fn new(code: &str, full_name: &str) -> Self {
        let name = full_name
            .split(' ')
            .last()
            .filter(|s| !s.is_empty())
            .unwrap_or(full_name);
        Self {
            code: code.to_string(),
            name: name.to_string(),
            full_name: full_name.to_string(),
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        self.name.contains(query) || self.full_name.contains(query)
    }
}

#[derive(Debug, Deserialize)]
struct RawRegionRow {
    #[serde(rename = "법정동코드")]
    code: String,
    #[serde(rename = "법정동명")]
    full_name: String,
    #[serde(rename = "폐지여부", default)]
    status: String,
}

/// Preloaded region codes, in dataset order
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    entries: Vec<LegalDongCode>,
}

impl RegionIndex {
    pub fn new(entries: Vec<LegalDongCode>) -> Self {
        Self { entries }
    }

    /// Read the reference CSV, keeping only codes still in use
    pub fn from_reader<R: Read>(reader: R) -> CoreResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (line, row) in csv_reader.deserialize::<RawRegionRow>().enumerate() {
            let row = row.map_err(|e| CoreError::DatasetError {
                message: format!("row {}: {}", line + 1, e),
            })?;
            if row.status == EXISTS_FLAG {
                entries.push(LegalDongCode::new(&row.code, &row.full_name));
            }
        }
        Ok(Self { entries })
    }

    /// Load the reference CSV from disk
    pub fn load(path: &Path) -> CoreResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| CoreError::DatasetError {
            message: format!("{}: {}", path.display(), e),
        })?;
        let index = Self::from_reader(file)?;
        log::info!("Loaded {} region codes from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substring match on short or full name, first ten in dataset order
    pub fn search(&self, query: &str) -> Vec<LegalDongCode> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|dong| dong.matches(query))
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&LegalDongCode> {
        self.entries.iter().find(|dong| dong.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "법정동코드,법정동명,폐지여부
1100000000,서울특별시,존재
1171000000,서울특별시 송파구,존재
1171010100,서울특별시 송파구 잠실동,존재
1171010200,서울특별시 송파구 신천동,존재
1171099999,서울특별시 송파구 옛동,폐지
4113510900,경기도 성남시 분당구 정자동,존재
";

    #[test]
    fn test_from_reader_filters_retired_codes() {
        let index = RegionIndex::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(index.len(), 5);
        assert!(index.find_by_code("1171099999").is_none());
        let jamsil = index.find_by_code("1171010100").unwrap();
        assert_eq!(jamsil.name, "잠실동");
        assert_eq!(jamsil.full_name, "서울특별시 송파구 잠실동");
    }

    #[test]
    fn test_short_name_is_last_word() {
        assert_eq!(LegalDongCode::new("1", "서울특별시").name, "서울특별시");
        assert_eq!(LegalDongCode::new("1", "경기도 성남시 분당구 정자동").name, "정자동");
    }

    #[test]
    fn test_search_matches_name_or_full_name() {
        let index = RegionIndex::from_reader(SAMPLE.as_bytes()).unwrap();
        let found = index.search("송파구");
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|d| d.name.contains("송파구") || d.full_name.contains("송파구")));
        assert_eq!(found[0].code, "1171000000");

        assert_eq!(index.search("잠실")[0].code, "1171010100");
        assert!(index.search("옛동").is_empty());
    }

    #[test]
    fn test_search_empty_query() {
        let index = RegionIndex::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(index.search("").is_empty());
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let index = RegionIndex::new(vec![LegalDongCode::new("1", "Gangnam Apgujeong")]);
        assert_eq!(index.search("Gang").len(), 1);
        assert!(index.search("gang").is_empty());
    }

    #[test]
    fn test_search_caps_at_ten_in_order() {
        let entries: Vec<_> = (0..25)
            .map(|i| LegalDongCode::new(&format!("{:010}", i), &format!("테스트시 {}동", i)))
            .collect();
        let index = RegionIndex::new(entries);
        let found = index.search("테스트");
        assert_eq!(found.len(), SUGGESTION_LIMIT);
        assert_eq!(found[0].code, "0000000000");
        assert_eq!(found[9].code, "0000000009");
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegionIndex::load(Path::new("/nonexistent/location-code.csv")).unwrap_err();
        assert!(matches!(err, CoreError::DatasetError { .. }));
    }
}
