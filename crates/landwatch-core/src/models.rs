//! Transaction records returned by the API and the page that holds them

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One transaction row
///
/// Missing or null fields become 0 / empty. Numbers that arrive as JSON
/// strings are parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "순위", default, deserialize_with = "lenient_i64")]
    pub rank: i64,
    #[serde(rename = "단지명", default, deserialize_with = "lenient_string")]
    pub complex_name: String,
    #[serde(rename = "지역명", default, deserialize_with = "lenient_string")]
    pub region_name: String,
    /// Exclusive area in ㎡, as sent
    #[serde(rename = "전용면적", default, deserialize_with = "lenient_string")]
    pub area: String,
    /// 만원
    #[serde(rename = "거래금액", default, deserialize_with = "lenient_i64")]
    pub price: i64,
    #[serde(rename = "거래년월일", default, deserialize_with = "lenient_string")]
    pub deal_date: String,
    #[serde(rename = "거래층", default, deserialize_with = "lenient_string")]
    pub floor: String,
    #[serde(rename = "직전거래금액", default, deserialize_with = "lenient_i64")]
    pub prev_price: i64,
    #[serde(rename = "직전거래년월일", default, deserialize_with = "lenient_string")]
    pub prev_deal_date: String,
    #[serde(rename = "직전거래층", default, deserialize_with = "lenient_string")]
    pub prev_floor: String,
    #[serde(rename = "변동가격", default, deserialize_with = "lenient_i64")]
    pub change_amount: i64,
    /// Percent
    #[serde(rename = "변동률", default, deserialize_with = "lenient_f64")]
    pub change_rate: f64,
    #[serde(rename = "번지", default, deserialize_with = "lenient_string")]
    pub lot_number: String,
    #[serde(rename = "공급면적타입", default, deserialize_with = "lenient_string")]
    pub supply_area_type: String,
    #[serde(rename = "전용평형", default, deserialize_with = "lenient_f64")]
    pub pyeong: f64,
}

impl SearchResult {
    pub fn has_previous_deal(&self) -> bool {
        self.prev_price > 0
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).filter(|v| v.is_finite()).unwrap_or(0.0))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        other => value_to_f64(other).map(|f| f.round() as i64),
    };
    Ok(parsed.unwrap_or(0))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// One fetched page of results plus its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    /// `업데이트일자` from the payload
    pub update_date: String,
    pub total_size: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for SearchPage {
    fn default() -> Self {
        Self::empty()
    }
}

impl SearchPage {
    /// The reset state: nothing loaded, page 1 of 0
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            update_date: String::new(),
            total_size: 0,
            current_page: 1,
            total_pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// `ceil(total_size / page_size)`, or 0 without a usable page size
pub fn total_pages(total_size: u64, page_size: Option<u32>) -> u32 {
    match page_size {
        Some(size) if size > 0 => {
            u32::try_from(total_size.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
        }
        _ => 0,
    }
}

/// Read the API envelope
///
/// Returns `Ok(None)` when the body is well-formed JSON but carries no
/// `dataBody.data.list` array.
pub fn parse_envelope(body: &Value, page: u32, page_size: Option<u32>) -> CoreResult<Option<SearchPage>> {
    let data = match body.pointer("/dataBody/data") {
        Some(data) => data,
        None => return Ok(None),
    };
    let list = match data.get("list").and_then(Value::as_array) {
        Some(list) => list,
        None => return Ok(None),
    };

    let results = list
        .iter()
        .map(|item| {
            serde_json::from_value::<SearchResult>(item.clone()).map_err(|e| CoreError::InvalidResponse {
                message: format!("list item: {}", e),
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let total_size = data
        .get("size")
        .and_then(value_to_f64)
        .filter(|v| *v >= 0.0)
        .map(|v| v as u64)
        .unwrap_or(0);
    let update_date = match data.get("업데이트일자") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Ok(Some(SearchPage {
        results,
        update_date,
        total_size,
        current_page: page,
        total_pages: total_pages(total_size, page_size),
    }))
}
