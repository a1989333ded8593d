//! Two-bound price slider in 억 steps, synced with the filter's 만원 fields

use crate::filter::{SearchFilter, NO_BOUND};
use serde::{Deserialize, Serialize};

/// Highest slider step; at the top the upper bound means "no limit"
pub const PRICE_STEPS: u32 = 50;

/// 만원 per slider step (1억)
pub const MANWON_PER_STEP: i64 = 10_000;

/// Which handle of the slider moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

impl std::str::FromStr for Bound {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" => Ok(Bound::Min),
            "max" => Ok(Bound::Max),
            _ => Err(format!("Invalid bound: {}", s)),
        }
    }
}

/// Slider position, `min <= max <= PRICE_STEPS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: u32,
    max: u32,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: PRICE_STEPS,
        }
    }
}

impl PriceRange {
    pub fn new(min: u32, max: u32) -> Self {
        let max = max.min(PRICE_STEPS);
        let min = min.min(max);
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Move the lower handle; the upper one is pushed up if needed
    pub fn with_min(self, value: u32) -> Self {
        let min = value.min(PRICE_STEPS);
        Self {
            min,
            max: self.max.max(min),
        }
    }

    /// Move the upper handle; the lower one is pushed down if needed
    pub fn with_max(self, value: u32) -> Self {
        let max = value.min(PRICE_STEPS);
        Self {
            min: self.min.min(max),
            max,
        }
    }

    pub fn with_bound(self, bound: Bound, value: u32) -> Self {
        match bound {
            Bound::Min => self.with_min(value),
            Bound::Max => self.with_max(value),
        }
    }

    /// `최소금액` value: `-1` at the bottom, otherwise 만원
    pub fn min_param(&self) -> String {
        if self.min == 0 {
            NO_BOUND.to_string()
        } else {
            (self.min as i64 * MANWON_PER_STEP).to_string()
        }
    }

    /// `최대금액` value: `-1` at the top, otherwise 만원
    pub fn max_param(&self) -> String {
        if self.max == PRICE_STEPS {
            NO_BOUND.to_string()
        } else {
            (self.max as i64 * MANWON_PER_STEP).to_string()
        }
    }

    /// Write both bounds into the filter
    pub fn apply_to(&self, filter: &mut SearchFilter) {
        filter.min_price = self.min_param();
        filter.max_price = self.max_param();
    }

    /// Recover the slider position from the filter's price fields
    ///
    /// Unparseable values fall back to the open end of the slider.
    pub fn from_filter(filter: &SearchFilter) -> Self {
        let min = parse_steps(&filter.min_price).unwrap_or(0);
        let max = parse_steps(&filter.max_price)
            .filter(|steps| *steps > 0)
            .unwrap_or(PRICE_STEPS);
        Self::new(min, max)
    }

    /// Text under a handle
    pub fn label(value: u32, bound: Bound) -> String {
        let open = match bound {
            Bound::Min => value == 0,
            Bound::Max => value == PRICE_STEPS,
        };
        if open {
            "제한없음".to_string()
        } else {
            format!("{}억원", value)
        }
    }
}

fn parse_steps(value: &str) -> Option<u32> {
    if value == NO_BOUND {
        return None;
    }
    let manwon: i64 = value.trim().parse().ok()?;
    if manwon < 0 {
        return None;
    }
    Some((manwon / MANWON_PER_STEP).min(PRICE_STEPS as i64) as u32)
}
