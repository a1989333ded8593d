//! Display helpers for result rows

use landwatch_utils::format_number;

/// 만원 in one 억
const MANWON_PER_EOK: i64 = 10_000;

/// Price in 만원 as shown in the table
///
/// `15000` → `1.5억`, `3000` → `3,000만원`.
pub fn format_price(price: i64) -> String {
    if price >= MANWON_PER_EOK {
        // one decimal, half rounded up
        let tenths = (price + 500) / 1000;
        format!("{}.{}억", tenths / 10, tenths % 10)
    } else {
        format!("{}만원", format_number(price))
    }
}

/// Change amount with a leading `+` when it went up
pub fn format_signed_price(amount: i64) -> String {
    let sign = if amount > 0 { "+" } else { "" };
    format!("{}{}", sign, format_price(amount))
}

/// Change rate as `+1.23%`
pub fn format_rate(rate: f64) -> String {
    let sign = if rate > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, rate)
}

/// Previous-deal price, or `-` when there was none
pub fn format_prev_price(price: i64) -> String {
    if price > 0 {
        format_price(price)
    } else {
        "-".to_string()
    }
}

/// `84.97㎡ (25.7평)`
pub fn format_area(area: &str, pyeong: f64) -> String {
    format!("{}㎡ ({}평)", area, trim_float(pyeong))
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Direction of a price change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTone {
    Positive,
    Negative,
    Neutral,
}

impl ChangeTone {
    pub fn from_rate(rate: f64) -> Self {
        if rate > 0.0 {
            ChangeTone::Positive
        } else if rate < 0.0 {
            ChangeTone::Negative
        } else {
            ChangeTone::Neutral
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ChangeTone::Positive => "text-red-600",
            ChangeTone::Negative => "text-blue-600",
            ChangeTone::Neutral => "text-gray-600",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            ChangeTone::Positive => "↗",
            ChangeTone::Negative => "↘",
            ChangeTone::Neutral => "→",
        }
    }
}

/// Naver map search for a complex
pub fn map_link(complex_name: &str, region_name: &str) -> String {
    let query = format!("{} {}", complex_name, region_name);
    format!("https://map.naver.com/p/search/{}", urlencoding::encode(&query))
}

/// `20250628` → `2025-06-28` for date inputs; anything else → empty
pub fn date_to_input(yyyymmdd: &str) -> String {
    if yyyymmdd.len() == 8 && yyyymmdd.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}-{}", &yyyymmdd[0..4], &yyyymmdd[4..6], &yyyymmdd[6..8])
    } else {
        String::new()
    }
}

/// `2025-06-28` → `20250628`
pub fn date_from_input(value: &str) -> String {
    value.trim().replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(15000), "1.5억");
        assert_eq!(format_price(3000), "3,000만원");
        assert_eq!(format_price(10000), "1.0억");
        assert_eq!(format_price(235000), "23.5억");
        assert_eq!(format_price(9999), "9,999만원");
        assert_eq!(format_price(0), "0만원");
    }

    #[test]
    fn test_format_price_rounds_half_up() {
        assert_eq!(format_price(12500), "1.3억");
        assert_eq!(format_price(12449), "1.2억");
        assert_eq!(format_price(99999), "10.0억");
    }

    #[test]
    fn test_signed_and_negative() {
        assert_eq!(format_signed_price(25000), "+2.5억");
        assert_eq!(format_signed_price(-5000), "-5,000만원");
        assert_eq!(format_signed_price(0), "0만원");
        assert_eq!(format_rate(11.9), "+11.90%");
        assert_eq!(format_rate(-3.456), "-3.46%");
        assert_eq!(format_rate(0.0), "0.00%");
    }

    #[test]
    fn test_prev_price_and_area() {
        assert_eq!(format_prev_price(0), "-");
        assert_eq!(format_prev_price(20000), "2.0억");
        assert_eq!(format_area("84.97", 25.7), "84.97㎡ (25.7평)");
        assert_eq!(format_area("59", 18.0), "59㎡ (18평)");
    }

    #[test]
    fn test_change_tone() {
        assert_eq!(ChangeTone::from_rate(1.5), ChangeTone::Positive);
        assert_eq!(ChangeTone::from_rate(-0.1), ChangeTone::Negative);
        assert_eq!(ChangeTone::from_rate(0.0), ChangeTone::Neutral);
        assert_eq!(ChangeTone::Positive.css_class(), "text-red-600");
        assert_eq!(ChangeTone::Negative.arrow(), "↘");
        assert_eq!(ChangeTone::Neutral.arrow(), "→");
    }

    #[test]
    fn test_map_link() {
        let link = map_link("잠실엘스", "송파구 잠실동");
        assert!(link.starts_with("https://map.naver.com/p/search/"));
        assert!(link.ends_with(&*urlencoding::encode("잠실엘스 송파구 잠실동")));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_date_conversion() {
        assert_eq!(date_to_input("20250628"), "2025-06-28");
        assert_eq!(date_to_input(""), "");
        assert_eq!(date_to_input("2025"), "");
        assert_eq!(date_from_input("2025-06-28"), "20250628");
        assert_eq!(date_from_input(""), "");
    }
}
