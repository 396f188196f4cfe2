use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+))").expect("leading number pattern")
});

static YEARS_OF_EXPERIENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*years?\s*(?:of\s*)?(?:experience|exp)")
        .expect("years of experience pattern")
});

/// Parses the leading number of `text`, ignoring whatever follows it.
/// `"85%"` → 85, `"3.5 years"` → 3.5, `"n/a"` → None.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Reads a number out of an upstream value, accepting JSON numbers and numeric strings.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// Finds the first "<N>+ years of experience" style requirement in free text.
pub fn years_from_text(text: &str) -> Option<f64> {
    YEARS_OF_EXPERIENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
