//! Loose scalar coercion for raw catalog records and query parameters.
//!
//! Exports are hand-edited and arrive with numbers as strings, stringly
//! integers, and legacy array fields. Every helper here returns `None` when a
//! value cannot be read, and callers decide what the default is.

use serde_json::Value;

/// Exclusive upper bound of `i64` as an `f64` (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Reads a finite number from a JSON number or numeric string.
#[must_use]
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parses a finite number, ignoring surrounding whitespace.
///
/// Empty input is not a number, and neither are `inf` or `NaN`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Reads an exact integer, as required for product ids.
///
/// `"12"`, `12` and `12.0` are all accepted; `12.5` is not.
#[must_use]
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => id_token(s),
        _ => None,
    }
}

/// Parses one token of an id list such as the `ids` query parameter.
#[must_use]
pub fn id_token(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_number(trimmed).and_then(integral))
}

/// Reads a count, truncating fractional values toward zero.
#[must_use]
pub fn count(value: &Value) -> Option<i64> {
    #[allow(clippy::cast_possible_truncation)]
    number(value).map(|f| f.trunc() as i64)
}

/// Reads display text. Empty strings count as missing.
///
/// Numbers keep their JSON spelling and arrays of scalars are joined with
/// `", "` (legacy exports store sizes as `[30, 40]`).
#[must_use]
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.fract() != 0.0 || value < -I64_BOUND || value >= I64_BOUND {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn number_accepts_numeric_strings() {
        assert_eq!(number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(number(&json!(3)), Some(3.0));
    }

    #[test]
    fn number_rejects_non_numeric_values() {
        assert_eq!(number(&json!("abc")), None);
        assert_eq!(number(&json!("")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!(null)), None);
        assert_eq!(number(&json!(true)), None);
        assert_eq!(number(&json!({"amount": 1})), None);
    }

    #[test]
    fn integer_accepts_whole_numbers_in_any_spelling() {
        assert_eq!(integer(&json!(7)), Some(7));
        assert_eq!(integer(&json!("7")), Some(7));
        assert_eq!(integer(&json!(" 7 ")), Some(7));
        assert_eq!(integer(&json!(7.0)), Some(7));
        assert_eq!(integer(&json!("7.0")), Some(7));
        assert_eq!(integer(&json!(-3)), Some(-3));
    }

    #[test]
    fn integer_rejects_fractions_and_overflow() {
        assert_eq!(integer(&json!(7.5)), None);
        assert_eq!(integer(&json!("7.5")), None);
        assert_eq!(integer(&json!(u64::MAX)), None);
        assert_eq!(integer(&json!("1e30")), None);
        assert_eq!(integer(&json!("abc")), None);
        assert_eq!(integer(&json!(null)), None);
    }

    #[test]
    fn id_token_rejects_empty_tokens() {
        assert_eq!(id_token(""), None);
        assert_eq!(id_token("  "), None);
        assert_eq!(id_token("42"), Some(42));
    }

    #[test]
    fn count_truncates_toward_zero() {
        assert_eq!(count(&json!(4.9)), Some(4));
        assert_eq!(count(&json!("-2.7")), Some(-2));
        assert_eq!(count(&json!("none")), None);
    }

    #[test]
    fn text_joins_scalar_arrays() {
        assert_eq!(text(&json!([30, 40])), Some("30, 40".to_string()));
        assert_eq!(text(&json!(["S", "", "M"])), Some("S, M".to_string()));
        assert_eq!(text(&json!([])), None);
    }

    #[test]
    fn text_treats_empty_and_non_scalar_values_as_missing() {
        assert_eq!(text(&json!("")), None);
        assert_eq!(text(&json!(false)), None);
        assert_eq!(text(&json!({"a": 1})), None);
        assert_eq!(text(&json!(25)), Some("25".to_string()));
        assert_eq!(text(&json!("  ")), Some("  ".to_string()));
    }
}
