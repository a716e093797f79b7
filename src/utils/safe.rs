//! Lenient accessors for raw exchange JSON.
//!
//! Every helper returns `None` when the key is missing or the value has the
//! wrong shape, so normalizers can keep "absent" distinct from zero.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub fn safe_string(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

pub fn safe_string2(obj: &Value, key1: &str, key2: &str) -> Option<String> {
    safe_string(obj, key1).or_else(|| safe_string(obj, key2))
}

pub fn safe_integer(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

/// Number or numeric string as a `Decimal`
pub fn safe_decimal(obj: &Value, key: &str) -> Option<Decimal> {
    obj.get(key).and_then(value_to_decimal)
}

pub fn safe_decimal2(obj: &Value, key1: &str, key2: &str) -> Option<Decimal> {
    safe_decimal(obj, key1).or_else(|| safe_decimal(obj, key2))
}

pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) if !s.is_empty() => Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok(),
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        _ => None,
    }
}

/// Python-style truthiness, which is what the exchanges' `success` flag follows
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_decimal_accepts_strings_and_numbers() {
        let raw = json!({"a": "100.5", "b": 90, "c": 95.5, "d": "", "e": null, "f": "abc"});
        assert_eq!(safe_decimal(&raw, "a"), Some(Decimal::from_str("100.5").unwrap()));
        assert_eq!(safe_decimal(&raw, "b"), Some(Decimal::from(90)));
        assert_eq!(safe_decimal(&raw, "c"), Some(Decimal::from_str("95.5").unwrap()));
        assert_eq!(safe_decimal(&raw, "d"), None);
        assert_eq!(safe_decimal(&raw, "e"), None);
        assert_eq!(safe_decimal(&raw, "f"), None);
        assert_eq!(safe_decimal(&raw, "missing"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(true)));
    }

    #[test]
    fn test_safe_string2_falls_back() {
        let raw = json!({"tid": 42});
        assert_eq!(safe_string2(&raw, "trade_id", "tid"), Some("42".to_string()));
    }
}
