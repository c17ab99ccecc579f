// src/core/extract.rs — Recover a JSON object embedded in free-form model output
//
// The span heuristic takes everything from the first `{` to the last `}`.
// It is not a parser: prose containing stray braces, or a reply carrying two
// separate objects, yields a span that fails to parse and the caller gets the
// defaults back. Input is bounded to MAX_SCAN_BYTES before scanning.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::util::truncate_str;

/// Longest prefix of model output considered for the brace scan.
pub const MAX_SCAN_BYTES: usize = 64 * 1024;

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    pub value: T,
    /// A brace span was found and parsed as a JSON object.
    pub parsed: bool,
    /// Number of fields taken from the model rather than the defaults.
    pub from_model: usize,
}

impl<T> Extraction<T> {
    /// True when the model supplied at least one field.
    pub fn contributed(&self) -> bool {
        self.from_model > 0
    }
}

/// Greedy outer-brace span of `raw`, if any.
pub fn find_json_span(raw: &str) -> Option<&str> {
    let bounded = truncate_str(raw, MAX_SCAN_BYTES);
    let start = bounded.find('{')?;
    let end = bounded.rfind('}')?;
    (end > start).then(|| &bounded[start..=end])
}

/// Merge the object embedded in `raw` over `defaults`, field by field.
///
/// Every key of `defaults` is kept. A parsed value replaces the default only
/// when it has a compatible shape (see [`compatible`]); missing, null or
/// mistyped fields fall back individually. Never fails.
pub fn extract<T>(raw: &str, defaults: &T) -> Extraction<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let miss = || Extraction {
        value: defaults.clone(),
        parsed: false,
        from_model: 0,
    };

    let Ok(Value::Object(default_map)) = serde_json::to_value(defaults) else {
        return miss();
    };
    let Some(span) = find_json_span(raw) else {
        return miss();
    };
    let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(span) else {
        return miss();
    };

    let mut merged = Map::with_capacity(default_map.len());
    let mut from_model = 0;
    for (key, default) in default_map {
        match parsed.get(&key) {
            Some(candidate) if compatible(&default, candidate) => {
                merged.insert(key, candidate.clone());
                from_model += 1;
            }
            _ => {
                merged.insert(key, default);
            }
        }
    }

    match serde_json::from_value(Value::Object(merged)) {
        Ok(value) => Extraction {
            value,
            parsed: true,
            from_model,
        },
        Err(e) => {
            tracing::debug!("Merged model output failed to deserialize: {e}");
            Extraction {
                parsed: true,
                ..miss()
            }
        }
    }
}

/// Whether `candidate` may stand in for `default`.
///
/// Strings must be non-blank, lists non-empty with elements shaped like the
/// default's elements, numbers finite. A null default (an optional field)
/// accepts a string.
pub fn compatible(default: &Value, candidate: &Value) -> bool {
    match (default, candidate) {
        (_, Value::Null) => false,
        (Value::Null, Value::String(_)) => true,
        (Value::String(_), Value::String(s)) => !s.trim().is_empty(),
        (Value::Number(_), Value::Number(n)) => n.as_f64().is_some_and(f64::is_finite),
        (Value::Bool(_), Value::Bool(_)) => true,
        (Value::Object(_), Value::Object(_)) => true,
        (Value::Array(d), Value::Array(c)) => {
            if c.is_empty() {
                return false;
            }
            match d.first() {
                Some(proto) => c.iter().all(|item| compatible(proto, item)),
                None => c.iter().all(Value::is_string),
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Plan {
        title: String,
        items: Vec<String>,
        score: f64,
        note: Option<String>,
    }

    fn defaults() -> Plan {
        Plan {
            title: "default title".into(),
            items: vec!["a".into(), "b".into()],
            score: 0.5,
            note: None,
        }
    }

    #[test]
    fn test_clean_json_reproduced() {
        let raw = r#"{"title":"T","items":["x","y","z"],"score":0.9,"note":"n"}"#;
        let out = extract(raw, &defaults());
        assert!(out.parsed);
        assert_eq!(out.from_model, 4);
        assert_eq!(
            out.value,
            Plan {
                title: "T".into(),
                items: vec!["x".into(), "y".into(), "z".into()],
                score: 0.9,
                note: Some("n".into()),
            }
        );
    }

    #[test]
    fn test_json_inside_markdown_fence() {
        let raw = "Here you go:\n```json\n{\"title\": \"Fenced\"}\n```\nHope it helps!";
        let out = extract(raw, &defaults());
        assert!(out.parsed);
        assert_eq!(out.from_model, 1);
        assert_eq!(out.value.title, "Fenced");
        assert_eq!(out.value.items, defaults().items);
    }

    #[test]
    fn test_field_by_field_backfill() {
        let raw = r#"{"title":"  ","items":[],"score":"high","note":null,"extra":1}"#;
        let out = extract(raw, &defaults());
        assert!(out.parsed);
        assert_eq!(out.from_model, 0);
        assert!(!out.contributed());
        assert_eq!(out.value, defaults());
    }

    #[test]
    fn test_mixed_list_rejected() {
        let raw = r#"{"items":["ok", 3]}"#;
        let out = extract(raw, &defaults());
        assert_eq!(out.value.items, defaults().items);
    }

    #[test]
    fn test_no_span_returns_defaults() {
        for raw in ["", "no braces here", "} backwards {", "{", "}"] {
            let out = extract(raw, &defaults());
            assert!(!out.parsed, "input {raw:?}");
            assert_eq!(out.value, defaults());
        }
    }

    #[test]
    fn test_malformed_span_returns_defaults() {
        let raw = r#"{"title": "unterminated}"#;
        let out = extract(raw, &defaults());
        assert!(!out.parsed);
        assert_eq!(out.value, defaults());
    }

    #[test]
    fn test_two_objects_mis_extract_to_defaults() {
        // Greedy span covers both objects plus the prose between them.
        let raw = r#"{"title":"one"} and also {"title":"two"}"#;
        assert_eq!(
            find_json_span(raw),
            Some(r#"{"title":"one"} and also {"title":"two"}"#)
        );
        let out = extract(raw, &defaults());
        assert!(!out.parsed);
        assert_eq!(out.value, defaults());
    }

    #[test]
    fn test_non_object_json_ignored() {
        let out = extract("[{\"title\":\"x\"}]", &defaults());
        // The span is `{"title":"x"}` which does parse
        assert!(out.parsed);
        assert_eq!(out.value.title, "x");

        let out = extract("{1, 2}", &defaults());
        assert!(!out.parsed);
    }

    #[test]
    fn test_scan_is_bounded() {
        let mut raw = String::from("{\"title\":\"late\"");
        raw.push_str(&" ".repeat(MAX_SCAN_BYTES));
        raw.push('}');
        assert!(find_json_span(&raw).is_none());
        assert_eq!(extract(&raw, &defaults()).value, defaults());
    }

    #[test]
    fn test_compatible_shapes() {
        use serde_json::json;
        assert!(compatible(&json!(null), &json!("code")));
        assert!(!compatible(&json!(null), &json!(5)));
        assert!(compatible(&json!(1.0), &json!(0.25)));
        assert!(!compatible(&json!("s"), &json!(["s"])));
        assert!(compatible(&json!([]), &json!(["s"])));
        assert!(!compatible(&json!([]), &json!([1])));
    }
}
