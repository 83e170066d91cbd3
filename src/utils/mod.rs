use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Usable display text from a loosely-typed JSON value.
///
/// Strings count when non-blank (returned trimmed), numbers are stringified,
/// anything else yields `None`.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn opt_text(value: Option<&Value>) -> Option<String> {
    value.and_then(text_value)
}

/// JavaScript-style truthiness, used for flags like `media.hasImage`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[_-]+").expect("static regex"))
}

/// `clt_website` -> `Clt Website`, `free-code_camp` -> `Free Code Camp`.
pub fn friendly_label(key: &str) -> String {
    let spaced = separator_re().replace_all(key, " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !is_word;
    }
    out
}

/// Upper-cases the first character: `personal` -> `Personal`.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits a comma-separated list, trimming items, dropping empties and
/// repeats while keeping first-seen order.
pub fn parse_csv_list(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in value.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    out
}

/// `scheme://host[:port]` of a URL, or `None` when it does not parse.
pub fn url_origin(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url.trim()).ok()?;
    let origin = parsed.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_value_rejects_blank_and_structured() {
        assert_eq!(text_value(&json!("  hi ")), Some("hi".to_string()));
        assert_eq!(text_value(&json!("   ")), None);
        assert_eq!(text_value(&json!(3135)), Some("3135".to_string()));
        assert_eq!(text_value(&json!({"a": 1})), None);
        assert_eq!(text_value(&json!(null)), None);
    }

    #[test]
    fn friendly_label_handles_separators() {
        assert_eq!(friendly_label("clt_website"), "Clt Website");
        assert_eq!(friendly_label("free--code_camp"), "Free Code Camp");
        assert_eq!(friendly_label("github"), "Github");
    }

    #[test]
    fn csv_list_dedups_in_order() {
        assert_eq!(
            parse_csv_list(" image, quote,,image "),
            vec!["image".to_string(), "quote".to_string()]
        );
    }

    #[test]
    fn origin_drops_path_and_query() {
        assert_eq!(
            url_origin("https://dvonb.xyz/api/2025-fall/itis-3135/students?full=1"),
            Some("https://dvonb.xyz".to_string())
        );
        assert_eq!(
            url_origin("http://127.0.0.1:8080/x"),
            Some("http://127.0.0.1:8080".to_string())
        );
        assert_eq!(url_origin("not a url"), None);
    }

    #[test]
    fn truthiness_matches_js() {
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(null)));
    }
}
