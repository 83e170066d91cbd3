mod links;

use serde::Serialize;
use serde_json::Value;

use crate::roster::RawStudentRecord;
use crate::utils;

pub use links::{gather_links, LINK_KEYS};

pub const UNNAMED_STUDENT: &str = "Unnamed Student";

/// Origin that relative `media.src` paths are resolved against by default.
pub const DEFAULT_MEDIA_ORIGIN: &str = "https://dvonb.xyz";

const BACKGROUND_KEYS: [&str; 4] = ["personal", "professional", "academic", "subject"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Background {
    /// Empty when the upstream value was a bare string.
    pub label: String,
    pub value: String,
}

impl Background {
    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: String,
    pub author: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    pub key: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedStudent {
    pub display_name: String,
    pub email_prefix: Option<String>,
    pub mascot: Option<String>,
    pub image_url: Option<String>,
    pub personal_statement: Option<String>,
    pub extra_info: Option<String>,
    pub fun_fact: Option<String>,
    pub backgrounds: Vec<Background>,
    pub classes: Vec<String>,
    pub quote: Option<Quote>,
    pub links: Vec<Link>,
}

/// Resolves every display field of `raw`, using the default media origin.
pub fn normalize(raw: &RawStudentRecord) -> NormalizedStudent {
    normalize_with_origin(raw, DEFAULT_MEDIA_ORIGIN)
}

/// Each field resolves independently; a malformed field only ever degrades
/// itself to absent.
pub fn normalize_with_origin(raw: &RawStudentRecord, media_origin: &str) -> NormalizedStudent {
    NormalizedStudent {
        display_name: display_name(raw),
        email_prefix: utils::opt_text(raw.get("prefix")),
        mascot: utils::opt_text(raw.get("mascot")),
        image_url: image_url(raw, media_origin),
        personal_statement: first_text(raw, &["personal_statement", "personalStatement"]),
        extra_info: first_text(raw, &["extra_info", "additional", "extra"]),
        fun_fact: first_text(raw, &["fun_fact", "funFact", "computer"]),
        backgrounds: backgrounds(raw),
        classes: classes(raw),
        quote: quote(raw),
        links: gather_links(raw),
    }
}

fn first_text(raw: &RawStudentRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| utils::opt_text(raw.get(key)))
}

fn name_part(raw: &RawStudentRecord, flat: &str, nested: &str) -> Option<String> {
    utils::opt_text(raw.get(flat)).or_else(|| utils::opt_text(raw.get_nested("name", nested)))
}

/// The name search matches against. Never empty.
pub fn display_name(raw: &RawStudentRecord) -> String {
    let first = name_part(raw, "first_name", "first").unwrap_or_default();
    let last = name_part(raw, "last_name", "last").unwrap_or_default();
    let full = format!("{first} {last}");
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }
    if let Some(preferred) = utils::opt_text(raw.get_nested("name", "preferred")) {
        return preferred;
    }
    if let Some(prefix) = utils::opt_text(raw.get("prefix")) {
        return prefix;
    }
    UNNAMED_STUDENT.to_string()
}

pub fn image_url(raw: &RawStudentRecord, media_origin: &str) -> Option<String> {
    if let Some(direct) = first_text(raw, &["image", "picture", "photo"]) {
        return Some(direct);
    }
    let media = raw.get("media")?;
    if !media.get("hasImage").map(utils::is_truthy).unwrap_or(false) {
        return None;
    }
    let src = utils::opt_text(media.get("src"))?;
    Some(format!("{}{}", media_origin.trim_end_matches('/'), src))
}

pub fn classes(raw: &RawStudentRecord) -> Vec<String> {
    if let Some(Value::Array(items)) = raw.get("classes") {
        return items.iter().filter_map(utils::text_value).collect();
    }
    if let Some(Value::Array(courses)) = raw.get("courses") {
        return courses.iter().filter_map(course_label).collect();
    }
    Vec::new()
}

fn course_label(course: &Value) -> Option<String> {
    if !course.is_object() {
        return None;
    }
    if let Some(name) = utils::opt_text(course.get("name")) {
        return Some(name);
    }
    if let Some(code) = utils::opt_text(course.get("code")) {
        return Some(code);
    }
    let dept = utils::opt_text(course.get("dept")).or_else(|| utils::opt_text(course.get("department")));
    let num = utils::opt_text(course.get("num")).or_else(|| utils::opt_text(course.get("number")));
    let joined = [dept, num].into_iter().flatten().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

pub fn backgrounds(raw: &RawStudentRecord) -> Vec<Background> {
    let source = ["background", "backgrounds"]
        .iter()
        .filter_map(|key| raw.get(key))
        .find(|value| utils::is_truthy(value));
    match source {
        Some(value @ Value::String(_)) => utils::text_value(value)
            .map(|value| Background {
                label: String::new(),
                value,
            })
            .into_iter()
            .collect(),
        Some(Value::Object(map)) => BACKGROUND_KEYS
            .iter()
            .filter_map(|key| {
                utils::opt_text(map.get(*key)).map(|value| Background {
                    label: utils::capitalize(key),
                    value,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn quote(raw: &RawStudentRecord) -> Option<Quote> {
    match raw.get("quote")? {
        value @ Value::String(_) => utils::text_value(value).map(|text| Quote { text, author: None }),
        Value::Object(map) => Some(Quote {
            text: utils::opt_text(map.get("text")).unwrap_or_default(),
            author: utils::opt_text(map.get("author")),
        }),
        _ => None,
    }
}
