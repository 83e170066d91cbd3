pub mod card;

use crate::normalize::NormalizedStudent;

pub use card::{render_card, render_status};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Plain cards (every field shown, no color), separated by blank lines.
pub fn render_text(students: &[NormalizedStudent]) -> Vec<u8> {
    let visible = crate::browse::VisibleFields::default();
    let cards: Vec<String> = students
        .iter()
        .map(|s| card::render_card_plain(s, &visible))
        .collect();
    cards.join("\n").into_bytes()
}

pub fn render_json(students: &[NormalizedStudent]) -> Vec<u8> {
    serde_json::to_vec_pretty(students).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render(format: OutputFormat, students: &[NormalizedStudent]) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(students),
        OutputFormat::Json => render_json(students),
    }
}
