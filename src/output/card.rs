use colored::Colorize;

use crate::browse::{FieldKey, LoadState, Page, VisibleFields};
use crate::normalize::NormalizedStudent;
use crate::utils::friendly_label;

const NO_MATCHES: &str = "No students match your search.";
const LOADING: &str = "Loading students...";

struct CardWriter {
    out: String,
    color: bool,
}

impl CardWriter {
    fn heading(&mut self, text: &str) {
        if self.color {
            self.out.push_str(&text.bold().cyan().to_string());
        } else {
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn label(&self, label: &str) -> String {
        let label = format!("{label}:");
        if self.color {
            label.bold().to_string()
        } else {
            label
        }
    }

    fn field(&mut self, label: &str, value: &str) {
        let label = self.label(label);
        self.out.push_str(&format!("{label} {value}\n"));
    }

    fn section(&mut self, label: &str) {
        let label = self.label(label);
        self.out.push_str(&label);
        self.out.push('\n');
    }

    fn item(&mut self, label: &str, value: &str) {
        let label = self.label(label);
        self.out.push_str(&format!("  {label} {value}\n"));
    }

    fn note(&mut self, text: &str) {
        if self.color {
            self.out.push_str(&text.dimmed().to_string());
        } else {
            self.out.push_str(text);
        }
        self.out.push('\n');
    }
}

/// Renders one student as labelled lines, honoring the visible-field toggles.
pub fn render_card(student: &NormalizedStudent, visible: &VisibleFields, color: bool) -> String {
    let mut w = CardWriter {
        out: String::new(),
        color,
    };

    if visible.is_visible(FieldKey::Name) {
        w.heading(&student.display_name);
    }

    if visible.is_visible(FieldKey::Mascot) {
        w.field(
            FieldKey::Mascot.label(),
            student.mascot.as_deref().unwrap_or("N/A"),
        );
    }

    if visible.is_visible(FieldKey::Image) {
        match student.image_url.as_deref() {
            Some(url) => w.field(FieldKey::Image.label(), url),
            None => w.field(FieldKey::Image.label(), "No image available"),
        }
    }

    if visible.is_visible(FieldKey::Personal) {
        if let Some(statement) = student.personal_statement.as_deref() {
            w.field(FieldKey::Personal.label(), statement);
        }
    }

    if visible.is_visible(FieldKey::Backgrounds) {
        match student.backgrounds.as_slice() {
            [] => {}
            [only] if !only.is_labeled() => w.field(FieldKey::Backgrounds.label(), &only.value),
            entries => {
                w.section(FieldKey::Backgrounds.label());
                for entry in entries {
                    w.item(&entry.label, &entry.value);
                }
            }
        }
    }

    if visible.is_visible(FieldKey::Classes) && !student.classes.is_empty() {
        w.field(FieldKey::Classes.label(), &student.classes.join(", "));
    }

    if visible.is_visible(FieldKey::Extra) {
        if let Some(extra) = student.extra_info.as_deref() {
            w.field(FieldKey::Extra.label(), extra);
        }
    }

    if visible.is_visible(FieldKey::FunFact) {
        if let Some(fun_fact) = student.fun_fact.as_deref() {
            w.field(FieldKey::FunFact.label(), fun_fact);
        }
    }

    if visible.is_visible(FieldKey::Quote) {
        if let Some(quote) = student.quote.as_ref() {
            let text = match quote.author.as_deref() {
                Some(author) => format!("{} \u{2014} {}", quote.text, author),
                None => quote.text.clone(),
            };
            w.field(FieldKey::Quote.label(), &text);
        }
    }

    if visible.is_visible(FieldKey::Links) {
        w.section(FieldKey::Links.label());
        if student.links.is_empty() {
            w.note("  No links provided.");
        }
        for link in &student.links {
            w.item(&friendly_label(&link.key), &link.href);
        }
    }

    w.out
}

pub(crate) fn render_card_plain(student: &NormalizedStudent, visible: &VisibleFields) -> String {
    render_card(student, visible, false)
}

/// The one-line summary above the card: loading, the error, or match counts.
pub fn render_status(page: &Page, color: bool) -> String {
    let line = match page.state() {
        LoadState::Loading => LOADING.to_string(),
        LoadState::Error(message) => {
            return if color {
                message.red().to_string()
            } else {
                message.clone()
            };
        }
        LoadState::Ready => {
            let model = page.model();
            match model.position() {
                Some((index, count)) => format!(":: Matches: {count} :: Student {index} of {count}"),
                None => format!(":: Matches: 0 :: {NO_MATCHES}"),
            }
        }
    };
    if color {
        line.yellow().to_string()
    } else {
        line
    }
}
