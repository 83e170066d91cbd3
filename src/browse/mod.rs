mod fields;
mod page;

use crate::normalize::{self, NormalizedStudent};
use crate::roster::RawStudentRecord;

pub use fields::{FieldKey, UnknownField, VisibleFields};
pub use page::{LoadState, Page};

/// How `next`/`previous` behave at the ends of the match list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigationPolicy {
    /// Step modulo the match count (the introductions viewer).
    #[default]
    Wrap,
    /// Stop at the first and last match (the simple roster page).
    Clamp,
}

impl NavigationPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "wrap" | "viewer" => Some(Self::Wrap),
            "clamp" | "clamped" | "roster" => Some(Self::Clamp),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Clamp => "clamp",
        }
    }
}

/// One card at a time, or every match at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Single,
    All,
}

/// In-memory browse state over one roster snapshot.
///
/// `filtered` holds indices into `roster` in roster order. Every mutation that
/// can change its length re-checks the cursor before returning, so callers
/// never observe `cursor >= filtered.len()` on a non-empty match list.
#[derive(Clone, Debug, Default)]
pub struct BrowseModel {
    roster: Vec<RawStudentRecord>,
    search_term: String,
    filtered: Vec<usize>,
    cursor: usize,
    policy: NavigationPolicy,
    view_mode: ViewMode,
    visible: VisibleFields,
}

impl BrowseModel {
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn set_roster(&mut self, roster: Vec<RawStudentRecord>) {
        self.roster = roster;
        self.refilter();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        let term = self.search_term.trim().to_lowercase();
        self.filtered = if term.is_empty() {
            (0..self.roster.len()).collect()
        } else {
            self.roster
                .iter()
                .enumerate()
                .filter(|(_, r)| normalize::display_name(r).to_lowercase().contains(&term))
                .map(|(i, _)| i)
                .collect()
        };
        self.cursor = 0;
        self.revalidate_cursor();
        tracing::debug!(
            term = %self.search_term,
            matches = self.filtered.len(),
            total = self.roster.len(),
            "filter applied"
        );
    }

    fn revalidate_cursor(&mut self) {
        if self.filtered.is_empty() || self.cursor >= self.filtered.len() {
            self.cursor = 0;
        }
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.cursor = match self.policy {
            NavigationPolicy::Wrap => (self.cursor + 1) % len,
            NavigationPolicy::Clamp => (self.cursor + 1).min(len - 1),
        };
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.cursor = match self.policy {
            NavigationPolicy::Wrap => {
                if self.cursor == 0 {
                    len - 1
                } else {
                    self.cursor - 1
                }
            }
            NavigationPolicy::Clamp => self.cursor.saturating_sub(1),
        };
    }

    pub fn toggle_field(&mut self, key: FieldKey) -> bool {
        self.visible.toggle(key)
    }

    /// Toggles a field by its key name. Unknown names change nothing.
    pub fn toggle_field_named(&mut self, key: &str) -> Result<bool, UnknownField> {
        let key: FieldKey = key.parse()?;
        Ok(self.toggle_field(key))
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = match self.view_mode {
            ViewMode::Single => ViewMode::All,
            ViewMode::All => ViewMode::Single,
        };
        self.cursor = 0;
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.cursor = 0;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn visible_fields(&self) -> &VisibleFields {
        &self.visible
    }

    pub fn visible_fields_mut(&mut self) -> &mut VisibleFields {
        &mut self.visible
    }

    pub fn roster(&self) -> &[RawStudentRecord] {
        &self.roster
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.filtered.len()
    }

    /// Matching records in roster order.
    pub fn matches(&self) -> impl Iterator<Item = &RawStudentRecord> + '_ {
        self.filtered.iter().map(|&i| &self.roster[i])
    }

    pub fn current(&self) -> Option<&RawStudentRecord> {
        self.filtered.get(self.cursor).map(|&i| &self.roster[i])
    }

    pub fn current_normalized(&self, media_origin: &str) -> Option<NormalizedStudent> {
        self.current()
            .map(|r| normalize::normalize_with_origin(r, media_origin))
    }

    /// 1-based position of the cursor and the match count.
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.filtered.is_empty() {
            None
        } else {
            Some((self.cursor + 1, self.filtered.len()))
        }
    }

    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn at_end(&self) -> bool {
        self.filtered.is_empty() || self.cursor + 1 >= self.filtered.len()
    }
}
