use crate::roster::{FetchError, RawStudentRecord};

use super::{BrowseModel, FieldKey, NavigationPolicy, UnknownField};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error(String),
}

/// One activation of a roster page: a load state plus the browse model it
/// gates. Browse operations do nothing until the fetch has resolved to
/// `Ready`.
#[derive(Clone, Debug)]
pub struct Page {
    state: LoadState,
    model: BrowseModel,
}

impl Page {
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            state: LoadState::Loading,
            model: BrowseModel::new(policy),
        }
    }

    /// Applies the outcome of the page's single fetch.
    pub fn resolve(&mut self, result: Result<Vec<RawStudentRecord>, FetchError>) {
        match result {
            Ok(roster) => {
                self.model.set_roster(roster);
                self.state = LoadState::Ready;
            }
            Err(err) => {
                tracing::error!(error = %err, "roster unavailable");
                self.model.set_roster(Vec::new());
                self.state = LoadState::Error(err.user_message());
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn model(&self) -> &BrowseModel {
        &self.model
    }

    /// Mutable access to the browse model, only once the roster is loaded.
    pub fn model_mut(&mut self) -> Option<&mut BrowseModel> {
        if self.is_ready() {
            Some(&mut self.model)
        } else {
            None
        }
    }

    pub fn next(&mut self) {
        if let Some(model) = self.model_mut() {
            model.next();
        }
    }

    pub fn previous(&mut self) {
        if let Some(model) = self.model_mut() {
            model.previous();
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        if let Some(model) = self.model_mut() {
            model.set_search_term(term);
        }
    }

    pub fn toggle_field(&mut self, key: FieldKey) -> Option<bool> {
        self.model_mut().map(|m| m.toggle_field(key))
    }

    pub fn toggle_field_named(&mut self, key: &str) -> Result<Option<bool>, UnknownField> {
        let key: FieldKey = key.parse()?;
        Ok(self.toggle_field(key))
    }
}
