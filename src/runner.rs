use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::browse::{FieldKey, NavigationPolicy, Page, ViewMode};
use crate::normalize::{self, NormalizedStudent, DEFAULT_MEDIA_ORIGIN};
use crate::roster::{FetchError, RosterClient, DEFAULT_ROSTER_URL};
use crate::utils;

#[derive(Clone, Debug)]
pub struct Options {
    pub url: String,
    pub timeout_seconds: u64,
    pub policy: NavigationPolicy,
    pub view_mode: ViewMode,
    pub search: Option<String>,
    pub hidden_fields: Vec<FieldKey>,
    /// Origin for relative `media.src` paths; derived from `url` when unset.
    pub media_origin: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: DEFAULT_ROSTER_URL.to_string(),
            timeout_seconds: 10,
            policy: NavigationPolicy::Wrap,
            view_mode: ViewMode::Single,
            search: None,
            hidden_fields: Vec::new(),
            media_origin: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("invalid timeout {value}, expected a positive number of seconds")]
    InvalidTimeout { value: u64 },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Clone, Debug)]
pub struct LoadResult {
    pub page: Page,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    media_origin: String,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if reqwest::Url::parse(options.url.trim()).is_err() {
            return Err(RunnerError::InvalidUrl {
                url: options.url.clone(),
            });
        }
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        let media_origin = options
            .media_origin
            .clone()
            .or_else(|| utils::url_origin(&options.url))
            .unwrap_or_else(|| DEFAULT_MEDIA_ORIGIN.to_string());
        Ok(Self {
            options,
            media_origin,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn media_origin(&self) -> &str {
        &self.media_origin
    }

    pub fn client(&self) -> Result<RosterClient, RunnerError> {
        Ok(RosterClient::new(
            self.options.url.trim(),
            Duration::from_secs(self.options.timeout_seconds),
        )?)
    }

    /// A fresh page in the loading state with the configured view settings
    /// applied.
    pub fn new_page(&self) -> Page {
        Page::new(self.options.policy)
    }

    /// Fetches the roster once and returns the resolved page. A failed fetch
    /// is not an error here: the page carries it as its error state.
    pub async fn load(&self) -> Result<LoadResult, RunnerError> {
        let started_at = Instant::now();
        let client = self.client()?;
        let mut page = self.new_page();
        page.resolve(client.fetch().await);
        self.apply_view_settings(&mut page);
        Ok(LoadResult {
            page,
            elapsed: started_at.elapsed(),
        })
    }

    pub fn apply_view_settings(&self, page: &mut Page) {
        if let Some(model) = page.model_mut() {
            for key in &self.options.hidden_fields {
                model.visible_fields_mut().set(*key, false);
            }
            model.set_view_mode(self.options.view_mode);
            if let Some(term) = self.options.search.as_deref() {
                model.set_search_term(term);
            }
        }
    }

    pub fn normalize_matches(&self, page: &Page) -> Vec<NormalizedStudent> {
        page.model()
            .matches()
            .map(|r| normalize::normalize_with_origin(r, &self.media_origin))
            .collect()
    }
}
