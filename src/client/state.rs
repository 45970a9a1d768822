//! Browsing state for the public directory UI.
//!
//! [`BrowserState`] is a plain value updated by [`BrowserState::apply`];
//! [`Browser`] performs the requests and feeds their outcomes back in as
//! [`BrowserEvent`]s, so the transitions can be tested without a server.

use super::{ClientError, PortfolioApi};
use crate::models::MAX_PER_PAGE;
use crate::models::portfolio::PortfolioDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    LoadStarted,
    Loaded(Vec<PortfolioDetail>),
    LoadFailed(String),
    SearchStarted(String),
    SearchResults(Vec<PortfolioDetail>),
    SearchFailed(String),
    /// Blank query or an explicit clear: show the full list again.
    SearchCleared,
    Selected(PortfolioDetail),
    BackToList,
    ErrorDismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    /// Every portfolio from the last full load.
    pub all: Vec<PortfolioDetail>,
    /// What the list view shows: `all`, or the last search/filter result.
    pub results: Vec<PortfolioDetail>,
    pub selected: Option<PortfolioDetail>,
    pub view: View,
    /// True until the first full load settles.
    pub initial_loading: bool,
    pub loading: bool,
    pub searching: bool,
    pub query: String,
    pub error: Option<String>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            results: Vec::new(),
            selected: None,
            view: View::List,
            initial_loading: true,
            loading: false,
            searching: false,
            query: String::new(),
            error: None,
        }
    }
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transition. Responses are applied in the order they resolve.
    pub fn apply(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::LoadStarted => {
                self.loading = true;
                self.error = None;
            }
            BrowserEvent::Loaded(portfolios) => {
                self.results = portfolios.clone();
                self.all = portfolios;
                self.query.clear();
                self.loading = false;
                self.initial_loading = false;
                self.searching = false;
            }
            BrowserEvent::LoadFailed(message) => {
                self.loading = false;
                self.initial_loading = false;
                self.error = Some(message);
            }
            BrowserEvent::SearchStarted(query) => {
                self.query = query;
                self.searching = true;
                self.loading = true;
                self.error = None;
            }
            BrowserEvent::SearchResults(portfolios) => {
                self.results = portfolios;
                self.loading = false;
                self.view = View::List;
            }
            BrowserEvent::SearchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            BrowserEvent::SearchCleared => {
                self.query.clear();
                self.searching = false;
                self.loading = false;
                self.results = self.all.clone();
            }
            BrowserEvent::Selected(portfolio) => {
                self.selected = Some(portfolio);
                self.view = View::Detail;
            }
            BrowserEvent::BackToList => {
                self.selected = None;
                self.view = View::List;
            }
            BrowserEvent::ErrorDismissed => self.error = None,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.results.is_empty()
    }
}

/// Drives a [`BrowserState`] from the public API.
#[derive(Debug)]
pub struct Browser {
    api: PortfolioApi,
    state: BrowserState,
}

impl Browser {
    pub fn new(api: PortfolioApi) -> Self {
        Self {
            api,
            state: BrowserState::new(),
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Initial load; in debug mode a health probe runs first and is only logged.
    pub async fn start(&mut self) {
        if self.api.config().debug {
            let health = self.api.health_check().await;
            tracing::debug!(
                healthy = health.is_healthy,
                message = %health.message,
                "api health probe"
            );
        }
        self.load_all().await;
    }

    pub async fn load_all(&mut self) {
        self.state.apply(BrowserEvent::LoadStarted);
        let event = match self.api.list(1, MAX_PER_PAGE).await {
            Ok(page) => BrowserEvent::Loaded(page.data),
            Err(err) => BrowserEvent::LoadFailed(failure("load portfolios", &err)),
        };
        self.state.apply(event);
    }

    pub async fn retry(&mut self) {
        self.load_all().await;
    }

    /// Server-side search; a blank query restores the full list.
    pub async fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.state.apply(BrowserEvent::SearchCleared);
            return;
        }

        self.state.apply(BrowserEvent::SearchStarted(query.to_string()));
        let event = match self.api.search(query, MAX_PER_PAGE).await {
            Ok(page) => BrowserEvent::SearchResults(page.data),
            Err(err) => BrowserEvent::SearchFailed(failure("search", &err)),
        };
        self.state.apply(event);
    }

    pub async fn filter_by_skill(&mut self, skill: &str) {
        let skill = skill.trim();
        if skill.is_empty() {
            self.state.apply(BrowserEvent::SearchCleared);
            return;
        }

        self.state.apply(BrowserEvent::SearchStarted(skill.to_string()));
        let event = match self.api.filter_by_skill(skill, MAX_PER_PAGE).await {
            Ok(page) => BrowserEvent::SearchResults(page.data),
            Err(err) => BrowserEvent::SearchFailed(failure("filter", &err)),
        };
        self.state.apply(event);
    }

    pub fn clear_search(&mut self) {
        self.state.apply(BrowserEvent::SearchCleared);
    }

    /// Open a portfolio, using the loaded copy when there is one.
    pub async fn select(&mut self, id: i32) {
        let loaded = self.state.all.iter().find(|p| p.portfolio.id == id).cloned();
        let event = match loaded {
            Some(portfolio) => BrowserEvent::Selected(portfolio),
            None => match self.api.get(id).await {
                Ok(Some(portfolio)) => BrowserEvent::Selected(portfolio),
                Ok(None) => BrowserEvent::LoadFailed("Portfolio not found".to_string()),
                Err(err) => BrowserEvent::LoadFailed(failure("load portfolio", &err)),
            },
        };
        self.state.apply(event);
    }

    pub fn back(&mut self) {
        self.state.apply(BrowserEvent::BackToList);
    }
}

fn failure(action: &str, err: &ClientError) -> String {
    tracing::warn!(error = %err, "failed to {action}");
    err.user_message()
}
