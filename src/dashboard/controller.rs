//! Dashboard Controller
//!
//! Owns the view state and mediates every call to the catalog service.
//!
//! Operations take `&self` and may overlap: the user can pick another app
//! while the previous one is still loading. Each detail load carries a
//! [`SelectionTicket`] captured at dispatch; responses whose ticket is no
//! longer current are dropped instead of being installed.

use super::sentiment::{SentimentBreakdown, SentimentDistribution};
use super::state::{DashboardSnapshot, DashboardState, DetailPhase, Notice, SelectionTicket};
use crate::catalog::{AppSummary, CatalogError, CatalogService, FilterState, IssuePreview};
use crate::config::DashboardConfig;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result of a mutating action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The service accepted the action. `refreshed` is true when the
    /// selected app's detail was reloaded afterwards.
    Succeeded { refreshed: bool },
    /// The service rejected the action or could not be reached
    Failed,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    CollectReviews,
    AnalyzeSentiment,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::CollectReviews => "collect_reviews",
            Action::AnalyzeSentiment => "analyze_sentiment",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Action::CollectReviews => "Data collected successfully! Reloading...",
            Action::AnalyzeSentiment => "Sentiment analysis completed! Reloading...",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Action::CollectReviews => "Failed to collect data",
            Action::AnalyzeSentiment => "Sentiment analysis failed",
        }
    }
}

/// Coordinates app listing, selection and the detail lifecycle
pub struct DashboardController<S: ?Sized> {
    service: Arc<S>,
    settings: DashboardConfig,
    state: Arc<RwLock<DashboardState>>,
}

impl<S: ?Sized> Clone for DashboardController<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            settings: self.settings.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: CatalogService + ?Sized> DashboardController<S> {
    /// Create a controller with empty state
    pub fn new(service: Arc<S>, settings: DashboardConfig) -> Self {
        Self {
            service,
            settings,
            state: Arc::new(RwLock::new(DashboardState::default())),
        }
    }

    pub fn settings(&self) -> &DashboardConfig {
        &self.settings
    }

    // ============================================
    // Read accessors
    // ============================================

    /// Copy of the current view state
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn is_busy(&self) -> bool {
        self.state.read().await.is_busy()
    }

    pub async fn phase(&self) -> DetailPhase {
        self.state.read().await.phase
    }

    /// Drain queued user-visible notices
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.write().await.notices)
    }

    /// Local percentages for the loaded reviews
    pub async fn sentiment_breakdown(&self) -> SentimentBreakdown {
        SentimentBreakdown::from_reviews(&self.state.read().await.reviews)
    }

    /// Distribution to display: server analysis if loaded, else local
    pub async fn sentiment_distribution(&self) -> SentimentDistribution {
        let state = self.state.read().await;
        SentimentDistribution::resolve(state.analysis.as_ref(), &state.reviews)
    }

    // ============================================
    // App list and filters
    // ============================================

    /// Initial load of the app list and category vocabulary
    pub async fn mount(&self) {
        tokio::join!(self.refresh_app_list(), self.refresh_categories());
    }

    /// Replace the filters; refreshes the list and categories if they changed
    ///
    /// Returns whether the filters changed.
    pub async fn set_filters(&self, filters: FilterState) -> bool {
        if !self.replace_filters(filters).await {
            return false;
        }

        tokio::join!(self.refresh_app_list(), self.refresh_categories());
        true
    }

    /// Store new filters without fetching anything
    ///
    /// The next [`Self::refresh_app_list`] uses them. Returns whether they changed.
    pub async fn replace_filters(&self, filters: FilterState) -> bool {
        let filters = filters.normalized();
        let mut state = self.state.write().await;
        if state.filters == filters {
            return false;
        }
        tracing::debug!(?filters, "Filters changed");
        state.filters = filters;
        true
    }

    /// Fetch the app list for the current filters
    ///
    /// Failures leave an empty list; errors are logged, never returned.
    pub async fn refresh_app_list(&self) {
        let (filters, generation) = {
            let mut state = self.state.write().await;
            state.list_generation += 1;
            state.begin_busy();
            (state.filters.clone(), state.list_generation)
        };

        let result = self.service.list_apps(&filters).await;

        let mut state = self.state.write().await;
        state.end_busy();
        if state.list_generation != generation {
            tracing::debug!(generation, "Dropping superseded app list response");
            return;
        }

        match result {
            Ok(apps) => {
                tracing::info!(count = apps.len(), "Loaded app list");
                state.apps = apps;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load apps");
                state.apps.clear();
            }
        }
    }

    /// Fetch the category vocabulary; failures keep the previous one
    pub async fn refresh_categories(&self) {
        if self.settings.cache_categories && !self.state.read().await.categories.is_empty() {
            tracing::debug!("Using cached categories");
            return;
        }

        match self.service.list_categories().await {
            Ok(categories) => {
                tracing::debug!(count = categories.len(), "Loaded categories");
                self.state.write().await.categories = categories;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories, keeping previous list");
            }
        }
    }

    // ============================================
    // Selection and detail
    // ============================================

    /// Select an app (or none) and load its reviews and analysis
    pub async fn select_app(&self, app: Option<AppSummary>) {
        let Some(app) = app else {
            let mut state = self.state.write().await;
            state.selection = None;
            state.clear_detail();
            state.phase = DetailPhase::Idle;
            tracing::debug!("Selection cleared");
            return;
        };

        tracing::info!(app_id = %app.app_id, name = %app.name, "Selecting app");
        let ticket = {
            let mut state = self.state.write().await;
            let ticket = state.select(app);
            state.clear_detail();
            state.phase = DetailPhase::Loading;
            state.begin_busy();
            ticket
        };

        self.load_detail(&ticket).await;
        self.state.write().await.end_busy();
    }

    /// Fetch reviews and analysis concurrently and install them if `ticket`
    /// is still current. Returns whether they were installed.
    async fn load_detail(&self, ticket: &SelectionTicket) -> bool {
        let app_id = ticket.app_id.as_str();
        let (reviews, analysis) = tokio::join!(
            self.service.app_reviews(app_id, self.settings.review_limit),
            self.service.app_analysis(app_id),
        );

        let reviews = reviews.unwrap_or_else(|e| {
            tracing::error!(app_id, error = %e, "Failed to load reviews");
            Vec::new()
        });
        let analysis = analysis.unwrap_or_else(|e| {
            tracing::error!(app_id, error = %e, "Failed to load sentiment analysis");
            None
        });

        let mut state = self.state.write().await;
        if !state.is_current(ticket) {
            tracing::debug!(app_id, epoch = ticket.epoch, "Discarding stale detail response");
            return false;
        }

        tracing::info!(
            app_id,
            reviews = reviews.len(),
            has_analysis = analysis.is_some(),
            "Loaded app detail"
        );
        state.reviews = reviews;
        state.analysis = analysis;
        state.phase = state.settled_phase();
        true
    }

    // ============================================
    // Mutating actions
    // ============================================

    /// Ask the service to scrape more reviews for `app_id`
    pub async fn collect_data(&self, app_id: &str) -> ActionOutcome {
        self.run_action(Action::CollectReviews, app_id).await
    }

    /// Ask the service to run sentiment inference for `app_id`
    pub async fn analyze_sentiment(&self, app_id: &str) -> ActionOutcome {
        self.run_action(Action::AnalyzeSentiment, app_id).await
    }

    async fn run_action(&self, action: Action, app_id: &str) -> ActionOutcome {
        let serial = {
            let mut state = self.state.write().await;
            state.begin_busy();
            state.begin_refresh(app_id)
        };

        tracing::info!(app_id, action = action.name(), "Starting action");
        let result = match action {
            Action::CollectReviews => {
                self.service
                    .collect_reviews(app_id, self.settings.collect_limit)
                    .await
            }
            Action::AnalyzeSentiment => {
                self.service
                    .analyze_app(app_id, self.settings.analyze_limit)
                    .await
            }
        };

        let outcome = match result {
            Ok(()) => {
                tracing::info!(app_id, action = action.name(), "Action completed");
                let ticket = {
                    let mut state = self.state.write().await;
                    state.notices.push(Notice::success(action.success_message()));
                    state.reissue(app_id)
                };
                match ticket {
                    Some(ticket) => ActionOutcome::Succeeded {
                        refreshed: self.load_detail(&ticket).await,
                    },
                    None => {
                        tracing::debug!(app_id, "App no longer selected, skipping refresh");
                        ActionOutcome::Succeeded { refreshed: false }
                    }
                }
            }
            Err(e) => {
                self.action_failed(action, app_id, &e).await;
                ActionOutcome::Failed
            }
        };

        let mut state = self.state.write().await;
        if let Some(serial) = serial {
            state.end_refresh(serial);
        }
        state.end_busy();
        outcome
    }

    async fn action_failed(&self, action: Action, app_id: &str, error: &CatalogError) {
        tracing::error!(app_id, action = action.name(), error = %error, "Action failed");
        self.state
            .write()
            .await
            .notices
            .push(Notice::error(action.failure_message()));
    }

    /// Generate an issue preview for `app_id`
    pub async fn simulate_issue(&self, app_id: &str) -> Option<IssuePreview> {
        self.state.write().await.begin_busy();

        let result = self.service.simulate_issue(app_id).await;

        let mut state = self.state.write().await;
        state.end_busy();
        match result {
            Ok(preview) => {
                tracing::info!(app_id, title = preview.title(), "Issue preview generated");
                state
                    .notices
                    .push(Notice::success(format!("Issue preview: {}", preview.title())));
                Some(preview)
            }
            Err(e) => {
                tracing::error!(app_id, error = %e, "Issue simulation failed");
                state.notices.push(Notice::error("Failed to simulate issue"));
                None
            }
        }
    }
}
