//! Dashboard State
//!
//! The view-state container owned by the controller. Presentation code only
//! ever sees [`DashboardSnapshot`] copies of it.

use crate::catalog::{AppSummary, FilterState, Review, SentimentAnalysis};
use serde::Serialize;

/// Phase of the selected app's detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailPhase {
    /// No app selected
    #[default]
    Idle,
    /// Detail cleared, reviews and analysis in flight
    Loading,
    /// Reviews and analysis installed
    Loaded,
    /// A mutating action is running; the detail shown is stale
    Refreshing,
}

/// Kind of user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Message for the user, queued until the presentation layer drains it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Identifies one detail load: the app it targets and the selection epoch
/// current when it was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectionTicket {
    pub app_id: String,
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct Selection {
    pub app: AppSummary,
    pub epoch: u64,
    /// Epoch at selection time; unlike `epoch` it survives `reissue`
    pub serial: u64,
    /// Actions running against this selection
    pub refreshing: usize,
}

/// Mutable view state, guarded by the controller's lock
#[derive(Debug, Default)]
pub(crate) struct DashboardState {
    pub filters: FilterState,
    pub list_generation: u64,
    pub apps: Vec<AppSummary>,
    pub categories: Vec<String>,
    pub selection: Option<Selection>,
    pub next_epoch: u64,
    pub reviews: Vec<Review>,
    pub analysis: Option<SentimentAnalysis>,
    pub phase: DetailPhase,
    pub in_flight: usize,
    pub notices: Vec<Notice>,
}

impl DashboardState {
    pub fn begin_busy(&mut self) {
        self.in_flight += 1;
    }

    pub fn end_busy(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a new selection of `app`, returning its ticket
    pub fn select(&mut self, app: AppSummary) -> SelectionTicket {
        self.next_epoch += 1;
        let ticket = SelectionTicket {
            app_id: app.app_id.clone(),
            epoch: self.next_epoch,
        };
        self.selection = Some(Selection {
            app,
            epoch: ticket.epoch,
            serial: ticket.epoch,
            refreshing: 0,
        });
        ticket
    }

    /// Record an action starting against `app_id` if it is selected.
    /// Returns the selection serial to hand back to [`Self::end_refresh`].
    pub fn begin_refresh(&mut self, app_id: &str) -> Option<u64> {
        let selection = self.selection.as_mut().filter(|s| s.app.app_id == app_id)?;
        selection.refreshing += 1;
        let serial = selection.serial;
        if self.phase == DetailPhase::Loaded {
            self.phase = DetailPhase::Refreshing;
        }
        Some(serial)
    }

    /// Record an action finishing. The phase leaves `Refreshing` only once
    /// no action remains for the same selection.
    pub fn end_refresh(&mut self, serial: u64) {
        let Some(selection) = self.selection.as_mut().filter(|s| s.serial == serial) else {
            return;
        };
        selection.refreshing = selection.refreshing.saturating_sub(1);
        if selection.refreshing == 0 && self.phase == DetailPhase::Refreshing {
            self.phase = DetailPhase::Loaded;
        }
    }

    /// Phase for freshly installed detail
    pub fn settled_phase(&self) -> DetailPhase {
        match &self.selection {
            Some(s) if s.refreshing > 0 => DetailPhase::Refreshing,
            _ => DetailPhase::Loaded,
        }
    }

    /// Issue a fresh ticket for the current selection without clearing its
    /// detail. Older loads for the same app become stale.
    pub fn reissue(&mut self, app_id: &str) -> Option<SelectionTicket> {
        let selection = self.selection.as_mut().filter(|s| s.app.app_id == app_id)?;
        self.next_epoch += 1;
        selection.epoch = self.next_epoch;
        Some(SelectionTicket {
            app_id: app_id.to_string(),
            epoch: self.next_epoch,
        })
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        self.selection
            .as_ref()
            .map(|s| s.epoch == ticket.epoch && s.app.app_id == ticket.app_id)
            .unwrap_or(false)
    }

    pub fn clear_detail(&mut self) {
        self.reviews.clear();
        self.analysis = None;
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            filters: self.filters.clone(),
            apps: self.apps.clone(),
            categories: self.categories.clone(),
            selected_app: self.selection.as_ref().map(|s| s.app.clone()),
            reviews: self.reviews.clone(),
            analysis: self.analysis.clone(),
            phase: self.phase,
            busy: self.is_busy(),
        }
    }
}

/// Read-only copy of the view state for rendering
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub filters: FilterState,
    pub apps: Vec<AppSummary>,
    pub categories: Vec<String>,
    pub selected_app: Option<AppSummary>,
    pub reviews: Vec<Review>,
    pub analysis: Option<SentimentAnalysis>,
    pub phase: DetailPhase,
    pub busy: bool,
}

impl DashboardSnapshot {
    /// Look up an app in the current list
    pub fn find_app(&self, app_id: &str) -> Option<&AppSummary> {
        self.apps.iter().find(|a| a.app_id == app_id)
    }
}
