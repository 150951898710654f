//! Dashboard
//!
//! View-state coordination for browsing the catalog.
//!
//! ## Architecture
//!
//! - **Controller**: owns the state and runs every catalog call
//! - **State**: filters, app list, selection, detail, busy flag, notices
//! - **Sentiment**: local percentage breakdown of loaded reviews
//!
//! ## Detail lifecycle
//!
//! 1. `select_app` clears the previous detail and enters `Loading`
//! 2. Reviews and analysis are fetched concurrently, then installed together
//! 3. `collect_data` / `analyze_sentiment` move a loaded app to `Refreshing`
//!    and reload it once the service accepts the action

mod controller;
mod sentiment;
mod state;

pub use controller::{ActionOutcome, DashboardController};
pub use sentiment::{DistributionSource, SentimentBreakdown, SentimentDistribution};
pub use state::{DashboardSnapshot, DetailPhase, Notice, NoticeKind};
