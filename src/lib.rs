//! # Appsight
//!
//! App review insights - browse a catalog of mobile applications, inspect
//! their user reviews and view sentiment summaries computed by a remote
//! analysis backend.
//!
//! ## Features
//!
//! - **Typed catalog client**: apps, categories, reviews and sentiment analysis
//! - **Dashboard controller**: filter, selection and detail lifecycle with
//!   stale-response protection
//! - **Actions**: trigger review scraping and sentiment inference, then reload
//! - **Local fallback**: sentiment percentages from the loaded reviews
//!
//! ## Modules
//!
//! - [`catalog`]: Catalog service trait, HTTP client and data types
//! - [`dashboard`]: View-state controller and sentiment breakdown
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use appsight::{CatalogClient, ClientConfig, DashboardConfig, DashboardController};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(ClientConfig::default())?;
//!     let dashboard = DashboardController::new(Arc::new(client), DashboardConfig::default());
//!
//!     // Load apps and categories
//!     dashboard.mount().await;
//!
//!     // Open the first app
//!     let first = dashboard.snapshot().await.apps.first().cloned();
//!     dashboard.select_app(first).await;
//!
//!     let distribution = dashboard.sentiment_distribution().await;
//!     println!("{:.1}% positive", distribution.positive);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod logging;

// Re-export top-level types for convenience
pub use catalog::{
    AppSummary, CatalogClient, CatalogError, CatalogService, ClientConfig, FilterState,
    IssuePreview, Review, ReviewId, Sentiment, SentimentAnalysis, Store,
};

pub use dashboard::{
    ActionOutcome, DashboardController, DashboardSnapshot, DetailPhase, DistributionSource,
    Notice, NoticeKind, SentimentBreakdown, SentimentDistribution,
};

pub use config::{Config, ConfigError, DashboardConfig, LogFormat, LoggingConfig, ServiceConfig};

pub use logging::LoggingError;
