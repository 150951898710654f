//! Catalog Service
//!
//! Access to the remote app catalog: app listings, reviews, precomputed
//! sentiment analysis and the mutating scrape/analyze actions.
//!
//! ## Endpoints
//!
//! - `GET  /api/apps` - filtered app list
//! - `GET  /api/categories` - category vocabulary
//! - `GET  /api/apps/{id}/reviews?limit=N` - recent reviews
//! - `GET  /api/apps/{id}/analysis` - sentiment summary
//! - `POST /api/scraping/app/{id}/reviews` - collect more reviews
//! - `POST /api/sentiment/analyze-app/{id}` - run sentiment inference
//! - `POST /api/github/simulate-issue/{id}` - issue preview

mod client;
mod types;

pub use client::{CatalogClient, CatalogError, ClientConfig};
pub use types::{
    AppSummary, FilterState, IssuePreview, IssuePreviewBody, Review, ReviewId, Sentiment,
    SentimentAnalysis, Store, UnknownStore,
};

use async_trait::async_trait;

/// Operations offered by the remote catalog service
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List apps matching the given filters
    async fn list_apps(&self, filters: &FilterState) -> Result<Vec<AppSummary>, CatalogError>;

    /// Fetch the category vocabulary
    async fn list_categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetch up to `limit` reviews for an app
    async fn app_reviews(&self, app_id: &str, limit: u32) -> Result<Vec<Review>, CatalogError>;

    /// Fetch the sentiment summary for an app, `None` if none exists yet
    async fn app_analysis(&self, app_id: &str)
        -> Result<Option<SentimentAnalysis>, CatalogError>;

    /// Ask the service to scrape up to `limit` additional reviews
    async fn collect_reviews(&self, app_id: &str, limit: u32) -> Result<(), CatalogError>;

    /// Ask the service to run sentiment inference over up to `limit` reviews
    async fn analyze_app(&self, app_id: &str, limit: u32) -> Result<(), CatalogError>;

    /// Generate an issue preview for an app
    async fn simulate_issue(&self, app_id: &str) -> Result<IssuePreview, CatalogError>;
}
