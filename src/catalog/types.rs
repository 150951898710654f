//! Catalog data types
//!
//! Records exchanged with the catalog service. They are kept as close to the
//! wire format as possible; the controller never reshapes them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// App store a catalog entry originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    GooglePlay,
    AppStore,
}

impl Store {
    /// Value used in query strings and JSON bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Store::GooglePlay => "google_play",
            Store::AppStore => "app_store",
        }
    }

    /// Human-readable store name
    pub fn label(&self) -> &'static str {
        match self {
            Store::GooglePlay => "Google Play",
            Store::AppStore => "App Store",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Store {
    type Err = UnknownStore;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google_play" | "google-play" | "play" => Ok(Store::GooglePlay),
            "app_store" | "app-store" | "apple" => Ok(Store::AppStore),
            _ => Err(UnknownStore(s.to_string())),
        }
    }
}

/// Store name that is neither `google_play` nor `app_store`
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown store '{0}', expected google_play or app_store")]
pub struct UnknownStore(pub String);

/// Metadata for one catalog application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSummary {
    pub app_id: String,
    pub name: String,
    pub store: Store,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u64>,
    #[serde(default)]
    pub current_version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Review identifier; the service emits either numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewId::Number(n) => write!(f, "{}", n),
            ReviewId::Text(s) => f.write_str(s),
        }
    }
}

/// Sentiment label attached to a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Case-insensitive parse; unknown labels yield `None`
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any casing and maps unrecognised labels to `None`, so one odd
/// review doesn't fail the whole list.
fn lenient_sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|label| {
        let parsed = Sentiment::parse(label);
        if parsed.is_none() && !label.is_empty() {
            tracing::debug!(label, "Ignoring unknown sentiment label");
        }
        parsed
    }))
}

/// Server-computed sentiment summary for one app
///
/// Percentages are reported as the server computed them and are not
/// guaranteed to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_reviews: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_sentiment_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
}

/// Preview returned by the issue simulation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePreview {
    pub preview: IssuePreviewBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePreviewBody {
    pub title: String,
}

impl IssuePreview {
    pub fn title(&self) -> &str {
        &self.preview.title
    }
}

/// User-controlled criteria narrowing the app list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub store: Option<Store>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl FilterState {
    pub fn new(store: Option<Store>, category: Option<String>, search: Option<String>) -> Self {
        Self {
            store,
            category,
            search,
        }
        .normalized()
    }

    /// Collapse empty strings to `None`
    pub fn normalized(self) -> Self {
        Self {
            store: self.store,
            category: self.category.filter(|c| !c.is_empty()),
            search: self.search.filter(|s| !s.is_empty()),
        }
    }

    /// Query parameters for the app listing; absent filters are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(store) = self.store {
            pairs.push(("store", store.as_str().to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}
