//! Local sentiment breakdown
//!
//! Percentages computed from the loaded reviews. Shown before a
//! server-computed [`SentimentAnalysis`] is available.

use crate::catalog::{Review, Sentiment, SentimentAnalysis};
use serde::Serialize;

/// Percentage of reviews per sentiment label, one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Number of reviews considered, labelled or not
    pub total: usize,
}

impl SentimentBreakdown {
    /// `count(label) / total * 100` per label; every label is 0 for an empty list
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let total = reviews.len();
        if total == 0 {
            return Self::default();
        }

        let (mut positive, mut negative, mut neutral) = (0usize, 0usize, 0usize);
        for review in reviews {
            match review.sentiment {
                Some(Sentiment::Positive) => positive += 1,
                Some(Sentiment::Negative) => negative += 1,
                Some(Sentiment::Neutral) => neutral += 1,
                None => {}
            }
        }

        Self {
            positive: percentage(positive, total),
            negative: percentage(negative, total),
            neutral: percentage(neutral, total),
            total,
        }
    }

    /// Percentage for a single label
    pub fn percentage_for(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Where a displayed distribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionSource {
    Server,
    Local,
}

/// Distribution ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentDistribution {
    pub source: DistributionSource,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentDistribution {
    /// Server percentages verbatim when present, else the local breakdown
    pub fn resolve(analysis: Option<&SentimentAnalysis>, reviews: &[Review]) -> Self {
        match analysis {
            Some(a) => Self {
                source: DistributionSource::Server,
                positive: a.positive_percentage,
                negative: a.negative_percentage,
                neutral: a.neutral_percentage,
            },
            None => {
                let local = SentimentBreakdown::from_reviews(reviews);
                Self {
                    source: DistributionSource::Local,
                    positive: local.positive,
                    negative: local.negative,
                    neutral: local.neutral,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReviewId;

    fn review(id: i64, sentiment: Option<Sentiment>) -> Review {
        Review {
            id: ReviewId::Number(id),
            user_name: None,
            rating: 4.0,
            content: format!("review {}", id),
            date: None,
            sentiment,
            sentiment_score: None,
        }
    }

    fn labelled(labels: &[Sentiment]) -> Vec<Review> {
        labels
            .iter()
            .enumerate()
            .map(|(i, s)| review(i as i64, Some(*s)))
            .collect()
    }

    #[test]
    fn test_two_positive_one_negative() {
        use Sentiment::*;
        let breakdown = SentimentBreakdown::from_reviews(&labelled(&[Positive, Positive, Negative]));
        assert_eq!(breakdown.positive, 66.7);
        assert_eq!(breakdown.negative, 33.3);
        assert_eq!(breakdown.neutral, 0.0);
        assert_eq!(breakdown.total, 3);
    }

    #[test]
    fn test_empty_list_is_all_zero() {
        let breakdown = SentimentBreakdown::from_reviews(&[]);
        assert_eq!(breakdown, SentimentBreakdown::default());
        assert_eq!(breakdown.positive + breakdown.negative + breakdown.neutral, 0.0);
    }

    #[test]
    fn test_fully_labelled_lists_sum_to_hundred() {
        use Sentiment::*;
        for p in 0..8 {
            for n in 0..8 {
                for u in 0..8 {
                    if p + n + u == 0 {
                        continue;
                    }
                    let mut labels = vec![Positive; p];
                    labels.extend(std::iter::repeat(Negative).take(n));
                    labels.extend(std::iter::repeat(Neutral).take(u));

                    let b = SentimentBreakdown::from_reviews(&labelled(&labels));
                    let sum = b.positive + b.negative + b.neutral;
                    assert!(
                        (sum - 100.0).abs() <= 0.15 + 1e-9,
                        "p={} n={} u={} summed to {}",
                        p,
                        n,
                        u,
                        sum
                    );
                }
            }
        }
    }

    #[test]
    fn test_unlabelled_reviews_count_toward_total() {
        let reviews = vec![review(1, Some(Sentiment::Neutral)), review(2, None)];
        let b = SentimentBreakdown::from_reviews(&reviews);
        assert_eq!(b.neutral, 50.0);
        assert_eq!(b.percentage_for(Sentiment::Positive), 0.0);
    }

    #[test]
    fn test_distribution_prefers_server_values() {
        let analysis = SentimentAnalysis {
            positive_percentage: 70.0,
            negative_percentage: 20.0,
            neutral_percentage: 15.0,
            total_reviews: 50,
            avg_sentiment_score: 0.81,
            last_updated: "2024-01-01T00:00:00Z".to_string(),
        };
        let reviews = labelled(&[Sentiment::Negative]);

        let dist = SentimentDistribution::resolve(Some(&analysis), &reviews);
        assert_eq!(dist.source, DistributionSource::Server);
        assert_eq!((dist.positive, dist.negative, dist.neutral), (70.0, 20.0, 15.0));

        let dist = SentimentDistribution::resolve(None, &reviews);
        assert_eq!(dist.source, DistributionSource::Local);
        assert_eq!(dist.negative, 100.0);
    }
}
