// src/services/skew.rs
use crate::models::{Percentages, Sentiment, SentimentResult, Skew};

/// Share of headlines a direction needs before it decides the skew.
pub const SKEW_THRESHOLD: f64 = 0.25;

/// Aggregate per-headline results into a skew label and percentages.
pub fn classify(sentiments: &[SentimentResult]) -> (Skew, Percentages) {
    let labels: Vec<Sentiment> = sentiments.iter().map(|s| s.label).collect();
    classify_labels(&labels)
}

pub fn classify_labels(labels: &[Sentiment]) -> (Skew, Percentages) {
    if labels.is_empty() {
        return (Skew::NoData, Percentages::default());
    }

    let count = |wanted: Sentiment| labels.iter().filter(|l| **l == wanted).count();
    let positive_count = count(Sentiment::Positive);
    let neutral_count = count(Sentiment::Neutral);
    let negative_count = count(Sentiment::Negative);

    let total = labels.len() as f64;
    let positive_ratio = positive_count as f64 / total;
    let neutral_ratio = neutral_count as f64 / total;
    let negative_ratio = negative_count as f64 / total;

    // Positive is checked first, so it wins ties at the threshold
    let skew = if positive_ratio >= SKEW_THRESHOLD {
        if neutral_ratio > positive_ratio {
            Skew::SlightlyPositive
        } else {
            Skew::Positive
        }
    } else if negative_ratio >= SKEW_THRESHOLD {
        if neutral_ratio > negative_ratio {
            Skew::SlightlyNegative
        } else {
            Skew::Negative
        }
    } else {
        Skew::Neutral
    };

    (
        skew,
        Percentages {
            positive: positive_ratio * 100.0,
            neutral: neutral_ratio * 100.0,
            negative: negative_ratio * 100.0,
        },
    )
}
