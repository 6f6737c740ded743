// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single news headline for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Headline {
            title: title.into(),
            publisher: None,
            published_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

/// Classifier confidence, always finite and within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Confidence(value))
        } else {
            None
        }
    }

    /// Clamp into [0, 1]; NaN becomes 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Confidence(0.0)
        } else {
            Confidence(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// What the classifier says about one headline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Sentiment,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub headline: Headline,
    pub label: Sentiment,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skew {
    Positive,
    #[serde(rename = "Slightly Positive")]
    SlightlyPositive,
    Neutral,
    #[serde(rename = "Slightly Negative")]
    SlightlyNegative,
    Negative,
    #[serde(rename = "Invalid Ticker")]
    InvalidTicker,
    #[serde(rename = "No data")]
    NoData,
}

impl Skew {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skew::Positive => "Positive",
            Skew::SlightlyPositive => "Slightly Positive",
            Skew::Neutral => "Neutral",
            Skew::SlightlyNegative => "Slightly Negative",
            Skew::Negative => "Negative",
            Skew::InvalidTicker => "Invalid Ticker",
            Skew::NoData => "No data",
        }
    }

    /// True for the five directional labels.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Skew::InvalidTicker | Skew::NoData)
    }
}

impl fmt::Display for Skew {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Percentages {
    #[cfg(test)]
    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerReport {
    pub ticker: String,
    pub skew: Skew,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentages: Option<Percentages>,
}

impl TickerReport {
    pub fn invalid(ticker: impl Into<String>) -> Self {
        TickerReport {
            ticker: ticker.into(),
            skew: Skew::InvalidTicker,
            percentages: None,
        }
    }

    /// Whether a pie chart should be drawn for this report.
    pub fn has_chart(&self) -> bool {
        self.skew.is_directional() && self.percentages.is_some()
    }
}

/// A report together with the per-headline results it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerAnalysis {
    pub report: TickerReport,
    pub results: Vec<SentimentResult>,
}
