// src/services/lexicon.rs
use async_trait::async_trait;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::models::{Classification, Confidence, Sentiment};
use crate::services::classifier::SentimentClassifier;
use crate::BoxError;

/// Scores above this are positive, below its negation negative.
const POLARITY_CUTOFF: f64 = 0.1;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("beat", 0.6),
    ("beats", 0.6),
    ("bullish", 0.8),
    ("boost", 0.5),
    ("boosts", 0.5),
    ("climb", 0.5),
    ("climbs", 0.5),
    ("exceed", 0.6),
    ("exceeds", 0.6),
    ("gain", 0.5),
    ("gains", 0.5),
    ("growth", 0.6),
    ("jump", 0.6),
    ("jumps", 0.6),
    ("outperform", 0.7),
    ("profit", 0.6),
    ("profits", 0.6),
    ("rally", 0.7),
    ("rallies", 0.7),
    ("rebound", 0.5),
    ("record", 0.6),
    ("rise", 0.5),
    ("rises", 0.5),
    ("soar", 0.8),
    ("soars", 0.8),
    ("strong", 0.5),
    ("surge", 0.7),
    ("surges", 0.7),
    ("upgrade", 0.6),
    ("upgraded", 0.6),
    ("win", 0.5),
    ("wins", 0.5),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("cut", -0.5),
    ("cuts", -0.5),
    ("decline", -0.6),
    ("declines", -0.6),
    ("downgrade", -0.6),
    ("downgraded", -0.6),
    ("drop", -0.6),
    ("drops", -0.6),
    ("fall", -0.5),
    ("falls", -0.5),
    ("fined", -0.5),
    ("fraud", -0.8),
    ("lawsuit", -0.6),
    ("layoffs", -0.6),
    ("loss", -0.6),
    ("losses", -0.6),
    ("miss", -0.6),
    ("misses", -0.6),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("probe", -0.5),
    ("slump", -0.7),
    ("slumps", -0.7),
    ("tumble", -0.7),
    ("tumbles", -0.7),
    ("warning", -0.5),
    ("weak", -0.5),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "without", "fails", "failed"];

/// Rule-based fallback classifier over a small financial word list.
pub struct LexiconClassifier {
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    token_re: Regex,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self, BoxError> {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS.iter())
            .copied()
            .collect();
        Ok(LexiconClassifier {
            words,
            negations: NEGATIONS.iter().copied().collect(),
            token_re: Regex::new(r"[a-z]+(?:'[a-z]+)?")?,
        })
    }

    /// Raw polarity score; the sign decides the label.
    pub fn score(&self, text: &str) -> f64 {
        // Headlines often use typographic apostrophes ("doesn’t")
        let lowered = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
        let mut score = 0.0;
        let mut negate = false;
        for token in self.token_re.find_iter(&lowered).map(|m| m.as_str()) {
            if self.negations.contains(token) || token.ends_with("n't") {
                negate = true;
                continue;
            }
            if let Some(weight) = self.words.get(token) {
                score += if negate { -weight } else { *weight };
                negate = false;
            }
        }
        score
    }

    pub fn classify_one(&self, text: &str) -> Classification {
        let score = self.score(text);
        let magnitude = score.abs().min(1.0);
        let (label, confidence) = if score > POLARITY_CUTOFF {
            (Sentiment::Positive, 0.5 + magnitude / 2.0)
        } else if score < -POLARITY_CUTOFF {
            (Sentiment::Negative, 0.5 + magnitude / 2.0)
        } else {
            (Sentiment::Neutral, 1.0 - magnitude)
        };
        Classification {
            label,
            confidence: Confidence::clamped(confidence),
        }
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    async fn classify(&self, headlines: &[String]) -> Result<Vec<Classification>, BoxError> {
        Ok(headlines.iter().map(|h| self.classify_one(h)).collect())
    }
}
