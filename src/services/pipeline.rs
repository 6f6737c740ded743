// src/services/pipeline.rs
use log::{info, warn};
use std::sync::Arc;

use crate::config::{AppConfig, SentimentBackend};
use crate::models::{SentimentResult, TickerAnalysis, TickerReport};
use crate::services::classifier::{HuggingFaceClassifier, SentimentClassifier};
use crate::services::headlines::{HeadlineFetch, HeadlineSource, YahooHeadlineSource};
use crate::services::lexicon::LexiconClassifier;
use crate::services::skew;
use crate::BoxError;

/// Split the user's comma-separated input into upper-cased symbols.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .to_uppercase()
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Holds the two collaborators for the lifetime of the process.
pub struct SentimentService {
    source: Arc<dyn HeadlineSource>,
    classifier: Arc<dyn SentimentClassifier>,
}

impl SentimentService {
    pub fn new(source: Arc<dyn HeadlineSource>, classifier: Arc<dyn SentimentClassifier>) -> Self {
        SentimentService { source, classifier }
    }

    /// Build the Yahoo source and the configured classifier. Meant to be
    /// called once at startup; the result is shared behind an `Arc`.
    pub fn from_config(config: &AppConfig) -> Result<Self, BoxError> {
        let source = YahooHeadlineSource::new(
            &config.yahoo_base_url,
            config.news_count,
            config.http_timeout,
        )?;

        let classifier: Arc<dyn SentimentClassifier> = match (config.backend, &config.hugging_face)
        {
            (SentimentBackend::HuggingFace, Some(hf)) => {
                Arc::new(HuggingFaceClassifier::new(hf, config.http_timeout)?)
            }
            (SentimentBackend::HuggingFace, None) => {
                return Err("huggingface backend selected without its settings".into())
            }
            (SentimentBackend::Lexicon, _) => {
                info!("Using the offline lexicon sentiment classifier");
                Arc::new(LexiconClassifier::new()?)
            }
        };

        Ok(SentimentService::new(Arc::new(source), classifier))
    }

    pub async fn analyze_ticker(&self, ticker: &str) -> Result<TickerAnalysis, BoxError> {
        let headlines = match self.source.fetch(ticker).await? {
            HeadlineFetch::Found(headlines) => headlines,
            HeadlineFetch::NotFound => {
                warn!("No headlines for {}, reporting it as an invalid ticker", ticker);
                return Ok(TickerAnalysis {
                    report: TickerReport::invalid(ticker),
                    results: Vec::new(),
                });
            }
        };

        let titles: Vec<String> = headlines.iter().map(|h| h.title.clone()).collect();
        let classifications = self.classifier.classify(&titles).await?;
        if classifications.len() != headlines.len() {
            return Err(format!(
                "classifier returned {} results for {} headlines of {}",
                classifications.len(),
                headlines.len(),
                ticker
            )
            .into());
        }

        let results: Vec<SentimentResult> = headlines
            .into_iter()
            .zip(classifications)
            .map(|(headline, c)| SentimentResult {
                headline,
                label: c.label,
                confidence: c.confidence,
            })
            .collect();

        let (skew, percentages) = skew::classify(&results);
        info!(
            "{}: {} ({:.1}% positive, {:.1}% neutral, {:.1}% negative over {} headlines)",
            ticker,
            skew,
            percentages.positive,
            percentages.neutral,
            percentages.negative,
            results.len()
        );

        Ok(TickerAnalysis {
            report: TickerReport {
                ticker: ticker.to_string(),
                skew,
                percentages: Some(percentages),
            },
            results,
        })
    }

    /// Tickers are processed one at a time, in input order.
    pub async fn analyze_tickers(&self, input: &str) -> Result<Vec<TickerAnalysis>, BoxError> {
        let tickers = parse_tickers(input);
        info!("Analyzing {} ticker(s): {:?}", tickers.len(), tickers);

        let mut analyses = Vec::with_capacity(tickers.len());
        for ticker in &tickers {
            analyses.push(self.analyze_ticker(ticker).await?);
        }
        Ok(analyses)
    }
}
