// src/services/classifier.rs
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::HuggingFaceConfig;
use crate::models::{Classification, Confidence, Sentiment};
use crate::BoxError;

/// Turns headlines into sentiment labels. Implementations return exactly
/// one classification per input, in input order.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, headlines: &[String]) -> Result<Vec<Classification>, BoxError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    UnknownLabel(String),
    InvalidConfidence(f64),
    LengthMismatch { expected: usize, actual: usize },
    EmptyCandidates(usize),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::UnknownLabel(label) => {
                write!(f, "classifier returned unknown label '{}'", label)
            }
            ClassifierError::InvalidConfidence(score) => {
                write!(f, "classifier returned confidence {} outside [0, 1]", score)
            }
            ClassifierError::LengthMismatch { expected, actual } => write!(
                f,
                "classifier returned {} results for {} headlines",
                actual, expected
            ),
            ClassifierError::EmptyCandidates(index) => {
                write!(f, "classifier returned no candidates for headline {}", index)
            }
        }
    }
}

impl std::error::Error for ClassifierError {}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    label: String,
    score: f64,
}

/// The inference API answers a batch either with every candidate label per
/// input or with just the top one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Ranked(Vec<Vec<Candidate>>),
    Top(Vec<Candidate>),
}

impl Candidate {
    fn into_classification(self) -> Result<Classification, ClassifierError> {
        let label = self
            .label
            .parse::<Sentiment>()
            .map_err(|_| ClassifierError::UnknownLabel(self.label.clone()))?;
        let confidence =
            Confidence::new(self.score).ok_or(ClassifierError::InvalidConfidence(self.score))?;
        Ok(Classification { label, confidence })
    }
}

fn top_candidate(candidates: Vec<Candidate>, index: usize) -> Result<Candidate, ClassifierError> {
    candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(ClassifierError::EmptyCandidates(index))
}

fn into_classifications(
    response: InferenceResponse,
    expected: usize,
) -> Result<Vec<Classification>, ClassifierError> {
    let top: Vec<Candidate> = match response {
        InferenceResponse::Ranked(per_input) => per_input
            .into_iter()
            .enumerate()
            .map(|(i, candidates)| top_candidate(candidates, i))
            .collect::<Result<_, _>>()?,
        InferenceResponse::Top(candidates) => candidates,
    };

    if top.len() != expected {
        return Err(ClassifierError::LengthMismatch {
            expected,
            actual: top.len(),
        });
    }

    top.into_iter().map(Candidate::into_classification).collect()
}

/// FinancialBERT (or any text-classification model with
/// positive/neutral/negative labels) behind the Hugging Face inference API.
pub struct HuggingFaceClassifier {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl HuggingFaceClassifier {
    pub fn new(config: &HuggingFaceConfig, timeout: Duration) -> Result<Self, BoxError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/{}", config.api_url.trim_end_matches('/'), config.model);
        info!("Using Hugging Face sentiment model at {}", endpoint);
        Ok(HuggingFaceClassifier {
            client,
            endpoint,
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, headlines: &[String]) -> Result<Vec<Classification>, BoxError> {
        if headlines.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Classifying {} headlines", headlines.len());

        let response: InferenceResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&InferenceRequest { inputs: headlines })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(into_classifications(response, headlines.len())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn classifier(server: &MockServer) -> HuggingFaceClassifier {
        let config = HuggingFaceConfig {
            api_url: server.url("/models"),
            model: "acme/fin-bert".to_string(),
            api_token: "hf_test".to_string(),
        };
        HuggingFaceClassifier::new(&config, Duration::from_secs(5)).unwrap()
    }

    fn headlines(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn picks_top_candidate_per_headline() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/acme/fin-bert")
                    .header("authorization", "Bearer hf_test")
                    .json_body(json!({"inputs": ["Profits soar", "Shares slump"]}));
                then.status(200).json_body(json!([
                    [
                        {"label": "neutral", "score": 0.05},
                        {"label": "positive", "score": 0.93},
                        {"label": "negative", "score": 0.02}
                    ],
                    [
                        {"label": "negative", "score": 0.81},
                        {"label": "neutral", "score": 0.15},
                        {"label": "positive", "score": 0.04}
                    ]
                ]));
            })
            .await;

        let out = classifier(&server)
            .classify(&headlines(&["Profits soar", "Shares slump"]))
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label, Sentiment::Positive);
        assert_eq!(out[0].confidence.value(), 0.93);
        assert_eq!(out[1].label, Sentiment::Negative);
    }

    #[tokio::test]
    async fn accepts_flat_top_label_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/acme/fin-bert");
                then.status(200).json_body(json!([
                    {"label": "Neutral", "score": 0.7},
                    {"label": "positive", "score": 0.6}
                ]));
            })
            .await;

        let out = classifier(&server)
            .classify(&headlines(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(out[0].label, Sentiment::Neutral);
        assert_eq!(out[1].label, Sentiment::Positive);
    }

    #[tokio::test]
    async fn empty_input_skips_the_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(500);
            })
            .await;

        let out = classifier(&server).classify(&[]).await.unwrap();
        assert!(out.is_empty());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn misaligned_response_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200)
                    .json_body(json!([[{"label": "positive", "score": 0.9}]]));
            })
            .await;

        let err = classifier(&server)
            .classify(&headlines(&["a", "b"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 results for 2 headlines"));
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(503).json_body(json!({"error": "Model is loading"}));
            })
            .await;

        assert!(classifier(&server).classify(&headlines(&["a"])).await.is_err());
    }

    #[test]
    fn unknown_labels_and_scores_are_rejected() {
        let bad_label = InferenceResponse::Top(vec![Candidate {
            label: "LABEL_2".to_string(),
            score: 0.5,
        }]);
        assert_eq!(
            into_classifications(bad_label, 1).unwrap_err(),
            ClassifierError::UnknownLabel("LABEL_2".to_string())
        );

        let bad_score = InferenceResponse::Top(vec![Candidate {
            label: "positive".to_string(),
            score: 1.5,
        }]);
        assert_eq!(
            into_classifications(bad_score, 1).unwrap_err(),
            ClassifierError::InvalidConfidence(1.5)
        );

        let empty = InferenceResponse::Ranked(vec![vec![]]);
        assert_eq!(
            into_classifications(empty, 1).unwrap_err(),
            ClassifierError::EmptyCandidates(0)
        );
    }
}
