// src/handlers/sentiment.rs
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::{Html, Json};
use warp::Rejection;

use super::error::ApiError;
use crate::models::{TickerAnalysis, TickerReport};
use crate::services::pipeline::SentimentService;
use crate::services::render::render_page;

#[derive(Debug, Default, Deserialize)]
pub struct TickerForm {
    #[serde(default)]
    pub tickers: String,
}

async fn analyze(
    service: &SentimentService,
    tickers: &str,
) -> Result<Vec<TickerAnalysis>, Rejection> {
    service.analyze_tickers(tickers).await.map_err(|e| {
        error!("Failed to analyze tickers '{}': {}", tickers, e);
        let message = format!("Failed to analyze tickers: {}", e);
        warp::reject::custom(ApiError::upstream(message))
    })
}

pub async fn show_form() -> Result<Html<String>, Rejection> {
    Ok(warp::reply::html(render_page("", &[])))
}

pub async fn submit_form(
    form: TickerForm,
    service: Arc<SentimentService>,
) -> Result<Html<String>, Rejection> {
    info!("Handling form submission for tickers: {}", form.tickers);
    let analyses = analyze(&service, &form.tickers).await?;
    Ok(warp::reply::html(render_page(&form.tickers, &analyses)))
}

pub async fn get_sentiment(
    query: TickerForm,
    service: Arc<SentimentService>,
) -> Result<Json, Rejection> {
    info!("Handling API request for tickers: {}", query.tickers);
    let analyses = analyze(&service, &query.tickers).await?;
    let reports: Vec<TickerReport> = analyses.into_iter().map(|a| a.report).collect();
    Ok(warp::reply::json(&reports))
}
