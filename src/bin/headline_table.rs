// src/bin/headline_table.rs
//
// Classify the latest headlines for one ticker and print them as a table.
//
//   cargo run --bin headline_table -- [TICKER] [--csv]
use anyhow::anyhow;
use dotenv::dotenv;
use headline_skew::config::AppConfig;
use headline_skew::models::{Skew, TickerAnalysis};
use headline_skew::services::pipeline::{parse_tickers, SentimentService};
use log::{error, info};
use std::env;
use std::io;

const DEFAULT_TICKER: &str = "META";
const HEADLINE_WIDTH: usize = 80;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width - 3).collect();
        out.push_str("...");
        out
    }
}

fn print_table(analysis: &TickerAnalysis) {
    println!(
        "{:<4} {:<w$} {:<9} {:>10}",
        "",
        "Headline",
        "Sentiment",
        "Confidence",
        w = HEADLINE_WIDTH
    );
    for (i, result) in analysis.results.iter().enumerate() {
        println!(
            "{:<4} {:<w$} {:<9} {:>10.6}",
            i,
            truncate(&result.headline.title, HEADLINE_WIDTH),
            result.label,
            result.confidence.value(),
            w = HEADLINE_WIDTH
        );
    }

    let report = &analysis.report;
    if let Some(pct) = report.percentages {
        println!();
        println!(
            "{}: {} ({:.2}% positive, {:.2}% neutral, {:.2}% negative)",
            report.ticker, report.skew, pct.positive, pct.neutral, pct.negative
        );
    }
}

fn write_csv(analysis: &TickerAnalysis) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Headline", "Sentiment", "Confidence"])?;
    for result in &analysis.results {
        let confidence = result.confidence.value().to_string();
        writer.write_record([
            result.headline.title.as_str(),
            result.label.as_str(),
            confidence.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let as_csv = args.iter().any(|a| a == "--csv");
    let ticker = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|a| parse_tickers(a))
        .and_then(|tickers| tickers.into_iter().next())
        .unwrap_or_else(|| DEFAULT_TICKER.to_string());

    let config = AppConfig::from_env()?;
    let service = SentimentService::from_config(&config)
        .map_err(|e| anyhow!("failed to build sentiment service: {}", e))?;

    info!("Classifying headlines for {}", ticker);
    let analysis = match service.analyze_ticker(&ticker).await {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("Failed to analyze {}: {}", ticker, e);
            return Err(anyhow!("failed to analyze {}: {}", ticker, e));
        }
    };

    if analysis.report.skew == Skew::InvalidTicker {
        println!("No news data found for ticker: {}", ticker);
        return Ok(());
    }

    if as_csv {
        write_csv(&analysis)?;
    } else {
        print_table(&analysis);
    }
    Ok(())
}
