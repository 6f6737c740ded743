// src/services/render.rs
use std::collections::HashSet;
use std::fmt::Write;

use crate::models::{Skew, TickerAnalysis, TickerReport};
use crate::services::chart::pie_chart_svg;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:2em;}\
table{border-collapse:collapse;margin:1em 0;}\
th,td{border:1px solid #ccc;padding:4px 10px;text-align:left;}\
.charts{display:flex;flex-wrap:wrap;gap:1em;}\
details{margin:0.5em 0;}";

fn report_row(report: &TickerReport) -> String {
    match (report.skew, report.percentages) {
        (Skew::InvalidTicker, _) | (_, None) => format!(
            "<tr><td>{}</td><td>{}</td><td></td><td></td><td></td></tr>",
            escape_html(&report.ticker),
            report.skew
        ),
        (skew, Some(pct)) => format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
            escape_html(&report.ticker),
            skew,
            pct.positive,
            pct.neutral,
            pct.negative
        ),
    }
}

fn headline_details(analysis: &TickerAnalysis) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<details><summary>{} headlines ({})</summary>\
<table><tr><th>Headline</th><th>Sentiment</th><th>Confidence</th></tr>",
        escape_html(&analysis.report.ticker),
        analysis.results.len()
    );
    for result in &analysis.results {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.4}</td></tr>",
            escape_html(&result.headline.title),
            result.label,
            result.confidence.value()
        );
    }
    html.push_str("</table></details>");
    html
}

/// Full page: the ticker form, and when there are analyses, the results
/// table, one pie chart per charted ticker and the per-headline breakdown.
/// A ticker entered twice still gets a single chart.
pub fn render_page(input: &str, analyses: &[TickerAnalysis]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<title>Headline Sentiment Skew</title>");
    let _ = write!(html, "<style>{}</style></head><body>", STYLE);
    html.push_str("<h1>Headline Sentiment Skew</h1>");
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/\">\
<label for=\"tickers\">Tickers (comma-separated)</label> \
<input type=\"text\" id=\"tickers\" name=\"tickers\" value=\"{}\" placeholder=\"AAPL, MSFT\"> \
<button type=\"submit\">Analyze</button></form>",
        escape_html(input)
    );

    if !analyses.is_empty() {
        html.push_str(
            "<table class=\"results\"><tr><th>Ticker</th><th>Skew</th>\
<th>Percent Positive</th><th>Percent Neutral</th><th>Percent Negative</th></tr>",
        );
        for analysis in analyses {
            html.push_str(&report_row(&analysis.report));
        }
        html.push_str("</table>");

        html.push_str("<div class=\"charts\">");
        let mut charted: HashSet<&str> = HashSet::new();
        for analysis in analyses {
            let report = &analysis.report;
            if !report.has_chart() || !charted.insert(report.ticker.as_str()) {
                continue;
            }
            if let Some(pct) = report.percentages {
                let _ = write!(
                    html,
                    "<div class=\"chart\" id=\"chart-{}\">{}</div>",
                    escape_html(&report.ticker),
                    pie_chart_svg(&report.ticker, &pct)
                );
            }
        }
        html.push_str("</div>");

        for analysis in analyses.iter().filter(|a| !a.results.is_empty()) {
            html.push_str(&headline_details(analysis));
        }
    }

    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Headline, Percentages, Sentiment, SentimentResult};

    fn valid(ticker: &str) -> TickerAnalysis {
        TickerAnalysis {
            report: TickerReport {
                ticker: ticker.to_string(),
                skew: Skew::SlightlyPositive,
                percentages: Some(Percentages {
                    positive: 25.0,
                    neutral: 75.0,
                    negative: 0.0,
                }),
            },
            results: vec![SentimentResult {
                headline: Headline::new("Fed <holds> rates & markets wait"),
                label: Sentiment::Neutral,
                confidence: Confidence::clamped(0.87654),
            }],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn empty_page_is_just_the_form() {
        let html = render_page("", &[]);
        assert!(html.contains("name=\"tickers\""));
        assert!(!html.contains("class=\"results\""));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn results_table_and_charts() {
        let analyses = vec![
            valid("AAPL"),
            TickerAnalysis {
                report: TickerReport::invalid("ZZZZ"),
                results: vec![],
            },
        ];
        let html = render_page("aapl, zzzz", &analyses);

        assert!(html.contains("value=\"aapl, zzzz\""));
        assert!(html.contains(concat!(
            "<tr><td>AAPL</td><td>Slightly Positive</td>",
            "<td>25.00</td><td>75.00</td><td>0.00</td></tr>"
        )));
        assert!(html.contains(
            "<tr><td>ZZZZ</td><td>Invalid Ticker</td><td></td><td></td><td></td></tr>"
        ));
        assert!(html.contains("id=\"chart-AAPL\""));
        assert!(!html.contains("id=\"chart-ZZZZ\""));
        assert_eq!(html.matches("<svg").count(), 1);
        assert!(html.contains(
            "<td>Fed &lt;holds&gt; rates &amp; markets wait</td><td>neutral</td><td>0.8765</td>"
        ));
    }

    #[test]
    fn repeated_ticker_gets_one_chart() {
        let html = render_page("aapl, aapl", &[valid("AAPL"), valid("AAPL")]);
        assert_eq!(html.matches("<tr><td>AAPL</td>").count(), 2);
        assert_eq!(html.matches("id=\"chart-AAPL\"").count(), 1);
        assert_eq!(html.matches("<svg").count(), 1);
    }

    #[test]
    fn user_input_is_escaped() {
        let html = render_page("\"><script>", &[]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
