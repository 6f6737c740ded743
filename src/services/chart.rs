// src/services/chart.rs
use std::f64::consts::PI;
use std::fmt::Write;

use crate::models::Percentages;
use crate::services::render::escape_html;

pub const POSITIVE_COLOR: &str = "green";
pub const NEUTRAL_COLOR: &str = "gray";
pub const NEGATIVE_COLOR: &str = "red";

const WIDTH: f64 = 420.0;
const HEIGHT: f64 = 320.0;
const CX: f64 = 150.0;
const CY: f64 = 170.0;
const RADIUS: f64 = 120.0;

struct Slice {
    name: &'static str,
    color: &'static str,
    percent: f64,
}

fn point_at(fraction: f64) -> (f64, f64) {
    // Start at twelve o'clock and go clockwise
    let angle = fraction * 2.0 * PI - PI / 2.0;
    (CX + RADIUS * angle.cos(), CY + RADIUS * angle.sin())
}

/// Inline SVG pie chart of a ticker's sentiment distribution.
pub fn pie_chart_svg(ticker: &str, percentages: &Percentages) -> String {
    let slices = [
        Slice {
            name: "Positive",
            color: POSITIVE_COLOR,
            percent: percentages.positive,
        },
        Slice {
            name: "Neutral",
            color: NEUTRAL_COLOR,
            percent: percentages.neutral,
        },
        Slice {
            name: "Negative",
            color: NEGATIVE_COLOR,
            percent: percentages.negative,
        },
    ];
    let title = format!("{} Sentiment Distribution", escape_html(ticker));

    let mut svg = String::new();
    let _ = write!(
        svg,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="pie-chart" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">"#
        ),
        w = WIDTH,
        h = HEIGHT,
        title = title
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        title
    );

    let mut start = 0.0;
    for slice in slices.iter().filter(|s| s.percent > 0.0) {
        let fraction = slice.percent / 100.0;
        if fraction >= 1.0 - 1e-9 {
            let _ = write!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"><title>{} {:.1}%</title></circle>"#,
                CX, CY, RADIUS, slice.color, slice.name, slice.percent
            );
        } else {
            let (x0, y0) = point_at(start);
            let (x1, y1) = point_at(start + fraction);
            let large_arc = if fraction > 0.5 { 1 } else { 0 };
            let _ = write!(
                svg,
                concat!(
                    r#"<path d="M {cx} {cy} L {x0:.3} {y0:.3} "#,
                    r#"A {r} {r} 0 {large} 1 {x1:.3} {y1:.3} Z" "#,
                    r#"fill="{color}"><title>{name} {pct:.1}%</title></path>"#
                ),
                cx = CX,
                cy = CY,
                x0 = x0,
                y0 = y0,
                r = RADIUS,
                large = large_arc,
                x1 = x1,
                y1 = y1,
                color = slice.color,
                name = slice.name,
                pct = slice.percent
            );
        }
        start += fraction;
    }

    // Legend lists every label, including empty ones
    for (i, slice) in slices.iter().enumerate() {
        let y = 80.0 + i as f64 * 28.0;
        let _ = write!(
            svg,
            concat!(
                r#"<rect x="300" y="{}" width="14" height="14" fill="{}"/>"#,
                r#"<text x="320" y="{}" font-size="13">{} {:.1}%</text>"#
            ),
            y,
            slice.color,
            y + 12.0,
            slice.name,
            slice.percent
        );
    }

    svg.push_str("</svg>");
    svg
}
