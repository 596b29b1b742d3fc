//! SVG chart adapter.
//!
//! Renders the close-price series as a polyline with buy markers (green
//! up-triangles) and sell markers (red down-triangles) overlaid, plus an axis
//! frame, date/price labels, and a legend.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::analysis::Analysis;
use crate::domain::error::SigchartError;
use crate::ports::chart_port::ChartPort;

const PADDING: f64 = 50.0;
const MARKER: f64 = 5.0;

pub struct SvgChartAdapter {
    width: u32,
    height: u32,
}

impl SvgChartAdapter {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new(800, 400)
    }
}

impl ChartPort for SvgChartAdapter {
    fn write(&self, analysis: &Analysis, output_path: &Path) -> Result<(), SigchartError> {
        let svg = render_svg(analysis, self.width, self.height);
        fs::write(output_path, svg)?;
        Ok(())
    }
}

pub fn render_svg(analysis: &Analysis, width: u32, height: u32) -> String {
    let w = width as f64;
    let h = height as f64;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
<rect width="{width}" height="{height}" fill="white"/>
"#
    );

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-family="sans-serif" font-size="16">Trading Signals - {}</text>"#,
        w / 2.0,
        xml_escape(&analysis.ticker),
    );

    if analysis.bars.is_empty() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="14" fill="gray">No price data</text>"#,
            w / 2.0,
            h / 2.0,
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let min_close = analysis
        .bars
        .iter()
        .map(|b| b.close)
        .fold(f64::INFINITY, f64::min);
    let max_close = analysis
        .bars
        .iter()
        .map(|b| b.close)
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = w - 2.0 * PADDING;
    let plot_height = h - 2.0 * PADDING;

    let range = max_close - min_close;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if analysis.bars.len() > 1 {
        plot_width / (analysis.bars.len() - 1) as f64
    } else {
        0.0
    };

    let x_at = |i: usize| PADDING + i as f64 * scale_x;
    let y_at = |close: f64| h - PADDING - (close - min_close) * scale_y;

    // Axis frame
    let _ = writeln!(
        svg,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
        PADDING, PADDING, plot_width, plot_height,
    );

    // Price scale and date range labels
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11">{:.2}</text>"#,
        PADDING - 6.0,
        PADDING + 4.0,
        max_close,
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11">{:.2}</text>"#,
        PADDING - 6.0,
        h - PADDING + 4.0,
        min_close,
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11">{}</text>"#,
        PADDING,
        h - PADDING + 16.0,
        analysis.bars[0].date,
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11">{}</text>"#,
        w - PADDING,
        h - PADDING + 16.0,
        analysis.bars[analysis.bars.len() - 1].date,
    );

    // Close-price polyline
    let points: Vec<String> = analysis
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| format!("{:.1},{:.1}", x_at(i), y_at(bar.close)))
        .collect();
    let _ = writeln!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="blue" stroke-width="1.5"/>"#,
        points.join(" "),
    );

    // Signal markers
    for (i, point) in analysis.signals.points.iter().enumerate() {
        let x = x_at(i);
        let y = y_at(analysis.bars[i].close);
        if point.buy {
            let _ = writeln!(
                svg,
                r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="green"/>"#,
                x,
                y - MARKER - 1.0,
                x - MARKER,
                y + MARKER - 1.0,
                x + MARKER,
                y + MARKER - 1.0,
            );
        }
        if point.sell {
            let _ = writeln!(
                svg,
                r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="red"/>"#,
                x,
                y + MARKER + 1.0,
                x - MARKER,
                y - MARKER + 1.0,
                x + MARKER,
                y - MARKER + 1.0,
            );
        }
    }

    // Legend
    let legend_x = w - PADDING - 120.0;
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="blue">— close</text>"#,
        legend_x,
        PADDING - 24.0,
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="green">▲ buy</text>"#,
        legend_x + 50.0,
        PADDING - 24.0,
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="red">▼ sell</text>"#,
        legend_x + 90.0,
        PADDING - 24.0,
    );

    svg.push_str("</svg>\n");
    svg
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{compute, AnalysisRequest, IndicatorParams};
    use crate::domain::price::PriceBar;
    use crate::domain::signal::{SignalPoint, SignalThresholds};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_analysis(n: usize) -> Analysis {
        let request = AnalysisRequest {
            ticker: "AAPL.US".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            params: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
        };
        let bars: Vec<PriceBar> = (0..n)
            .map(|i| {
                let close = 100.0 + (i % 9) as f64;
                PriceBar {
                    ticker: "AAPL.US".into(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .checked_add_days(chrono::Days::new(i as u64))
                        .unwrap(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1000,
                }
            })
            .collect();
        compute(&request, bars)
    }

    #[test]
    fn render_contains_price_polyline() {
        let svg = render_svg(&sample_analysis(20), 800, 400);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("polyline"));
        assert!(svg.contains("Trading Signals - AAPL.US"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn render_empty_analysis_reports_no_data() {
        let svg = render_svg(&sample_analysis(0), 800, 400);

        assert!(svg.contains("No price data"));
        assert!(!svg.contains("polyline"));
    }

    #[test]
    fn render_draws_one_marker_per_signal() {
        let mut analysis = sample_analysis(10);
        analysis.signals.points[3] = SignalPoint {
            date: analysis.bars[3].date,
            buy: true,
            sell: false,
        };
        analysis.signals.points[7] = SignalPoint {
            date: analysis.bars[7].date,
            buy: false,
            sell: true,
        };

        let svg = render_svg(&analysis, 800, 400);

        assert_eq!(svg.matches("<polygon").count(), 2);
        assert!(svg.contains(r#"fill="green""#));
        assert!(svg.contains(r#"fill="red""#));
    }

    #[test]
    fn render_escapes_ticker_in_title() {
        let mut analysis = sample_analysis(5);
        analysis.ticker = "A&B<C>".into();

        let svg = render_svg(&analysis, 800, 400);
        assert!(svg.contains("A&amp;B&lt;C&gt;"));
    }

    #[test]
    fn write_creates_svg_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.svg");

        let adapter = SvgChartAdapter::default();
        adapter.write(&sample_analysis(20), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
    }

    #[test]
    fn render_single_bar_does_not_panic() {
        let svg = render_svg(&sample_analysis(1), 800, 400);
        assert!(svg.contains("polyline"));
    }
}
