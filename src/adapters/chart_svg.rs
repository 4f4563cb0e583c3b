//! SVG line chart of the rolling Sharpe series.
//!
//! Undefined points break the line into separate segments. A dashed zero line
//! is drawn whenever zero lies inside the plotted range.

use crate::domain::series::TimeSeries;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 40.0;

/// Empty string when the series has no defined points.
pub fn generate_rolling_sharpe_svg(rolling: &TimeSeries<f64>) -> String {
    let defined: Vec<f64> = rolling.defined();
    if defined.is_empty() {
        return String::new();
    }

    let min = defined.iter().copied().fold(f64::INFINITY, f64::min);
    let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let scale_x = if rolling.len() > 1 {
        plot_width / (rolling.len() - 1) as f64
    } else {
        0.0
    };
    let to_y = |v: f64| {
        if range > 0.0 {
            HEIGHT - PADDING - (v - min) / range * plot_height
        } else {
            HEIGHT / 2.0
        }
    };

    let mut segments: Vec<Vec<String>> = vec![Vec::new()];
    for (i, value) in rolling.values().iter().enumerate() {
        match value {
            Some(v) => {
                let x = PADDING + i as f64 * scale_x;
                if let Some(seg) = segments.last_mut() {
                    seg.push(format!("{:.1},{:.1}", x, to_y(*v)));
                }
            }
            None => {
                if segments.last().is_some_and(|s| !s.is_empty()) {
                    segments.push(Vec::new());
                }
            }
        }
    }

    let axis_y = HEIGHT - PADDING;
    let axis_x = WIDTH - PADDING;
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH:.0}\" height=\"{HEIGHT:.0}\" viewBox=\"0 0 {WIDTH:.0} {HEIGHT:.0}\">\n"
    ));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{WIDTH:.0}\" height=\"{HEIGHT:.0}\" fill=\"white\"/>\n"
    ));
    svg.push_str(&format!(
        "<text x=\"{:.0}\" y=\"24\" font-family=\"sans-serif\" font-size=\"14\" text-anchor=\"middle\">Rolling Annualized Sharpe</text>\n",
        WIDTH / 2.0
    ));
    svg.push_str(&format!(
        "<line x1=\"{PADDING:.0}\" y1=\"{axis_y:.0}\" x2=\"{axis_x:.0}\" y2=\"{axis_y:.0}\" stroke=\"black\"/>\n"
    ));
    svg.push_str(&format!(
        "<line x1=\"{PADDING:.0}\" y1=\"{PADDING:.0}\" x2=\"{PADDING:.0}\" y2=\"{axis_y:.0}\" stroke=\"black\"/>\n"
    ));
    if range > 0.0 && min < 0.0 && max > 0.0 {
        let zero = to_y(0.0);
        svg.push_str(&format!(
            "<line x1=\"{PADDING:.0}\" y1=\"{zero:.1}\" x2=\"{axis_x:.0}\" y2=\"{zero:.1}\" stroke=\"gray\" stroke-dasharray=\"4 4\"/>\n"
        ));
    }
    svg.push_str(&format!(
        "<text x=\"4\" y=\"{PADDING:.0}\" font-family=\"sans-serif\" font-size=\"10\">{max:.2}</text>\n"
    ));
    svg.push_str(&format!(
        "<text x=\"4\" y=\"{axis_y:.0}\" font-family=\"sans-serif\" font-size=\"10\">{min:.2}</text>\n"
    ));
    for seg in segments.iter().filter(|s| !s.is_empty()) {
        svg.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"steelblue\" stroke-width=\"1.5\" points=\"{}\"/>\n",
            seg.join(" ")
        ));
    }
    svg.push_str("</svg>\n");
    svg
}
