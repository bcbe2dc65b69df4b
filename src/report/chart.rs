//! HTML report with inline SVG charts.

use std::collections::BTreeMap;

use crate::analysis::Analysis;

const REPORT_TEMPLATE: &str = include_str!("templates/report.html");

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 380.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 110.0;
const Y_TICKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Line,
    Bars,
}

/// One chart's worth of data.
#[derive(Debug)]
struct Series {
    x_label: &'static str,
    y_label: &'static str,
    labels: Vec<String>,
    values: Vec<f64>,
    style: Style,
}

/// Render the HTML report page.
pub fn render_html(analysis: &Analysis, generated: &str) -> String {
    let (loss_chart, hourly_chart) = if analysis.hourly.is_empty() {
        (empty_note("No hourly data."), empty_note("No hourly data."))
    } else {
        (
            render_svg(&loss_rate_series(analysis)),
            render_svg(&hourly_disconnection_series(analysis)),
        )
    };

    let duration_chart = if analysis.disconnections.is_empty() {
        empty_note("No disconnection data to chart.")
    } else {
        render_svg(&duration_series(analysis))
    };

    REPORT_TEMPLATE
        .replace("{{host}}", &escape(&analysis.host))
        .replace("{{generated}}", &escape(generated))
        .replace("{{threshold}}", &analysis.threshold.to_string())
        .replace("{{summary_rows}}", &summary_rows(analysis))
        .replace("{{loss_chart}}", &loss_chart)
        .replace("{{hourly_chart}}", &hourly_chart)
        .replace("{{duration_chart}}", &duration_chart)
}

fn loss_rate_series(analysis: &Analysis) -> Series {
    Series {
        x_label: "Hour",
        y_label: "Packet Loss Rate (%)",
        labels: analysis
            .hourly
            .iter()
            .map(|h| h.hour.format("%Y/%m/%d %H:%M").to_string())
            .collect(),
        values: analysis.hourly.iter().map(|h| h.loss_rate).collect(),
        style: Style::Line,
    }
}

fn hourly_disconnection_series(analysis: &Analysis) -> Series {
    Series {
        x_label: "Hour",
        y_label: "Number of Disconnections",
        labels: analysis
            .disconnection_hourly
            .iter()
            .map(|h| h.hour.format("%Y/%m/%d %H:00").to_string())
            .collect(),
        values: analysis
            .disconnection_hourly
            .iter()
            .map(|h| h.count as f64)
            .collect(),
        style: Style::Bars,
    }
}

fn duration_series(analysis: &Analysis) -> Series {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for d in &analysis.disconnections {
        *counts.entry(d.duration_seconds).or_default() += 1;
    }

    Series {
        x_label: "Disconnection Duration (seconds)",
        y_label: "Number of Disconnections",
        labels: counts.keys().map(|secs| format!("{}s", secs)).collect(),
        values: counts.values().map(|&c| c as f64).collect(),
        style: Style::Bars,
    }
}

fn summary_rows(analysis: &Analysis) -> String {
    let summary = &analysis.summary;
    let mut rows = vec![
        ("Overall packet loss rate", format!("{:.2}%", summary.overall_loss_rate)),
        (
            "Probes",
            format!("{} ({} failed)", summary.total_probes, summary.failed_probes),
        ),
        ("Disconnections", summary.disconnection_count.to_string()),
        (
            "Average disconnections per hour",
            format!("{:.2}", summary.avg_disconnections_per_hour),
        ),
    ];
    if let Some(d) = &summary.durations {
        rows.push((
            "Average disconnection duration",
            format!("{:.2} seconds", d.avg_seconds),
        ));
    }

    rows.iter()
        .map(|(name, value)| format!("<tr><td>{}</td><td>{}</td></tr>", name, escape(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn empty_note(text: &str) -> String {
    format!("<p class=\"empty\">{}</p>", escape(text))
}

/// Upper bound for the y axis: the next whole number at or above the max.
fn y_axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max.ceil()
    }
}

fn render_svg(series: &Series) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bottom = MARGIN_TOP + plot_h;
    let y_max = y_axis_max(&series.values);
    let n = series.values.len().max(1);
    let slot = plot_w / n as f64;

    let x_at = |i: usize| MARGIN_LEFT + slot * (i as f64 + 0.5);
    let y_at = |v: f64| bottom - v / y_max * plot_h;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = WIDTH,
        h = HEIGHT
    );

    // Horizontal grid and y tick labels
    for tick in 0..=Y_TICKS {
        let value = y_max * tick as f64 / Y_TICKS as f64;
        let y = y_at(value);
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#ddd\" stroke-dasharray=\"4 3\"/>\n",
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_w,
            y
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{:.1}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            value
        ));
    }

    match series.style {
        Style::Bars => {
            for (i, &v) in series.values.iter().enumerate() {
                let y = y_at(v);
                svg.push_str(&format!(
                    "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"blue\" stroke=\"black\" stroke-width=\"1\"/>\n",
                    x_at(i) - slot * 0.35,
                    y,
                    slot * 0.7,
                    bottom - y
                ));
            }
        }
        Style::Line => {
            let points: Vec<String> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| format!("{:.1},{:.1}", x_at(i), y_at(v)))
                .collect();
            svg.push_str(&format!(
                "<polyline points=\"{}\" fill=\"none\" stroke=\"blue\" stroke-width=\"2\"/>\n",
                points.join(" ")
            ));
            for (i, &v) in series.values.iter().enumerate() {
                svg.push_str(&format!(
                    "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"blue\"/>\n",
                    x_at(i),
                    y_at(v)
                ));
            }
        }
    }

    // Label every bucket for short series, every fourth one otherwise
    let stride = if series.labels.len() > 20 { 4 } else { 1 };
    for (i, label) in series.labels.iter().enumerate().step_by(stride) {
        let x = x_at(i);
        let y = bottom + 14.0;
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" transform=\"rotate(-45 {x:.1} {y:.1})\">{}</text>\n",
            escape(label),
        ));
    }

    // Axes
    svg.push_str(&format!(
        "<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n\
         <line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom,
        r = MARGIN_LEFT + plot_w
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 6.0,
        escape(series.x_label)
    ));
    svg.push_str(&format!(
        "<text x=\"14\" y=\"{y:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 14 {y:.1})\">{}</text>\n",
        escape(series.y_label),
        y = MARGIN_TOP + plot_h / 2.0
    ));

    svg.push_str("</svg>");
    svg
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
