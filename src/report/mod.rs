//! Report module: text output, HTML charts and JSON export.

mod chart;
mod sink;
mod text;

pub use chart::*;
pub use sink::*;
pub use text::*;

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::analysis::Analysis;

/// File name of the HTML chart page.
pub const CHART_FILE: &str = "ping_report.html";
/// File name of the JSON export.
pub const JSON_FILE: &str = "analysis.json";

/// Report error types.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the chart page and JSON export into `dir`, returning the paths written.
pub async fn write_artifacts(analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    tokio::fs::create_dir_all(dir).await?;

    let generated = Local::now().format("%Y/%m/%d %H:%M:%S").to_string();
    let chart_path = dir.join(CHART_FILE);
    tokio::fs::write(&chart_path, render_html(analysis, &generated)).await?;
    tracing::debug!("Chart page written to {}", chart_path.display());

    let json_path = dir.join(JSON_FILE);
    tokio::fs::write(&json_path, serde_json::to_vec_pretty(analysis)?).await?;
    tracing::debug!("JSON export written to {}", json_path.display());

    Ok(vec![chart_path, json_path])
}
