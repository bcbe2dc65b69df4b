//! pinglog - Ping Log Connectivity Analyzer
//!
//! Reads a textual ping log for one target host and reports hourly packet
//! loss and disconnection events.

mod analysis;
mod config;
mod parse;
mod report;

use analysis::{analyze, Analysis};
use config::AnalyzerConfig;
use parse::parse_log;
use report::{write_artifacts, write_report, ReportSink};

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("pinglog=info".parse()?))
        .init();

    // Load configuration, then let the command line or prompts override it
    let mut cfg = AnalyzerConfig::load();
    let input_path = resolve_input(&mut cfg, env::args().skip(1)).await?;
    tracing::info!(
        "Analyzing {} with disconnection threshold {}",
        input_path.display(),
        cfg.disconnect_threshold
    );

    let mut sink = ReportSink::create(&cfg.log_path)?;
    let analysis = match run(&cfg, &input_path, &mut sink).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            writeln!(sink, "Error: {}", e)?;
            sink.finish()?;
            std::process::exit(1);
        }
    };
    sink.finish()?;

    for path in write_artifacts(&analysis, &cfg.output_dir).await? {
        tracing::info!("Report written to {}", path.display());
    }
    println!("\nAnalysis results saved to '{}'", cfg.log_path.display());

    Ok(())
}

/// Read, parse and analyze the input, writing the text report to `sink`.
async fn run<W: Write>(
    cfg: &AnalyzerConfig,
    input_path: &Path,
    sink: &mut W,
) -> Result<Analysis, BoxError> {
    let bytes = tokio::fs::read(input_path).await?;
    let text = String::from_utf8_lossy(&bytes);

    let log = parse_log(&text)?;
    let analysis = analyze(&log, cfg.disconnect_threshold);
    write_report(sink, &analysis, &log.warnings)?;

    Ok(analysis)
}

/// `pinglog [INPUT_PATH] [THRESHOLD]`; prompts on stdin when no path is given.
async fn resolve_input<I>(cfg: &mut AnalyzerConfig, args: I) -> Result<PathBuf, BoxError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    if let Some(path) = args.next() {
        if let Some(threshold) = args.next() {
            cfg.apply_threshold(&threshold);
        }
        return Ok(PathBuf::from(path));
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let path = prompt(&mut stdin, "Enter the path to the ping data file: ").await?;
    let threshold = prompt(
        &mut stdin,
        &format!(
            "Enter the number of consecutive failures to consider as a disconnection (default: {}): ",
            cfg.disconnect_threshold
        ),
    )
    .await?;
    cfg.apply_threshold(&threshold);

    Ok(PathBuf::from(path))
}

async fn prompt<R>(input: &mut R, question: &str) -> Result<String, BoxError>
where
    R: AsyncBufReadExt + Unpin,
{
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).await?;
    Ok(answer.trim().to_string())
}
