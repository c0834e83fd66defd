//! CLI tool for validating URLs in PowerPoint decks.
//!
//! Extracts URLs from the slides and notes of one or more .pptx files,
//! checks each one against its live endpoint, and writes a CSV report of
//! the problems next to the first input file.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use urlcheck_core::{report_path, write_report, ReportPolicy, UrlMap};
use urlcheck_http::{CheckerConfig, UrlChecker};
use urlcheck_pptx::PptxScanner;

/// Validate URLs in the notes and slides of one or more PowerPoint pptx files.
///
/// Rows with a 200 response are omitted from the report unless the SKIP200
/// environment variable is set to 0.
#[derive(Parser, Debug)]
#[command(name = "pptxurlcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input .pptx file(s); a .txt file is read as a newline-delimited list
    /// of URLs to exclude from validation
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let (packages, exclusions) = partition_inputs(&args.input)?;
    if packages.is_empty() {
        bail!("No PPTX files supplied.");
    }

    // Build the deduplicated URL map across every input, in argument order.
    let scanner = PptxScanner::new();
    let mut urls = UrlMap::new();
    for (idx, path) in packages.iter().enumerate() {
        log::debug!("Scanning {}", path.display());
        if let Err(e) = scanner.scan_file(path, idx + 1, &mut urls) {
            // A single bad input must not abort the whole run.
            eprintln!(
                "Cannot extract data from PowerPoint file {}: {}",
                path.display(),
                e
            );
        }
    }

    for url in &exclusions {
        if urls.remove(url) {
            log::debug!("Excluded {}", url);
        }
    }

    log::info!("Checking {} distinct URLs", urls.len());

    let checker =
        UrlChecker::new(CheckerConfig::default()).context("Failed to initialize HTTP checker")?;

    let mut results = tokio::select! {
        results = checker.check_all(&urls, |done| eprint!("{}\r", done)) => results,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted; exiting without a report.");
            std::process::exit(130);
        }
    };

    let policy = ReportPolicy {
        include_ok: !skip200_from_env(),
    };
    let report = report_path(&packages[0]);
    write_report(&report, &mut results, policy)
        .with_context(|| format!("Failed to write report to {}", report.display()))?;

    println!("URL validation report created at {}", report.display());
    Ok(())
}

/// Split the positional arguments into package files and exclusion-list
/// URLs. Anything that is neither .pptx nor .txt is an error.
fn partition_inputs(inputs: &[PathBuf]) -> Result<(Vec<PathBuf>, Vec<String>)> {
    let mut packages = Vec::new();
    let mut exclusions = Vec::new();

    for path in inputs {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("pptx") => packages.push(path.clone()),
            Some("txt") => exclusions.extend(read_exclusions(path)?),
            _ => bail!("Invalid PPTX file supplied: {}", path.display()),
        }
    }

    Ok((packages, exclusions))
}

/// Read a newline-delimited URL exclusion list.
fn read_exclusions(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read exclusion list {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// SKIP200 controls whether plain-success rows appear in the report.
/// Default is to skip them; anything other than "0" keeps the default.
fn skip200_from_env() -> bool {
    match std::env::var("SKIP200") {
        Ok(value) => value.trim() != "0",
        Err(_) => true,
    }
}
