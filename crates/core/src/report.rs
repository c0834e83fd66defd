//! CSV report building.
//!
//! Results arrive from the validation engine in completion order; the report
//! is deterministic: sorted by `(file, page)`, with plain 200 rows omitted
//! unless the caller asks for everything.

use crate::error::{Error, Result};
use crate::types::CheckResult;
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default report filename, used when the first input has no parent directory.
pub const DEFAULT_REPORT_NAME: &str = "pptxurlreport.csv";

/// Column header row.
const HEADER: &str = "File#,Page,Response,URL,Note";

/// What to include in the report.
#[derive(Debug, Clone, Copy)]
pub struct ReportPolicy {
    /// Include rows whose status is a plain 200. Default: false.
    pub include_ok: bool,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self { include_ok: false }
    }
}

/// Stable sort by `(file_index, page)` ascending.
pub fn sort_results(results: &mut [CheckResult]) {
    results.sort_by_key(|r| (r.location.file_index, r.location.page));
}

/// Write the CSV report to a writer. The results slice must already be sorted.
pub fn write_csv<W: Write>(
    writer: &mut W,
    results: &[CheckResult],
    policy: ReportPolicy,
) -> Result<()> {
    writeln!(writer, "{}", HEADER).map_err(|e| Error::ReportError(e.to_string()))?;

    for result in results {
        if !policy.include_ok && result.status.is_ok() {
            continue;
        }
        writeln!(
            writer,
            "{},{},{},{},{}",
            result.location.file_index,
            result.location.page,
            csv_field(&result.status.to_string()),
            csv_field(&result.url),
            csv_field(&result.note),
        )
        .map_err(|e| Error::ReportError(e.to_string()))?;
    }

    Ok(())
}

/// Sort results and write the report to `path`. A write failure here is
/// fatal for the run, unlike every other error in the pipeline.
pub fn write_report(
    path: &Path,
    results: &mut [CheckResult],
    policy: ReportPolicy,
) -> Result<()> {
    sort_results(results);

    let file = std::fs::File::create(path)
        .map_err(|e| Error::ReportError(format!("cannot create {}: {}", path.display(), e)))?;
    let mut writer = std::io::BufWriter::new(file);
    write_csv(&mut writer, results, policy)?;
    writer
        .flush()
        .map_err(|e| Error::ReportError(format!("cannot write {}: {}", path.display(), e)))?;

    Ok(())
}

/// Report path: next to the first input file, or the default name in the
/// current directory when the input path has no directory component.
pub fn report_path(first_input: &Path) -> PathBuf {
    match first_input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(DEFAULT_REPORT_NAME),
        _ => PathBuf::from(DEFAULT_REPORT_NAME),
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
