//! Core domain types, URL extraction and normalization, and report
//! building for PPTX URL validation.

pub mod error;
pub mod extract;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use extract::{extract_urls, normalize_url, TextKind};
pub use report::{report_path, sort_results, write_report, ReportPolicy};
pub use types::{CheckResult, ResponseStatus, UrlLocation, UrlMap};
