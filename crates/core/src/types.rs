//! Domain types for URL locations, the deduplicated URL map, and check results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where a URL was first seen: the input file and the slide/notes page.
///
/// Both ordinals are 1-based. `file_index` follows command-line order;
/// `page` is parsed from the slide or notes filename inside the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlLocation {
    /// 1-based ordinal of the input file.
    pub file_index: usize,

    /// 1-based slide or notes-slide number.
    pub page: usize,
}

impl UrlLocation {
    /// Create a new location.
    pub fn new(file_index: usize, page: usize) -> Self {
        Self { file_index, page }
    }
}

/// Deduplicated map of normalized URLs to their first-seen location.
///
/// Later sightings of a URL already in the map are ignored, even when they
/// come from a different file or page.
#[derive(Debug, Clone, Default)]
pub struct UrlMap {
    entries: HashMap<String, UrlLocation>,
}

impl UrlMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a URL sighting. Returns true if the URL was new.
    pub fn record(&mut self, url: impl Into<String>, location: UrlLocation) -> bool {
        let url = url.into();
        if self.entries.contains_key(&url) {
            return false;
        }
        self.entries.insert(url, location);
        true
    }

    /// Remove a URL (used for exclusion lists). Returns true if it was present.
    pub fn remove(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Whether the URL is already recorded.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Look up the first-seen location of a URL.
    pub fn location(&self, url: &str) -> Option<UrlLocation> {
        self.entries.get(url).copied()
    }

    /// Number of distinct URLs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(url, location)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, UrlLocation)> {
        self.entries.iter().map(|(url, loc)| (url.as_str(), *loc))
    }
}

/// HTTP status observed for a URL, or a sentinel when no response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// A numeric HTTP status code.
    Code(u16),

    /// No usable HTTP response was ever obtained.
    NoResponse,
}

impl ResponseStatus {
    /// Whether this is a plain 200 success.
    pub fn is_ok(self) -> bool {
        matches!(self, ResponseStatus::Code(200))
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Code(code) => write!(f, "{}", code),
            ResponseStatus::NoResponse => write!(f, "ERR"),
        }
    }
}

/// Outcome of validating one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Where the URL was first seen.
    pub location: UrlLocation,

    /// The normalized URL that was checked.
    pub url: String,

    /// Observed status, or the error sentinel.
    pub status: ResponseStatus,

    /// Short diagnostic note; empty on plain success.
    pub note: String,
}

impl CheckResult {
    /// Create a result with no note.
    pub fn new(location: UrlLocation, url: impl Into<String>, status: ResponseStatus) -> Self {
        Self {
            location,
            url: url.into(),
            status,
            note: String::new(),
        }
    }

    /// Create a result carrying a diagnostic note.
    pub fn with_note(
        location: UrlLocation,
        url: impl Into<String>,
        status: ResponseStatus,
        note: impl Into<String>,
    ) -> Self {
        Self {
            location,
            url: url.into(),
            status,
            note: note.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_wins() {
        let mut map = UrlMap::new();
        assert!(map.record("http://example.com", UrlLocation::new(1, 2)));
        assert!(!map.record("http://example.com", UrlLocation::new(1, 5)));
        assert!(!map.record("http://example.com", UrlLocation::new(2, 1)));

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.location("http://example.com"),
            Some(UrlLocation::new(1, 2))
        );
    }

    #[test]
    fn test_remove_for_exclusion() {
        let mut map = UrlMap::new();
        map.record("http://example.com", UrlLocation::new(1, 1));

        assert!(map.remove("http://example.com"));
        assert!(!map.remove("http://example.com"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ResponseStatus::Code(200).to_string(), "200");
        assert_eq!(ResponseStatus::Code(404).to_string(), "404");
        assert_eq!(ResponseStatus::NoResponse.to_string(), "ERR");
    }

    #[test]
    fn test_status_is_ok() {
        assert!(ResponseStatus::Code(200).is_ok());
        assert!(!ResponseStatus::Code(206).is_ok());
        assert!(!ResponseStatus::NoResponse.is_ok());
    }
}
