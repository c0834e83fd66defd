//! PPTX package walker.
//!
//! A .pptx file is a ZIP archive of XML documents. URLs live in the text of
//! `ppt/slides/slideN.xml` and `ppt/notesSlides/notesSlideN.xml`; this module
//! walks both sets in page order, assembles paragraph text, and records every
//! normalized URL with the first `(file, page)` location it was seen at.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use std::path::Path;
use urlcheck_core::{extract_urls, Error, Result, TextKind, UrlLocation, UrlMap};
use zip::ZipArchive;

const SLIDES_PREFIX: &str = "ppt/slides/";
const NOTES_PREFIX: &str = "ppt/notesSlides/";

/// Walker for PPTX (Office Open XML) packages.
pub struct PptxScanner;

impl PptxScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan a package file on disk. `file_index` is the 1-based ordinal of
    /// the file in input order.
    pub fn scan_file(&self, path: &Path, file_index: usize, urls: &mut UrlMap) -> Result<()> {
        let file = std::fs::File::open(path)?;
        self.scan(std::io::BufReader::new(file), file_index, urls)
    }

    /// Scan a package from a reader, recording URLs into `urls`.
    ///
    /// Slides are processed before notes, each set in ascending page order,
    /// so "first occurrence wins" resolves to the lowest page. A slide whose
    /// XML cannot be read contributes nothing but does not fail the scan;
    /// only an unreadable archive is an error.
    pub fn scan<R: Read + Seek>(&self, reader: R, file_index: usize, urls: &mut UrlMap) -> Result<()> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        for (entry, page) in page_entries(&archive, SLIDES_PREFIX) {
            self.scan_entry(&mut archive, &entry, TextKind::Slide, file_index, page, urls);
        }

        for (entry, page) in page_entries(&archive, NOTES_PREFIX) {
            self.scan_entry(&mut archive, &entry, TextKind::Notes, file_index, page, urls);
        }

        Ok(())
    }

    /// Scan one slide or notes XML entry. Failures are logged and swallowed;
    /// one bad slide must not cost us the rest of the deck.
    fn scan_entry<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        entry: &str,
        kind: TextKind,
        file_index: usize,
        page: usize,
        urls: &mut UrlMap,
    ) {
        let content = match read_entry(archive, entry) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping {}: {}", entry, e);
                return;
            }
        };

        for paragraph in collect_paragraphs(&content) {
            for url in extract_urls(&paragraph, kind) {
                if urls.record(url, UrlLocation::new(file_index, page)) {
                    log::debug!("{} page {}: new URL recorded", entry, page);
                }
            }
        }
    }
}

impl Default for PptxScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// List the XML entries directly under `prefix`, paired with the page number
/// parsed from the filename, sorted ascending by page. Entries without a
/// digit sequence in their name (and anything in subdirectories such as
/// `_rels/`) are ignored.
fn page_entries<R: Read + Seek>(archive: &ZipArchive<R>, prefix: &str) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = archive
        .file_names()
        .filter(|name| {
            name.starts_with(prefix)
                && name.ends_with(".xml")
                && !name[prefix.len()..].contains('/')
        })
        .filter_map(|name| page_number(name).map(|page| (name.to_string(), page)))
        .collect();

    entries.sort_by_key(|(_, page)| *page);
    entries
}

/// Parse the page ordinal from an entry name like `ppt/slides/slide12.xml`
/// or `ppt/notesSlides/notesSlide3.xml`.
fn page_number(name: &str) -> Option<usize> {
    let digits: String = name
        .rsplit('/')
        .next()
        .unwrap_or(name)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Read one archive entry into a string.
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, entry: &str) -> Result<String> {
    let mut file = archive
        .by_name(entry)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", entry, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", entry, e)))?;

    Ok(content)
}

/// Assemble the logical text of every `<a:p>` paragraph in a slide or notes
/// XML document.
///
/// Within a paragraph: text nodes append their character data (non-ASCII
/// characters are dropped, not substituted), an `<a:br/>` appends exactly one
/// newline, and all other markup is transparent. Adjacent text runs
/// concatenate with no separator so a URL split across formatting runs comes
/// back out whole.
fn collect_paragraphs(xml_content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    // Fresh accumulator per paragraph; no cross-paragraph leakage.
                    current = Some(String::new());
                }
                b"br" => {
                    if let Some(text) = current.as_mut() {
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"br" {
                    if let Some(text) = current.as_mut() {
                        text.push('\n');
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(text) = current.as_mut() {
                    let data = e.unescape().unwrap_or_default();
                    text.extend(data.chars().filter(|c| c.is_ascii()));
                }
            }
            Ok(Event::End(ref e)) => {
                if local_name(e.name().as_ref()) == b"p" {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error (continuing): {}", e);
                break;
            }
            _ => {}
        }
    }

    paragraphs
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
