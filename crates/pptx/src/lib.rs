//! PPTX (Office Open XML) package walker for URL extraction.
//!
//! Walks .pptx files (ZIP archives of XML documents) and records every
//! normalized URL found in slide and notes text.

pub mod parser;

pub use parser::PptxScanner;
