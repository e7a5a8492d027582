//! PDF text backend trait.
//!
//! Defines the [`TextBackend`] trait that abstracts opening a PDF and pulling
//! positioned text fragments out of its pages, so the roster pipeline never
//! touches a PDF library directly.

use crewseat_core::{ParseResult, RosterError, TextFragment};

/// Trait abstracting PDF text extraction.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let first = MyBackend::page_fragments(&doc, 0)?;
/// let all = MyBackend::document_fragments(&doc)?;
/// ```
pub trait TextBackend {
    /// The parsed PDF document type.
    type Document;

    /// Backend-specific error type, convertible to [`RosterError`].
    type Error: std::error::Error + Into<RosterError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF, or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Every text fragment shown on a page (0-based), in content order, each
    /// carrying its page index and baseline position.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page's content
    /// cannot be read.
    fn page_fragments(
        doc: &Self::Document,
        index: usize,
    ) -> Result<ParseResult<Vec<TextFragment>>, Self::Error>;

    /// Fragments of every page, in page order.
    ///
    /// # Errors
    ///
    /// Stops at the first page that fails.
    fn document_fragments(
        doc: &Self::Document,
    ) -> Result<ParseResult<Vec<TextFragment>>, Self::Error> {
        let mut fragments = Vec::new();
        let mut warnings = Vec::new();
        for index in 0..Self::page_count(doc) {
            let (page, page_warnings) = Self::page_fragments(doc, index)?.into_parts();
            fragments.extend(page);
            warnings.extend(page_warnings);
        }
        Ok(ParseResult::with_warnings(fragments, warnings))
    }
}
