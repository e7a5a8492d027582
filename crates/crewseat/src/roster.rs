//! Top-level roster document type.

use chrono::NaiveDateTime;
use crewseat_core::{
    ParseResult, RosterError, RosterOptions, RosterParse, TextFragment, date_label,
};
use crewseat_parse::{LopdfBackend, LopdfDocument, TextBackend};

/// How page text is handed to line reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Keep each fragment's baseline so lines are rebuilt by row.
    #[default]
    Positioned,
    /// Drop positions and re-split the joined text at flight and crew markers.
    Flat,
}

/// A roster PDF opened for parsing.
///
/// # Example
///
/// ```ignore
/// let roster = Roster::open(bytes, None)?;
/// let report = roster.parse(ExtractionMode::Positioned)?;
/// println!("{}", report.value.message("06MAR25"));
/// ```
pub struct Roster {
    doc: LopdfDocument,
    options: RosterOptions,
}

impl std::fmt::Debug for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roster")
            .field("page_count", &self.page_count())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Roster {
    /// Open a roster PDF from bytes.
    ///
    /// `options` describes the roster template; `None` uses the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidOptions`] for unusable options,
    /// [`RosterError::PasswordRequired`] for encrypted documents, and
    /// [`RosterError::ParseError`] if the bytes are not a PDF.
    pub fn open(bytes: &[u8], options: Option<RosterOptions>) -> Result<Self, RosterError> {
        let options = options.unwrap_or_default();
        options.validate()?;
        let doc = LopdfBackend::open(bytes).map_err(RosterError::from)?;
        tracing::debug!(pages = LopdfBackend::page_count(&doc), "opened roster");
        Ok(Self { doc, options })
    }

    /// Open a roster PDF from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::IoError`] if the file cannot be read, otherwise
    /// as [`Roster::open`].
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<RosterOptions>,
    ) -> Result<Self, RosterError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    pub fn options(&self) -> &RosterOptions {
        &self.options
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Text fragments of every page, in page and content order.
    ///
    /// # Errors
    ///
    /// Fails on the first page whose content cannot be read.
    pub fn fragments(
        &self,
        mode: ExtractionMode,
    ) -> Result<ParseResult<Vec<TextFragment>>, RosterError> {
        let result = LopdfBackend::document_fragments(&self.doc).map_err(|e| {
            tracing::warn!(error = %e, "failed to read roster text");
            RosterError::from(e)
        })?;
        Ok(match mode {
            ExtractionMode::Positioned => result,
            ExtractionMode::Flat => result.map(|fragments| {
                fragments
                    .into_iter()
                    .map(TextFragment::without_position)
                    .collect()
            }),
        })
    }

    /// Extract and parse the roster.
    ///
    /// Warnings from extraction come first, followed by those from parsing.
    ///
    /// # Errors
    ///
    /// Extraction failures as in [`Roster::fragments`].
    pub fn parse(&self, mode: ExtractionMode) -> Result<ParseResult<RosterParse>, RosterError> {
        let (fragments, mut warnings) = self.fragments(mode)?.into_parts();
        let (parsed, parse_warnings) = crewseat_core::parse(&fragments, &self.options)?.into_parts();
        warnings.extend(parse_warnings);
        Ok(ParseResult::with_warnings(parsed, warnings))
    }

    /// The reservation message for the given local time.
    ///
    /// From 18:00 on the message is dated for the next day.
    ///
    /// # Errors
    ///
    /// As in [`Roster::parse`].
    pub fn message(
        &self,
        mode: ExtractionMode,
        now: NaiveDateTime,
    ) -> Result<ParseResult<String>, RosterError> {
        let label = date_label(now);
        Ok(self.parse(mode)?.map(|parsed| parsed.message(&label)))
    }

    /// The reservation message dated from the local clock.
    ///
    /// # Errors
    ///
    /// As in [`Roster::parse`].
    pub fn message_now(&self, mode: ExtractionMode) -> Result<ParseResult<String>, RosterError> {
        self.message(mode, chrono::Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_positioned() {
        assert_eq!(ExtractionMode::default(), ExtractionMode::Positioned);
    }

    #[test]
    fn invalid_options_rejected_before_reading() {
        let options = RosterOptions {
            station: String::new(),
            ..RosterOptions::default()
        };
        let err = Roster::open(b"not a pdf", Some(options)).unwrap_err();
        assert!(matches!(err, RosterError::InvalidOptions(_)));
    }

    #[test]
    fn garbage_bytes_are_parse_errors() {
        let err = Roster::open(b"not a pdf", None).unwrap_err();
        assert!(matches!(err, RosterError::ParseError(_)));
    }

    #[cfg(feature = "std")]
    #[test]
    fn missing_file_is_io_error() {
        let err = Roster::open_file("/nonexistent/roster.pdf", None).unwrap_err();
        assert!(matches!(err, RosterError::IoError(_)));
    }
}
