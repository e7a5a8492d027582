//! Callback trait between the content stream interpreter and its consumers.

use crewseat_core::{ParseWarning, TextFragment};

/// One text-showing operator (`Tj`, `TJ`, `'`, `"`) after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    /// Decoded text of the whole operator.
    pub text: String,
    /// Baseline of the text origin in page space at the start of the operator.
    pub y: f64,
}

/// Receives interpreter events.
///
/// Only `on_text` is required; warnings are dropped unless overridden.
pub trait ContentHandler {
    fn on_text(&mut self, event: TextEvent);

    fn on_warning(&mut self, warning: ParseWarning) {
        let _ = warning;
    }
}

/// Collects one page's text events as [`TextFragment`]s.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    page: usize,
    fragments: Vec<TextFragment>,
    warnings: Vec<ParseWarning>,
}

impl FragmentCollector {
    pub fn new(page: usize) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Fragments and warnings collected so far.
    pub fn finish(self) -> (Vec<TextFragment>, Vec<ParseWarning>) {
        (self.fragments, self.warnings)
    }
}

impl ContentHandler for FragmentCollector {
    fn on_text(&mut self, event: TextEvent) {
        if event.text.trim().is_empty() {
            return;
        }
        self.fragments
            .push(TextFragment::positioned(event.text, self.page, event.y));
    }

    fn on_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning.on_page(self.page));
    }
}
