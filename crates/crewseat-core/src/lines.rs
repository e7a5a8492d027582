//! Line reconstruction: text fragments into ordered logical lines.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::fragment::TextFragment;
use crate::normalize::{collapse_spaced_letters, collapse_whitespace, nfc, strip_statistics};
use crate::patterns::RosterPatterns;

/// One reconstructed line of roster text.
///
/// `index` is the line's ordinal in the reconstructed stream. Indices are
/// unique and strictly increasing, and they are the only notion of
/// "before" and "after" the later stages use.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalLine {
    /// Normalized line text.
    pub text: String,
    /// Ordinal position in the reconstructed stream.
    pub index: usize,
}

impl LogicalLine {
    /// Create a line at the given ordinal.
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    /// Number already-split texts consecutively from 0.
    ///
    /// ```
    /// use crewseat_core::LogicalLine;
    ///
    /// let lines = LogicalLine::sequence(["CZL - ALG 6190", "CP BOUTALEB #12A"]);
    /// assert_eq!(lines[1].index, 1);
    /// ```
    pub fn sequence<I, S>(texts: I) -> Vec<LogicalLine>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| LogicalLine::new(text, index))
            .collect()
    }
}

/// Reconstruct logical lines from extracted fragments.
///
/// When every fragment has a vertical position, fragments are grouped into
/// rows by `(page, y rounded to the row precision)`, joined with single
/// spaces in their original order, and rows are emitted page by page from
/// the top of the page down.
///
/// Otherwise all fragments are joined into one run with whitespace
/// collapsed.
///
/// Rows and runs are then re-split before every flight marker and every
/// role-code token, so crew text sharing a row with its flight becomes a
/// line of its own.
///
/// Either way the text is normalized once before splitting: Unicode NFC,
/// statistics-section removal (if enabled), and spaced-capital collapse.
/// Blank lines are dropped.
pub fn reconstruct(fragments: &[TextFragment], patterns: &RosterPatterns) -> Vec<LogicalLine> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let texts: Vec<String> = if fragments.iter().all(TextFragment::is_positioned) {
        let rows = rows_by_position(fragments, patterns.row_precision());
        let text = normalize_text(&rows.join("\n"), patterns);
        text.lines()
            .flat_map(|row| patterns.split_at_markers(&collapse_whitespace(row)))
            .collect()
    } else {
        let joined = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = collapse_whitespace(&normalize_text(&joined, patterns));
        patterns.split_at_markers(&text)
    };

    let lines = LogicalLine::sequence(texts.into_iter().filter(|t| !t.is_empty()));
    tracing::debug!(
        fragments = fragments.len(),
        lines = lines.len(),
        "reconstructed roster lines"
    );
    lines
}

/// Group positioned fragments into visual rows, top to bottom per page.
fn rows_by_position(fragments: &[TextFragment], precision: f64) -> Vec<String> {
    let mut rows: BTreeMap<(usize, Reverse<i64>), Vec<&str>> = BTreeMap::new();
    for fragment in fragments {
        let y = fragment.y.unwrap_or_default();
        let key = (fragment.page, Reverse((y / precision).round() as i64));
        rows.entry(key).or_default().push(fragment.text.as_str());
    }
    rows.into_values().map(|parts| parts.join(" ")).collect()
}

fn normalize_text(text: &str, patterns: &RosterPatterns) -> String {
    let text = nfc(text);
    let text = if patterns.strip_statistics() {
        strip_statistics(&text)
    } else {
        text
    };
    collapse_spaced_letters(&text)
}
