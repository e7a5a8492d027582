//! Text clean-up applied to reconstructed roster text before line splitting.
//!
//! Generic PDF text extraction leaves three kinds of damage in a roster:
//! names split into spaced capitals, an airport statistics table whose
//! numeric rows look like flight numbers, and irregular whitespace.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Two or more single uppercase letters, each separated by exactly one space.
static SPACED_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:[A-Z] )+[A-Z]\b").expect("valid spaced-letter regex"));

/// The airport statistics section, from its title through the record count.
static STATISTICS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)AIR ALGERIE.*?Total records.*?\d+").expect("valid statistics regex")
});

/// Collapse runs of spaced single capitals into one token.
///
/// `"C P  B O U T A L E B"` becomes `"CP  BOUTALEB"`: the double space is a
/// real word boundary and survives, so `"CP"` and `"BOUTALEB"` stay apart.
///
/// ```
/// use crewseat_core::normalize::collapse_spaced_letters;
///
/// assert_eq!(collapse_spaced_letters("C P  B O U T A L E B #1"), "CP  BOUTALEB #1");
/// assert_eq!(collapse_spaced_letters("FO SAIDI"), "FO SAIDI");
/// ```
pub fn collapse_spaced_letters(text: &str) -> String {
    SPACED_LETTERS
        .replace_all(text, |caps: &regex::Captures<'_>| caps[0].replace(' ', ""))
        .into_owned()
}

/// Remove the airport statistics section.
///
/// The section is replaced by a line break so the text on either side does
/// not fuse into one line. Text without the section is returned unchanged.
pub fn strip_statistics(text: &str) -> String {
    STATISTICS_SECTION.replace_all(text, "\n").into_owned()
}

/// Collapse every whitespace run (including line breaks) into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply Unicode NFC normalization.
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}
