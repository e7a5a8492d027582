//! Compiled matchers for one roster template.

use regex::Regex;

use crate::error::RosterError;
use crate::options::RosterOptions;

/// Regular expressions and markers derived from [`RosterOptions`].
///
/// Built once per parse; immutable afterwards, so one value can serve any
/// number of parses.
#[derive(Debug, Clone)]
pub struct RosterPatterns {
    /// `<station> - <destination> <3-4 digits>`; group 1 is the identifier.
    flight: Regex,
    /// Any role code as a whole word.
    role: Regex,
    terminator: char,
    row_precision: f64,
    strip_statistics: bool,
}

impl RosterPatterns {
    /// Compile the matchers for `options`.
    ///
    /// Station and role codes are matched literally.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidOptions`] if the options fail
    /// validation, or [`RosterError::PatternError`] if a pattern cannot be
    /// compiled.
    pub fn new(options: &RosterOptions) -> Result<Self, RosterError> {
        options.validate()?;

        let flight = Regex::new(&format!(
            r"\b{}\s*-\s*\w+\s+(\d{{3,4}})\b",
            regex::escape(options.station.trim())
        ))?;

        let alternatives: Vec<String> = options
            .role_codes
            .iter()
            .map(|code| regex::escape(code.trim()))
            .collect();
        let role = Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|")))?;

        Ok(Self {
            flight,
            role,
            terminator: options.terminator,
            row_precision: options.row_precision,
            strip_statistics: options.strip_statistics,
        })
    }

    /// The flight identifier on this line, if it carries a full flight marker.
    pub fn flight_identifier<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.flight
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Byte range of the first role-code token on this line.
    pub fn find_role(&self, text: &str) -> Option<std::ops::Range<usize>> {
        self.role.find(text).map(|m| m.range())
    }

    /// The character that ends a crew label.
    pub fn terminator(&self) -> char {
        self.terminator
    }

    /// Vertical rounding step for grouping positioned fragments into rows.
    pub fn row_precision(&self) -> f64 {
        self.row_precision
    }

    /// Whether the statistics section is removed before splitting.
    pub fn strip_statistics(&self) -> bool {
        self.strip_statistics
    }

    /// Re-split flattened text into lines.
    ///
    /// A line break is inserted immediately before every flight marker and
    /// every role-code token. Pieces are trimmed; empty pieces are dropped.
    pub fn split_at_markers(&self, text: &str) -> Vec<String> {
        let marked = self.flight.replace_all(text, "\n${0}");
        let marked = self.role.replace_all(&marked, "\n${0}");
        marked
            .split('\n')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> RosterPatterns {
        RosterPatterns::new(&RosterOptions::default()).unwrap()
    }

    #[test]
    fn full_flight_marker_matches() {
        let p = patterns();
        assert_eq!(p.flight_identifier("CZL - ALG 6190"), Some("6190"));
        assert_eq!(p.flight_identifier("CZL-ORN 612"), Some("612"));
        assert_eq!(p.flight_identifier("08:10 CZL - ALG 6027 B738"), Some("6027"));
    }

    #[test]
    fn bare_numbers_are_not_flights() {
        let p = patterns();
        assert_eq!(p.flight_identifier("6190"), None);
        assert_eq!(p.flight_identifier("ALG 6190"), None);
        assert_eq!(p.flight_identifier("CZL 6190"), None);
        assert_eq!(p.flight_identifier("Total 1234 5678"), None);
    }

    #[test]
    fn five_digit_numbers_are_not_flights() {
        assert_eq!(patterns().flight_identifier("CZL - ALG 61901"), None);
    }

    #[test]
    fn two_digit_numbers_are_not_flights() {
        assert_eq!(patterns().flight_identifier("CZL - ALG 61"), None);
    }

    #[test]
    fn station_must_be_whole_word() {
        assert_eq!(patterns().flight_identifier("XCZL - ALG 6190"), None);
    }

    #[test]
    fn custom_station_is_literal() {
        let opts = RosterOptions {
            station: "A.B".to_string(),
            ..RosterOptions::default()
        };
        let p = RosterPatterns::new(&opts).unwrap();
        assert_eq!(p.flight_identifier("A.B - ALG 123"), Some("123"));
        assert_eq!(p.flight_identifier("AXB - ALG 123"), None);
    }

    #[test]
    fn role_token_found_as_whole_word() {
        let p = patterns();
        assert_eq!(p.find_role("CP BOUTALEB #1"), Some(0..2));
        assert_eq!(p.find_role("12 FO SAIDI #1"), Some(3..5));
        assert_eq!(p.find_role("SCP BOUTALEB"), None);
        assert_eq!(p.find_role("CPX"), None);
    }

    #[test]
    fn invalid_options_rejected() {
        let opts = RosterOptions {
            role_codes: Vec::new(),
            ..RosterOptions::default()
        };
        assert!(matches!(
            RosterPatterns::new(&opts),
            Err(RosterError::InvalidOptions(_))
        ));
    }

    #[test]
    fn split_inserts_breaks_before_markers() {
        let p = patterns();
        let lines =
            p.split_at_markers("header CZL - ALG 6190 CP BOUTALEB #12A FO SAIDI #12A");
        assert_eq!(
            lines,
            vec![
                "header",
                "CZL - ALG 6190",
                "CP BOUTALEB #12A",
                "FO SAIDI #12A"
            ]
        );
    }

    #[test]
    fn split_empty_text() {
        assert!(patterns().split_at_markers("").is_empty());
    }
}
