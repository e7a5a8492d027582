use crate::error::RosterError;

/// Options describing the roster document template.
///
/// Defaults match the operations roster the parser was tuned on: flights
/// depart from `CZL`, crew ranks are `CP FO PC CC FA FE`, and `#` separates
/// a crew label from its seat reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RosterOptions {
    /// Departure station code that opens every flight marker (default: `CZL`).
    pub station: String,
    /// Crew rank abbreviations that start a crew entry.
    pub role_codes: Vec<String>,
    /// Character ending the usable crew label (default: `#`).
    pub terminator: char,
    /// Vertical rounding step, in points, for grouping fragments into rows (default: 1.0).
    pub row_precision: f64,
    /// Remove the airport statistics section before splitting lines (default: true).
    pub strip_statistics: bool,
}

/// Crew rank abbreviations used by the default template.
pub const DEFAULT_ROLE_CODES: [&str; 6] = ["CP", "FO", "PC", "CC", "FA", "FE"];

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            station: "CZL".to_string(),
            role_codes: DEFAULT_ROLE_CODES.iter().map(|c| c.to_string()).collect(),
            terminator: '#',
            row_precision: 1.0,
            strip_statistics: true,
        }
    }
}

impl RosterOptions {
    /// Check that the options can drive a parse.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidOptions`] for an empty station code, an
    /// empty or blank role-code set, a whitespace terminator, or a
    /// non-positive row precision.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.station.trim().is_empty() {
            return Err(RosterError::InvalidOptions(
                "station code is empty".to_string(),
            ));
        }
        if self.role_codes.is_empty() {
            return Err(RosterError::InvalidOptions(
                "role code set is empty".to_string(),
            ));
        }
        if let Some(blank) = self.role_codes.iter().position(|c| c.trim().is_empty()) {
            return Err(RosterError::InvalidOptions(format!(
                "role code #{blank} is blank"
            )));
        }
        if self.terminator.is_whitespace() {
            return Err(RosterError::InvalidOptions(
                "terminator must not be whitespace".to_string(),
            ));
        }
        if !(self.row_precision.is_finite() && self.row_precision > 0.0) {
            return Err(RosterError::InvalidOptions(format!(
                "row precision must be positive, got {}",
                self.row_precision
            )));
        }
        Ok(())
    }
}
