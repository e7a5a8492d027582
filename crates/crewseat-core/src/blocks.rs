use crate::crew::CrewEntry;
use crate::error::{ParseResult, ParseWarning, ParseWarningCode};
use crate::flights::FlightRecord;

/// Dash separator printed under a block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeparatorWidth {
    /// Five dashes, for 3-digit identifiers.
    Short,
    /// Six dashes, for 4-digit identifiers.
    Long,
}

impl SeparatorWidth {
    /// The separator for an identifier, or `None` if its length is neither 3 nor 4.
    pub fn for_identifier(identifier: &str) -> Option<Self> {
        match identifier.chars().count() {
            3 => Some(Self::Short),
            4 => Some(Self::Long),
            _ => None,
        }
    }

    /// Number of dashes.
    pub fn width(self) -> usize {
        match self {
            Self::Short => 5,
            Self::Long => 6,
        }
    }

    /// The separator line.
    pub fn dashes(self) -> &'static str {
        match self {
            Self::Short => "-----",
            Self::Long => "------",
        }
    }
}

/// The rendered unit of output for one flight.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub flight_identifier: String,
    pub separator: SeparatorWidth,
    /// Crew labels in document order.
    pub entries: Vec<String>,
}

impl Block {
    /// `AH<identifier>`.
    pub fn header(&self) -> String {
        format!("AH{}", self.flight_identifier)
    }

    /// Blank line, header, separator, then one label per line.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 3);
        lines.push(String::new());
        lines.push(self.header());
        lines.push(self.separator.dashes().to_string());
        lines.extend(self.entries.iter().cloned());
        lines
    }
}

/// Group crew entries under their flights.
///
/// See [`assemble_with_warnings`].
pub fn assemble(flights: &[FlightRecord], entries: &[CrewEntry]) -> Vec<Block> {
    assemble_with_warnings(flights, entries).value
}

/// Group crew entries under their flights, reporting what was dropped.
///
/// Each entry goes to the flight with the largest position strictly less
/// than its own. Entries with no preceding flight are dropped with an
/// [`ParseWarningCode::OrphanEntry`] warning. Every flight record yields its
/// own block in position order, even when its identifier repeats, with
/// entries in document order. Flights with no entries produce no block. An
/// identifier that is not 3 or 4 characters long is skipped with an
/// [`ParseWarningCode::UnsupportedIdentifier`] warning.
pub fn assemble_with_warnings(
    flights: &[FlightRecord],
    entries: &[CrewEntry],
) -> ParseResult<Vec<Block>> {
    let mut warnings = Vec::new();

    let mut ordered_flights: Vec<&FlightRecord> = flights.iter().collect();
    ordered_flights.sort_by_key(|f| f.position);

    let mut ordered_entries: Vec<&CrewEntry> = entries.iter().collect();
    ordered_entries.sort_by_key(|e| e.position);

    let mut groups: Vec<Vec<String>> = vec![Vec::new(); ordered_flights.len()];
    for entry in ordered_entries {
        let preceding = ordered_flights.partition_point(|f| f.position < entry.position);
        match preceding.checked_sub(1) {
            Some(slot) => groups[slot].push(entry.label.clone()),
            None => warnings.push(ParseWarning::on_line(
                ParseWarningCode::OrphanEntry,
                format!("crew entry {:?} precedes every flight", entry.label),
                entry.position,
            )),
        }
    }

    let mut blocks = Vec::new();
    for (flight, labels) in ordered_flights.into_iter().zip(groups) {
        if labels.is_empty() {
            continue;
        }
        let Some(separator) = SeparatorWidth::for_identifier(&flight.identifier) else {
            tracing::warn!(
                identifier = %flight.identifier,
                line = flight.position,
                "skipping flight with unsupported identifier length"
            );
            warnings.push(ParseWarning::on_line(
                ParseWarningCode::UnsupportedIdentifier,
                format!(
                    "flight identifier {:?} is not 3 or 4 characters long",
                    flight.identifier
                ),
                flight.position,
            ));
            continue;
        };
        blocks.push(Block {
            flight_identifier: flight.identifier.clone(),
            separator,
            entries: labels,
        });
    }

    ParseResult::with_warnings(blocks, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(identifier: &str, position: usize) -> FlightRecord {
        FlightRecord {
            identifier: identifier.to_string(),
            position,
        }
    }

    fn entry(label: &str, position: usize) -> CrewEntry {
        CrewEntry {
            label: label.to_string(),
            position,
        }
    }

    #[test]
    fn separator_width_by_identifier_length() {
        assert_eq!(SeparatorWidth::for_identifier("612"), Some(SeparatorWidth::Short));
        assert_eq!(SeparatorWidth::for_identifier("6190"), Some(SeparatorWidth::Long));
        assert_eq!(SeparatorWidth::for_identifier("61"), None);
        assert_eq!(SeparatorWidth::for_identifier("61901"), None);
        assert_eq!(SeparatorWidth::Short.dashes().len(), SeparatorWidth::Short.width());
        assert_eq!(SeparatorWidth::Long.dashes().len(), SeparatorWidth::Long.width());
    }

    #[test]
    fn entries_grouped_under_nearest_preceding_flight() {
        let flights = vec![flight("6190", 0), flight("612", 3)];
        let entries = vec![
            entry("CP BOUTALEB", 1),
            entry("FO SAIDI", 2),
            entry("CC KADI", 4),
        ];
        let blocks = assemble(&flights, &entries);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].flight_identifier, "6190");
        assert_eq!(blocks[0].entries, vec!["CP BOUTALEB", "FO SAIDI"]);
        assert_eq!(blocks[1].flight_identifier, "612");
        assert_eq!(blocks[1].separator, SeparatorWidth::Short);
        assert_eq!(blocks[1].entries, vec!["CC KADI"]);
    }

    #[test]
    fn orphan_entries_dropped_with_warning() {
        let flights = vec![flight("6190", 5)];
        let entries = vec![entry("CP EARLY", 2), entry("FO LATE", 6)];
        let result = assemble_with_warnings(&flights, &entries);
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].entries, vec!["FO LATE"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ParseWarningCode::OrphanEntry);
        assert_eq!(result.warnings[0].line, Some(2));
    }

    #[test]
    fn flights_without_crew_omitted() {
        let flights = vec![flight("612", 0), flight("6027", 2)];
        let entries = vec![entry("CC KADI", 3)];
        let blocks = assemble(&flights, &entries);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].flight_identifier, "6027");
    }

    #[test]
    fn repeated_identifier_yields_separate_blocks() {
        let flights = vec![flight("6190", 0), flight("612", 2), flight("6190", 4)];
        let entries = vec![entry("CP A", 1), entry("CC B", 3), entry("FO C", 5)];
        let blocks = assemble(&flights, &entries);
        let headers: Vec<String> = blocks.iter().map(Block::header).collect();
        assert_eq!(headers, vec!["AH6190", "AH612", "AH6190"]);
        assert_eq!(blocks[0].entries, vec!["CP A"]);
        assert_eq!(blocks[1].entries, vec!["CC B"]);
        assert_eq!(blocks[2].entries, vec!["FO C"]);
    }

    #[test]
    fn recurring_crew_text_assigned_by_position() {
        let flights = vec![flight("6190", 0), flight("612", 2)];
        let entries = vec![entry("CP BOUTALEB", 1), entry("CP BOUTALEB", 3)];
        let blocks = assemble(&flights, &entries);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].entries, vec!["CP BOUTALEB"]);
        assert_eq!(blocks[1].entries, vec!["CP BOUTALEB"]);
    }

    #[test]
    fn unsupported_identifier_skipped() {
        let flights = vec![flight("12", 0)];
        let entries = vec![entry("CP A", 1)];
        let result = assemble_with_warnings(&flights, &entries);
        assert!(result.value.is_empty());
        assert_eq!(result.warnings[0].code, ParseWarningCode::UnsupportedIdentifier);
    }

    #[test]
    fn input_order_does_not_matter() {
        let flights = vec![flight("612", 3), flight("6190", 0)];
        let entries = vec![entry("CC KADI", 4), entry("CP BOUTALEB", 1)];
        let blocks = assemble(&flights, &entries);
        assert_eq!(blocks[0].flight_identifier, "6190");
        assert_eq!(blocks[1].flight_identifier, "612");
    }

    #[test]
    fn entry_on_flight_line_belongs_to_previous_flight() {
        let flights = vec![flight("6190", 0), flight("612", 2)];
        let entries = vec![entry("CP SAME LINE", 2)];
        let blocks = assemble(&flights, &entries);
        assert_eq!(blocks[0].flight_identifier, "6190");
    }

    #[test]
    fn render_lines_layout() {
        let block = Block {
            flight_identifier: "6190".to_string(),
            separator: SeparatorWidth::Long,
            entries: vec!["CP BOUTALEB".to_string(), "FO SAIDI".to_string()],
        };
        assert_eq!(
            block.render_lines(),
            vec!["", "AH6190", "------", "CP BOUTALEB", "FO SAIDI"]
        );
    }

    #[test]
    fn nothing_in_nothing_out() {
        let result = assemble_with_warnings(&[], &[]);
        assert!(result.value.is_empty());
        assert!(result.is_clean());
    }
}
