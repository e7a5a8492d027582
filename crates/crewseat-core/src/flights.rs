use crate::lines::LogicalLine;
use crate::patterns::RosterPatterns;

/// A flight marker found in the roster.
///
/// Identifiers may repeat across a roster (the same flight number on
/// another day or leg); records are told apart by `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightRecord {
    /// The 3 or 4 digit flight number.
    pub identifier: String,
    /// Index of the line carrying the marker.
    pub position: usize,
}

/// Find every flight-marker line, in line order.
///
/// Only the full `<station> - <destination> <number>` marker qualifies;
/// bare 3 or 4 digit numbers elsewhere in the roster never do. A line yields
/// at most one flight.
pub fn locate(lines: &[LogicalLine], patterns: &RosterPatterns) -> Vec<FlightRecord> {
    let flights: Vec<FlightRecord> = lines
        .iter()
        .filter_map(|line| {
            patterns
                .flight_identifier(&line.text)
                .map(|identifier| FlightRecord {
                    identifier: identifier.to_string(),
                    position: line.index,
                })
        })
        .collect();
    tracing::debug!(flights = flights.len(), "located flight markers");
    flights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RosterOptions;

    fn patterns() -> RosterPatterns {
        RosterPatterns::new(&RosterOptions::default()).unwrap()
    }

    #[test]
    fn locates_flights_in_order() {
        let lines = LogicalLine::sequence([
            "CZL - ORN 612",
            "random noise",
            "CZL - ALG 6027",
            "CC KADI #5",
        ]);
        let flights = locate(&lines, &patterns());
        assert_eq!(
            flights,
            vec![
                FlightRecord {
                    identifier: "612".to_string(),
                    position: 0
                },
                FlightRecord {
                    identifier: "6027".to_string(),
                    position: 2
                },
            ]
        );
    }

    #[test]
    fn numeric_tables_are_ignored() {
        let lines = LogicalLine::sequence(["6190 6194 6027", "ALG 612 ORN 613", "Total 1234"]);
        assert!(locate(&lines, &patterns()).is_empty());
    }

    #[test]
    fn repeated_identifiers_kept_separately() {
        let lines = LogicalLine::sequence(["CZL - ALG 6190", "CP A #1", "CZL - ALG 6190"]);
        let flights = locate(&lines, &patterns());
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0].position, 0);
        assert_eq!(flights[1].position, 2);
    }

    #[test]
    fn no_lines_no_flights() {
        assert!(locate(&[], &patterns()).is_empty());
    }
}
