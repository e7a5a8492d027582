use crate::error::{ParseResult, ParseWarning, ParseWarningCode};
use crate::lines::LogicalLine;
use crate::normalize::collapse_whitespace;
use crate::patterns::RosterPatterns;

/// A crew member's reservation label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrewEntry {
    /// Role code and name, e.g. `"CP BOUTALEB"`.
    pub label: String,
    /// Index of the line the entry was read from.
    pub position: usize,
}

/// How a single line reads as a crew line.
enum CrewLine {
    Entry(String),
    Unterminated,
    NotCrew,
}

/// Extract crew entries from the lines, in line order.
///
/// See [`extract_with_warnings`] for the matching rules.
pub fn extract(lines: &[LogicalLine], patterns: &RosterPatterns) -> Vec<CrewEntry> {
    extract_with_warnings(lines, patterns).value
}

/// Extract crew entries and report lines that were rejected.
///
/// A line is a crew entry only if it holds a role-code token and, after
/// it, the terminator marker. The label runs from the start of the first
/// role-code token up to (not including) the terminator, with whitespace
/// collapsed. Lines with a role code but no terminator are partial labels
/// left by extraction drift; they are dropped with a
/// [`ParseWarningCode::MissingTerminator`] warning.
pub fn extract_with_warnings(
    lines: &[LogicalLine],
    patterns: &RosterPatterns,
) -> ParseResult<Vec<CrewEntry>> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for line in lines {
        match classify(&line.text, patterns) {
            CrewLine::Entry(label) => entries.push(CrewEntry {
                label,
                position: line.index,
            }),
            CrewLine::Unterminated => warnings.push(ParseWarning::on_line(
                ParseWarningCode::MissingTerminator,
                format!(
                    "role code without '{}' terminator: {:?}",
                    patterns.terminator(),
                    line.text
                ),
                line.index,
            )),
            CrewLine::NotCrew => {}
        }
    }

    tracing::debug!(
        entries = entries.len(),
        rejected = warnings.len(),
        "extracted crew entries"
    );
    ParseResult::with_warnings(entries, warnings)
}

fn classify(text: &str, patterns: &RosterPatterns) -> CrewLine {
    let Some(role) = patterns.find_role(text) else {
        return CrewLine::NotCrew;
    };
    match text[role.end..].find(patterns.terminator()) {
        Some(offset) => {
            let label = collapse_whitespace(&text[role.start..role.end + offset]);
            CrewLine::Entry(label)
        }
        None => CrewLine::Unterminated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RosterOptions;

    fn patterns() -> RosterPatterns {
        RosterPatterns::new(&RosterOptions::default()).unwrap()
    }

    #[test]
    fn label_runs_to_terminator() {
        let lines = LogicalLine::sequence(["CP BOUTALEB #12A", "FO SAIDI #12A"]);
        let entries = extract(&lines, &patterns());
        assert_eq!(
            entries,
            vec![
                CrewEntry {
                    label: "CP BOUTALEB".to_string(),
                    position: 0
                },
                CrewEntry {
                    label: "FO SAIDI".to_string(),
                    position: 1
                },
            ]
        );
    }

    #[test]
    fn label_starts_at_role_code() {
        let lines = LogicalLine::sequence(["12  CC   KADI  AMINA #5 07:40"]);
        let entries = extract(&lines, &patterns());
        assert_eq!(entries[0].label, "CC KADI AMINA");
    }

    #[test]
    fn missing_terminator_dropped_with_warning() {
        let lines = LogicalLine::sequence(["CP BOUTALEB no hash here"]);
        let result = extract_with_warnings(&lines, &patterns());
        assert!(result.value.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ParseWarningCode::MissingTerminator);
        assert_eq!(result.warnings[0].line, Some(0));
    }

    #[test]
    fn terminator_before_role_code_does_not_count() {
        let lines = LogicalLine::sequence(["#3 CP BOUTALEB"]);
        let result = extract_with_warnings(&lines, &patterns());
        assert!(result.value.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn lines_without_role_code_ignored_silently() {
        let lines = LogicalLine::sequence(["CZL - ALG 6190", "seat #4", "random noise"]);
        let result = extract_with_warnings(&lines, &patterns());
        assert!(result.value.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn custom_terminator() {
        let opts = RosterOptions {
            terminator: '/',
            ..RosterOptions::default()
        };
        let p = RosterPatterns::new(&opts).unwrap();
        let lines = LogicalLine::sequence(["FE MANSOURI / 3C", "FA LARBI #2"]);
        let entries = extract(&lines, &p);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "FE MANSOURI");
    }

    #[test]
    fn positions_follow_line_indices() {
        let lines = vec![LogicalLine::new("PC HAMDI #1", 7)];
        assert_eq!(extract(&lines, &patterns())[0].position, 7);
    }
}
