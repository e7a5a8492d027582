//! The whole roster pipeline in one call.

use crate::blocks::{Block, assemble_with_warnings};
use crate::crew::{CrewEntry, extract_with_warnings};
use crate::error::{ParseResult, RosterError};
use crate::flights::{FlightRecord, locate};
use crate::fragment::TextFragment;
use crate::lines::{LogicalLine, reconstruct};
use crate::message::compose;
use crate::options::RosterOptions;
use crate::patterns::RosterPatterns;

/// Every intermediate product of one parse.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterParse {
    pub lines: Vec<LogicalLine>,
    pub flights: Vec<FlightRecord>,
    pub crew: Vec<CrewEntry>,
    pub blocks: Vec<Block>,
}

impl RosterParse {
    /// Compose the final message for this roster.
    pub fn message(&self, date_label: &str) -> String {
        compose(&self.blocks, date_label)
    }
}

/// Run reconstruction, flight location, crew extraction and block assembly.
///
/// Lines excluded along the way are reported as warnings. The only errors
/// come from invalid options.
pub fn parse(
    fragments: &[TextFragment],
    options: &RosterOptions,
) -> Result<ParseResult<RosterParse>, RosterError> {
    let patterns = RosterPatterns::new(options)?;
    let lines = reconstruct(fragments, &patterns);
    Ok(run(lines, &patterns))
}

/// Parse a flat text dump of the roster.
pub fn parse_text(
    text: &str,
    options: &RosterOptions,
) -> Result<ParseResult<RosterParse>, RosterError> {
    parse(&[TextFragment::flat(text)], options)
}

/// Parse lines that are already split, skipping reconstruction.
///
/// Lines are used as given and numbered from 0.
///
/// ```
/// use crewseat_core::{RosterOptions, parse_lines};
///
/// let result = parse_lines(
///     ["CZL - ORN 612", "random noise", "CZL - ALG 6027", "CC KADI #5"],
///     &RosterOptions::default(),
/// )
/// .unwrap();
/// let blocks = &result.value.blocks;
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].entries, vec!["CC KADI"]);
/// ```
pub fn parse_lines<I, S>(
    texts: I,
    options: &RosterOptions,
) -> Result<ParseResult<RosterParse>, RosterError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let patterns = RosterPatterns::new(options)?;
    Ok(run(LogicalLine::sequence(texts), &patterns))
}

fn run(lines: Vec<LogicalLine>, patterns: &RosterPatterns) -> ParseResult<RosterParse> {
    let flights = locate(&lines, patterns);
    let (crew, mut warnings) = extract_with_warnings(&lines, patterns).into_parts();
    let (blocks, assembly_warnings) = assemble_with_warnings(&flights, &crew).into_parts();
    warnings.extend(assembly_warnings);

    tracing::debug!(
        lines = lines.len(),
        flights = flights.len(),
        crew = crew.len(),
        blocks = blocks.len(),
        warnings = warnings.len(),
        "parsed roster"
    );

    ParseResult::with_warnings(
        RosterParse {
            lines,
            flights,
            crew,
            blocks,
        },
        warnings,
    )
}
