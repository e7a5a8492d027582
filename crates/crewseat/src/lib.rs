//! crewseat: Turn crew roster PDFs into seat-reservation messages.
//!
//! This is the public API facade crate. It re-exports the pipeline types
//! from crewseat-core and reads PDFs through crewseat-parse.
//!
//! # Architecture
//!
//! - **crewseat-core**: Backend-independent data types and the roster pipeline
//! - **crewseat-parse**: PDF text extraction (lopdf backend and content stream interpreter)
//! - **crewseat** (this crate): [`Roster`], tying extraction and parsing together

mod roster;

pub use crewseat_core::{
    Block, CrewEntry, FlightRecord, LogicalLine, ParseResult, ParseWarning, ParseWarningCode,
    RosterError, RosterOptions, RosterParse, SeparatorWidth, TextFragment, compose, date_label,
    parse, parse_lines, parse_text,
};
pub use roster::{ExtractionMode, Roster};

pub use crewseat_core;
pub use crewseat_parse;
