//! crewseat-core: Backend-independent data types and the roster pipeline.
//!
//! This crate turns positioned (or flat) PDF text fragments into the crew
//! seat-reservation message. Each stage is a pure function:
//!
//! 1. [`reconstruct`]: fragments into ordered [`LogicalLine`]s
//! 2. [`locate`]: flight-marker lines into [`FlightRecord`]s
//! 3. [`extract`]: crew lines into [`CrewEntry`]s
//! 4. [`assemble`]: entries grouped under the nearest preceding flight as [`Block`]s
//! 5. [`compose`]: blocks wrapped in the fixed header and footer
//!
//! [`parse`] runs stages 1 to 4 and collects [`ParseWarning`]s for lines that
//! were excluded along the way.

pub mod blocks;
pub mod crew;
pub mod error;
pub mod flights;
pub mod fragment;
pub mod lines;
pub mod message;
pub mod normalize;
pub mod options;
pub mod patterns;
pub mod pipeline;

pub use blocks::{Block, SeparatorWidth, assemble, assemble_with_warnings};
pub use crew::{CrewEntry, extract, extract_with_warnings};
pub use error::{ParseResult, ParseWarning, ParseWarningCode, RosterError};
pub use flights::{FlightRecord, locate};
pub use fragment::TextFragment;
pub use lines::{LogicalLine, reconstruct};
pub use message::{compose, date_label};
pub use options::RosterOptions;
pub use patterns::RosterPatterns;
pub use pipeline::{RosterParse, parse, parse_lines, parse_text};
