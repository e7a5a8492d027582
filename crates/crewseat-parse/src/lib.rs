//! crewseat-parse: PDF text-layer extraction for crewseat.
//!
//! Opens roster PDFs through a pluggable [`TextBackend`] and turns each
//! page's content stream into positioned [`TextFragment`]s for the
//! crewseat-core pipeline. [`LopdfBackend`] is the default backend.
//!
//! [`TextFragment`]: crewseat_core::TextFragment

pub mod backend;
pub mod cmap;
pub mod error;
pub mod font;
pub mod handler;
mod interpreter;
pub mod lopdf_backend;
pub mod text_state;
pub mod tokenizer;

pub use backend::TextBackend;
pub use error::BackendError;
pub use handler::{ContentHandler, FragmentCollector, TextEvent};
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use crewseat_core;
