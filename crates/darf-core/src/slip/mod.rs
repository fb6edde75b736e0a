//! DARF slip extraction from document text.

mod parser;
pub mod rules;

pub use parser::{DarfParser, ExtractionResult, SlipParser};
pub use rules::SplitStrategy;
