//! Rule-based heuristics for DARF slip text.

pub mod amounts;
pub mod blocks;
pub mod fields;
pub mod patterns;

pub use amounts::{format_brl_amount, parse_brl_amount, MAX_AMOUNT};
pub use blocks::{normalize_block, normalize_line, segment_blocks, Segmentation, SplitStrategy};
pub use fields::{scan_lines, tag_field, SlipAccumulator, SlipDraft, SlipField, TaggedField};
