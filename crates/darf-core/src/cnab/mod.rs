//! CNAB-240 remittance file generation for DARF payments.
//!
//! One file carries a single batch: file header, batch header, one detail
//! line (segment A) per payment, batch trailer and file trailer.

mod encoder;
pub mod fields;
pub mod layout;

pub use encoder::{RemittanceEncoder, RemittanceFile};

/// Every line is exactly this many characters.
pub const LINE_WIDTH: usize = 240;

/// Lines are joined with CRLF.
pub const LINE_SEPARATOR: &str = "\r\n";

/// The only batch in the file.
pub const BATCH_NUMBER: &str = "0001";

/// Layout version written in the file header.
pub const LAYOUT_VERSION: &str = "1";

/// Remitting bank name written in the file header.
pub const DEFAULT_BANK_NAME: &str = "BANCO DO BRASIL S.A.";
