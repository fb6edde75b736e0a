//! Common regex patterns for DARF slip extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Slip heading: "Documento de Arrecadação de Receitas Federais" or "DARF"
    pub static ref DARF_HEADING: Regex = Regex::new(
        r"(?im)^[ \t]*(?:documento\s+de\s+arrecada[çc][ãa]o|darf\b)"
    ).unwrap();

    // First numbered field of a slip, used when the heading is missing
    pub static ref NAME_FIELD_MARKER: Regex = Regex::new(
        r"(?im)^[ \t]*0?1[ \t]*[.\-)]?[ \t]*nome"
    ).unwrap();

    // "07 VALOR DO PRINCIPAL 1.500,00", "01 NOME: ACME", "10 - VALOR TOTAL"
    pub static ref FIELD_LINE: Regex = Regex::new(
        r"^0?(\d{1,2})[\s.\-)]*(\p{L}[\p{L}\s/]*)\s*(?:[:\-]|\s|$)\s*(.*)$"
    ).unwrap();

    // Line cleanup
    pub static ref DOT_LEADER: Regex = Regex::new(r"\.{2,}").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    pub static ref SPACE_BEFORE_COLON: Regex = Regex::new(r" +:").unwrap();

    // Dates on slips and in remittance fields
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})$"
    ).unwrap();

    pub static ref DATE_COMPACT: Regex = Regex::new(r"^\d{8}$").unwrap();
}
