//! Banking data of the company that remits the payments.

use serde::{Deserialize, Serialize};

use crate::error::RemittanceError;

/// Company banking registration used in the remittance headers.
///
/// The encoder trusts these values; run [`CompanyProfile::validate`] before
/// generating a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    /// Bank code (e.g. "001").
    pub bank_code: String,

    /// Branch (agência) number.
    pub branch: String,

    /// Branch check digit.
    pub branch_digit: String,

    /// Account number.
    pub account: String,

    /// Account check digit.
    pub account_digit: String,

    /// Agreement (convênio) code assigned by the bank.
    pub agreement: String,

    /// Legal name.
    pub name: String,

    /// Company CNPJ.
    pub tax_id: String,
}

impl CompanyProfile {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("bank code", &self.bank_code),
            ("branch", &self.branch),
            ("branch check digit", &self.branch_digit),
            ("account", &self.account),
            ("account check digit", &self.account_digit),
            ("agreement code", &self.agreement),
            ("company name", &self.name),
            ("company tax ID", &self.tax_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// Check that every field is filled in.
    pub fn validate(&self) -> Result<(), RemittanceError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RemittanceError::IncompleteProfile {
                missing: missing.into_iter().map(String::from).collect(),
            })
        }
    }

    /// Load a profile from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }
}
