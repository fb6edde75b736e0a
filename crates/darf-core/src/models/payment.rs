//! Payment records recovered from DARF slips.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tax-payment slip, as recovered from document text.
///
/// Any field the slip did not yield is left empty (text) or zero (amounts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier assigned at extraction time.
    pub id: Uuid,

    /// Payer name (field 01).
    pub name: String,

    /// Assessment period (field 02), as printed on the slip.
    pub period: String,

    /// Payer CPF/CNPJ (field 03), digits only.
    pub tax_id: String,

    /// Revenue code (field 04).
    pub revenue_code: String,

    /// Reference number (field 05).
    pub reference: String,

    /// Due date (field 06), as printed on the slip.
    pub due_date: String,

    /// Principal amount (field 07).
    pub principal: Decimal,

    /// Penalty amount (field 08).
    pub penalty: Decimal,

    /// Interest and charges (field 09).
    pub interest: Decimal,

    /// Total amount (field 10).
    pub total: Decimal,
}

impl PaymentRecord {
    /// The four monetary amounts of the slip.
    pub fn amounts(&self) -> SlipAmounts {
        SlipAmounts {
            principal: self.principal,
            penalty: self.penalty,
            interest: self.interest,
            total: self.total,
        }
    }

    /// Describe fields that came out empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.tax_id.is_empty() {
            missing.push("tax ID");
        }
        if self.revenue_code.is_empty() {
            missing.push("revenue code");
        }
        if self.due_date.is_empty() {
            missing.push("due date");
        }
        if self.total.is_zero() {
            missing.push("total");
        }
        missing
    }
}

/// Principal, penalty, interest and total of one slip or of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipAmounts {
    pub principal: Decimal,
    pub penalty: Decimal,
    pub interest: Decimal,
    pub total: Decimal,
}

impl Add for SlipAmounts {
    type Output = SlipAmounts;

    fn add(mut self, rhs: SlipAmounts) -> SlipAmounts {
        self += rhs;
        self
    }
}

/// Field-wise sum that saturates at `Decimal::MAX` instead of panicking.
impl AddAssign for SlipAmounts {
    fn add_assign(&mut self, rhs: SlipAmounts) {
        self.principal = self.principal.saturating_add(rhs.principal);
        self.penalty = self.penalty.saturating_add(rhs.penalty);
        self.interest = self.interest.saturating_add(rhs.interest);
        self.total = self.total.saturating_add(rhs.total);
    }
}

impl Sum for SlipAmounts {
    fn sum<I: Iterator<Item = SlipAmounts>>(iter: I) -> Self {
        iter.fold(SlipAmounts::default(), Add::add)
    }
}

impl<'a> Sum<&'a PaymentRecord> for SlipAmounts {
    fn sum<I: Iterator<Item = &'a PaymentRecord>>(iter: I) -> Self {
        iter.map(PaymentRecord::amounts).sum()
    }
}
