//! Data models: payment records, company profile and configuration.

pub mod company;
pub mod config;
pub mod payment;

pub use company::CompanyProfile;
pub use config::DarfConfig;
pub use payment::{PaymentRecord, SlipAmounts};
