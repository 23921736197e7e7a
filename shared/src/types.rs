//! Common enums shared between backend and clients

use serde::{Deserialize, Serialize};

/// Role attached to a login session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionRole {
    Admin,
    Staff,
}

impl SessionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRole::Admin => "ADMIN",
            SessionRole::Staff => "STAFF",
        }
    }
}

impl std::str::FromStr for SessionRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(SessionRole::Admin),
            "STAFF" => Ok(SessionRole::Staff),
            other => Err(format!("unknown session role: {}", other)),
        }
    }
}

/// What an invoice line is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceItemType {
    Membership,
    RegistrationFee,
    PersonalTrainer,
}

impl InvoiceItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceItemType::Membership => "MEMBERSHIP",
            InvoiceItemType::RegistrationFee => "REGISTRATION_FEE",
            InvoiceItemType::PersonalTrainer => "PERSONAL_TRAINER",
        }
    }
}

impl std::str::FromStr for InvoiceItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBERSHIP" => Ok(InvoiceItemType::Membership),
            "REGISTRATION_FEE" => Ok(InvoiceItemType::RegistrationFee),
            "PERSONAL_TRAINER" => Ok(InvoiceItemType::PersonalTrainer),
            other => Err(format!("unknown invoice item type: {}", other)),
        }
    }
}

/// How a shop sale was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Upi,
    Split,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
            PaymentMode::Split => "SPLIT",
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentMode::Cash),
            "UPI" => Ok(PaymentMode::Upi),
            "SPLIT" => Ok(PaymentMode::Split),
            other => Err(format!("unknown payment mode: {}", other)),
        }
    }
}

/// Reporting period granularity for sales history and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    #[default]
    Day,
    Week,
    Month,
}
