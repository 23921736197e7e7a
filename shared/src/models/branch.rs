//! Branch (gym location) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A gym branch. The system runs single-branch today but every record is
/// branch-scoped so a second location does not collide with the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// GST registration number printed on invoices
    pub gstin: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Branch fields embedded in an invoice response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub gstin: Option<String>,
    pub logo_url: Option<String>,
}
