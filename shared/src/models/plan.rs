//! Membership plan models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plan code entered by the frontend when the membership amount is typed
/// in manually instead of picked from a stored plan.
pub const CUSTOM_PLAN_CODE: &str = "CUSTOM";

/// Plan code of the personal-trainer add-on. Must exist and be active for
/// invoices that include a trainer line.
pub const PERSONAL_TRAINER_PLAN_CODE: &str = "PT_20_SESSIONS";

/// A membership plan offered by the gym
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub duration_days: Option<i32>,
    pub base_amount: Decimal,
    pub is_taxable: bool,
    /// Combined GST percentage applied to the base amount
    pub gst_rate: Decimal,
    pub is_active: bool,
}
