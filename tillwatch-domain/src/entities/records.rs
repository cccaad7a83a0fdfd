// Business record entities
// Read-only inputs owned by the hosted record store; the engine never
// mutates them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub outlet_id: String,
    pub vendor_id: String,
    pub amount: f64,
    /// Account reference as entered at payment time; may be masked or partial.
    pub account_ref: Option<String>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub outlet_id: String,
    pub vendor_id: Option<String>,
    pub invoice_number: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub total_amount: Option<f64>,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EodReport {
    pub id: String,
    pub outlet_id: String,
    pub report_date: NaiveDate,
    pub total_sales: f64,
    /// Recorded difference between counted and expected cash, in currency units.
    pub cash_discrepancy: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub outlet_id: String,
    pub name: String,
    pub settlement_account: Option<String>,
}
