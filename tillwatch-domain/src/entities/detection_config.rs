// Detection configuration
// Every detector threshold lives here so outlets can tune them and tests
// can pin them; no magic numbers inside detector logic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    // Duplicate payment
    pub duplicate_payment_window_days: i64,
    pub duplicate_exact_tolerance: f64,
    pub duplicate_exact_window_hours: i64,
    pub duplicate_exact_confidence: u8,
    pub duplicate_near_pct: f64,
    pub duplicate_near_confidence: u8,
    /// Risk increments for duplicate-payment findings (high / non-high).
    pub duplicate_risk_high: u32,
    pub duplicate_risk_medium: u32,

    // Payment amount variance
    pub payment_variance_window_days: i64,
    pub payment_variance_high: f64,
    pub payment_variance_medium: f64,

    // Invoice price spike
    pub invoice_history_window_days: i64,
    pub invoice_history_cap: usize,
    pub price_spike_trigger_pct: f64,
    pub price_spike_medium_pct: f64,
    pub price_spike_high_pct: f64,
    pub price_spike_max_confidence: u8,

    // Duplicate invoice
    pub duplicate_invoice_window_days: i64,

    // Missing invoice information
    pub missing_info_confidence: u8,
    /// Missing-field count at which severity becomes medium.
    pub missing_info_medium_at: usize,

    // EOD sales variance
    pub sales_window_days: i64,
    pub sales_min_history: usize,
    pub sales_variance_trigger_pct: f64,
    pub sales_variance_high_pct: f64,
    pub sales_variance_confidence: u8,

    // EOD cash variance
    pub cash_variance_trigger: f64,
    pub cash_variance_medium: f64,
    pub cash_variance_high: f64,
    pub cash_variance_confidence: u8,

    /// Minimum comparables a variance detector needs before it may trigger.
    pub min_comparables: usize,

    pub risk_weights: RiskWeights,
}

/// Severity-weighted risk constants used by the aggregator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl RiskWeights {
    pub fn for_severity(&self, severity: crate::value_objects::Severity) -> u32 {
        use crate::value_objects::Severity;
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            low: 3,
            medium: 8,
            high: 15,
            critical: 25,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            duplicate_payment_window_days: 3,
            duplicate_exact_tolerance: 0.01,
            duplicate_exact_window_hours: 24,
            duplicate_exact_confidence: 95,
            duplicate_near_pct: 5.0,
            duplicate_near_confidence: 75,
            duplicate_risk_high: 30,
            duplicate_risk_medium: 20,

            payment_variance_window_days: 30,
            payment_variance_high: 2.0,
            payment_variance_medium: 1.0,

            invoice_history_window_days: 180,
            invoice_history_cap: 20,
            price_spike_trigger_pct: 30.0,
            price_spike_medium_pct: 50.0,
            price_spike_high_pct: 100.0,
            price_spike_max_confidence: 95,

            duplicate_invoice_window_days: 7,

            missing_info_confidence: 90,
            missing_info_medium_at: 2,

            sales_window_days: 30,
            sales_min_history: 7,
            sales_variance_trigger_pct: 50.0,
            sales_variance_high_pct: 100.0,
            sales_variance_confidence: 85,

            cash_variance_trigger: 100.0,
            cash_variance_medium: 200.0,
            cash_variance_high: 500.0,
            cash_variance_confidence: 90,

            min_comparables: 3,

            risk_weights: RiskWeights::default(),
        }
    }
}
