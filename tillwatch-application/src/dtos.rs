// Application DTOs

use serde::Serialize;

use tillwatch_domain::Anomaly;

/// Result of one detection pass. `risk_score` is the saturating sum of the
/// increments produced in this call only, NOT the outlet's aggregate risk;
/// that lives on the stats/aggregator path.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionOutcome {
    pub anomalies: Vec<Anomaly>,
    pub risk_score: u32,
    pub recommendations: Vec<String>,
}

impl DetectionOutcome {
    /// Fail-soft payload returned when detection cannot run; the caller's
    /// transaction must not be blocked by a detection outage.
    pub fn degraded() -> Self {
        Self {
            anomalies: Vec::new(),
            risk_score: 0,
            recommendations: vec![
                "Anomaly detection temporarily unavailable; records were saved normally."
                    .to_string(),
            ],
        }
    }
}
