// Outlet statistics
// Derived on demand from the anomaly set; never persisted. Recomputation
// must be idempotent and side-effect free.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::{Anomaly, DetectionConfig};
use crate::services::aggregate_risk_score;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutletStats {
    pub outlet_id: String,
    pub window_days: i64,
    pub total: u64,
    pub resolved: u64,
    pub unresolved: u64,
    pub by_type: BTreeMap<&'static str, u64>,
    pub by_severity: BTreeMap<&'static str, u64>,
    /// Percentage of anomalies resolved; 0.0 when no anomalies exist.
    pub resolution_rate: f64,
    pub risk_score: u32,
}

impl OutletStats {
    pub fn compute(
        outlet_id: &str,
        window_days: i64,
        anomalies: &[Anomaly],
        config: &DetectionConfig,
    ) -> Self {
        let total = anomalies.len() as u64;
        let resolved = anomalies.iter().filter(|a| a.resolved).count() as u64;

        let mut by_type = BTreeMap::new();
        let mut by_severity = BTreeMap::new();
        for anomaly in anomalies {
            *by_type.entry(anomaly.anomaly_type.as_str()).or_insert(0) += 1;
            *by_severity.entry(anomaly.severity.as_str()).or_insert(0) += 1;
        }

        let resolution_rate = if total == 0 {
            0.0
        } else {
            resolved as f64 / total as f64 * 100.0
        };

        Self {
            outlet_id: outlet_id.to_string(),
            window_days,
            total,
            resolved,
            unresolved: total - resolved,
            by_type,
            by_severity,
            resolution_rate,
            risk_score: aggregate_risk_score(anomalies, config),
        }
    }
}
