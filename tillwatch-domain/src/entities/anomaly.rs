// Anomaly entity
// A persisted finding that a business record deviates from an expected
// pattern. Created only by the detection orchestrator, mutated exactly once
// by resolution, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AnomalyType, EntityKind, Severity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: String,
    pub outlet_id: String,
    pub anomaly_type: AnomalyType,
    pub related_entity: EntityKind,
    pub related_id: String,
    /// Human-readable explanation including the quantitative basis.
    pub description: String,
    pub severity: Severity,
    /// Detector confidence in the finding, 0-100.
    pub confidence: u8,
    pub detected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
}

/// Filter for listing anomalies; every field is optional and conjunctive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyFilter {
    pub anomaly_type: Option<AnomalyType>,
    pub severity: Option<Severity>,
    pub resolved: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl AnomalyFilter {
    pub fn matches(&self, anomaly: &Anomaly) -> bool {
        if let Some(kind) = self.anomaly_type {
            if anomaly.anomaly_type != kind {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if anomaly.severity != severity {
                return false;
            }
        }
        if let Some(resolved) = self.resolved {
            if anomaly.resolved != resolved {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if anomaly.detected_at < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if anomaly.detected_at > to {
                return false;
            }
        }
        true
    }
}
