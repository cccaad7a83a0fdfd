// Risk scoring
// The aggregate score is a pure function of currently unresolved anomalies;
// it saturates at 100 and resolving an anomaly can only lower it.

use crate::entities::{Anomaly, DetectionConfig};
use crate::value_objects::{AnomalyType, Severity};

pub const MAX_RISK_SCORE: u32 = 100;

/// Per-finding risk increment used by the orchestrator's saturating
/// accumulator. Duplicate payments carry their own table; every other
/// finding contributes its severity's weight.
pub fn risk_increment(
    anomaly_type: AnomalyType,
    severity: Severity,
    config: &DetectionConfig,
) -> u32 {
    match anomaly_type {
        AnomalyType::DuplicatePayment => {
            if severity >= Severity::High {
                config.duplicate_risk_high
            } else {
                config.duplicate_risk_medium
            }
        }
        _ => config.risk_weights.for_severity(severity),
    }
}

/// Severity-weighted sum over unresolved anomalies, saturating at 100.
pub fn aggregate_risk_score(anomalies: &[Anomaly], config: &DetectionConfig) -> u32 {
    let total: u32 = anomalies
        .iter()
        .filter(|a| !a.resolved)
        .map(|a| config.risk_weights.for_severity(a.severity))
        .sum();
    total.min(MAX_RISK_SCORE)
}

/// Remediation advice shown alongside a finding.
pub fn recommendation_for(anomaly_type: AnomalyType) -> &'static str {
    match anomaly_type {
        AnomalyType::DuplicatePayment => {
            "Review recent payments to this vendor for a double entry before approving."
        }
        AnomalyType::PriceSpike => {
            "Compare the invoice against the vendor's price list and confirm the order."
        }
        AnomalyType::MissingInfo => {
            "Request a corrected invoice with all required fields filled in."
        }
        AnomalyType::UnauthorizedAccount => {
            "Verify the payment account with the vendor through a known contact."
        }
        AnomalyType::SupplyGap => {
            "Check delivery records against the ordering schedule for this vendor."
        }
        AnomalyType::EodMismatch => {
            "Recount the till and reconcile the day's sales before closing out."
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::value_objects::EntityKind;

    fn anomaly(severity: Severity, resolved: bool) -> Anomaly {
        let now = Utc::now();
        Anomaly {
            id: "a".to_string(),
            outlet_id: "o1".to_string(),
            anomaly_type: AnomalyType::EodMismatch,
            related_entity: EntityKind::EodReport,
            related_id: "r1".to_string(),
            description: String::new(),
            severity,
            confidence: 85,
            detected_at: now,
            created_at: now,
            resolved,
            resolved_by: None,
            resolved_at: None,
            resolution_notes: None,
        }
    }

    #[test]
    fn duplicate_payment_uses_its_own_increments() {
        let config = DetectionConfig::default();
        assert_eq!(
            risk_increment(AnomalyType::DuplicatePayment, Severity::High, &config),
            30
        );
        assert_eq!(
            risk_increment(AnomalyType::DuplicatePayment, Severity::Medium, &config),
            20
        );
        assert_eq!(risk_increment(AnomalyType::PriceSpike, Severity::High, &config), 15);
    }

    #[test]
    fn score_counts_only_unresolved() {
        let config = DetectionConfig::default();
        let anomalies = vec![
            anomaly(Severity::Critical, false),
            anomaly(Severity::High, true),
            anomaly(Severity::Low, false),
        ];
        assert_eq!(aggregate_risk_score(&anomalies, &config), 28);
    }

    #[test]
    fn score_saturates_at_100() {
        let config = DetectionConfig::default();
        let anomalies: Vec<Anomaly> =
            (0..10).map(|_| anomaly(Severity::Critical, false)).collect();
        assert_eq!(aggregate_risk_score(&anomalies, &config), 100);
    }

    #[test]
    fn resolving_never_raises_the_score() {
        let config = DetectionConfig::default();
        let mut anomalies = vec![
            anomaly(Severity::High, false),
            anomaly(Severity::Medium, false),
            anomaly(Severity::Low, false),
        ];
        let before = aggregate_risk_score(&anomalies, &config);
        anomalies[0].resolved = true;
        let after = aggregate_risk_score(&anomalies, &config);
        assert!(after <= before);
    }
}
