// Detection orchestrator
// Dispatches a freshly created record to the detectors for its kind, turns
// triggered verdicts into persisted anomalies, and accumulates a saturating
// risk score for this call. Failures on this path never reach the caller;
// the primary transaction takes priority over detection completeness.

use chrono::{Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use tillwatch_domain::services::{
    detect_amount_variance, detect_cash_variance, detect_duplicate_invoice,
    detect_duplicate_payment, detect_missing_info, detect_price_spike, detect_sales_variance,
    detect_unauthorized_account, recommendation_for, risk_increment, Verdict, MAX_RISK_SCORE,
};
use tillwatch_domain::{Anomaly, AnomalyType, EntityKind, StoreError};

use crate::dtos::DetectionOutcome;
use crate::AppState;

pub async fn detect_anomalies(
    state: &AppState,
    outlet_id: &str,
    entity: EntityKind,
    entity_id: &str,
) -> DetectionOutcome {
    state.metrics.record_detect_run();
    debug!(outlet_id, entity = entity.as_str(), entity_id, "running detection");

    match run_detection(state, outlet_id, entity, entity_id).await {
        Ok(Some(outcome)) => {
            state.metrics.record_anomalies(outcome.anomalies.len());
            outcome
        }
        Ok(None) => {
            // Subject entity not found in the store; nothing to inspect.
            debug!(entity_id, "detection subject not found");
            state.metrics.record_detect_degraded();
            DetectionOutcome::degraded()
        }
        Err(err) => {
            warn!(outlet_id, entity_id, "detection degraded: {}", err);
            state.metrics.record_detect_degraded();
            DetectionOutcome::degraded()
        }
    }
}

async fn run_detection(
    state: &AppState,
    outlet_id: &str,
    entity: EntityKind,
    entity_id: &str,
) -> Result<Option<DetectionOutcome>, StoreError> {
    match entity {
        EntityKind::Payment => detect_for_payment(state, outlet_id, entity_id).await,
        EntityKind::Invoice => detect_for_invoice(state, outlet_id, entity_id).await,
        EntityKind::EodReport => detect_for_eod_report(state, outlet_id, entity_id).await,
    }
}

async fn detect_for_payment(
    state: &AppState,
    outlet_id: &str,
    payment_id: &str,
) -> Result<Option<DetectionOutcome>, StoreError> {
    let Some(payment) = state.records.load_payment(payment_id).await? else {
        return Ok(None);
    };
    let now = Utc::now();
    let mut collector = Collector::new(state, outlet_id);

    let duplicate_window = state
        .records
        .payments_since(
            outlet_id,
            &payment.vendor_id,
            now - Duration::days(state.config.duplicate_payment_window_days),
            &payment.id,
        )
        .await?;
    collector
        .take(
            detect_duplicate_payment(&payment, &duplicate_window, &state.config),
            AnomalyType::DuplicatePayment,
            EntityKind::Payment,
            &payment.id,
        )
        .await;

    // A vendor that cannot be found counts as insufficient data for the
    // account check, not as a failure of the whole pass.
    if let Some(vendor) = state.records.load_vendor(&payment.vendor_id).await? {
        collector
            .take(
                detect_unauthorized_account(&payment, &vendor),
                AnomalyType::UnauthorizedAccount,
                EntityKind::Payment,
                &payment.id,
            )
            .await;
    }

    let variance_window = state
        .records
        .payments_since(
            outlet_id,
            &payment.vendor_id,
            now - Duration::days(state.config.payment_variance_window_days),
            &payment.id,
        )
        .await?;
    collector
        .take(
            detect_amount_variance(&payment, &variance_window, &state.config),
            AnomalyType::PriceSpike,
            EntityKind::Payment,
            &payment.id,
        )
        .await;

    Ok(Some(collector.finish()))
}

async fn detect_for_invoice(
    state: &AppState,
    outlet_id: &str,
    invoice_id: &str,
) -> Result<Option<DetectionOutcome>, StoreError> {
    let Some(invoice) = state.records.load_invoice(invoice_id).await? else {
        return Ok(None);
    };
    let now = Utc::now();
    let mut collector = Collector::new(state, outlet_id);

    if let Some(vendor_id) = invoice.vendor_id.clone() {
        let price_history = state
            .records
            .invoices_since(
                outlet_id,
                &vendor_id,
                now - Duration::days(state.config.invoice_history_window_days),
                &invoice.id,
            )
            .await?;
        collector
            .take(
                detect_price_spike(&invoice, &price_history, &state.config),
                AnomalyType::PriceSpike,
                EntityKind::Invoice,
                &invoice.id,
            )
            .await;

        let duplicate_window = state
            .records
            .invoices_since(
                outlet_id,
                &vendor_id,
                now - Duration::days(state.config.duplicate_invoice_window_days),
                &invoice.id,
            )
            .await?;
        collector
            .take(
                detect_duplicate_invoice(&invoice, &duplicate_window, &state.config),
                AnomalyType::DuplicatePayment,
                EntityKind::Invoice,
                &invoice.id,
            )
            .await;
    }

    collector
        .take(
            detect_missing_info(&invoice, &state.config),
            AnomalyType::MissingInfo,
            EntityKind::Invoice,
            &invoice.id,
        )
        .await;

    Ok(Some(collector.finish()))
}

async fn detect_for_eod_report(
    state: &AppState,
    outlet_id: &str,
    report_id: &str,
) -> Result<Option<DetectionOutcome>, StoreError> {
    let Some(report) = state.records.load_eod_report(report_id).await? else {
        return Ok(None);
    };
    let now = Utc::now();
    let mut collector = Collector::new(state, outlet_id);

    let history = state
        .records
        .reports_since(
            outlet_id,
            now - Duration::days(state.config.sales_window_days),
            &report.id,
        )
        .await?;
    collector
        .take(
            detect_sales_variance(&report, &history, &state.config),
            AnomalyType::EodMismatch,
            EntityKind::EodReport,
            &report.id,
        )
        .await;

    collector
        .take(
            detect_cash_variance(&report, &state.config),
            AnomalyType::EodMismatch,
            EntityKind::EodReport,
            &report.id,
        )
        .await;

    Ok(Some(collector.finish()))
}

/// Accumulates triggered verdicts into persisted anomalies, recommendations,
/// and the per-call saturating risk score.
struct Collector<'a> {
    state: &'a AppState,
    outlet_id: &'a str,
    anomalies: Vec<Anomaly>,
    recommendations: Vec<String>,
    risk_score: u32,
}

impl<'a> Collector<'a> {
    fn new(state: &'a AppState, outlet_id: &'a str) -> Self {
        Self {
            state,
            outlet_id,
            anomalies: Vec::new(),
            recommendations: Vec::new(),
            risk_score: 0,
        }
    }

    async fn take(
        &mut self,
        verdict: Verdict,
        anomaly_type: AnomalyType,
        related_entity: EntityKind,
        related_id: &str,
    ) {
        if !verdict.triggered {
            return;
        }

        let now = Utc::now();
        let anomaly = Anomaly {
            id: Uuid::new_v4().to_string(),
            outlet_id: self.outlet_id.to_string(),
            anomaly_type,
            related_entity,
            related_id: related_id.to_string(),
            description: verdict.reason.clone(),
            severity: verdict.severity,
            confidence: verdict.confidence,
            detected_at: now,
            created_at: now,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
            resolution_notes: None,
        };

        // A failed insert is absorbed; the caller still gets the finding,
        // it just is not persisted.
        if let Err(err) = self.state.anomalies.insert(&anomaly).await {
            warn!(anomaly_id = %anomaly.id, "failed to persist anomaly: {}", err);
        }

        self.risk_score = (self.risk_score
            + risk_increment(anomaly_type, verdict.severity, &self.state.config))
        .min(MAX_RISK_SCORE);
        self.recommendations
            .push(recommendation_for(anomaly_type).to_string());
        self.anomalies.push(anomaly);
    }

    fn finish(self) -> DetectionOutcome {
        DetectionOutcome {
            anomalies: self.anomalies,
            risk_score: self.risk_score,
            recommendations: self.recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate};
    use tillwatch_domain::ports::AnomalyRepository;
    use tillwatch_domain::{DetectionConfig, EodReport, Invoice, Payment, Severity, Vendor};
    use tillwatch_infrastructure::MemoryStore;

    use super::*;

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        AppState::new(DetectionConfig::default(), store.clone(), store)
    }

    fn payment(id: &str, amount: f64, hours_ago: i64) -> Payment {
        Payment {
            id: id.to_string(),
            outlet_id: "o1".to_string(),
            vendor_id: "v1".to_string(),
            amount,
            account_ref: None,
            paid_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    fn invoice(id: &str, number: &str, total: f64, days_ago: i64) -> Invoice {
        Invoice {
            id: id.to_string(),
            outlet_id: "o1".to_string(),
            vendor_id: Some("v1".to_string()),
            invoice_number: Some(number.to_string()),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15),
            total_amount: Some(total),
            issued_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[tokio::test]
    async fn duplicate_payment_is_flagged_and_persisted() {
        let store = Arc::new(MemoryStore::new());
        store.put_payment(payment("p1", 50.0, 24)).await;
        store.put_payment(payment("p2", 50.0, 0)).await;
        store
            .put_vendor(Vendor {
                id: "v1".to_string(),
                outlet_id: "o1".to_string(),
                name: "Acme".to_string(),
                settlement_account: None,
            })
            .await;
        let state = state_with(store.clone());

        let outcome = detect_anomalies(&state, "o1", EntityKind::Payment, "p2").await;
        assert_eq!(outcome.anomalies.len(), 1);
        let finding = &outcome.anomalies[0];
        assert_eq!(finding.anomaly_type, AnomalyType::DuplicatePayment);
        assert_eq!(finding.confidence, 95);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(outcome.risk_score, 30);
        assert_eq!(outcome.recommendations.len(), 1);

        let stored = store.load(&finding.id).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn clean_payment_produces_empty_outcome() {
        let store = Arc::new(MemoryStore::new());
        store.put_payment(payment("p1", 50.0, 0)).await;
        let state = state_with(store);

        let outcome = detect_anomalies(&state, "o1", EntityKind::Payment, "p1").await;
        assert!(outcome.anomalies.is_empty());
        assert_eq!(outcome.risk_score, 0);
        assert!(outcome.recommendations.is_empty());
    }

    #[tokio::test]
    async fn store_outage_degrades_instead_of_failing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let store = Arc::new(MemoryStore::new());
        store.put_payment(payment("p1", 50.0, 0)).await;
        store.set_unavailable(true);
        let state = state_with(store);

        let outcome = detect_anomalies(&state, "o1", EntityKind::Payment, "p1").await;
        assert!(outcome.anomalies.is_empty());
        assert_eq!(outcome.risk_score, 0);
        assert_eq!(outcome.recommendations.len(), 1);
        assert!(outcome.recommendations[0].contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn unknown_entity_degrades() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(store);

        let outcome = detect_anomalies(&state, "o1", EntityKind::Invoice, "missing").await;
        assert!(outcome.anomalies.is_empty());
        assert_eq!(outcome.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn price_spike_scenario_flags_high() {
        let store = Arc::new(MemoryStore::new());
        store.put_invoice(invoice("i1", "INV-1", 100.0, 10)).await;
        store.put_invoice(invoice("i2", "INV-2", 105.0, 20)).await;
        store.put_invoice(invoice("i3", "INV-3", 98.0, 30)).await;
        store.put_invoice(invoice("i4", "INV-4", 250.0, 0)).await;
        let state = state_with(store);

        let outcome = detect_anomalies(&state, "o1", EntityKind::Invoice, "i4").await;
        let spike = outcome
            .anomalies
            .iter()
            .find(|a| a.anomaly_type == AnomalyType::PriceSpike)
            .expect("price spike finding");
        assert_eq!(spike.severity, Severity::High);
        assert_eq!(spike.confidence, 95);
    }

    #[tokio::test]
    async fn cash_discrepancy_flags_eod_mismatch() {
        let store = Arc::new(MemoryStore::new());
        store
            .put_eod_report(EodReport {
                id: "r1".to_string(),
                outlet_id: "o1".to_string(),
                report_date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
                total_sales: 1200.0,
                cash_discrepancy: -650.0,
                created_at: Utc::now(),
            })
            .await;
        let state = state_with(store);

        let outcome = detect_anomalies(&state, "o1", EntityKind::EodReport, "r1").await;
        assert_eq!(outcome.anomalies.len(), 1);
        assert_eq!(outcome.anomalies[0].anomaly_type, AnomalyType::EodMismatch);
        assert_eq!(outcome.anomalies[0].severity, Severity::High);
        assert_eq!(outcome.risk_score, 15);
    }

    #[tokio::test]
    async fn risk_score_saturates_within_one_call() {
        let store = Arc::new(MemoryStore::new());
        // Duplicate (30) + unauthorized account (15) + variance cannot push
        // the per-call score past 100 however the thresholds are tuned.
        store.put_payment(payment("p1", 50.0, 24)).await;
        let mut candidate = payment("p2", 50.0, 0);
        candidate.account_ref = Some("****9999".to_string());
        store.put_payment(candidate).await;
        store
            .put_vendor(Vendor {
                id: "v1".to_string(),
                outlet_id: "o1".to_string(),
                name: "Acme".to_string(),
                settlement_account: Some("DE00 1234".to_string()),
            })
            .await;
        let state = state_with(store);

        let outcome = detect_anomalies(&state, "o1", EntityKind::Payment, "p2").await;
        assert!(outcome.risk_score <= 100);
        assert_eq!(outcome.anomalies.len(), 2);
        assert_eq!(outcome.risk_score, 45);
    }
}
