// Anomaly resolution
// The one mutation an anomaly ever receives. Unlike the detection path,
// failures here surface to the operator; they need to know resolution did
// not take effect.

use chrono::Utc;
use tracing::error;

use crate::{AppError, AppState};

pub async fn resolve_anomaly(
    state: &AppState,
    anomaly_id: &str,
    resolved_by: &str,
    resolution_notes: &str,
) -> Result<(), AppError> {
    if resolution_notes.trim().is_empty() {
        return Err(AppError::BadRequest(
            "resolution notes must not be empty".to_string(),
        ));
    }

    let anomaly = state
        .anomalies
        .load(anomaly_id)
        .await
        .map_err(|err| {
            error!(anomaly_id, "failed to load anomaly: {}", err);
            AppError::Internal(err.into())
        })?
        .ok_or_else(|| AppError::NotFound(format!("anomaly {}", anomaly_id)))?;

    if anomaly.resolved {
        return Err(AppError::BadRequest(
            "anomaly is already resolved".to_string(),
        ));
    }

    state
        .anomalies
        .mark_resolved(anomaly_id, resolved_by, resolution_notes, Utc::now())
        .await
        .map_err(|err| {
            error!(anomaly_id, "failed to resolve anomaly: {}", err);
            AppError::Internal(err.into())
        })?;

    state.metrics.record_resolution();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tillwatch_domain::{
        Anomaly, AnomalyType, DetectionConfig, EntityKind, Severity,
    };
    use tillwatch_infrastructure::MemoryStore;

    use super::*;

    async fn seeded_state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let anomaly = Anomaly {
            id: "a1".to_string(),
            outlet_id: "o1".to_string(),
            anomaly_type: AnomalyType::DuplicatePayment,
            related_entity: EntityKind::Payment,
            related_id: "p1".to_string(),
            description: "test".to_string(),
            severity: Severity::High,
            confidence: 95,
            detected_at: now,
            created_at: now,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
            resolution_notes: None,
        };
        tillwatch_domain::ports::AnomalyRepository::insert(store.as_ref(), &anomaly)
            .await
            .unwrap();
        let state = AppState::new(DetectionConfig::default(), store.clone(), store.clone());
        (state, store)
    }

    #[tokio::test]
    async fn resolve_sets_fields_once() {
        let (state, store) = seeded_state().await;
        resolve_anomaly(&state, "a1", "manager-3", "vendor confirmed both deliveries")
            .await
            .unwrap();

        let stored = tillwatch_domain::ports::AnomalyRepository::load(store.as_ref(), "a1")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.resolved);
        assert_eq!(stored.resolved_by.as_deref(), Some("manager-3"));
    }

    #[tokio::test]
    async fn blank_notes_are_rejected() {
        let (state, _store) = seeded_state().await;
        let err = resolve_anomaly(&state, "a1", "manager-3", "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn double_resolution_is_rejected() {
        let (state, _store) = seeded_state().await;
        resolve_anomaly(&state, "a1", "manager-3", "checked").await.unwrap();
        let err = resolve_anomaly(&state, "a1", "manager-4", "checked again")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_anomaly_is_not_found() {
        let (state, _store) = seeded_state().await;
        let err = resolve_anomaly(&state, "nope", "manager-3", "notes")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_surfaces_to_the_operator() {
        let (state, store) = seeded_state().await;
        store.set_unavailable(true);
        let err = resolve_anomaly(&state, "a1", "manager-3", "notes")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
