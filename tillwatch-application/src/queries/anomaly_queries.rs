use tracing::error;

use tillwatch_domain::{Anomaly, AnomalyFilter};

use crate::{AppError, AppState};

/// Lists an outlet's anomalies, newest first. The store carries no ordering
/// guarantee, so the sort happens here.
pub async fn list_anomalies(
    state: &AppState,
    outlet_id: &str,
    filter: AnomalyFilter,
) -> Result<Vec<Anomaly>, AppError> {
    let mut rows = state
        .anomalies
        .fetch(outlet_id, &filter)
        .await
        .map_err(|err| {
            error!(outlet_id, "failed to fetch anomalies: {}", err);
            AppError::Internal(err.into())
        })?;
    rows.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
    Ok(rows)
}
