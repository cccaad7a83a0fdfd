use chrono::{Duration, Utc};
use tracing::error;

use tillwatch_domain::services::aggregate_risk_score;
use tillwatch_domain::{AnomalyFilter, OutletStats};

use crate::{AppError, AppState};

pub const DEFAULT_STATS_WINDOW_DAYS: i64 = 30;

/// Outlet summary over a trailing window; derived on demand, never stored.
pub async fn outlet_stats(
    state: &AppState,
    outlet_id: &str,
    window_days: i64,
) -> Result<OutletStats, AppError> {
    let anomalies = fetch_window(state, outlet_id, window_days).await?;
    Ok(OutletStats::compute(
        outlet_id,
        window_days,
        &anomalies,
        &state.config,
    ))
}

/// The aggregator path: severity-weighted sum over unresolved anomalies
/// detected within the window, saturating at 100.
pub async fn risk_score(
    state: &AppState,
    outlet_id: &str,
    window_days: i64,
) -> Result<u32, AppError> {
    let anomalies = fetch_window(state, outlet_id, window_days).await?;
    Ok(aggregate_risk_score(&anomalies, &state.config))
}

async fn fetch_window(
    state: &AppState,
    outlet_id: &str,
    window_days: i64,
) -> Result<Vec<tillwatch_domain::Anomaly>, AppError> {
    let filter = AnomalyFilter {
        date_from: Some(Utc::now() - Duration::days(window_days)),
        ..Default::default()
    };
    state
        .anomalies
        .fetch(outlet_id, &filter)
        .await
        .map_err(|err| {
            error!(outlet_id, "failed to fetch anomaly window: {}", err);
            AppError::Internal(err.into())
        })
}
