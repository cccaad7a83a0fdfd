use std::sync::Arc;

use tillwatch_domain::ports::{AnomalyRepository, RecordGateway};
use tillwatch_domain::DetectionConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: DetectionConfig,
    pub records: Arc<dyn RecordGateway>,
    pub anomalies: Arc<dyn AnomalyRepository>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: DetectionConfig,
        records: Arc<dyn RecordGateway>,
        anomalies: Arc<dyn AnomalyRepository>,
    ) -> Self {
        Self {
            config,
            records,
            anomalies,
            metrics: Arc::new(Metrics::default()),
        }
    }
}
