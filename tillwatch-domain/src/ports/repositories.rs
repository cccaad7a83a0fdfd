use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{Anomaly, AnomalyFilter, EodReport, Invoice, Payment, Vendor};

/// Failure of the backing record store itself. Distinct from "not found",
/// which loads express as `Ok(None)`; callers need that difference to tell
/// insufficient data apart from a store outage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Read access to the hosted record store. Window queries carry no ordering
/// guarantee; callers sort when they need chronology.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    async fn load_payment(&self, id: &str) -> Result<Option<Payment>, StoreError>;
    async fn load_invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError>;
    async fn load_eod_report(&self, id: &str) -> Result<Option<EodReport>, StoreError>;
    async fn load_vendor(&self, id: &str) -> Result<Option<Vendor>, StoreError>;

    /// Payments for one vendor in one outlet since `since`, excluding the
    /// candidate record itself.
    async fn payments_since(
        &self,
        outlet_id: &str,
        vendor_id: &str,
        since: DateTime<Utc>,
        exclude_id: &str,
    ) -> Result<Vec<Payment>, StoreError>;

    async fn invoices_since(
        &self,
        outlet_id: &str,
        vendor_id: &str,
        since: DateTime<Utc>,
        exclude_id: &str,
    ) -> Result<Vec<Invoice>, StoreError>;

    /// EOD reports for one outlet since `since`, excluding the candidate.
    async fn reports_since(
        &self,
        outlet_id: &str,
        since: DateTime<Utc>,
        exclude_id: &str,
    ) -> Result<Vec<EodReport>, StoreError>;
}

#[async_trait]
pub trait AnomalyRepository: Send + Sync {
    async fn insert(&self, anomaly: &Anomaly) -> Result<(), StoreError>;
    async fn load(&self, id: &str) -> Result<Option<Anomaly>, StoreError>;
    async fn mark_resolved(
        &self,
        id: &str,
        resolved_by: &str,
        notes: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    async fn fetch(
        &self,
        outlet_id: &str,
        filter: &AnomalyFilter,
    ) -> Result<Vec<Anomaly>, StoreError>;
}
