// In-memory record store
// Reference adapter for local development and tests. Iteration order of the
// underlying maps is unordered, matching the "no ordering guarantee" of the
// gateway contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use tillwatch_domain::ports::{AnomalyRepository, RecordGateway, StoreError};
use tillwatch_domain::{Anomaly, AnomalyFilter, EodReport, Invoice, Payment, Vendor};

#[derive(Default)]
pub struct MemoryStore {
    payments: RwLock<HashMap<String, Payment>>,
    invoices: RwLock<HashMap<String, Invoice>>,
    reports: RwLock<HashMap<String, EodReport>>,
    vendors: RwLock<HashMap<String, Vendor>>,
    anomalies: RwLock<HashMap<String, Anomaly>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a store outage; every subsequent call fails with
    /// `StoreError::Unavailable` until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn put_payment(&self, payment: Payment) {
        self.payments
            .write()
            .await
            .insert(payment.id.clone(), payment);
    }

    pub async fn put_invoice(&self, invoice: Invoice) {
        self.invoices
            .write()
            .await
            .insert(invoice.id.clone(), invoice);
    }

    pub async fn put_eod_report(&self, report: EodReport) {
        self.reports.write().await.insert(report.id.clone(), report);
    }

    pub async fn put_vendor(&self, vendor: Vendor) {
        self.vendors.write().await.insert(vendor.id.clone(), vendor);
    }
}

#[async_trait]
impl RecordGateway for MemoryStore {
    async fn load_payment(&self, id: &str) -> Result<Option<Payment>, StoreError> {
        self.check_available()?;
        Ok(self.payments.read().await.get(id).cloned())
    }

    async fn load_invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError> {
        self.check_available()?;
        Ok(self.invoices.read().await.get(id).cloned())
    }

    async fn load_eod_report(&self, id: &str) -> Result<Option<EodReport>, StoreError> {
        self.check_available()?;
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn load_vendor(&self, id: &str) -> Result<Option<Vendor>, StoreError> {
        self.check_available()?;
        Ok(self.vendors.read().await.get(id).cloned())
    }

    async fn payments_since(
        &self,
        outlet_id: &str,
        vendor_id: &str,
        since: DateTime<Utc>,
        exclude_id: &str,
    ) -> Result<Vec<Payment>, StoreError> {
        self.check_available()?;
        Ok(self
            .payments
            .read()
            .await
            .values()
            .filter(|p| {
                p.outlet_id == outlet_id
                    && p.vendor_id == vendor_id
                    && p.paid_at >= since
                    && p.id != exclude_id
            })
            .cloned()
            .collect())
    }

    async fn invoices_since(
        &self,
        outlet_id: &str,
        vendor_id: &str,
        since: DateTime<Utc>,
        exclude_id: &str,
    ) -> Result<Vec<Invoice>, StoreError> {
        self.check_available()?;
        Ok(self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| {
                i.outlet_id == outlet_id
                    && i.vendor_id.as_deref() == Some(vendor_id)
                    && i.issued_at >= since
                    && i.id != exclude_id
            })
            .cloned()
            .collect())
    }

    async fn reports_since(
        &self,
        outlet_id: &str,
        since: DateTime<Utc>,
        exclude_id: &str,
    ) -> Result<Vec<EodReport>, StoreError> {
        self.check_available()?;
        Ok(self
            .reports
            .read()
            .await
            .values()
            .filter(|r| r.outlet_id == outlet_id && r.created_at >= since && r.id != exclude_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AnomalyRepository for MemoryStore {
    async fn insert(&self, anomaly: &Anomaly) -> Result<(), StoreError> {
        self.check_available()?;
        self.anomalies
            .write()
            .await
            .insert(anomaly.id.clone(), anomaly.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Anomaly>, StoreError> {
        self.check_available()?;
        Ok(self.anomalies.read().await.get(id).cloned())
    }

    async fn mark_resolved(
        &self,
        id: &str,
        resolved_by: &str,
        notes: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut anomalies = self.anomalies.write().await;
        let anomaly = anomalies
            .get_mut(id)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("anomaly {} not found", id)))?;
        anomaly.resolved = true;
        anomaly.resolved_by = Some(resolved_by.to_string());
        anomaly.resolution_notes = Some(notes.to_string());
        anomaly.resolved_at = Some(at);
        Ok(())
    }

    async fn fetch(
        &self,
        outlet_id: &str,
        filter: &AnomalyFilter,
    ) -> Result<Vec<Anomaly>, StoreError> {
        self.check_available()?;
        Ok(self
            .anomalies
            .read()
            .await
            .values()
            .filter(|a| a.outlet_id == outlet_id && filter.matches(a))
            .cloned()
            .collect())
    }
}
