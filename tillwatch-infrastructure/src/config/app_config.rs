use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use tillwatch_domain::{DetectionConfig, RiskWeights};

/// File-backed engine configuration. Every detector threshold can be tuned
/// per deployment; missing fields fall back to the built-in defaults, and a
/// handful of operationally relevant knobs accept env overrides.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub duplicate_payment_window_days: i64,
    pub duplicate_exact_tolerance: f64,
    pub duplicate_exact_window_hours: i64,
    pub duplicate_exact_confidence: u8,
    pub duplicate_near_pct: f64,
    pub duplicate_near_confidence: u8,
    pub duplicate_risk_high: u32,
    pub duplicate_risk_medium: u32,

    pub payment_variance_window_days: i64,
    pub payment_variance_high: f64,
    pub payment_variance_medium: f64,

    pub invoice_history_window_days: i64,
    pub invoice_history_cap: usize,
    pub price_spike_trigger_pct: f64,
    pub price_spike_medium_pct: f64,
    pub price_spike_high_pct: f64,
    pub price_spike_max_confidence: u8,

    pub duplicate_invoice_window_days: i64,

    pub missing_info_confidence: u8,
    pub missing_info_medium_at: usize,

    pub sales_window_days: i64,
    pub sales_min_history: usize,
    pub sales_variance_trigger_pct: f64,
    pub sales_variance_high_pct: f64,
    pub sales_variance_confidence: u8,

    pub cash_variance_trigger: f64,
    pub cash_variance_medium: f64,
    pub cash_variance_high: f64,
    pub cash_variance_confidence: u8,

    pub min_comparables: usize,

    pub risk_weight_low: u32,
    pub risk_weight_medium: u32,
    pub risk_weight_high: u32,
    pub risk_weight_critical: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let detection = DetectionConfig::default();
        Self {
            duplicate_payment_window_days: detection.duplicate_payment_window_days,
            duplicate_exact_tolerance: detection.duplicate_exact_tolerance,
            duplicate_exact_window_hours: detection.duplicate_exact_window_hours,
            duplicate_exact_confidence: detection.duplicate_exact_confidence,
            duplicate_near_pct: detection.duplicate_near_pct,
            duplicate_near_confidence: detection.duplicate_near_confidence,
            duplicate_risk_high: detection.duplicate_risk_high,
            duplicate_risk_medium: detection.duplicate_risk_medium,

            payment_variance_window_days: detection.payment_variance_window_days,
            payment_variance_high: detection.payment_variance_high,
            payment_variance_medium: detection.payment_variance_medium,

            invoice_history_window_days: detection.invoice_history_window_days,
            invoice_history_cap: detection.invoice_history_cap,
            price_spike_trigger_pct: detection.price_spike_trigger_pct,
            price_spike_medium_pct: detection.price_spike_medium_pct,
            price_spike_high_pct: detection.price_spike_high_pct,
            price_spike_max_confidence: detection.price_spike_max_confidence,

            duplicate_invoice_window_days: detection.duplicate_invoice_window_days,

            missing_info_confidence: detection.missing_info_confidence,
            missing_info_medium_at: detection.missing_info_medium_at,

            sales_window_days: detection.sales_window_days,
            sales_min_history: detection.sales_min_history,
            sales_variance_trigger_pct: detection.sales_variance_trigger_pct,
            sales_variance_high_pct: detection.sales_variance_high_pct,
            sales_variance_confidence: detection.sales_variance_confidence,

            cash_variance_trigger: detection.cash_variance_trigger,
            cash_variance_medium: detection.cash_variance_medium,
            cash_variance_high: detection.cash_variance_high,
            cash_variance_confidence: detection.cash_variance_confidence,

            min_comparables: detection.min_comparables,

            risk_weight_low: detection.risk_weights.low,
            risk_weight_medium: detection.risk_weights.medium,
            risk_weight_high: detection.risk_weights.high,
            risk_weight_critical: detection.risk_weights.critical,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("TILLWATCH_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_comparables == 0 {
            return Err(anyhow!("min_comparables must be greater than 0"));
        }
        if self.duplicate_payment_window_days <= 0
            || self.payment_variance_window_days <= 0
            || self.invoice_history_window_days <= 0
            || self.duplicate_invoice_window_days <= 0
            || self.sales_window_days <= 0
        {
            return Err(anyhow!("detection windows must be positive"));
        }
        if self.duplicate_exact_tolerance <= 0.0 {
            return Err(anyhow!("duplicate_exact_tolerance must be positive"));
        }
        for confidence in [
            self.duplicate_exact_confidence,
            self.duplicate_near_confidence,
            self.price_spike_max_confidence,
            self.missing_info_confidence,
            self.sales_variance_confidence,
            self.cash_variance_confidence,
        ] {
            if confidence > 100 {
                return Err(anyhow!("confidence values must be in 0..=100"));
            }
        }
        if self.invoice_history_cap == 0 {
            return Err(anyhow!("invoice_history_cap must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_detection_config(&self) -> DetectionConfig {
        DetectionConfig {
            duplicate_payment_window_days: self.duplicate_payment_window_days,
            duplicate_exact_tolerance: self.duplicate_exact_tolerance,
            duplicate_exact_window_hours: self.duplicate_exact_window_hours,
            duplicate_exact_confidence: self.duplicate_exact_confidence,
            duplicate_near_pct: self.duplicate_near_pct,
            duplicate_near_confidence: self.duplicate_near_confidence,
            duplicate_risk_high: self.duplicate_risk_high,
            duplicate_risk_medium: self.duplicate_risk_medium,

            payment_variance_window_days: self.payment_variance_window_days,
            payment_variance_high: self.payment_variance_high,
            payment_variance_medium: self.payment_variance_medium,

            invoice_history_window_days: self.invoice_history_window_days,
            invoice_history_cap: self.invoice_history_cap,
            price_spike_trigger_pct: self.price_spike_trigger_pct,
            price_spike_medium_pct: self.price_spike_medium_pct,
            price_spike_high_pct: self.price_spike_high_pct,
            price_spike_max_confidence: self.price_spike_max_confidence,

            duplicate_invoice_window_days: self.duplicate_invoice_window_days,

            missing_info_confidence: self.missing_info_confidence,
            missing_info_medium_at: self.missing_info_medium_at,

            sales_window_days: self.sales_window_days,
            sales_min_history: self.sales_min_history,
            sales_variance_trigger_pct: self.sales_variance_trigger_pct,
            sales_variance_high_pct: self.sales_variance_high_pct,
            sales_variance_confidence: self.sales_variance_confidence,

            cash_variance_trigger: self.cash_variance_trigger,
            cash_variance_medium: self.cash_variance_medium,
            cash_variance_high: self.cash_variance_high,
            cash_variance_confidence: self.cash_variance_confidence,

            min_comparables: self.min_comparables,

            risk_weights: RiskWeights {
                low: self.risk_weight_low,
                medium: self.risk_weight_medium,
                high: self.risk_weight_high,
                critical: self.risk_weight_critical,
            },
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("TILLWATCH_MIN_COMPARABLES") {
            self.min_comparables = value.parse().unwrap_or(self.min_comparables);
        }
        if let Ok(value) = env::var("TILLWATCH_DUPLICATE_WINDOW_DAYS") {
            self.duplicate_payment_window_days =
                value.parse().unwrap_or(self.duplicate_payment_window_days);
        }
        if let Ok(value) = env::var("TILLWATCH_PRICE_SPIKE_TRIGGER_PCT") {
            self.price_spike_trigger_pct =
                value.parse().unwrap_or(self.price_spike_trigger_pct);
        }
        if let Ok(value) = env::var("TILLWATCH_SALES_MIN_HISTORY") {
            self.sales_min_history = value.parse().unwrap_or(self.sales_min_history);
        }
        if let Ok(value) = env::var("TILLWATCH_CASH_VARIANCE_TRIGGER") {
            self.cash_variance_trigger = value.parse().unwrap_or(self.cash_variance_trigger);
        }
    }
}
