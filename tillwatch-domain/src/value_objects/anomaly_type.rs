// Anomaly type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    DuplicatePayment,
    PriceSpike,
    MissingInfo,
    UnauthorizedAccount,
    SupplyGap,
    EodMismatch,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::DuplicatePayment => "duplicate_payment",
            AnomalyType::PriceSpike => "price_spike",
            AnomalyType::MissingInfo => "missing_info",
            AnomalyType::UnauthorizedAccount => "unauthorized_account",
            AnomalyType::SupplyGap => "supply_gap",
            AnomalyType::EodMismatch => "eod_mismatch",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "duplicate_payment" => Some(AnomalyType::DuplicatePayment),
            "price_spike" => Some(AnomalyType::PriceSpike),
            "missing_info" => Some(AnomalyType::MissingInfo),
            "unauthorized_account" => Some(AnomalyType::UnauthorizedAccount),
            "supply_gap" => Some(AnomalyType::SupplyGap),
            "eod_mismatch" => Some(AnomalyType::EodMismatch),
            _ => None,
        }
    }
}
