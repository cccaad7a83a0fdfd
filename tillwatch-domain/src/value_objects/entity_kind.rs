// Entity kind value object
// The record kinds the detection engine can be dispatched on.
// Dispatch is an exhaustive match; adding a kind is a compile-time change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Payment,
    Invoice,
    EodReport,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Payment => "payment",
            EntityKind::Invoice => "invoice",
            EntityKind::EodReport => "eod_report",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "payment" => Some(EntityKind::Payment),
            "invoice" => Some(EntityKind::Invoice),
            "eod_report" => Some(EntityKind::EodReport),
            _ => None,
        }
    }
}
