// Detection verdict
// The transient contract every detector returns; never persisted.

use crate::value_objects::Severity;

#[derive(Debug, Clone)]
pub struct Verdict {
    pub triggered: bool,
    /// Detector confidence in the finding, 0-100.
    pub confidence: u8,
    pub severity: Severity,
    pub reason: String,
}

impl Verdict {
    pub fn clear() -> Self {
        Self {
            triggered: false,
            confidence: 0,
            severity: Severity::Low,
            reason: String::new(),
        }
    }

    pub fn flag(confidence: u8, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            triggered: true,
            confidence,
            severity,
            reason: reason.into(),
        }
    }
}
