// Domain services: the rule-based detectors and risk scoring
pub mod eod_detectors;
pub mod invoice_detectors;
pub mod payment_detectors;
pub mod risk;
pub mod verdict;

pub use eod_detectors::*;
pub use invoice_detectors::*;
pub use payment_detectors::*;
pub use risk::*;
pub use verdict::*;
