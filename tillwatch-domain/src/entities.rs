// Domain entities
pub mod anomaly;
pub mod detection_config;
pub mod records;
pub mod stats;

pub use anomaly::*;
pub use detection_config::*;
pub use records::*;
pub use stats::*;
