// Domain value objects
pub mod anomaly_type;
pub mod entity_kind;
pub mod severity;

pub use anomaly_type::*;
pub use entity_kind::*;
pub use severity::*;
