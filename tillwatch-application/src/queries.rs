// Application queries
pub mod anomaly_queries;
pub mod stats_queries;

pub use anomaly_queries::*;
pub use stats_queries::*;
