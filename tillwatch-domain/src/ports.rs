// Domain ports
pub mod repositories;

pub use repositories::*;
