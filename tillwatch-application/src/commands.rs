// Application commands
pub mod detect_commands;
pub mod resolution_commands;

pub use detect_commands::*;
pub use resolution_commands::*;
