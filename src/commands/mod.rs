//! Command implementations for the analyzer CLI.

mod analyze;
mod check;
mod generate;

pub use analyze::command_analyze;
pub use check::command_check;
pub use generate::command_generate_testdata;
