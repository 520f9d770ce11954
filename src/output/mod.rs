//! Output formatting for run results.
//!
//! - [`summary`] - End of run counters and snapshot status
//! - [`terminal`] - Column formatting helpers

mod summary;
mod terminal;

pub use summary::{print_summary, summary_lines};
pub use terminal::format_field;
