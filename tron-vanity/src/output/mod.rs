//! Persistence and formatting of search results.

mod format;
mod store;

pub use format::{format_count, format_elapsed, format_number};
pub use store::{format_match, format_match_banner, format_summary, ResultLog};
