//! Pattern matching for TRON addresses.
//!
//! A pattern constrains the characters after the leading `T` (prefix) and the
//! trailing characters (suffix). Matching is case-sensitive.

mod pattern;

pub use pattern::{find_invalid_char, matches, MatchResult, Pattern, BASE58_ALPHABET};
