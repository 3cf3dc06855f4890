//! Pattern matching implementation.

use std::fmt;

/// Characters of the Base58 alphabet. Addresses never contain `0`, `O`, `I` or `l`.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Returns the first character of `s` that cannot appear in an address, if any.
pub fn find_invalid_char(s: &str) -> Option<char> {
    s.chars().find(|&c| !BASE58_ALPHABET.contains(c))
}

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

impl From<bool> for MatchResult {
    #[inline]
    fn from(matched: bool) -> Self {
        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }
}

/// Checks `address` against a prefix and suffix.
///
/// The prefix is compared with the characters right after the fixed leading `T`,
/// the suffix with the last characters. Both comparisons are case-sensitive and an
/// empty side always matches. A missing address, or one too short to hold either
/// window, never matches.
#[inline]
pub fn matches(address: Option<&str>, prefix: &str, suffix: &str) -> bool {
    let Some(address) = address else {
        return false;
    };
    let bytes = address.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    let prefix_ok = bytes.get(1..1 + prefix.len()) == Some(prefix.as_bytes());
    prefix_ok && bytes.len() >= suffix.len() && bytes.ends_with(suffix.as_bytes())
}

/// A prefix/suffix pattern for TRON addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Characters expected after the leading `T`
    prefix: String,
    /// Characters expected at the end
    suffix: String,
}

impl Pattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True when neither side constrains the address, so every address matches.
    pub fn is_vacuous(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    /// Matches an address string against this pattern.
    #[inline]
    pub fn matches(&self, address: &str) -> MatchResult {
        matches(Some(address), &self.prefix, &self.suffix).into()
    }

    /// Returns the expected number of attempts to find a match.
    ///
    /// Each constrained character has 58 possible values, so the expectation is
    /// 58^n where n is the combined pattern length.
    pub fn estimated_difficulty(&self) -> u64 {
        let total_len = self.prefix.len() + self.suffix.len();
        58u64.saturating_pow(total_len as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=200_000 => "Very Easy (seconds)".into(),
            200_001..=20_000_000 => "Easy (minutes)".into(),
            20_000_001..=2_000_000_000 => "Medium (hours)".into(),
            2_000_000_001..=200_000_000_000 => "Hard (days)".into(),
            _ => "Very Hard (weeks or more)".into(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.prefix.is_empty(), self.suffix.is_empty()) {
            (_, true) => write!(f, "T{}", self.prefix),
            (true, false) => write!(f, "T...{}", self.suffix),
            (false, false) => write!(f, "T{}...{}", self.prefix, self.suffix),
        }
    }
}
