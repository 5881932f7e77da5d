//! Parsing of raw suggestion text.
//!
//! The suggestion service answers in free text: the alternative on the first
//! line, the reason on whatever lines follow. Blank lines are noise.

use crate::types::Suggestion;

/// Turn a raw completion into a [`Suggestion`].
///
/// Returns `None` when the text has no non-blank line, which callers treat as
/// "no suggestion produced" rather than an error.
pub fn parse_suggestion(raw: &str) -> Option<Suggestion> {
    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

    let alternative = lines.next()?.to_string();
    let reason = lines.collect::<Vec<_>>().join(" ");

    Some(Suggestion {
        alternative,
        reason,
    })
}
