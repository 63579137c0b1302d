//! Console line annotation
//!
//! Cosmetic colorizing of tagged console lines: lines carrying the runner's
//! tag are highlighted bold red when they contain `ERROR` and brown when
//! they contain `INFO`. Untagged lines (the interpreter's own output) pass
//! through untouched.

use std::borrow::Cow;

/// Prefix tag the runner puts on its own console lines
pub const CONSOLE_TAG: &str = "[scriptline]";

const BOLD_RED: &str = "\x1b[1;31m";
// 256-color brown, the closest ANSI match to the #993300 used upstream
const BROWN: &str = "\x1b[38;5;130m";
const RESET: &str = "\x1b[0m";

/// Annotates a single console line
///
/// Only lines starting with [`CONSOLE_TAG`] are considered; everything else
/// is returned unchanged.
#[must_use]
pub fn annotate(line: &str) -> Cow<'_, str> {
    if !line.starts_with(CONSOLE_TAG) {
        return Cow::Borrowed(line);
    }
    if line.contains("ERROR") {
        Cow::Owned(format!("{BOLD_RED}{line}{RESET}"))
    } else if line.contains("INFO") {
        Cow::Owned(format!("{BROWN}{line}{RESET}"))
    } else {
        Cow::Borrowed(line)
    }
}
