//! Release-notes cleanup
//!
//! GitHub release bodies are written for GitHub's renderer. AltStore shows
//! them as plain text, so fences, indentation, and stray whitespace are
//! stripped before the notes land in a catalog entry.

use regex::Regex;
use std::sync::OnceLock;

/// Lines that only open or close a code fence (optionally with an info string)
fn fence_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^ *`{3,}[A-Za-z0-9_+.#-]*[^\S\n]*$").unwrap())
}

fn backtick_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`{3,}").unwrap())
}

fn indented_heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^ +#").unwrap())
}

fn leading_spaces_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^ {2,}").unwrap())
}

fn trailing_whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)[^\S\n]+$").unwrap())
}

/// Convert `\r\n` and bare `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Clean up release notes for display in a catalog.
///
/// Applied in order:
/// 1. `\r\n` / `\r` become `\n`
/// 2. tabs become a single space
/// 3. code-fence lines are emptied and any other run of three or more
///    backticks is removed
/// 4. whitespace in front of a `#` heading is removed
/// 5. runs of two or more leading spaces are removed
/// 6. trailing whitespace is removed from every line
/// 7. the whole text is trimmed
///
/// `clean_notes(&clean_notes(x)) == clean_notes(x)` for every input.
pub fn clean_notes(text: &str) -> String {
    let text = normalize_line_endings(text).replace('\t', " ");
    let text = fence_line_regex().replace_all(&text, "");
    let text = backtick_run_regex().replace_all(&text, "");
    let text = indented_heading_regex().replace_all(&text, "#");
    let text = leading_spaces_regex().replace_all(&text, "");
    let text = trailing_whitespace_regex().replace_all(&text, "");
    text.trim().to_string()
}
