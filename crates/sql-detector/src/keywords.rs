//! SQL keyword matching and line classification shared by both detection
//! paths.
//!
//! The tree path matches a bare keyword alternation against dequoted literal
//! values. The line-scanner path uses a stricter per-line pattern that only
//! fires on a quoted fragment containing a keyword or on a bare keyword at a
//! word boundary.

use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords treated as evidence of SQL, matched case-insensitively.
pub const SQL_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "INSERT",
    "UPDATE",
    "DELETE",
    "CREATE TABLE",
    "ALTER TABLE",
    "DROP TABLE",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "UNION",
    "INTERSECT",
    "EXCEPT",
];

static VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let keywords = SQL_KEYWORDS.join("|");
    Regex::new(&format!("(?i)({keywords})")).expect("keyword pattern is valid")
});

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let keywords = SQL_KEYWORDS.join("|");
    Regex::new(&format!(
        r#"(?i)(["'`].*?({keywords}).*?["'`]|\b({keywords})\b)"#
    ))
    .expect("line pattern is valid")
});

const CONSOLE_IO_MARKERS: &[&str] = &[
    "System.out.print",
    "System.out.format",
    "System.out.write",
    "System.err.print",
    "System.err.format",
    "System.err.write",
    "System.in",
];

/// Check a dequoted literal value for SQL keywords (tree path).
pub fn value_matches(value: &str) -> bool {
    VALUE_PATTERN.is_match(value)
}

/// Check a whole source line for SQL keywords (scanner path).
pub fn line_matches(line: &str) -> bool {
    LINE_PATTERN.is_match(line)
}

/// First scanner-pattern match on a line, verbatim.
pub fn first_line_match(line: &str) -> Option<&str> {
    LINE_PATTERN.find(line).map(|m| m.as_str())
}

/// Lines that are comments in their own right: `//`, block-comment open,
/// continuation or close, and javadoc continuations.
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.contains("*/")
        || trimmed.starts_with('*')
}

/// Lines driving console I/O; literals on them are never SQL candidates.
pub fn is_console_io_line(line: &str) -> bool {
    CONSOLE_IO_MARKERS.iter().any(|marker| line.contains(marker))
}
