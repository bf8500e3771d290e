//! Fallback line scanner used when the syntax tree cannot be built.
//!
//! A per-line state machine tracks block comments, `String`/`StringBuilder`
//! variable declarations and actively-constructed string operations, opening
//! and closing keyword paragraphs as it goes. Paragraphs belonging to a
//! string operation recompute their content by slicing the original text so
//! the emitted range and text always agree.
//!
//! The scanner can emit overlapping paragraphs (a plain keyword paragraph and
//! a string-operation paragraph over the same lines), so it runs the shared
//! merge pass over its raw output before returning.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlsift_protocol::SqlParagraph;

use crate::keywords;
use crate::merge;
use crate::types::StatementSet;

// A continued string literal: optional `+`, then an opening quote...
static CONTINUATION_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*\+?\s*["'`]"#).expect("continuation pattern is valid"));

// ...or accumulated content that ends on a quote with an optional `+`.
static CONTINUATION_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["'`]\s*\+?\s*$"#).expect("continuation pattern is valid"));

/// Scan source text line by line for SQL paragraphs.
pub fn scan_lines(source: &str) -> Vec<SqlParagraph> {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut paragraphs: Vec<SqlParagraph> = Vec::new();

    let mut in_block_comment = false;

    let mut in_paragraph = false;
    let mut paragraph_start = 0usize; // 0-indexed
    let mut paragraph_content = String::new();
    let mut statements = StatementSet::new();

    let mut builder_vars: HashSet<String> = HashSet::new();

    let mut in_string_op = false;
    let mut op_start = 0usize; // 0-indexed
    let mut op_var = String::new();

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if in_block_comment {
            if trimmed.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if trimmed.starts_with("/*") {
            in_block_comment = !trimmed.contains("*/");
            continue;
        }
        if trimmed.starts_with("//") || trimmed.starts_with('*') {
            continue;
        }
        if keywords::is_console_io_line(trimmed) {
            continue;
        }

        if let Some(name) = declared_variable(trimmed, "String ") {
            if keywords::line_matches(line) {
                in_string_op = true;
                op_start = index;
                op_var = name;
            }
        }
        if let Some(name) = declared_variable(trimmed, "StringBuilder ") {
            builder_vars.insert(name);
        }
        if trimmed.contains(".append(") && keywords::line_matches(line) {
            let receiver = trimmed.split(".append(").next().unwrap_or("").trim();
            if builder_vars.contains(receiver) && !in_string_op {
                in_string_op = true;
                op_start = index;
                op_var = receiver.to_string();
            }
        }

        if let Some(matched) = match_outside_trailing_comment(line) {
            if in_paragraph {
                paragraph_content.push('\n');
                paragraph_content.push_str(line);
            } else {
                in_paragraph = true;
                paragraph_start = index;
                paragraph_content = (*line).to_string();
            }
            statements.insert(matched);
        } else if in_paragraph {
            if CONTINUATION_OPEN.is_match(line) || CONTINUATION_CLOSE.is_match(&paragraph_content) {
                paragraph_content.push('\n');
                paragraph_content.push_str(line);
            } else {
                paragraphs.push(SqlParagraph::new(
                    paragraph_start + 1,
                    index,
                    std::mem::take(&mut paragraph_content),
                    statements.take(),
                ));
                in_paragraph = false;
            }
        }

        if in_string_op {
            let references_var = trimmed.contains(op_var.as_str());
            let continues = trimmed.contains("+=")
                || trimmed.contains('+')
                || trimmed.contains(".append(");

            if references_var && continues {
                if keywords::line_matches(line) {
                    if !in_paragraph {
                        in_paragraph = true;
                        paragraph_start = op_start;
                    }
                    paragraph_content = lines[op_start..=index].join("\n");
                    if let Some(matched) = keywords::first_line_match(line) {
                        statements.insert(matched);
                    }
                }
            } else if trimmed.ends_with(';') || references_var {
                in_string_op = false;
                if in_paragraph {
                    paragraphs.push(SqlParagraph::new(
                        op_start + 1,
                        index + 1,
                        lines[op_start..=index].join("\n"),
                        statements.take(),
                    ));
                    in_paragraph = false;
                    paragraph_content.clear();
                }
            }
        }
    }

    if in_paragraph && !statements.is_empty() {
        if in_string_op {
            paragraphs.push(SqlParagraph::new(
                op_start + 1,
                lines.len(),
                lines[op_start..].join("\n"),
                statements.take(),
            ));
        } else {
            paragraphs.push(SqlParagraph::new(
                paragraph_start + 1,
                lines.len(),
                paragraph_content,
                statements.take(),
            ));
        }
    }

    merge::merge_paragraphs(paragraphs)
}

/// Extract `<name>` from a `<type_prefix><name> = ...` declaration line.
fn declared_variable(trimmed: &str, type_prefix: &str) -> Option<String> {
    if !trimmed.contains('=') {
        return None;
    }
    let after_type = trimmed.split_once(type_prefix)?.1;
    let name = after_type.split('=').next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// A match counts unless it appears only after a `//` marker on the line.
fn match_outside_trailing_comment(line: &str) -> Option<&str> {
    if !keywords::line_matches(line) {
        return None;
    }
    if let Some(comment_index) = line.find("//") {
        if !keywords::line_matches(&line[..comment_index]) {
            return None;
        }
    }
    keywords::first_line_match(line)
}
