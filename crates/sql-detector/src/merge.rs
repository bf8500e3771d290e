//! Paragraph grouping, interval merging and content deduplication.
//!
//! Both detection paths funnel through [`merge_paragraphs`]; the tree path
//! additionally groups its raw candidates with [`group_candidates`] first.
//! The whole pipeline is idempotent: feeding its output back in is a no-op.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use sqlsift_protocol::SqlParagraph;

use crate::types::{SqlCandidate, StatementSet};

/// Collapse candidates sharing an identical `(start_line, end_line)` span
/// into one paragraph each, in first-seen order. The paragraph content is the
/// verbatim source slice of the span.
pub fn group_candidates(source: &str, candidates: &[SqlCandidate]) -> Vec<SqlParagraph> {
    let mut order: Vec<(usize, usize)> = Vec::new();
    let mut grouped: HashMap<(usize, usize), StatementSet> = HashMap::new();

    for candidate in candidates {
        let key = (candidate.start_line, candidate.end_line);
        let statements = grouped.entry(key).or_insert_with(|| {
            order.push(key);
            StatementSet::new()
        });
        statements.insert(&candidate.value);
    }

    order
        .into_iter()
        .filter_map(|(start, end)| {
            let statements = grouped.remove(&(start, end))?;
            if statements.is_empty() {
                return None;
            }
            Some(SqlParagraph::new(
                start,
                end,
                slice_lines(source, start, end),
                statements.into_vec(),
            ))
        })
        .collect()
}

/// Merge a file's paragraph list: sort, interval-merge overlapping or
/// adjacent (gap of one line) ranges, then collapse identical content.
pub fn merge_paragraphs(paragraphs: Vec<SqlParagraph>) -> Vec<SqlParagraph> {
    if paragraphs.len() <= 1 {
        return paragraphs;
    }

    let mut sorted = paragraphs;
    // Widest range first on ties so the carrier paragraph keeps its content.
    sorted.sort_by(|a, b| {
        a.line_start
            .cmp(&b.line_start)
            .then_with(|| b.line_end.cmp(&a.line_end))
    });

    let mut merged: Vec<SqlParagraph> = Vec::new();
    let mut current: Option<SqlParagraph> = None;

    for paragraph in sorted {
        current = Some(match current.take() {
            None => paragraph,
            Some(held) => {
                if paragraph.line_start <= held.line_end + 1 {
                    merge_pair(held, paragraph)
                } else {
                    merged.push(held);
                    paragraph
                }
            }
        });
    }
    if let Some(held) = current {
        merged.push(held);
    }

    collapse_by_content(merged)
}

/// Extract the verbatim text of an inclusive 1-indexed line range.
pub(crate) fn slice_lines(source: &str, start: usize, end: usize) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let from = start.saturating_sub(1).min(lines.len());
    let to = end.min(lines.len());
    if from >= to {
        return String::new();
    }
    lines[from..to].join("\n")
}

fn merge_pair(first: SqlParagraph, second: SqlParagraph) -> SqlParagraph {
    let line_start = first.line_start.min(second.line_start);
    let line_end = first.line_end.max(second.line_end);

    // Keep whichever content actually covers the merged range; when neither
    // does, fall back to the textually longer one.
    let content = if second.line_end > first.line_end || second.line_start < first.line_start {
        let total_lines = line_end - line_start + 1;
        if first.content.split('\n').count() >= total_lines {
            first.content.clone()
        } else if second.content.split('\n').count() >= total_lines {
            second.content.clone()
        } else if second.content.len() > first.content.len() {
            second.content.clone()
        } else {
            first.content.clone()
        }
    } else {
        first.content.clone()
    };

    let mut statements = StatementSet::new();
    statements.extend_from(&first.sql_statements);
    statements.extend_from(&second.sql_statements);

    SqlParagraph::new(line_start, line_end, content, statements.into_vec())
}

/// Identical content means the same paragraph found twice; keep the richer
/// statement list, first-seen position and spelling winning ties.
fn collapse_by_content(paragraphs: Vec<SqlParagraph>) -> Vec<SqlParagraph> {
    let mut order: Vec<String> = Vec::new();
    let mut by_hash: HashMap<String, SqlParagraph> = HashMap::new();

    for paragraph in paragraphs {
        let key = content_hash(&paragraph.content);
        match by_hash.get(&key) {
            Some(existing) if existing.sql_statements.len() >= paragraph.sql_statements.len() => {}
            Some(_) => {
                by_hash.insert(key, paragraph);
            }
            None => {
                order.push(key.clone());
                by_hash.insert(key, paragraph);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| by_hash.remove(&key))
        .collect()
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
