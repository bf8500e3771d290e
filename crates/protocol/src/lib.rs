//! Shared result model for SQL detection.
//!
//! Every boundary of the workspace (CLI output, batch aggregation, tests)
//! speaks the shapes defined here. Serialized field names use camelCase so
//! the JSON contract is stable regardless of which crate produced the value.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A merged, deduplicated line range believed to construct one or more SQL
/// statements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlParagraph {
    /// First line of the range (1-indexed, inclusive)
    pub line_start: usize,

    /// Last line of the range (1-indexed, inclusive)
    pub line_end: usize,

    /// Verbatim source text for the range
    pub content: String,

    /// Detected SQL fragments, insertion-ordered and duplicate-free
    pub sql_statements: Vec<String>,
}

impl SqlParagraph {
    #[must_use]
    pub const fn new(
        line_start: usize,
        line_end: usize,
        content: String,
        sql_statements: Vec<String>,
    ) -> Self {
        Self {
            line_start,
            line_end,
            content,
            sql_statements,
        }
    }

    /// Number of lines covered by this paragraph
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_end.saturating_sub(self.line_start) + 1
    }

    /// Check if the paragraph covers a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.line_start && line <= self.line_end
    }
}

/// All SQL paragraphs found in one source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub file_path: String,
    pub sql_paragraphs: Vec<SqlParagraph>,
}

impl AnalysisResult {
    #[must_use]
    pub const fn new(file_path: String, sql_paragraphs: Vec<SqlParagraph>) -> Self {
        Self {
            file_path,
            sql_paragraphs,
        }
    }

    /// True when the file produced no paragraphs; such results are dropped
    /// from batch output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql_paragraphs.is_empty()
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_paragraph() -> SqlParagraph {
        SqlParagraph::new(
            10,
            12,
            "String sql = \"SELECT *\" +\n    \"FROM users\" +\n    \"WHERE id = ?\";".to_string(),
            vec!["SELECT *".to_string(), "FROM users".to_string()],
        )
    }

    #[test]
    fn paragraph_line_helpers() {
        let paragraph = sample_paragraph();
        assert_eq!(paragraph.line_count(), 3);
        assert!(paragraph.contains_line(10));
        assert!(paragraph.contains_line(12));
        assert!(!paragraph.contains_line(9));
        assert!(!paragraph.contains_line(13));
    }

    #[test]
    fn result_serializes_with_camel_case_fields() {
        let result = AnalysisResult::new("src/Dao.java".to_string(), vec![sample_paragraph()]);
        let json = serialize_json(&result).unwrap();

        assert!(json.contains("\"filePath\":\"src/Dao.java\""));
        assert!(json.contains("\"sqlParagraphs\""));
        assert!(json.contains("\"lineStart\":10"));
        assert!(json.contains("\"lineEnd\":12"));
        assert!(json.contains("\"sqlStatements\""));
    }

    #[test]
    fn result_round_trips() {
        let result = AnalysisResult::new("src/Dao.java".to_string(), vec![sample_paragraph()]);
        let json = serialize_json(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn empty_result_is_flagged() {
        let result = AnalysisResult::new("src/Empty.java".to_string(), Vec::new());
        assert!(result.is_empty());
    }
}
