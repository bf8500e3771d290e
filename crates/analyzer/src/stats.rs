use serde::{Deserialize, Serialize};
use sqlsift_protocol::AnalysisResult;

/// Statistics about one batch analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Number of files analyzed
    pub files_scanned: usize,

    /// Number of files that produced at least one paragraph
    pub files_with_sql: usize,

    /// Total paragraphs across the batch
    pub paragraphs: usize,

    /// Total SQL fragments across the batch
    pub sql_statements: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Per-file errors encountered (the batch continued past them)
    pub errors: Vec<String>,
}

impl AnalysisStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, result: &AnalysisResult) {
        self.files_scanned += 1;
        if !result.is_empty() {
            self.files_with_sql += 1;
            self.paragraphs += result.sql_paragraphs.len();
            self.sql_statements += result
                .sql_paragraphs
                .iter()
                .map(|p| p.sql_statements.len())
                .sum::<usize>();
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

impl std::fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Files: {} | With SQL: {} | Paragraphs: {} | Statements: {} | Errors: {} | {} ms",
            self.files_scanned,
            self.files_with_sql,
            self.paragraphs,
            self.sql_statements,
            self.errors.len(),
            self.time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlsift_protocol::SqlParagraph;

    #[test]
    fn counts_accumulate_per_result() {
        let mut stats = AnalysisStats::new();
        stats.add_file(&AnalysisResult::new("Empty.java".into(), vec![]));
        stats.add_file(&AnalysisResult::new(
            "Dao.java".into(),
            vec![SqlParagraph::new(
                1,
                2,
                "content".into(),
                vec!["SELECT 1".into(), "FROM t".into()],
            )],
        ));
        stats.add_error("boom".into());

        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.files_with_sql, 1);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.sql_statements, 2);
        assert_eq!(stats.errors.len(), 1);
    }
}
