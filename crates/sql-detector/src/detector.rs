//! Per-file detection facade.

use sqlsift_protocol::{AnalysisResult, SqlParagraph};
use tree_sitter::Parser;

use crate::error::{DetectorError, Result};
use crate::line_scanner;
use crate::merge;
use crate::tree_extract::TreeExtractor;

/// Detects SQL paragraphs in one file's source text.
///
/// The tree path is tried first; any parse failure degrades transparently to
/// the line scanner, so `analyze` always produces a result.
#[derive(Debug, Default)]
pub struct SqlDetector;

impl SqlDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Analyze one file, producing its (possibly empty) result.
    pub fn analyze(&self, file_path: &str, content: &str) -> AnalysisResult {
        AnalysisResult::new(file_path.to_string(), self.detect(content))
    }

    /// Detect SQL paragraphs, preferring the tree path.
    pub fn detect(&self, content: &str) -> Vec<SqlParagraph> {
        match self.detect_with_tree(content) {
            Ok(paragraphs) => paragraphs,
            Err(err) => {
                log::warn!("tree parse failed, falling back to line scan: {err}");
                line_scanner::scan_lines(content)
            }
        }
    }

    /// Tree-based detection; fails when no usable tree can be built.
    pub fn detect_with_tree(&self, content: &str) -> Result<Vec<SqlParagraph>> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|err| DetectorError::tree_sitter(format!("failed to set language: {err}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| DetectorError::parse("parser produced no tree"))?;
        if tree.root_node().has_error() {
            return Err(DetectorError::parse("source contains syntax errors"));
        }

        let candidates = TreeExtractor::new(content).extract(&tree);
        Ok(merge::merge_paragraphs(merge::group_candidates(
            content,
            &candidates,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_source_without_sql_yields_nothing() {
        let detector = SqlDetector::new();
        let result = detector.analyze("Empty.java", "public class Empty {}\n");
        assert_eq!(result.file_path, "Empty.java");
        assert!(result.sql_paragraphs.is_empty());
    }

    #[test]
    fn comment_only_sql_yields_nothing() {
        let detector = SqlDetector::new();
        let source = concat!(
            "public class T {\n",
            "    // SELECT * FROM users\n",
            "    void noop() {}\n",
            "}\n"
        );
        assert!(detector.detect(source).is_empty());
    }

    #[test]
    fn console_output_sql_yields_nothing() {
        let detector = SqlDetector::new();
        let source = concat!(
            "public class T {\n",
            "    void log() {\n",
            "        System.out.println(\"SELECT * FROM users\");\n",
            "    }\n",
            "}\n"
        );
        assert!(detector.detect(source).is_empty());
    }

    #[test]
    fn one_line_concatenated_declaration() {
        let detector = SqlDetector::new();
        // 21 filler lines so the declaration sits on line 22.
        let mut source = String::from("public class Dao {\n    void load(long id) {\n");
        for _ in 0..19 {
            source.push_str("        // filler\n");
        }
        source.push_str("        String sql = \"SELECT * FROM users WHERE id = \" + id + \";\";\n");
        source.push_str("    }\n}\n");

        let paragraphs = detector.detect_with_tree(&source).unwrap();

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].line_start, 22);
        assert_eq!(paragraphs[0].line_end, 22);
        assert_eq!(
            paragraphs[0].sql_statements,
            vec!["SELECT * FROM users WHERE id = "]
        );
    }

    #[test]
    fn builder_chain_collapses_to_one_paragraph_on_the_tree_path() {
        let detector = SqlDetector::new();
        let source = concat!(
            "public class Dao {\n",                                    // 1
            "    void load() {\n",                                     // 2
            "        int pad1 = 0;\n",                                 // 3
            "        int pad2 = 0;\n",                                 // 4
            "        int pad3 = 0;\n",                                 // 5
            "        int pad4 = 0;\n",                                 // 6
            "        int pad5 = 0;\n",                                 // 7
            "        int pad6 = 0;\n",                                 // 8
            "        int pad7 = 0;\n",                                 // 9
            "        StringBuilder sb = new StringBuilder();\n",       // 10
            "        sb.append(\"SELECT * FROM t \");\n",              // 11
            "        sb.append(\"AND status = 1\");\n",                // 12
            "    }\n",
            "}\n"
        );

        let tree_paragraphs = detector.detect_with_tree(source).unwrap();
        assert_eq!(tree_paragraphs.len(), 1);
        assert_eq!(tree_paragraphs[0].line_start, 10);
        assert_eq!(tree_paragraphs[0].line_end, 11);
        assert_eq!(tree_paragraphs[0].sql_statements, vec!["SELECT * FROM t "]);

        // The fallback path on the same input is a different observable:
        // it anchors on the matching append line and quotes the fragment.
        let scan_paragraphs = crate::line_scanner::scan_lines(source);
        assert_eq!(scan_paragraphs.len(), 1);
        assert_eq!(scan_paragraphs[0].line_start, 11);
        assert_eq!(scan_paragraphs[0].line_end, 11);
        assert_eq!(
            scan_paragraphs[0].sql_statements,
            vec!["\"SELECT * FROM t \""]
        );
    }

    #[test]
    fn broken_syntax_falls_back_to_the_line_scanner() {
        let detector = SqlDetector::new();
        let source = concat!(
            "public class Broken {\n",
            "    void m() {\n",
            "        String sql = \"SELECT * FROM users WHERE id = 1\";\n",
            "    @@@\n"
        );

        assert!(detector.detect_with_tree(source).is_err());

        let paragraphs = detector.detect(source);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].line_start, 3);
        assert_eq!(paragraphs[0].line_end, 3);
        assert_eq!(
            paragraphs[0].sql_statements,
            vec!["\"SELECT * FROM users WHERE id = 1\""]
        );
    }

    #[test]
    fn overlapping_rule_output_is_merged_per_file() {
        let detector = SqlDetector::new();
        let source = concat!(
            "public class Dao {\n",
            "    void load() {\n",
            "        String sql = \"SELECT id, name \" +\n",
            "                     \"FROM users \" +\n",
            "                     \"WHERE id = ?\";\n",
            "    }\n",
            "}\n"
        );

        let paragraphs = detector.detect_with_tree(source).unwrap();

        // Literal and concatenation rules overlap on lines 3-5; the merger
        // must leave exactly one non-overlapping paragraph.
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].line_start, 3);
        assert_eq!(paragraphs[0].line_end, 5);
        for pair in paragraphs.windows(2) {
            assert!(pair[1].line_start > pair[0].line_end + 1);
        }
    }
}
