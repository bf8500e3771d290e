//! Tree-based SQL candidate extraction.
//!
//! Three rules run independently over the full syntax tree and may overlap on
//! the same source span; the merger reconciles them afterwards:
//!
//! 1. literal rule — any keyword-matching string literal;
//! 2. concatenation rule — additive chains inside local declarations;
//! 3. builder-append rule — `append` calls carrying a matching literal.
//!
//! Enclosing declarations are found without parent pointers: declarations are
//! visited top-down (rule 2) or resolved textually (rules 1 and 3).

use tree_sitter::{Node, Tree};

use crate::keywords;
use crate::types::SqlCandidate;

pub struct TreeExtractor<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> TreeExtractor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: source.split('\n').collect(),
        }
    }

    /// Run all extraction rules against the tree.
    pub fn extract(&self, tree: &Tree) -> Vec<SqlCandidate> {
        let root = tree.root_node();
        let mut candidates = Vec::new();
        self.collect_literals(root, &mut candidates);
        self.collect_concatenations(root, &mut candidates);
        self.collect_appends(root, &mut candidates);
        candidates
    }

    // Rule 1: string literals.

    fn collect_literals(&self, node: Node<'_>, out: &mut Vec<SqlCandidate>) {
        if node.kind() == "string_literal" {
            if let Some(candidate) = self.literal_candidate(node) {
                out.push(candidate);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_literals(child, out);
        }
    }

    fn literal_candidate(&self, node: Node<'_>) -> Option<SqlCandidate> {
        let value = dequote(self.node_text(node));
        if value.trim().is_empty() || !keywords::value_matches(value) {
            return None;
        }

        let literal_line = node.start_position().row + 1;
        let line_text = self.line(literal_line);
        if keywords::is_comment_line(line_text) || keywords::is_console_io_line(line_text) {
            return None;
        }

        let end_line = node.end_position().row + 1;
        let start_line = self.resolve_declaration_start(literal_line);
        Some(SqlCandidate::new(value, start_line.min(end_line), end_line))
    }

    /// The literal's own line if it declares a string variable, else the
    /// nearest such line above, else the literal's own line.
    fn resolve_declaration_start(&self, literal_line: usize) -> usize {
        if is_string_declaration(self.line(literal_line)) {
            return literal_line;
        }
        for index in (0..literal_line.saturating_sub(1)).rev() {
            if is_string_declaration(self.lines[index]) {
                return index + 1;
            }
        }
        literal_line
    }

    // Rule 2: concatenation chains in local declarations.

    fn collect_concatenations(&self, node: Node<'_>, out: &mut Vec<SqlCandidate>) {
        if node.kind() == "local_variable_declaration" {
            self.concatenation_candidates(node, out);
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_concatenations(child, out);
        }
    }

    fn concatenation_candidates(&self, declaration: Node<'_>, out: &mut Vec<SqlCandidate>) {
        let mut cursor = declaration.walk();
        for declarator in declaration.children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(initializer) = declarator.child_by_field_name("value") else {
                continue;
            };
            if !contains_concatenation(initializer) {
                continue;
            }
            if let Some(candidate) = self.concatenation_candidate(declaration, initializer) {
                out.push(candidate);
            }
        }
    }

    fn concatenation_candidate(
        &self,
        declaration: Node<'_>,
        initializer: Node<'_>,
    ) -> Option<SqlCandidate> {
        let mut literals = Vec::new();
        collect_string_literals(initializer, &mut literals);

        let mut matching: Vec<(&str, usize)> = Vec::new();
        for literal in literals {
            let value = dequote(self.node_text(literal));
            if !keywords::value_matches(value) {
                continue;
            }
            matching.push((value, literal.end_position().row + 1));
        }
        if matching.is_empty() {
            return None;
        }

        let value = matching
            .iter()
            .map(|(value, _)| *value)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        let end_line = matching.iter().map(|(_, line)| *line).max()?;
        let start_line = declaration.start_position().row + 1;

        Some(SqlCandidate::new(value, start_line.min(end_line), end_line))
    }

    // Rule 3: builder append calls.

    fn collect_appends(&self, node: Node<'_>, out: &mut Vec<SqlCandidate>) {
        if node.kind() == "method_invocation" {
            if let Some(candidate) = self.append_candidate(node) {
                out.push(candidate);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_appends(child, out);
        }
    }

    fn append_candidate(&self, call: Node<'_>) -> Option<SqlCandidate> {
        let name = call.child_by_field_name("name")?;
        if self.node_text(name) != "append" {
            return None;
        }

        let arguments = call.child_by_field_name("arguments")?;
        if arguments.named_child_count() != 1 {
            return None;
        }
        let argument = arguments.named_child(0)?;
        if argument.kind() != "string_literal" {
            return None;
        }

        let value = dequote(self.node_text(argument));
        if !keywords::value_matches(value) {
            return None;
        }

        let end_line = call.end_position().row + 1;
        let start_line = call
            .child_by_field_name("object")
            .and_then(|receiver| self.receiver_root_name(receiver))
            .and_then(|name| self.builder_declaration_line(&name))
            .unwrap_or_else(|| call.start_position().row + 1);

        Some(SqlCandidate::new(value, start_line.min(end_line), end_line))
    }

    /// Walk a receiver chain like `sb.append(a).append(b)` down to its root
    /// identifier.
    fn receiver_root_name(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "identifier" => Some(self.node_text(node).to_string()),
            "method_invocation" => node
                .child_by_field_name("object")
                .and_then(|object| self.receiver_root_name(object)),
            "field_access" => node
                .child_by_field_name("field")
                .map(|field| self.node_text(field).to_string()),
            "parenthesized_expression" => node
                .named_child(0)
                .and_then(|inner| self.receiver_root_name(inner)),
            _ => None,
        }
    }

    /// First line in the file declaring `StringBuilder <name>`.
    fn builder_declaration_line(&self, name: &str) -> Option<usize> {
        let needle = format!("StringBuilder {name}");
        self.lines
            .iter()
            .position(|line| line.contains(&needle))
            .map(|index| index + 1)
    }

    fn node_text(&self, node: Node<'_>) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn line(&self, number: usize) -> &'a str {
        self.lines.get(number.saturating_sub(1)).copied().unwrap_or("")
    }
}

fn is_string_declaration(line: &str) -> bool {
    line.contains("String ") && line.contains('=')
}

fn contains_concatenation(node: Node<'_>) -> bool {
    if node.kind() == "binary_expression" {
        if let Some(operator) = node.child_by_field_name("operator") {
            if operator.kind() == "+" {
                return true;
            }
        }
    }
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(contains_concatenation);
    result
}

fn collect_string_literals<'tree>(node: Node<'tree>, out: &mut Vec<Node<'tree>>) {
    if node.kind() == "string_literal" {
        out.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_string_literals(child, out);
    }
}

fn dequote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .unwrap_or(raw)
        .strip_suffix('"')
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tree_sitter::Parser;

    fn parse(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .expect("java grammar loads");
        parser.parse(source, None).expect("source parses")
    }

    fn extract(source: &str) -> Vec<SqlCandidate> {
        let tree = parse(source);
        TreeExtractor::new(source).extract(&tree)
    }

    #[test]
    fn literal_rule_finds_simple_declaration() {
        let source = "public class Dao {\n    void load() {\n        String sql = \"SELECT id FROM users\";\n    }\n}\n";
        let candidates = extract(source);

        assert!(candidates
            .iter()
            .any(|c| c.value == "SELECT id FROM users" && c.start_line == 3 && c.end_line == 3));
    }

    #[test]
    fn literal_rule_skips_console_io_lines() {
        let source = "public class Dao {\n    void log() {\n        System.out.println(\"SELECT * FROM users\");\n    }\n}\n";
        assert!(extract(source).is_empty());
    }

    #[test]
    fn literal_rule_skips_non_sql_strings() {
        let source =
            "public class Dao {\n    void greet() {\n        String s = \"hello\";\n    }\n}\n";
        assert!(extract(source).is_empty());
    }

    #[test]
    fn literal_rule_resolves_declaration_above() {
        let source = "public class Dao {\n    void load() {\n        String sql =\n            executeQuery(\"SELECT id FROM users\");\n    }\n}\n";
        let candidates = extract(source);

        let literal = candidates
            .iter()
            .find(|c| c.value == "SELECT id FROM users")
            .expect("literal candidate");
        assert_eq!(literal.start_line, 3);
        assert_eq!(literal.end_line, 4);
    }

    #[test]
    fn concatenation_rule_joins_matching_literals_only() {
        let source = concat!(
            "public class Dao {\n",
            "    void load(long id) {\n",
            "        String sql = \"SELECT id, name \" +\n",
            "                     \"FROM users \" +\n",
            "                     \"WHERE id = \" + id;\n",
            "    }\n",
            "}\n"
        );
        let candidates = extract(source);

        let joined = candidates
            .iter()
            .find(|c| c.value.contains("SELECT id, name") && c.value.contains("WHERE id ="))
            .expect("concatenation candidate");
        assert_eq!(joined.start_line, 3);
        assert_eq!(joined.end_line, 5);
        assert_eq!(joined.value, "SELECT id, name  FROM users  WHERE id =");
    }

    #[test]
    fn concatenation_rule_ignores_chains_without_keywords() {
        let source = "public class Dao {\n    void label(String name) {\n        String s = \"Mr. \" + name + \"!\";\n    }\n}\n";
        assert!(extract(source).is_empty());
    }

    #[test]
    fn append_rule_anchors_on_builder_declaration() {
        let source = concat!(
            "public class Dao {\n",
            "    void load() {\n",
            "        StringBuilder sb = new StringBuilder();\n",
            "        sb.append(\"SELECT id \");\n",
            "        sb.append(\"FROM users\");\n",
            "    }\n",
            "}\n"
        );
        let candidates = extract(source);

        let appends: Vec<&SqlCandidate> = candidates
            .iter()
            .filter(|c| c.start_line == 3 && (c.value == "SELECT id " || c.value == "FROM users"))
            .collect();
        assert_eq!(appends.len(), 2);
        assert!(appends.iter().any(|c| c.end_line == 4));
        assert!(appends.iter().any(|c| c.end_line == 5));
    }

    #[test]
    fn append_rule_resolves_chained_receiver() {
        let source = concat!(
            "public class Dao {\n",
            "    void load() {\n",
            "        StringBuilder sb = new StringBuilder();\n",
            "        sb.append(\"SELECT id \").append(\"FROM users\");\n",
            "    }\n",
            "}\n"
        );
        let candidates = extract(source);

        let chained: Vec<&SqlCandidate> = candidates
            .iter()
            .filter(|c| c.start_line == 3 && c.end_line == 4)
            .collect();
        assert!(chained.iter().any(|c| c.value == "SELECT id "));
        assert!(chained.iter().any(|c| c.value == "FROM users"));
    }

    #[test]
    fn append_rule_skips_non_literal_arguments() {
        let source = concat!(
            "public class Dao {\n",
            "    void load(String condition) {\n",
            "        StringBuilder sb = new StringBuilder();\n",
            "        sb.append(condition);\n",
            "    }\n",
            "}\n"
        );
        assert!(extract(source).is_empty());
    }

    #[test]
    fn dequote_strips_only_outer_quotes() {
        assert_eq!(dequote("\"SELECT 1\""), "SELECT 1");
        assert_eq!(dequote("bare"), "bare");
    }
}
