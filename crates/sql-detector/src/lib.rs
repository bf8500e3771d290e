//! # sqlsift Detector
//!
//! Heuristic detection of hand-built SQL inside Java source text.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> Tree-sitter Parsing → CST
//!     │        │
//!     │        ├─> Literal rule (string literals matching SQL keywords)
//!     │        ├─> Concatenation rule (additive chains in declarations)
//!     │        └─> Builder-append rule (StringBuilder.append calls)
//!     │
//!     ├──> (parse failure) Line Scanner
//!     │        └─> Per-line state machine over comments, declarations,
//!     │            string operations and keyword matches
//!     │
//!     └──> Merge / Deduplicate
//!          ├─> Group identical line ranges
//!          ├─> Interval-merge overlapping/adjacent paragraphs
//!          └─> Collapse identical content by hash
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sqlsift_detector::SqlDetector;
//!
//! let detector = SqlDetector::new();
//! let source = r#"
//! public class Dao {
//!     void load() {
//!         String sql = "SELECT id FROM users";
//!     }
//! }
//! "#;
//!
//! let result = detector.analyze("Dao.java", source);
//! assert_eq!(result.sql_paragraphs.len(), 1);
//! ```

mod detector;
mod error;
mod keywords;
mod line_scanner;
mod merge;
mod tree_extract;
mod types;

pub use detector::SqlDetector;
pub use error::{DetectorError, Result};
pub use line_scanner::scan_lines;
pub use merge::{group_candidates, merge_paragraphs};
pub use sqlsift_protocol::{AnalysisResult, SqlParagraph};
pub use types::SqlCandidate;
