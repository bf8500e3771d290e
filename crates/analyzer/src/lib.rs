//! # sqlsift Analyzer
//!
//! Batch orchestration for SQL detection across a Java source tree.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> Java File Scanner (.gitignore aware)
//!     │      └─> *.java paths
//!     │
//!     ├──> Detector (tree path, line-scanner fallback, per-file timeout)
//!     │      └─> AnalysisResult per file
//!     │
//!     └──> Aggregation
//!            └─> empty results dropped, path-sorted, stats collected
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sqlsift_analyzer::BatchAnalyzer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let analyzer = BatchAnalyzer::default();
//!     let outcome = analyzer.analyze_directory("/path/to/project").await?;
//!
//!     println!("{} files carry SQL", outcome.results.len());
//!     Ok(())
//! }
//! ```

mod analyzer;
mod error;
mod scanner;
mod stats;

pub use analyzer::{AnalyzerConfig, BatchAnalyzer, BatchOutcome};
pub use error::{AnalyzerError, Result};
pub use scanner::JavaFileScanner;
pub use stats::AnalysisStats;
