use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sqlsift_detector::SqlDetector;
use sqlsift_protocol::AnalysisResult;

use crate::error::{AnalyzerError, Result};
use crate::scanner::JavaFileScanner;
use crate::stats::AnalysisStats;

/// Configuration for batch analysis
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Budget for one file's analysis before it degrades to the line scanner
    pub per_file_timeout: Duration,

    /// Upper bound on concurrently analyzed files
    pub max_concurrency: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        // Analysis is a mix of IO + CPU (parsing). A hardcoded high fan-out
        // spikes CPU on large batches; prefer a small, adaptive cap.
        let max_concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(2, 8);
        Self {
            per_file_timeout: Duration::from_secs(10),
            max_concurrency,
        }
    }
}

/// Everything one batch run produces: the per-file results (empty results
/// dropped, sorted by path) and the run statistics.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<AnalysisResult>,
    pub stats: AnalysisStats,
}

/// Batch analyzer that discovers, analyzes and aggregates Java files
pub struct BatchAnalyzer {
    config: AnalyzerConfig,
}

impl BatchAnalyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Discover Java files under `root` and analyze them all.
    ///
    /// Only an invalid root aborts; every other failure is isolated to its
    /// file and recorded in the outcome's stats.
    pub async fn analyze_directory(&self, root: impl AsRef<Path>) -> Result<BatchOutcome> {
        let scanner = JavaFileScanner::new(root);
        let files = scanner.scan()?;
        self.analyze_files(&files).await
    }

    /// Analyze an explicit list of files.
    pub async fn analyze_files(&self, files: &[PathBuf]) -> Result<BatchOutcome> {
        let start = Instant::now();
        let mut stats = AnalysisStats::new();
        let mut results = Vec::new();

        for slice in files.chunks(self.config.max_concurrency.max(1)) {
            let mut tasks = Vec::with_capacity(slice.len());
            for path in slice {
                let path = path.clone();
                let timeout = self.config.per_file_timeout;
                tasks.push(tokio::spawn(
                    async move { analyze_path(path, timeout).await },
                ));
            }

            for task in tasks {
                match task.await {
                    Ok(Ok(result)) => {
                        stats.add_file(&result);
                        if !result.is_empty() {
                            results.push(result);
                        }
                    }
                    Ok(Err(e)) => {
                        log::warn!("{e}");
                        stats.add_error(e.to_string());
                    }
                    Err(e) => {
                        log::warn!("Analysis task panicked: {e}");
                        stats.add_error(format!("task panicked: {e}"));
                    }
                }
            }
        }

        results.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = start.elapsed().as_millis() as u64;
        }
        log::info!("Batch analysis completed: {stats}");

        Ok(BatchOutcome { results, stats })
    }
}

impl Default for BatchAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Read and analyze one file under the configured time budget.
///
/// The tree path runs on a blocking thread; if it overruns the budget its
/// result is discarded and the cheap line scanner answers instead, so one
/// pathological file cannot stall the batch.
async fn analyze_path(path: PathBuf, timeout: Duration) -> Result<AnalysisResult> {
    let display = path.to_string_lossy().to_string();
    let content =
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AnalyzerError::FileRead {
                path: display.clone(),
                source,
            })?;

    let worker = {
        let display = display.clone();
        let content = content.clone();
        tokio::task::spawn_blocking(move || SqlDetector::new().analyze(&display, &content))
    };

    match tokio::time::timeout(timeout, worker).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(join_err)) => Err(AnalyzerError::Analysis {
            path: display,
            reason: join_err.to_string(),
        }),
        Err(_elapsed) => {
            log::warn!("Analysis of {display} exceeded {timeout:?}; using the line scanner");
            let paragraphs = sqlsift_detector::scan_lines(&content);
            Ok(AnalysisResult::new(display, paragraphs))
        }
    }
}
