//! Main test runner that executes generated cases one at a time

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::case::TestCase;
use crate::error::{E2eError, E2eResult};
use crate::harness::Harness;

/// Result of running a single test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    /// Files saved to help diagnose a failure
    #[serde(default)]
    pub artifacts: Vec<String>,
}

/// Result of running all test cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Extra time a case gets after its timeout to capture artifacts and close
/// its driver
const CLEANUP_GRACE: Duration = Duration::from_secs(60);

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Budget for one case, including browser start-up
    pub case_timeout: Duration,
    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            case_timeout: Duration::from_secs(300),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Sequential runner over generated test cases
pub struct TestRunner<H: Harness> {
    harness: H,
    config: RunnerConfig,
}

impl<H: Harness> TestRunner<H> {
    pub fn new(harness: H) -> Self {
        Self::with_config(harness, RunnerConfig::default())
    }

    pub fn with_config(harness: H, config: RunnerConfig) -> Self {
        Self { harness, config }
    }

    pub fn harness(&self) -> &H {
        &self.harness
    }

    /// Run every case in order; a failing case never stops the ones after it
    pub async fn run_cases<I>(&self, cases: I) -> TestSuiteResult
    where
        I: IntoIterator<Item = TestCase<H>>,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        for case in cases {
            let result = self.run_case(&case).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        TestSuiteResult {
            started_at,
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Run one case under the configured timeout. A case that cannot even
    /// clean up within the grace period after that is abandoned.
    pub async fn run_case(&self, case: &TestCase<H>) -> TestResult {
        let start = Instant::now();
        let budget = self.config.case_timeout + CLEANUP_GRACE;
        let run = case.run(&self.harness, self.config.case_timeout);
        match tokio::time::timeout(budget, run).await {
            Ok(result) => result,
            Err(_) => {
                let waited_ms = start.elapsed().as_millis() as u64;
                TestResult {
                    name: case.name().to_string(),
                    success: false,
                    duration_ms: waited_ms,
                    error: Some(
                        E2eError::Timeout {
                            what: format!("test case {}", case.name()),
                            waited_ms,
                        }
                        .to_string(),
                    ),
                    artifacts: Vec::new(),
                }
            }
        }
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
