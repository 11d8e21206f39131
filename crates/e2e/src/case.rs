//! A fully bound, independently runnable test case

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::time::timeout_at;
use tracing::{debug, warn};

use crate::config::OutputPaths;
use crate::context::TestContext;
use crate::device::Device;
use crate::error::{E2eError, E2eResult};
use crate::harness::Harness;
use crate::language::Language;
use crate::runner::TestResult;
use crate::scenario::Scenario;

pub struct TestCase<H: Harness> {
    name: String,
    scenario: Scenario<H>,
    lang: Language,
    device: Arc<Device>,
    device_label: String,
    paths: OutputPaths,
    screenshots_enabled: bool,
}

impl<H: Harness> TestCase<H> {
    pub(crate) fn new(
        scenario: Scenario<H>,
        lang: Language,
        device: Arc<Device>,
        device_label: String,
        paths: OutputPaths,
        screenshots_enabled: bool,
    ) -> Self {
        Self {
            name: case_name(scenario.name(), lang, &device_label),
            scenario,
            lang,
            device,
            device_label,
            paths,
            screenshots_enabled,
        }
    }

    /// Unique, stable name: `<scenario>_<lang>_<device label>`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scenario_name(&self) -> &'static str {
        self.scenario.name()
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_label(&self) -> &str {
        &self.device_label
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    pub fn screenshots_enabled(&self) -> bool {
        self.screenshots_enabled
    }

    fn context(&self) -> TestContext {
        TestContext::new(
            self.name.clone(),
            self.lang,
            self.device_label.clone(),
            self.paths.clone(),
            self.screenshots_enabled,
        )
    }

    /// Run the scenario against a fresh driver and API client. Every failure,
    /// panics and overrunning `timeout` included, is reported in the result
    /// rather than propagated. The driver is closed in every case where it
    /// was opened.
    pub async fn run(&self, harness: &H, timeout: Duration) -> TestResult {
        let start = Instant::now();
        debug!("Running test case: {}", self.name);

        let ctx = Arc::new(self.context());
        let (outcome, artifacts) = match self.execute(harness, Arc::clone(&ctx), timeout).await {
            Ok(done) => done,
            Err(e) => (Err(e), Vec::new()),
        };

        TestResult {
            name: self.name.clone(),
            success: outcome.is_ok(),
            duration_ms: start.elapsed().as_millis() as u64,
            error: outcome.err().map(|e| e.to_string()),
            artifacts: artifacts
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
        }
    }

    /// Outer error: setup failed. Inner result: the scenario's own outcome.
    async fn execute(
        &self,
        harness: &H,
        ctx: Arc<TestContext>,
        timeout: Duration,
    ) -> E2eResult<(E2eResult<()>, Vec<std::path::PathBuf>)> {
        let deadline = tokio::time::Instant::now() + timeout;
        self.paths.ensure()?;
        let driver = timeout_at(deadline, harness.open_driver(&self.device, Arc::clone(&ctx)))
            .await
            .map_err(|_| self.timed_out(timeout))??;

        let api = match harness.api_client(self.lang) {
            Ok(api) => api,
            Err(e) => {
                close_quietly(harness, driver, &self.name).await;
                return Err(e);
            }
        };

        let scenario = AssertUnwindSafe(self.scenario.call(&ctx, &driver, &api)).catch_unwind();
        let outcome = match timeout_at(deadline, scenario).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(panic)) => Err(E2eError::Panicked(panic_message(panic.as_ref()))),
            Err(_) => Err(self.timed_out(timeout)),
        };

        let artifacts = if outcome.is_err() {
            harness.capture_failure(&driver, &ctx).await
        } else {
            Vec::new()
        };

        close_quietly(harness, driver, &self.name).await;
        Ok((outcome, artifacts))
    }

    fn timed_out(&self, timeout: Duration) -> E2eError {
        E2eError::Timeout {
            what: format!("test case {}", self.name),
            waited_ms: timeout.as_millis() as u64,
        }
    }
}

async fn close_quietly<H: Harness>(harness: &H, driver: H::Driver, name: &str) {
    if let Err(e) = harness.close_driver(driver).await {
        warn!("Failed to close driver for {}: {}", name, e);
    }
}

fn case_name(scenario: &str, lang: Language, device_label: &str) -> String {
    format!("{}_{}_{}", scenario, lang.code(), device_label)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_name_format() {
        assert_eq!(
            case_name("check_basic_sign", Language::Sv, "mobile"),
            "check_basic_sign_sv_mobile"
        );
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
