//! Per-case state handed to every scenario

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::OutputPaths;
use crate::language::Language;

/// What a running scenario knows about the case it belongs to
#[derive(Debug)]
pub struct TestContext {
    case_name: String,
    lang: Language,
    device_label: String,
    paths: OutputPaths,
    screenshots_enabled: bool,
    screenshot_seq: AtomicUsize,
}

impl TestContext {
    pub fn new(
        case_name: String,
        lang: Language,
        device_label: String,
        paths: OutputPaths,
        screenshots_enabled: bool,
    ) -> Self {
        Self {
            case_name,
            lang,
            device_label,
            paths,
            screenshots_enabled,
            screenshot_seq: AtomicUsize::new(0),
        }
    }

    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn device_label(&self) -> &str {
        &self.device_label
    }

    /// Path for the next numbered screenshot, `None` when screenshots are off
    pub fn next_screenshot_path(&self) -> Option<PathBuf> {
        if !self.screenshots_enabled {
            return None;
        }
        let seq = self.screenshot_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Some(
            self.paths
                .screenshot_dir
                .join(format!("{}_{:02}.png", self.case_name, seq)),
        )
    }

    /// Path in the artifacts directory, prefixed with the case name
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.paths
            .artifact_dir
            .join(format!("{}_{}", self.case_name, suffix))
    }

    /// Fixed delay, for UI transitions no element state reflects
    pub async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
