//! The seam between test cases and the outside world
//!
//! A [`Harness`] turns a device into a driver and a language into an API
//! client. [`WebHarness`] does that with real WebDriver sessions and the
//! document API.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::E2eConfig;
use crate::context::TestContext;
use crate::device::Device;
use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::language::Language;

#[async_trait]
pub trait Harness: Send + Sync + 'static {
    type Driver: Send + Sync;
    type Api: Send + Sync;

    /// Start a browser session for `device`
    async fn open_driver(&self, device: &Device, ctx: Arc<TestContext>) -> E2eResult<Self::Driver>;

    /// Build an API client bound to `lang`
    fn api_client(&self, lang: Language) -> E2eResult<Self::Api>;

    /// Save whatever helps diagnose a failed case; returns the files written
    async fn capture_failure(&self, _driver: &Self::Driver, _ctx: &TestContext) -> Vec<PathBuf> {
        Vec::new()
    }

    async fn close_driver(&self, driver: Self::Driver) -> E2eResult<()>;
}

/// Harness backed by WebDriver (local server or remote grid) and the HTTP API
pub struct WebHarness {
    config: E2eConfig,
}

impl WebHarness {
    /// Validate `config` for a local or remote run and wrap it
    pub fn new(config: E2eConfig, remote: bool) -> E2eResult<Self> {
        config.validate(remote)?;
        Ok(Self { config })
    }

    fn server_url(&self, device: &Device) -> E2eResult<String> {
        match device {
            Device::Local(_) => Ok(self.config.local.webdriver_url.clone()),
            Device::Remote(_) => self
                .config
                .remote
                .as_ref()
                .map(|grid| grid.authenticated_url())
                .ok_or_else(|| {
                    E2eError::InvalidConfig("remote device selected without a [remote] section".into())
                }),
        }
    }
}

#[async_trait]
impl Harness for WebHarness {
    type Driver = Driver;
    type Api = ApiClient;

    async fn open_driver(&self, device: &Device, ctx: Arc<TestContext>) -> E2eResult<Driver> {
        let server_url = self.server_url(device)?;
        Driver::connect(
            &server_url,
            device.capabilities(),
            device.window_size(),
            ctx,
            self.config.timeouts.clone(),
        )
        .await
    }

    fn api_client(&self, lang: Language) -> E2eResult<ApiClient> {
        ApiClient::new(self.config.api.clone(), lang)
    }

    async fn capture_failure(&self, driver: &Driver, ctx: &TestContext) -> Vec<PathBuf> {
        let mut saved = Vec::new();

        let screenshot = ctx.artifact_path("failure.png");
        match driver.save_screenshot(&screenshot).await {
            Ok(()) => saved.push(screenshot),
            Err(e) => warn!("Could not capture failure screenshot for {}: {}", ctx.case_name(), e),
        }

        let source = ctx.artifact_path("source.html");
        let written = match driver.page_source().await {
            Ok(html) => std::fs::write(&source, html).map_err(E2eError::from),
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => saved.push(source),
            Err(e) => warn!("Could not save page source for {}: {}", ctx.case_name(), e),
        }

        debug!("Captured {} failure artifact(s) for {}", saved.len(), ctx.case_name());
        saved
    }

    async fn close_driver(&self, driver: Driver) -> E2eResult<()> {
        driver.quit().await
    }
}
