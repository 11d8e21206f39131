//! WebDriver handle used by scenarios

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::TimeoutConfig;
use crate::context::TestContext;
use crate::device::WindowSize;
use crate::error::{E2eError, E2eResult};

/// A browser session bound to one test case
pub struct Driver {
    inner: WebDriver,
    ctx: Arc<TestContext>,
    timeouts: TimeoutConfig,
}

impl Driver {
    /// Open a session on the WebDriver server at `server_url`
    pub async fn connect(
        server_url: &str,
        capabilities: Map<String, Value>,
        window_size: Option<WindowSize>,
        ctx: Arc<TestContext>,
        timeouts: TimeoutConfig,
    ) -> E2eResult<Self> {
        debug!("Opening WebDriver session for {}", ctx.case_name());
        let inner = WebDriver::new(server_url, capabilities).await?;

        if let Some(size) = window_size {
            inner
                .set_window_rect(0, 0, size.width.into(), size.height.into())
                .await?;
        }

        Ok(Self {
            inner,
            ctx,
            timeouts,
        })
    }

    pub async fn open_url(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.inner.goto(url).await?;
        Ok(())
    }

    pub async fn title(&self) -> E2eResult<String> {
        Ok(self.inner.title().await?)
    }

    /// The `number`-th element matching `selector`, counting from 1
    pub async fn get_element(&self, selector: &str, number: usize) -> E2eResult<WebElement> {
        let mut elements = self.inner.find_all(By::Css(selector)).await?;
        if number == 0 || number > elements.len() {
            return Err(E2eError::ElementNotFound {
                selector: selector.to_string(),
                number,
            });
        }
        Ok(elements.swap_remove(number - 1))
    }

    /// First displayed element matching `selector`, if any
    async fn displayed_element(&self, selector: &str) -> E2eResult<Option<WebElement>> {
        for element in self.inner.find_all(By::Css(selector)).await? {
            // Elements can go stale between lookup and the visibility check
            if element.is_displayed().await.unwrap_or(false) {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Wait until an element matching `selector` is displayed
    pub async fn wait_for_element(&self, selector: &str) -> E2eResult<WebElement> {
        let deadline = self.timeouts.element_wait();
        let start = Instant::now();

        loop {
            if let Some(element) = self.displayed_element(selector).await? {
                return Ok(element);
            }
            if start.elapsed() >= deadline {
                return Err(timeout_error(selector, start));
            }
            sleep(self.timeouts.poll_interval()).await;
        }
    }

    /// Wait until no element matching `selector` is displayed
    pub async fn wait_for_element_to_disappear(&self, selector: &str) -> E2eResult<()> {
        let what = format!("{} to disappear", selector);
        self.wait_until(&what, self.timeouts.element_wait(), || async {
            Ok::<_, E2eError>(self.displayed_element(selector).await?.is_none())
        })
        .await
    }

    pub async fn wait_for_element_and_click(&self, selector: &str) -> E2eResult<()> {
        self.wait_for_element(selector).await?.click().await?;
        Ok(())
    }

    /// Poll `condition` until it holds or `timeout` elapses
    pub async fn wait_until<F, Fut>(
        &self,
        what: &str,
        timeout: Duration,
        mut condition: F,
    ) -> E2eResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<bool>>,
    {
        let start = Instant::now();
        loop {
            if condition().await? {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(timeout_error(what, start));
            }
            sleep(self.timeouts.poll_interval()).await;
        }
    }

    /// Wait until the page title contains `text`
    pub async fn wait_for_title_contains(&self, text: &str, timeout: Duration) -> E2eResult<()> {
        let what = format!("title containing {:?}", text);
        self.wait_until(&what, timeout, || async {
            Ok::<_, E2eError>(self.inner.title().await?.contains(text))
        })
        .await
    }

    pub async fn scroll_to_top(&self) -> E2eResult<()> {
        self.inner
            .execute("window.scrollTo(0, 0);", Vec::new())
            .await?;
        Ok(())
    }

    pub async fn scroll_to_bottom(&self) -> E2eResult<()> {
        self.inner
            .execute(
                "window.scrollTo(0, document.body.scrollHeight);",
                Vec::new(),
            )
            .await?;
        Ok(())
    }

    /// Take the next numbered screenshot of this case, optionally after a
    /// delay. Returns `None` when screenshots are disabled.
    pub async fn screenshot(&self, first_sleep_for: Option<Duration>) -> E2eResult<Option<PathBuf>> {
        let Some(path) = self.ctx.next_screenshot_path() else {
            return Ok(None);
        };
        if let Some(delay) = first_sleep_for {
            sleep(delay).await;
        }
        self.save_screenshot(&path).await?;
        info!("Screenshot saved: {}", path.display());
        Ok(Some(path))
    }

    pub async fn save_screenshot(&self, path: &Path) -> E2eResult<()> {
        self.inner.screenshot(path).await?;
        Ok(())
    }

    pub async fn page_source(&self) -> E2eResult<String> {
        Ok(self.inner.source().await?)
    }

    /// End the browser session
    pub async fn quit(self) -> E2eResult<()> {
        self.inner.quit().await?;
        Ok(())
    }
}

fn timeout_error(what: &str, start: Instant) -> E2eError {
    E2eError::Timeout {
        what: what.to_string(),
        waited_ms: start.elapsed().as_millis() as u64,
    }
}
