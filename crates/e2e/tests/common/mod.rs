//! In-memory harness for exercising generation and running without a browser

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;

use signview_e2e::context::TestContext;
use signview_e2e::device::{Browser, Device, LocalDevice, RemoteDevice, WindowSize};
use signview_e2e::{ensure, E2eError, E2eResult, Harness, Language, ScenarioRegistry};

/// Records which devices and languages the cases asked for
#[derive(Default)]
pub struct FakeHarness {
    pub opened: Mutex<Vec<String>>,
    pub closed: Mutex<usize>,
    /// Device label whose driver refuses to start
    pub broken_device: Option<String>,
}

pub struct FakeDriver {
    pub label: String,
}

pub struct FakeApi {
    pub lang: Language,
}

#[async_trait]
impl Harness for FakeHarness {
    type Driver = FakeDriver;
    type Api = FakeApi;

    async fn open_driver(&self, device: &Device, ctx: Arc<TestContext>) -> E2eResult<FakeDriver> {
        if self.broken_device.as_deref() == Some(device.label()) {
            return Err(E2eError::InvalidConfig(format!(
                "cannot start {}",
                device.label()
            )));
        }
        self.opened
            .lock()
            .unwrap()
            .push(ctx.case_name().to_string());
        Ok(FakeDriver {
            label: device.label().to_string(),
        })
    }

    fn api_client(&self, lang: Language) -> E2eResult<FakeApi> {
        Ok(FakeApi { lang })
    }

    async fn capture_failure(&self, _driver: &FakeDriver, ctx: &TestContext) -> Vec<PathBuf> {
        vec![ctx.artifact_path("failure.png")]
    }

    async fn close_driver(&self, _driver: FakeDriver) -> E2eResult<()> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}

pub fn passes<'a>(
    ctx: &'a TestContext,
    drv: &'a FakeDriver,
    api: &'a FakeApi,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        ensure!(api.lang == ctx.lang(), "api bound to {}", api.lang);
        ensure!(drv.label == ctx.device_label(), "driver for {}", drv.label);
        Ok(())
    }
    .boxed()
}

pub fn fails<'a>(
    _ctx: &'a TestContext,
    _drv: &'a FakeDriver,
    _api: &'a FakeApi,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        ensure!(1 + 1 == 3, "arithmetic is broken");
        Ok(())
    }
    .boxed()
}

pub fn panics<'a>(
    _ctx: &'a TestContext,
    _drv: &'a FakeDriver,
    _api: &'a FakeApi,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let blow_up = true;
        if blow_up {
            panic!("scenario blew up");
        }
        Ok(())
    }
    .boxed()
}

pub fn hangs<'a>(
    _ctx: &'a TestContext,
    _drv: &'a FakeDriver,
    _api: &'a FakeApi,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
    .boxed()
}

pub fn registry(names: &[&'static str]) -> ScenarioRegistry<FakeHarness> {
    let mut registry = ScenarioRegistry::new();
    for &name in names {
        registry.register(name, passes).unwrap();
    }
    registry
}

pub fn local(name: &str) -> Device {
    Device::Local(LocalDevice {
        name: name.to_string(),
        browser: Browser::Firefox,
        window_size: None,
    })
}

pub fn remote(prefix: &str) -> Device {
    Device::Remote(RemoteDevice {
        browser_name: "chrome".to_string(),
        platform: "Windows 10".to_string(),
        version: "latest".to_string(),
        window_size: Some(WindowSize {
            width: 1024,
            height: 768,
        }),
        screenshot_prefix: prefix.to_string(),
        browser_args: Vec::new(),
        extra: Default::default(),
    })
}
