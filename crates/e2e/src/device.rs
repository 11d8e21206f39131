//! Device matrix: the browsers and window sizes test cases run against

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Browser used by a local device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Firefox,
    Chrome,
    Edge,
    Safari,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Firefox => "firefox",
            Browser::Chrome => "chrome",
            Browser::Edge => "MicrosoftEdge",
            Browser::Safari => "safari",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// A browser driven through a WebDriver server on this machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDevice {
    pub name: String,
    #[serde(default)]
    pub browser: Browser,
    #[serde(default)]
    pub window_size: Option<WindowSize>,
}

/// A browser/platform combination requested from a remote grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDevice {
    pub browser_name: String,
    pub platform: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub window_size: Option<WindowSize>,
    /// Label embedded in screenshot and test case names
    pub screenshot_prefix: String,
    /// Command-line arguments passed through the vendor options block
    #[serde(default)]
    pub browser_args: Vec<String>,
    /// Extra capabilities merged verbatim into the session request
    #[serde(default)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    "latest".to_string()
}

impl RemoteDevice {
    /// W3C capability set for a new remote session
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".into(), json!(self.browser_name));
        caps.insert("platformName".into(), json!(self.platform));
        caps.insert("browserVersion".into(), json!(self.version));

        if !self.browser_args.is_empty() {
            if let Some(key) = vendor_options_key(&self.browser_name) {
                caps.insert(key.into(), json!({ "args": self.browser_args }));
            }
        }

        for (key, value) in &self.extra {
            caps.insert(key.clone(), value.clone());
        }
        caps
    }
}

fn vendor_options_key(browser_name: &str) -> Option<&'static str> {
    match browser_name.to_ascii_lowercase().as_str() {
        "chrome" => Some("goog:chromeOptions"),
        "firefox" => Some("moz:firefoxOptions"),
        "microsoftedge" | "edge" => Some("ms:edgeOptions"),
        _ => None,
    }
}

impl LocalDevice {
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".into(), json!(self.browser.as_str()));
        caps
    }
}

/// An execution environment for a test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Device {
    Local(LocalDevice),
    Remote(RemoteDevice),
}

impl Device {
    /// Human-readable label used in test case and file names
    pub fn label(&self) -> &str {
        match self {
            Device::Local(local) => &local.name,
            Device::Remote(remote) => &remote.screenshot_prefix,
        }
    }

    pub fn window_size(&self) -> Option<WindowSize> {
        match self {
            Device::Local(local) => local.window_size,
            Device::Remote(remote) => remote.window_size,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Device::Remote(_))
    }

    pub fn capabilities(&self) -> Map<String, Value> {
        match self {
            Device::Local(local) => local.capabilities(),
            Device::Remote(remote) => remote.capabilities(),
        }
    }
}

/// The two device lists a run chooses between
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMatrix {
    #[serde(default = "default_local_devices")]
    pub local: Vec<Device>,
    #[serde(default = "default_remote_devices")]
    pub remote: Vec<Device>,
}

impl Default for DeviceMatrix {
    fn default() -> Self {
        Self {
            local: default_local_devices(),
            remote: default_remote_devices(),
        }
    }
}

fn default_local_devices() -> Vec<Device> {
    vec![Device::Local(LocalDevice {
        name: Browser::Firefox.as_str().to_string(),
        browser: Browser::Firefox,
        window_size: None,
    })]
}

fn default_remote_devices() -> Vec<Device> {
    let chrome = |prefix: &str, width, height| {
        Device::Remote(RemoteDevice {
            browser_name: "chrome".to_string(),
            platform: "Windows 8.1".to_string(),
            version: "beta".to_string(),
            window_size: Some(WindowSize { width, height }),
            screenshot_prefix: prefix.to_string(),
            browser_args: vec!["--disable-extensions".to_string()],
            extra: Map::new(),
        })
    };
    vec![chrome("desktop", 1040, 784), chrome("mobile", 619, 706)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_matrix() {
        let matrix = DeviceMatrix::default();
        assert_eq!(matrix.local.len(), 1);
        assert_eq!(matrix.local[0].label(), "firefox");
        let labels: Vec<_> = matrix.remote.iter().map(|d| d.label()).collect();
        assert_eq!(labels, ["desktop", "mobile"]);
        assert!(matrix.remote.iter().all(Device::is_remote));
    }

    #[test]
    fn test_remote_capabilities() {
        let matrix = DeviceMatrix::default();
        let caps = matrix.remote[1].capabilities();
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(caps["platformName"], "Windows 8.1");
        assert_eq!(caps["browserVersion"], "beta");
        assert_eq!(caps["goog:chromeOptions"]["args"][0], "--disable-extensions");
    }

    #[test]
    fn test_extra_capabilities_override() {
        let mut extra = Map::new();
        extra.insert("browserVersion".into(), json!("latest"));
        extra.insert("sauce:options".into(), json!({ "screenResolution": "1280x1024" }));
        let device = RemoteDevice {
            browser_name: "safari".into(),
            platform: "macOS 13".into(),
            version: "16".into(),
            window_size: None,
            screenshot_prefix: "mac".into(),
            browser_args: vec!["--ignored".into()],
            extra,
        };
        let caps = device.capabilities();
        assert_eq!(caps["browserVersion"], "latest");
        assert!(caps.contains_key("sauce:options"));
        assert!(!caps.contains_key("goog:chromeOptions"));
    }

    #[test]
    fn test_matrix_from_toml() {
        let toml = r#"
[[remote]]
kind = "remote"
browser_name = "firefox"
platform = "Linux"
screenshot_prefix = "tablet"
window_size = { width = 800, height = 1024 }
"#;
        let matrix: DeviceMatrix = toml::from_str(toml).unwrap();
        assert_eq!(matrix.local, default_local_devices());
        assert_eq!(matrix.remote.len(), 1);
        assert_eq!(matrix.remote[0].label(), "tablet");
        assert_eq!(
            matrix.remote[0].window_size(),
            Some(WindowSize { width: 800, height: 1024 })
        );
    }
}
