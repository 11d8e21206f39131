//! Expands scenarios × devices for one language into test cases
//!
//! Generation is pure: no driver, API client or directory is touched until a
//! case is run, so one case failing cannot stop the rest from being produced.

use std::collections::HashSet;
use std::sync::Arc;

use crate::case::TestCase;
use crate::config::OutputPaths;
use crate::device::Device;
use crate::harness::Harness;
use crate::language::Language;
use crate::scenario::{Scenario, ScenarioRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Iterate the remote device list instead of the local one
    pub remote: bool,
    pub screenshots_enabled: bool,
}

/// Lazily yield one test case per (device, scenario) for `lang`.
///
/// Only the selected device list is read. Devices come in list order, with
/// scenarios in registration order nested under each device.
pub fn generate_tests<H: Harness>(
    registry: &ScenarioRegistry<H>,
    paths: &OutputPaths,
    local_devices: &[Device],
    remote_devices: &[Device],
    lang: Language,
    options: GenerateOptions,
) -> GeneratedCases<H> {
    let devices = if options.remote {
        remote_devices
    } else {
        local_devices
    };
    let labels = unique_labels(devices);

    GeneratedCases {
        scenarios: registry.as_slice().to_vec(),
        devices: devices.iter().cloned().map(Arc::new).zip(labels).collect(),
        lang,
        paths: paths.clone(),
        screenshots_enabled: options.screenshots_enabled,
        device_idx: 0,
        scenario_idx: 0,
    }
}

/// Iterator returned by [`generate_tests`]
pub struct GeneratedCases<H: Harness> {
    scenarios: Vec<Scenario<H>>,
    devices: Vec<(Arc<Device>, String)>,
    lang: Language,
    paths: OutputPaths,
    screenshots_enabled: bool,
    device_idx: usize,
    scenario_idx: usize,
}

impl<H: Harness> GeneratedCases<H> {
    fn remaining(&self) -> usize {
        if self.scenarios.is_empty() || self.device_idx >= self.devices.len() {
            return 0;
        }
        (self.devices.len() - self.device_idx) * self.scenarios.len() - self.scenario_idx
    }
}

impl<H: Harness> Iterator for GeneratedCases<H> {
    type Item = TestCase<H>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        let (device, label) = &self.devices[self.device_idx];
        let case = TestCase::new(
            self.scenarios[self.scenario_idx],
            self.lang,
            Arc::clone(device),
            label.clone(),
            self.paths.clone(),
            self.screenshots_enabled,
        );

        self.scenario_idx += 1;
        if self.scenario_idx == self.scenarios.len() {
            self.scenario_idx = 0;
            self.device_idx += 1;
        }
        Some(case)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<H: Harness> ExactSizeIterator for GeneratedCases<H> {}

/// Filename-safe device labels, with `-2`, `-3`, ... appended to repeats so
/// that no two devices in one list share a label
pub fn unique_labels(devices: &[Device]) -> Vec<String> {
    let mut seen = HashSet::new();
    devices
        .iter()
        .map(|device| {
            let base = slug(device.label());
            let mut label = base.clone();
            let mut n = 1;
            while !seen.insert(label.clone()) {
                n += 1;
                label = format!("{}-{}", base, n);
            }
            label
        })
        .collect()
}

fn slug(label: &str) -> String {
    let slug: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() {
        "device".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Browser, LocalDevice};

    fn local(name: &str) -> Device {
        Device::Local(LocalDevice {
            name: name.to_string(),
            browser: Browser::Firefox,
            window_size: None,
        })
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Desktop"), "desktop");
        assert_eq!(slug("Windows 8.1_chrome"), "windows-8-1-chrome");
        assert_eq!(slug("   "), "device");
    }

    #[test]
    fn test_unique_labels_deduplicates() {
        let devices = vec![local("ff"), local("ff"), local("ff-2"), local("ff")];
        assert_eq!(unique_labels(&devices), ["ff", "ff-2", "ff-2-2", "ff-3"]);
    }

    #[test]
    fn test_unique_labels_keeps_distinct() {
        let devices = vec![local("desktop"), local("mobile")];
        assert_eq!(unique_labels(&devices), ["desktop", "mobile"]);
    }
}
