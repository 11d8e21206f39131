//! Discovery: every test case of a run, across all languages

use tracing::{info, warn};

use crate::case::TestCase;
use crate::config::{E2eConfig, OutputPaths, RunSettings};
use crate::device::DeviceMatrix;
use crate::error::E2eResult;
use crate::generator::{generate_tests, GenerateOptions};
use crate::harness::{Harness, WebHarness};
use crate::language::Language;
use crate::scenario::ScenarioRegistry;

/// Everything a run is generated from
pub struct Discovery<H: Harness> {
    pub registry: ScenarioRegistry<H>,
    pub matrix: DeviceMatrix,
    pub languages: Vec<Language>,
    pub paths: OutputPaths,
    pub settings: RunSettings,
    pub screenshots_enabled: bool,
}

impl Discovery<WebHarness> {
    /// Built-in scenarios, every supported language and default output paths.
    /// Devices come from the `[matrix]` of `config`, else the built-in matrix.
    pub fn builtin(config: Option<&E2eConfig>, settings: RunSettings) -> E2eResult<Self> {
        Ok(Self {
            registry: crate::scenarios::registry()?,
            matrix: config.map(E2eConfig::device_matrix).unwrap_or_default(),
            languages: Language::ALL.to_vec(),
            paths: OutputPaths::default(),
            settings,
            screenshots_enabled: true,
        })
    }

    /// [`Discovery::builtin`] with the config file, if one exists, and the
    /// remote/single-test switches from the environment
    pub fn from_env() -> E2eResult<Self> {
        let config = E2eConfig::load_optional(&E2eConfig::default_path())?;
        Self::builtin(config.as_ref(), RunSettings::from_env())
    }
}

/// All test cases of a run: languages in order, each expanded by the
/// generator. Honors the single-test override.
pub fn make_tests_with<H: Harness>(discovery: Discovery<H>) -> impl Iterator<Item = TestCase<H>> {
    let Discovery {
        registry,
        matrix,
        languages,
        paths,
        settings,
        screenshots_enabled,
    } = discovery;

    if let Some(name) = &settings.single_test {
        if registry.get(name).is_none() {
            warn!(
                "Single test {:?} matches no scenario (known: {})",
                name,
                registry.names().join(", ")
            );
        } else {
            info!("Restricting run to scenario {}", name);
        }
    }

    let options = GenerateOptions {
        remote: settings.remote,
        screenshots_enabled,
    };
    let single_test = settings.single_test;

    languages
        .into_iter()
        .flat_map(move |lang| {
            generate_tests(
                &registry,
                &paths,
                &matrix.local,
                &matrix.remote,
                lang,
                options,
            )
        })
        .filter(move |case| {
            single_test
                .as_deref()
                .map_or(true, |name| case.scenario_name() == name)
        })
}

/// Zero-argument discovery entry point for runners: see [`Discovery::from_env`]
pub fn make_tests() -> E2eResult<impl Iterator<Item = TestCase<WebHarness>>> {
    Ok(make_tests_with(Discovery::from_env()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG_PATH_VAR, EXAMPLE_CONFIG};

    const MATRIX: &str = r#"
[matrix]
local = [{ kind = "local", name = "chrome", browser = "chrome" }]
remote = [{ kind = "remote", browser_name = "safari", platform = "macOS 13", screenshot_prefix = "mac" }]
"#;

    #[test]
    fn test_builtin_uses_config_matrix() {
        let config = E2eConfig::from_toml(&format!("{}{}", EXAMPLE_CONFIG, MATRIX)).unwrap();
        let discovery = Discovery::builtin(Some(&config), RunSettings::default()).unwrap();
        assert_eq!(discovery.matrix, config.device_matrix());

        let names: Vec<_> = make_tests_with(discovery)
            .filter(|c| c.lang() == Language::En)
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names[0], "check_basic_sign_en_chrome");
        assert!(names.iter().all(|n| n.ends_with("_en_chrome")));
    }

    #[test]
    fn test_builtin_without_config_uses_builtin_matrix() {
        let discovery = Discovery::builtin(None, RunSettings::default()).unwrap();
        assert_eq!(discovery.matrix, DeviceMatrix::default());
    }

    #[test]
    fn test_from_env_reads_config_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e2e.toml");
        std::fs::write(&path, format!("{}{}", EXAMPLE_CONFIG, MATRIX)).unwrap();

        std::env::set_var(CONFIG_PATH_VAR, &path);
        let discovery = Discovery::from_env();
        std::env::set_var(CONFIG_PATH_VAR, dir.path().join("missing.toml"));
        let fallback = Discovery::from_env();
        std::env::remove_var(CONFIG_PATH_VAR);

        let matrix = discovery.unwrap().matrix;
        assert_eq!(matrix.local[0].label(), "chrome");
        assert_eq!(matrix.remote[0].label(), "mac");
        assert_eq!(fallback.unwrap().matrix, DeviceMatrix::default());
    }
}
