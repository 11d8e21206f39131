//! Named scenario procedures and their ordered registry

use std::fmt;

use futures::future::BoxFuture;

use crate::context::TestContext;
use crate::error::{E2eError, E2eResult};
use crate::harness::Harness;

/// Scenario body: drives the UI through `driver` and prepares data via `api`
pub type ScenarioFn<H> = for<'a> fn(
    &'a TestContext,
    &'a <H as Harness>::Driver,
    &'a <H as Harness>::Api,
) -> BoxFuture<'a, E2eResult<()>>;

pub struct Scenario<H: Harness> {
    name: &'static str,
    run: ScenarioFn<H>,
}

impl<H: Harness> Scenario<H> {
    pub fn new(name: &'static str, run: ScenarioFn<H>) -> Self {
        Self { name, run }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call<'a>(
        &self,
        ctx: &'a TestContext,
        driver: &'a H::Driver,
        api: &'a H::Api,
    ) -> BoxFuture<'a, E2eResult<()>> {
        (self.run)(ctx, driver, api)
    }
}

impl<H: Harness> Clone for Scenario<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: Harness> Copy for Scenario<H> {}

impl<H: Harness> fmt::Debug for Scenario<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

/// Scenarios in registration order
pub struct ScenarioRegistry<H: Harness> {
    scenarios: Vec<Scenario<H>>,
}

impl<H: Harness> Default for ScenarioRegistry<H> {
    fn default() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }
}

impl<H: Harness> Clone for ScenarioRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            scenarios: self.scenarios.clone(),
        }
    }
}

impl<H: Harness> ScenarioRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scenario. Names must be unique and filename-safe
    /// (ASCII letters, digits, `_` and `-`).
    pub fn register(&mut self, name: &'static str, run: ScenarioFn<H>) -> E2eResult<()> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(E2eError::InvalidConfig(format!(
                "Invalid scenario name: {:?}",
                name
            )));
        }
        if self.get(name).is_some() {
            return Err(E2eError::InvalidConfig(format!(
                "Scenario registered twice: {}",
                name
            )));
        }
        self.scenarios.push(Scenario::new(name, run));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Scenario<H>> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.scenarios.iter().map(|s| s.name).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[Scenario<H>] {
        &self.scenarios
    }
}
