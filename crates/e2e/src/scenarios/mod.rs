//! Built-in scenarios run against the signing application

mod sign_view;

use std::time::Duration;

use tracing::debug;

use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::harness::WebHarness;
use crate::scenario::ScenarioRegistry;

const MAX_ARROW_CLICKS: usize = 20;

/// Every built-in scenario, in run order
pub fn registry() -> E2eResult<ScenarioRegistry<WebHarness>> {
    let mut registry = ScenarioRegistry::new();
    for &(name, run) in sign_view::SCENARIOS {
        registry.register(name, run)?;
    }
    Ok(registry)
}

/// Follow the sign view's down arrow until the sign section is reached
pub(crate) async fn arrow_scroll(drv: &Driver, skip_scroll_to_top: bool) -> E2eResult<()> {
    if !skip_scroll_to_top {
        drv.scroll_to_top().await?;
    }
    drv.wait_for_element(".scroll-arrow").await?;

    for clicks in 0..MAX_ARROW_CLICKS {
        let arrow = match drv.get_element(".scroll-arrow.down", 1).await {
            Ok(arrow) => arrow,
            Err(E2eError::ElementNotFound { .. }) => break,
            Err(e) => return Err(e),
        };
        if !arrow.is_displayed().await? {
            break;
        }
        debug!("Arrow click {}", clicks + 1);
        arrow.click().await?;
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    drv.wait_for_element(".section.sign").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), sign_view::SCENARIOS.len());
        assert_eq!(
            registry.names(),
            [
                "check_basic_sign",
                "check_sign_with_signsuccessredirect",
                "check_regular_rejection",
                "check_custom_rejection",
                "check_sign_and_cancel",
            ]
        );
    }

    #[test]
    fn test_builtin_names_cannot_be_registered_twice() {
        let mut registry = registry().unwrap();
        let (name, run) = sign_view::SCENARIOS[0];
        assert!(registry.register(name, run).is_err());
        assert_eq!(registry.len(), sign_view::SCENARIOS.len());
    }
}
