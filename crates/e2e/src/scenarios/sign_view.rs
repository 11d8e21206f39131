//! Sign view flows: signing, rejecting, and viewing a cancelled document

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::arrow_scroll;
use crate::api::ApiClient;
use crate::context::TestContext;
use crate::driver::Driver;
use crate::ensure;
use crate::error::E2eResult;
use crate::harness::WebHarness;
use crate::scenario::ScenarioFn;

const SIGN_VIEW_TITLE: &str = "Scrive";
const SCROLL_ARROW_DOWN: &str = ".scroll-arrow.down";
const SIGN_BUTTON: &str = ".section.sign .button.action";
const REJECT_BUTTON: &str = ".section.sign .transparent-button";
const CONFIRM_REJECT_BUTTON: &str = ".section.sign .button-reject";
const SIGN_SECTION: &str = ".sign.section";
const OVERLAY: &str = ".above-overlay";
const REJECT_TEXTAREA: &str = ".reject-textarea textarea";
const SIGNED_HEADER: &str = ".instructions.s-header-doc-signed";
const CANCELLED_HEADER: &str = ".instructions.s-header-doc-cancelled";
const CANCELLED_ICON: &str = "span.icon.status.cancelled";
const REJECTION_REASON: &str = "A custom reason for rejection.";
const REDIRECT_TARGET: &str = "https://google.com/";
const REDIRECT_TITLE: &str = "Google";
const REDIRECT_WAIT: Duration = Duration::from_secs(30);
const MODAL_SETTLE: Duration = Duration::from_secs(1);

pub(super) const SCENARIOS: &[(&str, ScenarioFn<WebHarness>)] = &[
    ("check_basic_sign", check_basic_sign),
    (
        "check_sign_with_signsuccessredirect",
        check_sign_with_signsuccessredirect,
    ),
    ("check_regular_rejection", check_regular_rejection),
    ("check_custom_rejection", check_custom_rejection),
    ("check_sign_and_cancel", check_sign_and_cancel),
];

fn check_basic_sign<'a>(
    _ctx: &'a TestContext,
    drv: &'a Driver,
    api: &'a ApiClient,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let doc = api.create_standard_doc("basic sign").await?;
        let doc = api.update_document(&doc).await?;
        let doc = api.ready(&doc).await?;

        drv.open_url(&api.sign_url(doc.other_signatory()?)?).await?;
        let title = drv.title().await?;
        ensure!(
            title == SIGN_VIEW_TITLE,
            "expected page title {:?}, got {:?}",
            SIGN_VIEW_TITLE,
            title
        );

        drv.wait_for_element(SCROLL_ARROW_DOWN).await?;
        drv.screenshot(None).await?;

        drv.scroll_to_bottom().await?;
        drv.screenshot(None).await?;

        // first click opens the confirmation modal
        drv.wait_for_element_and_click(SIGN_BUTTON).await?;
        drv.wait_for_element(OVERLAY).await?;
        drv.screenshot(Some(MODAL_SETTLE)).await?;

        drv.wait_for_element_and_click(SIGN_BUTTON).await?;
        drv.screenshot(Some(MODAL_SETTLE)).await?;

        drv.wait_for_element_to_disappear(SIGN_SECTION).await?;
        drv.wait_for_element(SIGNED_HEADER).await?;
        drv.screenshot(None).await?;
        Ok(())
    }
    .boxed()
}

fn check_sign_with_signsuccessredirect<'a>(
    _ctx: &'a TestContext,
    drv: &'a Driver,
    api: &'a ApiClient,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let mut doc = api.create_standard_doc("success redirect").await?;
        doc.other_signatory_mut()?.sign_success_redirect_url = Some(REDIRECT_TARGET.to_string());
        let doc = api.update_document(&doc).await?;
        let doc = api.ready(&doc).await?;

        drv.open_url(&api.sign_url(doc.other_signatory()?)?).await?;

        drv.scroll_to_bottom().await?;
        drv.wait_for_element_and_click(SIGN_BUTTON).await?;
        drv.wait_for_element(OVERLAY).await?;
        drv.wait_for_element_and_click(SIGN_BUTTON).await?;

        drv.wait_for_title_contains(REDIRECT_TITLE, REDIRECT_WAIT).await
    }
    .boxed()
}

fn check_regular_rejection<'a>(
    _ctx: &'a TestContext,
    drv: &'a Driver,
    api: &'a ApiClient,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let doc = api.create_standard_doc("regular rejection").await?;
        let doc = api.ready(&api.update_document(&doc).await?).await?;

        drv.open_url(&api.sign_url(doc.other_signatory()?)?).await?;
        arrow_scroll(drv, true).await?;
        drv.screenshot(Some(MODAL_SETTLE)).await?;

        drv.wait_for_element_and_click(REJECT_BUTTON).await?;
        drv.wait_for_element(OVERLAY).await?;
        drv.screenshot(Some(MODAL_SETTLE)).await?;

        drv.wait_for_element_and_click(CONFIRM_REJECT_BUTTON).await?;
        drv.wait_for_element_to_disappear(SIGN_SECTION).await?;
        drv.wait_for_element(CANCELLED_HEADER).await?;
        drv.screenshot(None).await?;
        Ok(())
    }
    .boxed()
}

fn check_custom_rejection<'a>(
    ctx: &'a TestContext,
    drv: &'a Driver,
    api: &'a ApiClient,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let doc = api.create_standard_doc("custom rejection").await?;
        let doc = api.ready(&api.update_document(&doc).await?).await?;

        drv.open_url(&api.sign_url(doc.other_signatory()?)?).await?;
        arrow_scroll(drv, true).await?;

        drv.wait_for_element_and_click(REJECT_BUTTON).await?;
        drv.wait_for_element(OVERLAY).await?;

        let textarea = drv.get_element(REJECT_TEXTAREA, 1).await?;
        textarea.send_keys(REJECTION_REASON).await?;
        drv.screenshot(None).await?;

        // 'back' must close the modal and discard the typed reason
        drv.wait_for_element_and_click(REJECT_BUTTON).await?;
        drv.wait_for_element_to_disappear(OVERLAY).await?;
        // 0.2s z-index transition
        ctx.sleep(Duration::from_millis(500)).await;

        drv.wait_for_element_and_click(REJECT_BUTTON).await?;
        drv.wait_for_element(OVERLAY).await?;

        let textarea = drv.get_element(REJECT_TEXTAREA, 1).await?;
        let value = textarea.prop("value").await?.unwrap_or_default();
        ensure!(value.is_empty(), "textarea should be empty, not: {}", value);

        textarea.send_keys(REJECTION_REASON).await?;
        drv.wait_for_element_and_click(CONFIRM_REJECT_BUTTON).await?;

        drv.wait_for_element_to_disappear(SIGN_SECTION).await?;
        drv.wait_for_element(CANCELLED_HEADER).await?;
        Ok(())
    }
    .boxed()
}

fn check_sign_and_cancel<'a>(
    _ctx: &'a TestContext,
    drv: &'a Driver,
    api: &'a ApiClient,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let mut doc = api.create_standard_doc("sign and cancel").await?;
        doc.author_mut()?.signs = true;
        let doc = api.update_document(&doc).await?;
        let doc = api.ready(&doc).await?;
        let doc = api.sign(&doc, doc.author()?).await?;
        let sign_url = api.sign_url(doc.other_signatory()?)?;
        api.cancel_document(&doc).await?;

        drv.open_url(&sign_url).await?;
        drv.wait_for_element(CANCELLED_ICON).await?;
        drv.screenshot(None).await?;
        Ok(())
    }
    .boxed()
}
