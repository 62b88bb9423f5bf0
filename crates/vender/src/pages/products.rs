//! Product lookup table inside the quoting iframe.

use crate::pages::CommonActions;
use crate::result::VenderResult;
use crate::session::Session;
use crate::shadow::ShadowPath;

pub struct ProductSelection<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> ProductSelection<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            common: CommonActions::new(session),
        }
    }

    /// Tick the lookup checkbox for one product. Missing products abort the
    /// scenario; the iframe context is restored either way.
    pub fn select_product_by_name(&self, product_name: &str) -> VenderResult<()> {
        self.common.enter_accessibility_iframe()?;
        let outcome = self.session.resolver().select_product_by_name(product_name);
        self.common.leave_iframe()?;
        outcome?;
        self.session
            .reporter()
            .info(format!("Selected product: {product_name}"));
        Ok(())
    }

    /// Confirm the ticked products with the table's Select button.
    pub fn click_select_button(&self) -> VenderResult<()> {
        self.common.enter_accessibility_iframe()?;
        let result = self.session.resolver().resolve_required(
            &Self::select_button_path(),
            "product Select button",
        );
        let outcome = result.and_then(|button| self.session.driver().click(&button));
        self.common.leave_iframe()?;
        outcome?;
        self.session
            .reporter()
            .info("Clicked Select to confirm chosen products");
        self.common.wait_for_spinner_gone();
        Ok(())
    }

    fn select_button_path() -> ShadowPath {
        ShadowPath::start("#sbPageContainer")
            .then("#content > sb-product-lookup")
            .then("#plSelect")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fake::{FakeDom, FakeDriver, FakeElement};
    use crate::result::VenderError;
    use crate::testdata::TestData;
    use serde_json::json;

    const IFRAME: &str = "//iframe[@title='accessibility title']";

    fn iframe_dom() -> (FakeDom, u64) {
        let mut dom = FakeDom::new();
        let frame = dom.insert(FakeElement::new("iframe").selector(IFRAME));
        (dom, frame)
    }

    fn session_over(dom: FakeDom) -> (Session, FakeDriver) {
        let driver = FakeDriver::with_dom(dom);
        let probe = driver.clone();
        let session = Session::with_driver_and_data(
            SuiteConfig {
                max_wait_secs: 1,
                poll_interval_ms: 5,
                ..SuiteConfig::default()
            },
            Box::new(driver),
            TestData::from_value(json!({})),
        );
        (session, probe)
    }

    #[test]
    fn select_button_clicked_inside_iframe_then_context_restored() {
        let (mut dom, frame) = iframe_dom();
        let container = dom.insert_in_frame(
            frame,
            FakeElement::new("div").selector("#sbPageContainer"),
        );
        let lookup = dom.insert_shadow_child(
            container,
            FakeElement::new("sb-product-lookup").selector("#content > sb-product-lookup"),
        );
        dom.insert_shadow_child(lookup, FakeElement::new("button").selector("#plSelect"));

        let (session, probe) = session_over(dom);
        ProductSelection::new(&session).click_select_button().unwrap();

        let journal = probe.journal();
        let enter = journal.iter().position(|e| e.starts_with("enter_frame")).unwrap();
        let click = journal.iter().position(|e| e == "click #plSelect").unwrap();
        let leave = journal.iter().position(|e| e == "leave_frame").unwrap();
        assert!(enter < click && click < leave);
    }

    #[test]
    fn missing_product_restores_context_and_fails() {
        let (dom, _) = iframe_dom();
        let (session, probe) = session_over(dom);
        let err = ProductSelection::new(&session)
            .select_product_by_name("Listings")
            .unwrap_err();
        assert!(matches!(err, VenderError::NotFound { .. }));
        assert!(probe.was_called("leave_frame"));
    }
}
