//! Global search results screen.

use crate::driver::Locator;
use crate::pages::CommonActions;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

pub struct SearchPage<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> SearchPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            common: CommonActions::new(session),
        }
    }

    /// Click a record link from the results section named by `table_header`.
    ///
    /// `row` is 1-based; `None` or an empty string means the first row. A
    /// link that never shows up is a hard failure.
    pub fn click_link_from_results(
        &self,
        table_header: &str,
        row: Option<&str>,
    ) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        let target_row = match row {
            Some(r) if !r.is_empty() => r,
            _ => "1",
        };
        let locator = Locator::xpath(format!(
            "(//h2/a[text()='{table_header}']/ancestor::div[contains(@class,'resultsItem')]//th[@scope='row']//a)[{target_row}]"
        ));
        let link = self.session.waiter().visible(&locator).ok_or_else(|| {
            VenderError::not_found(format!(
                "search result link '{table_header}' in row {target_row}"
            ))
        })?;
        self.session.driver().scroll_into_view(&link)?;
        self.session.driver().click(&link)?;
        self.session.reporter().info(format!(
            "Clicked link '{table_header}' from search results row {target_row}"
        ));
        self.common.wait_for_spinner_gone();
        Ok(())
    }

    /// Record page check via its entity label.
    pub fn is_page_displayed(&self, page_name: &str) -> bool {
        self.common.wait_for_spinner_gone();
        let locator = Locator::xpath(format!(
            "//*[@slot='entityLabel' and text()='{page_name}']"
        ));
        let displayed = self.session.waiter().visible(&locator).is_some();
        if displayed {
            self.session
                .reporter()
                .info(format!("{page_name} page is displayed"));
        } else {
            self.session
                .reporter()
                .warn(format!("{page_name} page is not displayed"));
        }
        displayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fake::{FakeDom, FakeDriver, FakeElement};
    use crate::testdata::TestData;
    use serde_json::json;

    fn session_over(dom: FakeDom) -> (Session, FakeDriver) {
        let config = SuiteConfig {
            max_wait_secs: 1,
            poll_interval_ms: 5,
            ..SuiteConfig::default()
        };
        let driver = FakeDriver::with_dom(dom);
        let probe = driver.clone();
        (
            Session::with_driver_and_data(
                config,
                Box::new(driver),
                TestData::from_value(json!({})),
            ),
            probe,
        )
    }

    #[test]
    fn defaults_to_first_row() {
        let expected = "(//h2/a[text()='Accounts']/ancestor::div[contains(@class,'resultsItem')]//th[@scope='row']//a)[1]";
        let mut dom = FakeDom::new();
        dom.insert(FakeElement::new("a").selector(expected));
        let (session, probe) = session_over(dom);
        SearchPage::new(&session)
            .click_link_from_results("Accounts", None)
            .unwrap();
        assert!(probe.was_called(&format!("click {expected}")));
    }

    #[test]
    fn missing_link_is_hard_failure() {
        let (session, _) = session_over(FakeDom::new());
        let err = SearchPage::new(&session)
            .click_link_from_results("Accounts", Some("2"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Accounts"));
        assert!(msg.contains("row 2"));
    }
}
