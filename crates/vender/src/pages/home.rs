//! App-shell home screen and global search.

use crate::driver::{Key, Locator};
use crate::pages::CommonActions;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

const HOME_TAB: &str = "//one-app-nav-bar-item-root[@data-id='home']/a";
const SEARCH_BUTTON: &str = "//button[@aria-label='Search']";
const SEARCH_INPUT: &str = "//input[@placeholder='Search...' and @type='search']";

pub struct HomePage<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> HomePage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            common: CommonActions::new(session),
        }
    }

    pub fn click_home_tab(&self) -> VenderResult<()> {
        let tab = self
            .session
            .waiter()
            .visible(&Locator::xpath(HOME_TAB))
            .ok_or_else(|| VenderError::not_found("Home tab"))?;
        self.session.driver().js_click(&tab)?;
        self.session.reporter().info("Clicked Home tab");
        self.common.wait_for_spinner_gone();
        Ok(())
    }

    /// Hard check: the run cannot continue without the app shell.
    pub fn verify_home_displayed(&self) -> VenderResult<()> {
        match self.session.waiter().visible(&Locator::xpath(HOME_TAB)) {
            Some(_) => {
                self.session.reporter().info("Home page is displayed");
                Ok(())
            }
            None => Err(VenderError::assertion("Home page is not displayed")),
        }
    }

    /// Global search: open the box, type, submit, let results settle.
    pub fn search_and_open(&self, search_text: &str) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        let button = self
            .session
            .waiter()
            .clickable(&Locator::xpath(SEARCH_BUTTON))
            .ok_or_else(|| VenderError::not_found("search button"))?;
        self.session.driver().click(&button)?;
        self.session.reporter().info("Clicked Search button");

        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(SEARCH_INPUT))
            .ok_or_else(|| VenderError::not_found("search input"))?;
        self.session.driver().type_text(&input, search_text)?;
        self.session
            .reporter()
            .info(format!("Entered search text: {search_text}"));
        self.session.driver().press_key(&input, Key::Enter)?;
        self.common.wait_for_spinner_gone();
        Ok(())
    }
}
