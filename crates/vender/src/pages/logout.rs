//! Profile menu and logout.

use crate::driver::Locator;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

const PROFILE_MENU_BUTTON: &str = "//div[@class='forceHeaderButton']//span[@class='uiImage']";
const LOGOUT_LINK: &str = "//div[@class='profile-card-toplinks']//a[2]";
const LOGGED_OUT_TITLE: &str = "Salesforce: The Customer Company";

pub struct LogoutPage<'a> {
    session: &'a Session,
}

impl<'a> LogoutPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn open_profile_menu(&self) -> VenderResult<()> {
        let button = self
            .session
            .waiter()
            .visible(&Locator::xpath(PROFILE_MENU_BUTTON))
            .ok_or_else(|| VenderError::not_found("profile menu button"))?;
        self.session.driver().click(&button)?;
        self.session.reporter().info("Profile menu opened");
        Ok(())
    }

    pub fn click_logout(&self) -> VenderResult<()> {
        let link = self
            .session
            .waiter()
            .visible(&Locator::xpath(LOGOUT_LINK))
            .ok_or_else(|| VenderError::not_found("logout link"))?;
        self.session.driver().click(&link)?;
        self.session.reporter().info("Logout link clicked");
        Ok(())
    }

    pub fn perform_logout(&self) -> VenderResult<()> {
        self.open_profile_menu()?;
        self.click_logout()
    }

    /// Logged out when the marketing landing title is back.
    pub fn is_logout_successful(&self) -> VenderResult<bool> {
        self.session.waiter().page_loaded();
        let title = self.session.driver().title()?;
        Ok(title.contains(LOGGED_OUT_TITLE))
    }
}
