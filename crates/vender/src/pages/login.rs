//! Login screen.

use crate::driver::Locator;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

const USERNAME_INPUT: &str = "//input[@id='username']";
const PASSWORD_INPUT: &str = "//input[@id='password']";
const LOGIN_BUTTON: &str = "//input[@id='Login']";
const HOME_LINK: &str = "//a[@title='Home']";

pub struct LoginPage<'a> {
    session: &'a Session,
}

impl<'a> LoginPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn enter_username(&self, username: &str) -> VenderResult<()> {
        let input = self.require(USERNAME_INPUT, "username input")?;
        self.session.driver().clear(&input)?;
        self.session.driver().type_text(&input, username)?;
        self.session
            .reporter()
            .info(format!("Entered username: {username}"));
        Ok(())
    }

    pub fn enter_password(&self, password: &str) -> VenderResult<()> {
        let input = self.require(PASSWORD_INPUT, "password input")?;
        self.session.driver().clear(&input)?;
        self.session.driver().type_text(&input, password)?;
        self.session.reporter().info("Entered password: [PROTECTED]");
        Ok(())
    }

    /// Navigate to the login URL and submit the configured credentials.
    pub fn perform_login(&self, username: &str, password: &str) -> VenderResult<()> {
        self.session
            .driver()
            .navigate(&self.session.config().base_url)?;
        self.enter_username(username)?;
        self.enter_password(password)?;
        let button = self.require(LOGIN_BUTTON, "login button")?;
        self.session.driver().click(&button)?;
        self.session.reporter().info("Clicked login button");
        Ok(())
    }

    /// Login landed on the app shell when the home link is visible.
    pub fn is_login_successful(&self) -> bool {
        self.session
            .reporter()
            .info("Verifying login by home link visibility");
        self.session
            .waiter()
            .visible(&Locator::xpath(HOME_LINK))
            .is_some()
    }

    fn require(
        &self,
        xpath: &str,
        what: &str,
    ) -> VenderResult<crate::driver::ElementHandle> {
        self.session
            .waiter()
            .visible(&Locator::xpath(xpath))
            .ok_or_else(|| VenderError::not_found(what))
    }
}
