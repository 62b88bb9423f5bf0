//! Opportunities tab, the New Opportunity dialog and the quote entry points.

use crate::driver::{Key, Locator};
use crate::pages::CommonActions;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

const OPPORTUNITIES_TAB: &str = "//one-app-nav-bar-item-root[@data-id='Opportunity']/a";
const TAB_DROPDOWN: &str =
    "//one-app-nav-bar-item-root[@data-id='Opportunity']//a[@role='button']";
const NEW_OPPORTUNITY_LINK: &str =
    "//div[@class='menuItemsWrapper']//span[text()='New Opportunity']";
const NAME_INPUT: &str = "//input[@name='Name']";
const STAGE_DROPDOWN: &str = "//*[@aria-label='Stage']//span[@part='input-button-value']";
const ACCOUNT_COMBOBOX: &str =
    "//label[text()='Account Name']//following-sibling::div//input[@role='combobox']";
const DEAL_TYPE_DROPDOWN: &str =
    "//*[@aria-label='Deal Type']//span[@part='input-button-value']";
const CURRENCY_DROPDOWN: &str =
    "//*[@aria-label='Opportunity Currency']//span[@part='input-button-value']";
const RENEWAL_DROPDOWN: &str = "//*[@aria-label='Renewal?']//span[@part='input-button-value']";
const CLOSE_DATE_INPUT: &str = "//input[@name='CloseDate']";
const PRICING_MODEL_DROPDOWN: &str =
    "//*[@aria-label='Quote Pricing Model']//span[@part='input-button-value']";
const SEARCH_INPUT: &str = "//input[@name='Opportunity-search-input']";
const CREATE_QUOTE_BUTTON: &str =
    "//ul[@class='slds-button-group-list']//*[@title='Create Quote']//button";
const QUOTES_LINK: &str = "//slot[contains(text(),'Quotes')]/../parent::a[@id='window']";
const QUOTE_NUMBER_LINK: &str = "//*[@data-label='Quote Number']//a[@id='window']";

pub struct OpportunitiesPage<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> OpportunitiesPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            common: CommonActions::new(session),
        }
    }

    pub fn click_tab(&self) -> VenderResult<()> {
        let tab = self
            .session
            .waiter()
            .visible(&Locator::xpath(OPPORTUNITIES_TAB))
            .ok_or_else(|| VenderError::not_found("Opportunities tab"))?;
        self.session.driver().js_click(&tab)?;
        self.session.reporter().info("Clicked Opportunities tab");
        self.common.wait_for_spinner_gone();
        Ok(())
    }

    pub fn wait_until_tab_visible(&self) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        self.session
            .waiter()
            .visible(&Locator::xpath(TAB_DROPDOWN))
            .ok_or_else(|| VenderError::not_found("Opportunities tab dropdown"))?;
        Ok(())
    }

    pub fn click_new_opportunity_from_dropdown(&self) -> VenderResult<()> {
        let tab = self
            .session
            .waiter()
            .visible(&Locator::xpath(TAB_DROPDOWN))
            .ok_or_else(|| VenderError::not_found("Opportunities tab dropdown"))?;
        self.session.driver().js_click(&tab)?;
        let link = self
            .session
            .waiter()
            .visible(&Locator::xpath(NEW_OPPORTUNITY_LINK))
            .ok_or_else(|| VenderError::not_found("New Opportunity menu item"))?;
        self.session.driver().js_click(&link)?;
        self.session.reporter().info("Opened New Opportunity dialog");
        Ok(())
    }

    pub fn is_dialog_header_correct(&self, expected: &str) -> VenderResult<bool> {
        self.common.dialog_header_matches(expected)
    }

    pub fn select_record_type(&self, record_type: &str) -> VenderResult<()> {
        let radio = Locator::xpath(format!(
            "//div[@class='changeRecordTypeOptionRightColumn']/span[text()='{record_type}']/../../div/input[@type='radio']"
        ));
        let button = self
            .session
            .waiter()
            .visible(&radio)
            .ok_or_else(|| VenderError::not_found(format!("record type '{record_type}'")))?;
        self.session.driver().js_click(&button)?;
        self.session
            .reporter()
            .info(format!("Selected record type: {record_type}"));
        Ok(())
    }

    pub fn click_next(&self) -> VenderResult<()> {
        self.common.click_next()
    }

    pub fn type_name(&self, opportunity_name: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(NAME_INPUT))
            .ok_or_else(|| VenderError::not_found("opportunity name input"))?;
        self.session.driver().type_text(&input, opportunity_name)?;
        self.session
            .reporter()
            .info(format!("Entered opportunity name: {opportunity_name}"));
        Ok(())
    }

    pub fn select_stage(&self, stage: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(STAGE_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Stage']/..//div[@part='dropdown overlay']//span[text()='{stage}']"
            )),
            "stage",
        )
    }

    pub fn choose_account_name(&self, account_name: &str) -> VenderResult<()> {
        self.common.pick_from_combobox(
            &Locator::xpath(ACCOUNT_COMBOBOX),
            account_name,
            &Locator::xpath(format!(
                "//label[text()='Account Name']/..//div[@part='dropdown overlay']//span[text()='{account_name}']"
            )),
            "account name",
        )
    }

    pub fn select_deal_type(&self, deal_type: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(DEAL_TYPE_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Deal Type']/..//div[@part='dropdown overlay']//span[text()='{deal_type}']"
            )),
            "deal type",
        )
    }

    /// Currency entries carry the code in their `title` attribute.
    pub fn select_currency(&self, currency: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(CURRENCY_DROPDOWN),
            &Locator::xpath(format!(
                "//*[@aria-label='Opportunity Currency']//span[@title='{currency}']"
            )),
            "opportunity currency",
        )
    }

    pub fn select_renewal(&self, renewal: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(RENEWAL_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Renewal?']/..//div[@part='dropdown overlay']//span[text()='{renewal}']"
            )),
            "renewal",
        )
    }

    pub fn type_close_date(&self, close_date: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(CLOSE_DATE_INPUT))
            .ok_or_else(|| VenderError::not_found("close date input"))?;
        self.session.driver().scroll_into_view(&input)?;
        self.session.driver().type_text(&input, close_date)?;
        self.session
            .reporter()
            .info(format!("Entered close date: {close_date}"));
        Ok(())
    }

    pub fn select_pricing_model(&self, pricing_model: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(PRICING_MODEL_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Quote Pricing Model']/..//div[@part='dropdown overlay']//span[text()='{pricing_model}']"
            )),
            "quote pricing model",
        )
    }

    pub fn click_save(&self) -> VenderResult<()> {
        self.common.click_save()
    }

    pub fn is_name_displayed(
        &self,
        entity_label: &str,
        expected_fragment: &str,
    ) -> VenderResult<bool> {
        let actual = self.common.primary_field_text(entity_label)?;
        self.session.reporter().info(format!(
            "Opportunity primary field: '{actual}', expecting fragment '{expected_fragment}'"
        ));
        Ok(actual.contains(expected_fragment))
    }

    /// Filter the opportunity list view by name.
    pub fn search_opportunity(&self, opportunity_name: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(SEARCH_INPUT))
            .ok_or_else(|| VenderError::not_found("opportunity search input"))?;
        self.session.driver().js_set_value(&input, opportunity_name)?;
        self.session.driver().press_key(&input, Key::Enter)?;
        self.session
            .reporter()
            .info(format!("Searched opportunity: {opportunity_name}"));
        self.common.wait_for_spinner_gone();
        Ok(())
    }

    pub fn is_searched_name_displayed(&self, opportunity_name: &str) -> bool {
        self.searched_row_locator(opportunity_name)
            .map(|loc| self.session.waiter().visible(&loc).is_some())
            .unwrap_or(false)
    }

    pub fn click_name_from_searched_table(&self, opportunity_name: &str) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        let locator = self
            .searched_row_locator(opportunity_name)
            .ok_or_else(|| VenderError::not_found("searched opportunity row"))?;
        let row = self.session.waiter().visible(&locator).ok_or_else(|| {
            VenderError::not_found(format!("opportunity '{opportunity_name}' in list view"))
        })?;
        self.session.driver().js_click(&row)?;
        self.session
            .reporter()
            .info(format!("Opened opportunity: {opportunity_name}"));
        Ok(())
    }

    pub fn click_create_quote(&self) -> VenderResult<()> {
        self.require_and_js_click(CREATE_QUOTE_BUTTON, "Create Quote button")
    }

    pub fn click_quotes_link(&self) -> VenderResult<()> {
        self.require_and_js_click(QUOTES_LINK, "Quotes link")
    }

    pub fn click_quote_number_link(&self) -> VenderResult<()> {
        self.require_and_js_click(QUOTE_NUMBER_LINK, "Quote Number link")
    }

    fn searched_row_locator(&self, opportunity_name: &str) -> Option<Locator> {
        if opportunity_name.is_empty() {
            return None;
        }
        Some(Locator::xpath(format!(
            "//th[@data-label='Opportunity Name']//span[contains(text(),'{opportunity_name}')]"
        )))
    }

    fn require_and_js_click(&self, xpath: &str, what: &str) -> VenderResult<()> {
        let element = self
            .session
            .waiter()
            .visible(&Locator::xpath(xpath))
            .ok_or_else(|| VenderError::not_found(what))?;
        self.session.driver().js_click(&element)?;
        self.session.reporter().info(format!("Clicked {what}"));
        Ok(())
    }
}
