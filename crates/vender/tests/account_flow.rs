//! End-to-end account creation over the in-memory driver.
//!
//! Builds the full dialog DOM and walks the same steps the account scenario
//! takes, with the detail header mirroring the typed name so the final
//! verification exercises the real comparison.

use serde_json::json;
use vender::fake::{FakeDom, FakeDriver, FakeElement};
use vender::pages::AccountsPage;
use vender::testdata::{unique_string, TestData};
use vender::{Session, SuiteConfig};

const ACCOUNTS_TAB: &str = "//one-app-nav-bar-item-root[@data-id='Account']//a[@role='button']";
const NEW_ACCOUNT_LINK: &str = "//div[@class='menuItemsWrapper']//span[text()='New Account']";
const DIALOG_HEADER: &str = "//div[@class='actionBody']//h2";
const RECORD_TYPE_RADIO: &str = "//div[@class='changeRecordTypeOptionRightColumn']/span[text()='Customer']/../../div/input[@type='radio']";
const NEXT_BUTTON: &str = "//div[@class='inlineFooter']//span[text()='Next']";
const NAME_INPUT: &str = "//input[@name='Name']";
const STATUS_DROPDOWN: &str =
    "//*[@field-label='Account Status']//span[@part='input-button-value']";
const STATUS_OPTION: &str =
    "//*[@field-label='Account Status']//div[@part='dropdown overlay']//span[text()='Active']";
const CURRENCY_DROPDOWN: &str =
    "//*[@field-label='Account Currency']//span[@part='input-button-value']";
const CURRENCY_OPTION: &str = "//*[@field-label='Account Currency']//div[@part='dropdown overlay']//span[text()='USD - U.S. Dollar']";
const SOURCE_DROPDOWN: &str =
    "//*[@field-label='Account Source']//span[@part='input-button-value']";
const SOURCE_OPTION: &str =
    "//*[@field-label='Account Source']//div[@part='dropdown overlay']//span[text()='Web']";
const SAVE_BUTTON: &str = "//div[@class='footer-full-width']//button[text()='Save']";
const PRIMARY_FIELD: &str = "//*[@slot='entityLabel' and text()='Account']/../../following-sibling::slot//*[@slot='primaryField']";

fn account_dialog_dom() -> FakeDom {
    let mut dom = FakeDom::new();
    dom.insert(FakeElement::new("a").selector(ACCOUNTS_TAB));
    dom.insert(FakeElement::new("span").selector(NEW_ACCOUNT_LINK));
    dom.insert(FakeElement::new("h2").selector(DIALOG_HEADER).text("New Account"));
    dom.insert(FakeElement::new("input").selector(RECORD_TYPE_RADIO));
    dom.insert(FakeElement::new("span").selector(NEXT_BUTTON));
    dom.insert(FakeElement::new("input").selector(NAME_INPUT));
    dom.insert(FakeElement::new("span").selector(STATUS_DROPDOWN));
    dom.insert(FakeElement::new("span").selector(STATUS_OPTION));
    dom.insert(FakeElement::new("span").selector(CURRENCY_DROPDOWN));
    dom.insert(FakeElement::new("span").selector(CURRENCY_OPTION));
    dom.insert(FakeElement::new("span").selector(SOURCE_DROPDOWN));
    dom.insert(FakeElement::new("span").selector(SOURCE_OPTION));
    dom.insert(FakeElement::new("button").selector(SAVE_BUTTON));
    dom.insert(
        FakeElement::new("div")
            .selector(PRIMARY_FIELD)
            .mirror_value_of(NAME_INPUT),
    );
    dom
}

fn fast_session(driver: FakeDriver) -> Session {
    Session::with_driver_and_data(
        SuiteConfig {
            max_wait_secs: 1,
            poll_interval_ms: 5,
            ..SuiteConfig::default()
        },
        Box::new(driver),
        TestData::from_value(json!({})),
    )
}

#[test]
fn account_creation_round_trips_the_generated_name() {
    let driver = FakeDriver::with_dom(account_dialog_dom());
    let probe = driver.clone();
    let session = fast_session(driver);
    let page = AccountsPage::new(&session);
    let account_name = unique_string("AN");

    page.wait_until_tab_visible().unwrap();
    page.click_new_account_from_dropdown().unwrap();
    assert!(page.is_dialog_header_correct("New Account").unwrap());
    page.select_record_type("Customer").unwrap();
    page.click_next().unwrap();
    page.enter_account_name(&account_name).unwrap();
    page.select_status("Active").unwrap();
    page.select_currency("USD - U.S. Dollar").unwrap();
    page.select_source("Web").unwrap();
    page.click_save().unwrap();

    assert!(page
        .is_account_name_displayed("Account", &account_name)
        .unwrap());
    assert_eq!(probe.value_of(NAME_INPUT).unwrap(), account_name);
    assert!(probe.was_called(&format!("js_click {SAVE_BUTTON}")));
}

#[test]
fn wrong_dialog_header_is_reported_not_swallowed() {
    let mut dom = FakeDom::new();
    dom.insert(
        FakeElement::new("h2")
            .selector(DIALOG_HEADER)
            .text("New Lead"),
    );
    let session = fast_session(FakeDriver::with_dom(dom));
    let page = AccountsPage::new(&session);
    assert!(!page.is_dialog_header_correct("New Account").unwrap());
}

#[test]
fn two_generated_names_never_collide() {
    let first = unique_string("AN");
    let second = unique_string("AN");
    assert_ne!(first, second);
    assert!(first.starts_with("AN"));
}
