//! Scenario suite.
//!
//! The regression flows, in the order the business process runs them:
//! fresh unique data, login, account, contact, opportunity, quote, quote
//! products, logout. Scenarios share state only through the session's
//! unique-data store. A failing scenario is recorded with a screenshot and
//! the suite moves on; the aggregated counts decide the process exit.

use crate::pages::{
    AccountsPage, ContactsPage, HomePage, LoginPage, LogoutPage, OpportunitiesPage,
    ProductSelection, QuotePage, SearchPage,
};
use crate::reporter::ScenarioStatus;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;
use crate::testdata::{current_date, date_after_months, unique_string};
use std::collections::BTreeMap;
use tracing::info;

/// One runnable scenario.
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    run: fn(&Session) -> VenderResult<()>,
}

/// Aggregated outcome of a suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteSummary {
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// The regression scenarios in execution order.
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "setup-unique-data",
            description: "Generate per-run record names and persist them",
            run: setup_unique_data,
        },
        Scenario {
            name: "login",
            description: "Log in with the configured credentials",
            run: login,
        },
        Scenario {
            name: "create-account",
            description: "Create an account and verify its detail view",
            run: create_account,
        },
        Scenario {
            name: "create-contact",
            description: "Create a contact attached to the new account",
            run: create_contact,
        },
        Scenario {
            name: "create-opportunity",
            description: "Create an opportunity on the new account",
            run: create_opportunity,
        },
        Scenario {
            name: "create-quote",
            description: "Create a quote from the new opportunity",
            run: create_quote,
        },
        Scenario {
            name: "edit-quote-products",
            description: "Add products to the quote and edit their quantities",
            run: edit_quote_products,
        },
        Scenario {
            name: "logout",
            description: "Log out through the profile menu",
            run: logout,
        },
    ]
}

/// Run every scenario in order, recording outcomes and continuing past
/// failures.
pub fn run_suite(session: &Session) -> SuiteSummary {
    let mut summary = SuiteSummary {
        total: 0,
        passed: 0,
        failed: 0,
    };
    for scenario in scenarios() {
        summary.total += 1;
        let reporter = session.reporter();
        reporter.begin_scenario(scenario.name, scenario.description);
        match (scenario.run)(session) {
            Ok(()) => {
                reporter.pass(format!("{} completed", scenario.name));
                reporter.end_scenario(ScenarioStatus::Passed, None);
                summary.passed += 1;
            }
            Err(e) => {
                reporter.fail(format!("{}: {e}", scenario.name));
                if let Some(shot) = session.capture_screenshot(scenario.name) {
                    reporter.attach_screenshot(&shot);
                }
                reporter.end_scenario(ScenarioStatus::Failed, Some(e.to_string()));
                summary.failed += 1;
            }
        }
    }
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        "suite finished"
    );
    summary
}

fn ensure(condition: bool, message: impl Into<String>) -> VenderResult<()> {
    if condition {
        Ok(())
    } else {
        Err(VenderError::assertion(message))
    }
}

// ---------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------

fn setup_unique_data(session: &Session) -> VenderResult<()> {
    let account_name = unique_string("AN");
    let first_name = unique_string("FN");
    let last_name = unique_string("LN");
    let opportunity_name = unique_string("ON");
    let domain = session
        .data()
        .non_empty("contacts", "emailDomain")
        .unwrap_or_else(|| "example.com".to_string());

    let mut entries = BTreeMap::new();
    entries.insert("email".to_string(), format!("{account_name}@{domain}"));
    entries.insert(
        "contactName".to_string(),
        format!("{first_name} {last_name}"),
    );
    entries.insert("accountName".to_string(), account_name);
    entries.insert("firstName".to_string(), first_name);
    entries.insert("lastName".to_string(), last_name);
    entries.insert("opportunityName".to_string(), opportunity_name);
    session.unique().write(&entries)?;
    session.reporter().info(format!(
        "Unique data written to {}",
        session.unique().path().display()
    ));
    Ok(())
}

fn login(session: &Session) -> VenderResult<()> {
    let credentials = session.config().credentials.clone();
    let login_page = LoginPage::new(session);
    login_page.perform_login(&credentials.username, &credentials.password)?;
    ensure(login_page.is_login_successful(), "login was not successful")?;
    HomePage::new(session).verify_home_displayed()
}

fn create_account(session: &Session) -> VenderResult<()> {
    let data = session.data();
    let account_name = session.unique().value("accountName")?;
    let page = AccountsPage::new(session);

    page.wait_until_tab_visible()?;
    page.click_new_account_from_dropdown()?;
    ensure(
        page.is_dialog_header_correct(&data.value("accounts", "dialogHeader")?)?,
        "account dialog header mismatch",
    )?;
    page.select_record_type(&data.value("accounts", "recordType")?)?;
    page.click_next()?;
    page.enter_account_name(&account_name)?;
    page.select_status(&data.value("accounts", "status")?)?;
    page.select_currency(&data.value("accounts", "currency")?)?;
    page.select_source(&data.value("accounts", "source")?)?;
    page.click_save()?;
    ensure(
        page.is_account_name_displayed(&data.value("accounts", "entityLabel")?, &account_name)?,
        format!("created account '{account_name}' not shown on detail view"),
    )
}

fn create_contact(session: &Session) -> VenderResult<()> {
    let data = session.data();
    let unique = session.unique();
    let page = ContactsPage::new(session);

    page.wait_until_tab_visible()?;
    page.click_new_contact_from_dropdown()?;
    ensure(
        page.is_dialog_header_correct(&data.value("contacts", "dialogHeader")?)?,
        "contact dialog header mismatch",
    )?;
    page.select_salutation(&data.value("contacts", "salutation")?)?;
    page.enter_first_name(&unique.value("firstName")?)?;
    let last_name = unique.value("lastName")?;
    page.enter_last_name(&last_name)?;
    page.select_account_name(&unique.value("accountName")?)?;
    page.enter_email(&unique.value("email")?)?;
    page.select_primary_language(&data.value("contacts", "primaryLanguage")?)?;
    page.select_lead_source(&data.value("contacts", "leadSource")?)?;
    page.click_save()?;
    ensure(
        page.is_contact_name_displayed(&data.value("contacts", "entityLabel")?, &last_name)?,
        format!("created contact '{last_name}' not shown on detail view"),
    )
}

fn create_opportunity(session: &Session) -> VenderResult<()> {
    let data = session.data();
    let unique = session.unique();
    let config = session.config();
    let page = OpportunitiesPage::new(session);

    let header = data.value("opportunities", "dialogHeader")?;
    let record_type = data.value("opportunities", "recordType")?;
    page.wait_until_tab_visible()?;
    page.click_new_opportunity_from_dropdown()?;
    ensure(
        page.is_dialog_header_correct(&header)?,
        "opportunity dialog header mismatch",
    )?;
    page.select_record_type(&record_type)?;
    page.click_next()?;
    // The dialog header gains the record type once it is chosen.
    ensure(
        page.is_dialog_header_correct(&format!("{header}: {record_type}"))?,
        "opportunity dialog header mismatch after record type selection",
    )?;
    let opportunity_name = unique.value("opportunityName")?;
    page.type_name(&opportunity_name)?;
    page.select_stage(&data.value("opportunities", "stage")?)?;
    page.choose_account_name(&unique.value("accountName")?)?;
    page.select_deal_type(&data.value("opportunities", "dealType")?)?;
    page.select_currency(&data.value("opportunities", "currency")?)?;
    page.select_renewal(&data.value("opportunities", "renewal")?)?;
    // An empty close date in the data means "some months out from today".
    let close_date = data
        .non_empty("opportunities", "closeDate")
        .unwrap_or_else(|| date_after_months(&config.date_format, config.months_to_add));
    page.type_close_date(&close_date)?;
    page.select_pricing_model(&data.value("opportunities", "pricingModel")?)?;
    page.click_save()?;
    ensure(
        page.is_name_displayed(
            &data.value("opportunities", "entityLabel")?,
            &opportunity_name,
        )?,
        format!("created opportunity '{opportunity_name}' not shown on detail view"),
    )
}

fn create_quote(session: &Session) -> VenderResult<()> {
    let data = session.data();
    let unique = session.unique();
    let config = session.config();
    let opportunities = OpportunitiesPage::new(session);
    let quote = QuotePage::new(session);
    let opportunity_name = unique.value("opportunityName")?;
    let contact_name = unique.value("contactName")?;

    opportunities.click_tab()?;
    opportunities.search_opportunity(&opportunity_name)?;
    ensure(
        opportunities.is_searched_name_displayed(&opportunity_name),
        format!("opportunity '{opportunity_name}' missing from list view"),
    )?;
    opportunities.click_name_from_searched_table(&opportunity_name)?;
    opportunities.click_create_quote()?;
    quote.click_proceed()?;
    ensure(
        quote.is_dialog_header_correct(&format!(
            "{}: {}",
            data.value("quotes", "dialogHeader")?,
            data.value("quotes", "recordType")?
        ))?,
        "quote dialog header mismatch",
    )?;

    let start_date = data
        .non_empty("quotes", "startDate")
        .unwrap_or_else(|| current_date(&config.date_format));
    quote.enter_start_date(&start_date)?;
    quote.select_sold_to_contact(&contact_name)?;
    quote.select_bill_to_contact(&contact_name)?;
    quote.enter_subscription_term(&data.value("quotes", "subscriptionTerm")?)?;
    quote.select_payment_option(&data.value("quotes", "paymentOption")?)?;
    quote.select_payment_terms(&data.value("quotes", "paymentTerms")?)?;
    quote.select_billing_period(&data.value("quotes", "billingPeriod")?)?;
    quote.click_save()?;
    ensure(
        quote.is_quote_name_displayed(&data.value("quotes", "entityLabel")?, &opportunity_name)?,
        "quote name does not reference the opportunity",
    )
}

fn edit_quote_products(session: &Session) -> VenderResult<()> {
    let data = session.data();
    let home = HomePage::new(session);
    let search = SearchPage::new(session);
    let quote = QuotePage::new(session);
    let products = ProductSelection::new(session);

    // The quote is reached fresh: Home, global search on the account,
    // then the quote link from the results.
    home.click_home_tab()?;
    home.verify_home_displayed()?;
    home.search_and_open(&session.unique().value("accountName")?)?;
    search.click_link_from_results(&data.value("searchPage", "quotesTableHeader")?, None)?;
    ensure(
        search.is_page_displayed(&data.value("quotes", "entityLabel")?),
        "Quotes page is not displayed after search",
    )?;

    quote.click_edit_lines()?;
    quote.click_add_products()?;
    for key in ["product1", "product2", "product3"] {
        products.select_product_by_name(&data.value("quoteProducts", key)?)?;
    }
    products.click_select_button()?;

    // The first two cells need the hover-focus dance before their pencil
    // icons respond; the last one does not.
    quote.edit_product_quantity(
        &data.value("quoteProducts", "product1")?,
        &data.value("quoteProducts", "quantity1")?,
        true,
    )?;
    quote.edit_product_quantity(
        &data.value("quoteProducts", "product2")?,
        &data.value("quoteProducts", "quantity2")?,
        true,
    )?;
    quote.edit_product_quantity(
        &data.value("quoteProducts", "product3")?,
        &data.value("quoteProducts", "quantity3")?,
        false,
    )?;
    quote.click_save_in_iframe()?;
    quote.click_close_in_alert()
}

fn logout(session: &Session) -> VenderResult<()> {
    let page = LogoutPage::new(session);
    page.perform_logout()?;
    ensure(page.is_logout_successful()?, "logout was not successful")
}
