//! Suite runner and report lifecycle.

use serde_json::json;
use vender::fake::{FakeDom, FakeDriver, FakeElement};
use vender::testdata::TestData;
use vender::{run_suite, ReportConfig, Session, SuiteConfig};

fn sandbox_config(dir: &std::path::Path) -> SuiteConfig {
    SuiteConfig {
        // Zero explicit-wait budget: lookups fail on the first poll.
        max_wait_secs: 0,
        poll_interval_ms: 1,
        unique_data_file: dir.join("unique.json"),
        screenshot_dir: dir.join("screenshots"),
        report: ReportConfig {
            dir: dir.join("reports"),
            ..ReportConfig::default()
        },
        ..SuiteConfig::default()
    }
}

#[test]
fn run_records_every_scenario_and_report_lists_them() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::with_driver_and_data(
        sandbox_config(dir.path()),
        Box::new(FakeDriver::new()),
        TestData::from_value(json!({})),
    );

    let summary = run_suite(&session);
    assert_eq!(summary.total, 8);
    assert!(!summary.all_passed());

    let report = session.close().unwrap();
    let html = std::fs::read_to_string(report).unwrap();
    for name in [
        "setup-unique-data",
        "login",
        "create-account",
        "create-contact",
        "create-opportunity",
        "create-quote",
        "edit-quote-products",
        "logout",
    ] {
        assert!(html.contains(name), "report is missing scenario {name}");
    }
}

#[test]
fn data_setup_persists_names_other_scenarios_read() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::with_driver_and_data(
        sandbox_config(dir.path()),
        Box::new(FakeDriver::new()),
        TestData::from_value(json!({})),
    );

    run_suite(&session);

    let store = session.unique();
    let account = store.value("accountName").unwrap();
    let email = store.value("email").unwrap();
    assert!(account.starts_with("AN"));
    assert!(email.starts_with(&account));
    assert!(email.ends_with("@example.com"));
    let contact = store.value("contactName").unwrap();
    assert!(contact.contains(' '));
}

#[test]
fn failing_scenarios_leave_screenshots_behind() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::with_driver_and_data(
        sandbox_config(dir.path()),
        Box::new(FakeDriver::new()),
        TestData::from_value(json!({})),
    );

    run_suite(&session);

    let shots: Vec<_> = std::fs::read_dir(dir.path().join("screenshots"))
        .unwrap()
        .collect();
    assert!(!shots.is_empty());
}

#[test]
fn quit_happens_exactly_once_on_close() {
    let dir = tempfile::tempdir().unwrap();
    let driver = FakeDriver::new();
    let probe = driver.clone();
    let session = Session::with_driver_and_data(
        sandbox_config(dir.path()),
        Box::new(driver),
        TestData::from_value(json!({})),
    );
    session.close().unwrap();
    assert!(probe.quit_called());
    assert_eq!(
        probe.journal().iter().filter(|e| *e == "quit").count(),
        1
    );
}

#[test]
fn login_scenario_passes_on_a_prepared_dom() {
    let dir = tempfile::tempdir().unwrap();
    let mut dom = FakeDom::new();
    dom.insert(FakeElement::new("input").selector("//input[@id='username']"));
    dom.insert(FakeElement::new("input").selector("//input[@id='password']"));
    dom.insert(FakeElement::new("input").selector("//input[@id='Login']"));
    dom.insert(FakeElement::new("a").selector("//a[@title='Home']").text("Home"));
    dom.insert(
        FakeElement::new("a")
            .selector("//one-app-nav-bar-item-root[@data-id='home']/a"),
    );
    let mut config = sandbox_config(dir.path());
    config.base_url = "https://login.example.com".to_string();
    config.credentials.username = "tester@example.com".to_string();
    config.credentials.password = "secret".to_string();

    let driver = FakeDriver::with_dom(dom);
    let probe = driver.clone();
    let session =
        Session::with_driver_and_data(config, Box::new(driver), TestData::from_value(json!({})));

    let summary = run_suite(&session);
    assert!(probe.was_called("navigate https://login.example.com"));
    assert_eq!(probe.value_of("//input[@id='username']").unwrap(), "tester@example.com");
    // Setup and login pass; the CRM screens are absent from this DOM.
    assert_eq!(summary.passed, 2);
}
