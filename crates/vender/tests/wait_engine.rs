//! Wait engine behavior over the in-memory driver.

use std::time::{Duration, Instant};
use vender::fake::{FakeDom, FakeDriver, FakeElement};
use vender::{Driver, Locator, WaitOptions, Waiter};

fn fast_options() -> WaitOptions {
    WaitOptions::new(Duration::from_millis(200), Duration::from_millis(5))
}

#[test]
fn late_element_is_found_within_the_budget() {
    let mut dom = FakeDom::new();
    dom.insert(FakeElement::new("div").selector("#slow").visible_after(3));
    let driver = FakeDriver::with_dom(dom);
    let waiter = Waiter::new(&driver, fast_options());

    let started = Instant::now();
    let found = waiter.visible(&Locator::css("#slow"));
    assert!(found.is_some());
    assert!(started.elapsed() < Duration::from_millis(200));
}

#[test]
fn absent_element_gives_up_after_roughly_the_timeout() {
    let driver = FakeDriver::new();
    let waiter = Waiter::new(&driver, fast_options());

    let started = Instant::now();
    assert!(waiter.visible(&Locator::css("#never")).is_none());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    // One poll interval of overshoot at most, plus scheduling slack.
    assert!(elapsed < Duration::from_millis(400));
}

#[test]
fn timeout_override_shortens_a_single_wait() {
    let driver = FakeDriver::new();
    let waiter = Waiter::new(
        &driver,
        WaitOptions::new(Duration::from_secs(60), Duration::from_millis(5)),
    );

    let started = Instant::now();
    let found = waiter.visible_within(&Locator::css("#never"), Duration::from_millis(50));
    assert!(found.is_none());
    assert!(started.elapsed() < Duration::from_millis(300));
}

#[test]
fn invisibility_wait_is_silent_for_missing_nodes() {
    let driver = FakeDriver::new();
    let waiter = Waiter::new(&driver, fast_options());

    let started = Instant::now();
    waiter.invisible(&Locator::xpath("//*[@class='spinner']"));
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[test]
fn invisibility_counts_a_detached_node_as_gone() {
    let mut dom = FakeDom::new();
    dom.insert(FakeElement::new("div").selector("#spinner"));
    let driver = FakeDriver::with_dom(dom);
    driver.detach("#spinner");
    let waiter = Waiter::new(&driver, fast_options());

    let started = Instant::now();
    waiter.invisible(&Locator::css("#spinner"));
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[test]
fn page_load_tolerates_a_missing_window() {
    let driver = FakeDriver::new();
    driver.set_no_window(true);
    let waiter = Waiter::new(&driver, fast_options());

    let started = Instant::now();
    waiter.page_loaded();
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[test]
fn page_load_polls_ready_state_to_completion() {
    let driver = FakeDriver::new();
    driver.set_ready_after(2);
    let waiter = Waiter::new(&driver, fast_options());
    waiter.page_loaded();
    assert_eq!(driver.ready_state().unwrap(), "complete");
}
