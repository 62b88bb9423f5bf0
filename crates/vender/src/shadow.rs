//! Shadow DOM traversal.
//!
//! The quoting UI renders its product tables behind nested shadow roots that
//! ordinary locators cannot reach. A [`ShadowPath`] names the route as an
//! ordered list of CSS selectors, each resolved one shadow boundary deeper
//! than the last; [`ShadowResolver`] walks those routes and implements the
//! two product-grid operations built on them.
//!
//! Resolution is pure lookup: for a fixed DOM snapshot the same path always
//! lands on the same element or fails at the same step.

use crate::driver::{Driver, ElementHandle, Key};
use crate::result::{VenderError, VenderResult};
use crate::wait::{WaitOptions, Waiter};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Declarative route through nested shadow roots.
///
/// The first selector is looked up at document level, every following one
/// inside the shadow root of the previous match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowPath {
    steps: Vec<String>,
}

impl ShadowPath {
    /// Start a path at a document-level selector.
    pub fn start(root: impl Into<String>) -> Self {
        Self {
            steps: vec![root.into()],
        }
    }

    /// Descend one shadow boundary.
    #[must_use]
    pub fn then(mut self, css: impl Into<String>) -> Self {
        self.steps.push(css.into());
        self
    }

    /// The selectors in resolution order.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Human-readable route, for logs and errors.
    #[must_use]
    pub fn describe(&self) -> String {
        self.steps.join(" >>> ")
    }
}

impl std::fmt::Display for ShadowPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Delay and retry budgets for the product-grid operations.
#[derive(Debug, Clone, Copy)]
pub struct ShadowTimings {
    /// Budget for the inline quantity input to materialize after the pencil
    /// click.
    pub input_wait: WaitOptions,
    /// Settle delay after keystrokes the grid gives no observable signal
    /// for. Known brittleness, kept bounded.
    pub settle: Duration,
    /// Pause between simulated TAB presses during hover focus.
    pub tab_pause: Duration,
    /// TAB presses per hover-focus cycle.
    pub tab_count: u32,
}

impl Default for ShadowTimings {
    fn default() -> Self {
        Self {
            input_wait: WaitOptions::new(Duration::from_secs(30), Duration::from_secs(1)),
            settle: Duration::from_millis(1000),
            tab_pause: Duration::from_millis(200),
            tab_count: 10,
        }
    }
}

// Grid selectors, fixed by the quoting UI.
const PAGE_CONTAINER: &str = "#sbPageContainer";
const LINE_EDITOR: &str = "sb-line-editor";
const GROUP_LAYOUT: &str = "#groupLayout";
const GROUP: &str = "#Group_";
const STANDARD_LINES: &str = "#standardLines";
const TABLE_ROW: &str = "sf-le-table-row";
const PRODUCT_NAME_CELL: &str = "div[field='SBQQ__ProductName__c']";
const QUANTITY_PENCIL: &str = "div[field='yext_Display_Quantity__c'] span.pencil";
const QUANTITY_INPUT_HOST: &str = "div[field='yext_Display_Quantity__c'] sb-input";
const QUANTITY_INPUT_WRAPPED: &str = "iron-input > input";
const QUANTITY_INPUT_PLAIN: &str = "input";

/// Shadow-route resolver and product-grid operations.
pub struct ShadowResolver<'a> {
    driver: &'a dyn Driver,
    timings: ShadowTimings,
}

impl<'a> ShadowResolver<'a> {
    pub fn new(driver: &'a dyn Driver) -> Self {
        Self {
            driver,
            timings: ShadowTimings::default(),
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: ShadowTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Walk a path; `None` as soon as any step fails to match.
    pub fn resolve(&self, path: &ShadowPath) -> VenderResult<Option<ElementHandle>> {
        let mut steps = path.steps().iter();
        let root = steps.next().ok_or_else(|| {
            VenderError::config("shadow path must contain at least one selector")
        })?;
        let Some(mut current) = self.driver.document_query(root)? else {
            debug!(path = %path, step = %root, "shadow path missed at document root");
            return Ok(None);
        };
        for css in steps {
            match self.driver.shadow_query(&current, css)? {
                Some(next) => current = next,
                None => {
                    debug!(path = %path, step = %css, "shadow path missed");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    /// Walk a path that must match; `NotFound` names the route otherwise.
    pub fn resolve_required(
        &self,
        path: &ShadowPath,
        what: &str,
    ) -> VenderResult<ElementHandle> {
        self.resolve(path)?
            .ok_or_else(|| VenderError::not_found(format!("{what} (via {path})")))
    }

    /// Single-hop primitive: one shadow boundary below `host`.
    pub fn resolve_from(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Option<ElementHandle>> {
        self.driver.shadow_query(host, css)
    }

    /// Route to the selection checkbox of one product row in the lookup
    /// table, keyed by the row's `name` attribute.
    #[must_use]
    pub fn product_checkbox_path(product_name: &str) -> ShadowPath {
        ShadowPath::start(PAGE_CONTAINER)
            .then("sb-product-lookup")
            .then("#lookupLayout")
            .then(format!("#tbody > #list > [name=\"{product_name}\"]"))
            .then("sb-swipe-container #selection")
            .then("sb-table-cell-select")
            .then("#checkbox")
            .then("#checkboxContainer")
    }

    /// Tick the lookup-table checkbox for the named product.
    ///
    /// A product that is not in the table is a hard `NotFound` failure.
    pub fn select_product_by_name(&self, product_name: &str) -> VenderResult<()> {
        let path = Self::product_checkbox_path(product_name);
        let checkbox = self
            .resolve(&path)?
            .ok_or_else(|| VenderError::not_found(format!("product '{product_name}'")))?;
        self.driver.scroll_into_view(&checkbox)?;
        self.driver.js_click(&checkbox)?;
        info!(product = product_name, "product selected");
        Ok(())
    }

    /// Set the quantity of the named line item in the line-editor grid.
    ///
    /// Scans the grid rows, matches the product-name cell case-insensitively
    /// and stops at the first match. A scan that matches no row fails with
    /// `NotFound`. The inline input only exists after the pencil click, so it
    /// is awaited under a bounded budget, trying the wrapped selector first
    /// and the plain one as fallback.
    pub fn edit_product_quantity(
        &self,
        product_name: &str,
        quantity: &str,
        hover_first: bool,
    ) -> VenderResult<()> {
        let standard_lines = self.resolve_required(
            &ShadowPath::start(PAGE_CONTAINER)
                .then(LINE_EDITOR)
                .then(GROUP_LAYOUT)
                .then(GROUP)
                .then(STANDARD_LINES),
            "line-editor grid",
        )?;
        let rows = self.driver.shadow_query_all(&standard_lines, TABLE_ROW)?;
        debug!(rows = rows.len(), "scanning line-editor grid");

        for row in rows {
            let Some(name_cell) = self.driver.shadow_query(&row, PRODUCT_NAME_CELL)? else {
                continue;
            };
            let found = self.driver.text(&name_cell)?;
            if !found.trim().eq_ignore_ascii_case(product_name) {
                continue;
            }

            if hover_first {
                self.hover_and_focus(&name_cell)?;
            }

            let pencil = self
                .driver
                .shadow_query(&row, QUANTITY_PENCIL)?
                .ok_or_else(|| {
                    VenderError::not_found(format!(
                        "quantity pencil for product '{product_name}'"
                    ))
                })?;
            self.driver.js_click(&pencil)?;

            let input = self.await_quantity_input(&row)?;
            self.driver.clear(&input)?;
            self.driver.type_text(&input, quantity)?;
            std::thread::sleep(self.timings.settle);
            self.driver.press_key(&input, Key::Enter)?;
            std::thread::sleep(self.timings.settle);
            // Clicking away commits the edit.
            self.driver.click(&name_cell)?;
            info!(product = product_name, quantity, "quantity updated");
            return Ok(());
        }

        Err(VenderError::not_found(format!(
            "grid row for product '{product_name}'"
        )))
    }

    /// Wait for the inline quantity input under a row to materialize.
    fn await_quantity_input(&self, row: &ElementHandle) -> VenderResult<ElementHandle> {
        let waiter = Waiter::new(self.driver, self.timings.input_wait);
        waiter
            .until(|| {
                let host = self
                    .driver
                    .shadow_query(row, QUANTITY_INPUT_HOST)
                    .ok()
                    .flatten()?;
                self.driver
                    .shadow_query(&host, QUANTITY_INPUT_WRAPPED)
                    .ok()
                    .flatten()
                    .or_else(|| {
                        self.driver
                            .shadow_query(&host, QUANTITY_INPUT_PLAIN)
                            .ok()
                            .flatten()
                    })
            })
            .ok_or_else(|| VenderError::Timeout {
                ms: self.timings.input_wait.timeout.as_millis() as u64,
                what: "inline quantity input".to_string(),
            })
    }

    /// Hover, focus, then TAB around the cell. Some grid cells only arm
    /// their edit affordance after keyboard traversal.
    fn hover_and_focus(&self, element: &ElementHandle) -> VenderResult<()> {
        self.driver.hover(element)?;
        std::thread::sleep(self.timings.settle);
        self.driver.js_focus(element)?;
        for _ in 0..self.timings.tab_count {
            self.driver.send_tab()?;
            std::thread::sleep(self.timings.tab_pause);
            match self.driver.active_element() {
                Ok(active) => {
                    if let Err(e) = self.driver.hover(&active) {
                        warn!(error = %e, "could not hover focused element");
                    }
                }
                Err(e) => warn!(error = %e, "no active element during tab cycle"),
            }
        }
        debug!("hover-focus cycle finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDom, FakeDriver, FakeElement};

    fn fast_timings() -> ShadowTimings {
        ShadowTimings {
            input_wait: WaitOptions::new(Duration::from_millis(100), Duration::from_millis(5)),
            settle: Duration::from_millis(1),
            tab_pause: Duration::from_millis(1),
            tab_count: 2,
        }
    }

    /// Lookup table with one selectable product.
    fn lookup_dom(product: &str) -> FakeDom {
        let mut dom = FakeDom::new();
        let container = dom.insert(FakeElement::new("div").selector(PAGE_CONTAINER));
        let lookup = dom.insert_shadow_child(
            container,
            FakeElement::new("sb-product-lookup").selector("sb-product-lookup"),
        );
        let layout = dom
            .insert_shadow_child(lookup, FakeElement::new("div").selector("#lookupLayout"));
        let row = dom.insert_shadow_child(
            layout,
            FakeElement::new("tr").selector(format!("#tbody > #list > [name=\"{product}\"]")),
        );
        let swipe = dom.insert_shadow_child(
            row,
            FakeElement::new("div").selector("sb-swipe-container #selection"),
        );
        let cell = dom.insert_shadow_child(
            swipe,
            FakeElement::new("sb-table-cell-select").selector("sb-table-cell-select"),
        );
        let checkbox =
            dom.insert_shadow_child(cell, FakeElement::new("div").selector("#checkbox"));
        dom.insert_shadow_child(
            checkbox,
            FakeElement::new("div").selector("#checkboxContainer"),
        );
        dom
    }

    /// Line-editor grid with the given product rows.
    fn grid_dom(products: &[(&str, bool)]) -> FakeDom {
        let mut dom = FakeDom::new();
        let container = dom.insert(FakeElement::new("div").selector(PAGE_CONTAINER));
        let editor =
            dom.insert_shadow_child(container, FakeElement::new("div").selector(LINE_EDITOR));
        let layout =
            dom.insert_shadow_child(editor, FakeElement::new("div").selector(GROUP_LAYOUT));
        let group = dom.insert_shadow_child(layout, FakeElement::new("div").selector(GROUP));
        let lines =
            dom.insert_shadow_child(group, FakeElement::new("div").selector(STANDARD_LINES));
        for (name, with_input) in products {
            let row = dom.insert_shadow_child(lines, FakeElement::new("tr").selector(TABLE_ROW));
            dom.insert_shadow_child(
                row,
                FakeElement::new("div")
                    .selector(PRODUCT_NAME_CELL)
                    .text(*name),
            );
            dom.insert_shadow_child(
                row,
                FakeElement::new("span").selector(QUANTITY_PENCIL),
            );
            if *with_input {
                let host = dom.insert_shadow_child(
                    row,
                    FakeElement::new("sb-input").selector(QUANTITY_INPUT_HOST),
                );
                dom.insert_shadow_child(
                    host,
                    FakeElement::new("input")
                        .selector(QUANTITY_INPUT_WRAPPED)
                        .selector(format!("qty-input-{name}")),
                );
            }
        }
        dom
    }

    mod path_tests {
        use super::*;

        #[test]
        fn describe_joins_steps_in_order() {
            let path = ShadowPath::start("#a").then("b").then("#c");
            assert_eq!(path.describe(), "#a >>> b >>> #c");
            assert_eq!(path.steps().len(), 3);
        }

        #[test]
        fn resolution_is_deterministic_for_a_fixed_dom() {
            let driver = FakeDriver::with_dom(lookup_dom("Listings"));
            let resolver = ShadowResolver::new(&driver);
            let path = ShadowResolver::product_checkbox_path("Listings");
            let first = resolver.resolve(&path).unwrap();
            let second = resolver.resolve(&path).unwrap();
            assert!(first.is_some());
            assert_eq!(first, second);
        }

        #[test]
        fn missing_intermediate_step_resolves_to_none() {
            let mut dom = FakeDom::new();
            dom.insert(FakeElement::new("div").selector(PAGE_CONTAINER));
            let driver = FakeDriver::with_dom(dom);
            let resolver = ShadowResolver::new(&driver);
            let path = ShadowPath::start(PAGE_CONTAINER).then("sb-product-lookup");
            assert!(resolver.resolve(&path).unwrap().is_none());
        }

        #[test]
        fn required_resolution_names_route_on_miss() {
            let driver = FakeDriver::new();
            let resolver = ShadowResolver::new(&driver);
            let path = ShadowPath::start("#missing").then("#deeper");
            let err = resolver.resolve_required(&path, "save button").unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("save button"));
            assert!(msg.contains("#missing"));
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn selecting_existing_product_clicks_its_checkbox() {
            let driver = FakeDriver::with_dom(lookup_dom("Listings"));
            let resolver = ShadowResolver::new(&driver);
            resolver.select_product_by_name("Listings").unwrap();
            assert!(driver.was_called("scroll #checkboxContainer"));
            assert!(driver.was_called("js_click #checkboxContainer"));
        }

        #[test]
        fn selecting_missing_product_is_not_found_not_silence() {
            let driver = FakeDriver::with_dom(lookup_dom("Listings"));
            let resolver = ShadowResolver::new(&driver);
            let err = resolver.select_product_by_name("Reviews").unwrap_err();
            match err {
                VenderError::NotFound { what } => assert!(what.contains("Reviews")),
                other => panic!("expected NotFound, got {other}"),
            }
            assert!(!driver.was_called("js_click"));
        }
    }

    mod quantity_tests {
        use super::*;

        #[test]
        fn quantity_edit_types_into_the_matching_row() {
            let driver = FakeDriver::with_dom(grid_dom(&[("Listings", true), ("Reviews", true)]));
            let resolver = ShadowResolver::new(&driver).with_timings(fast_timings());
            resolver
                .edit_product_quantity("Reviews", "25", false)
                .unwrap();
            assert_eq!(driver.value_of("qty-input-Reviews").unwrap(), "25");
            assert_eq!(driver.value_of("qty-input-Listings").unwrap(), "");
        }

        #[test]
        fn product_match_is_case_insensitive() {
            let driver = FakeDriver::with_dom(grid_dom(&[("Listings", true)]));
            let resolver = ShadowResolver::new(&driver).with_timings(fast_timings());
            resolver
                .edit_product_quantity("LISTINGS", "3", false)
                .unwrap();
            assert_eq!(driver.value_of("qty-input-Listings").unwrap(), "3");
        }

        #[test]
        fn unmatched_product_surfaces_not_found() {
            let driver = FakeDriver::with_dom(grid_dom(&[("Listings", true)]));
            let resolver = ShadowResolver::new(&driver).with_timings(fast_timings());
            let err = resolver
                .edit_product_quantity("Reviews", "3", false)
                .unwrap_err();
            assert!(matches!(err, VenderError::NotFound { .. }));
        }

        #[test]
        fn input_that_never_appears_times_out() {
            let driver = FakeDriver::with_dom(grid_dom(&[("Listings", false)]));
            let resolver = ShadowResolver::new(&driver).with_timings(fast_timings());
            let err = resolver
                .edit_product_quantity("Listings", "3", false)
                .unwrap_err();
            assert!(matches!(err, VenderError::Timeout { .. }));
        }

        #[test]
        fn hover_cycle_runs_when_requested() {
            let driver = FakeDriver::with_dom(grid_dom(&[("Listings", true)]));
            let resolver = ShadowResolver::new(&driver).with_timings(fast_timings());
            resolver
                .edit_product_quantity("Listings", "7", true)
                .unwrap();
            assert!(driver.was_called("hover div[field='SBQQ__ProductName__c']"));
            assert!(driver.was_called("tab"));
        }
    }
}
