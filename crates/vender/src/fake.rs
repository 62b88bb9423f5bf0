//! Scripted in-memory driver for browserless tests.
//!
//! [`FakeDriver`] implements [`Driver`] over a hand-built DOM snapshot:
//! nodes answer to registered selector strings, may live inside an iframe or
//! behind a shadow boundary, and can be scheduled to become visible only
//! after a number of display polls. Every interaction is appended to a call
//! journal so tests can assert what the suite actually did.

use crate::driver::{Driver, ElementHandle, Key, Locator};
use crate::result::{VenderError, VenderResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One DOM node in the fixture.
#[derive(Debug, Clone)]
pub struct FakeElement {
    tag: String,
    selectors: Vec<String>,
    text: String,
    value: String,
    attrs: HashMap<String, String>,
    visible: bool,
    visible_after_polls: u32,
    enabled: bool,
    mirror_value_of: Option<String>,
}

impl FakeElement {
    /// New visible, enabled element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            selectors: Vec::new(),
            text: String::new(),
            value: String::new(),
            attrs: HashMap::new(),
            visible: true,
            visible_after_polls: 0,
            enabled: true,
            mirror_value_of: None,
        }
    }

    /// Register a locator value (CSS or XPath text) this node answers to.
    #[must_use]
    pub fn selector(mut self, value: impl Into<String>) -> Self {
        self.selectors.push(value.into());
        self
    }

    /// Static text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Start hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Report hidden for the first `polls` display checks, then visible.
    #[must_use]
    pub fn visible_after(mut self, polls: u32) -> Self {
        self.visible = true;
        self.visible_after_polls = polls;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Text content reflects the current value of the node registered under
    /// `selector`. Models a detail header echoing what was typed in a form.
    #[must_use]
    pub fn mirror_value_of(mut self, selector: impl Into<String>) -> Self {
        self.mirror_value_of = Some(selector.into());
        self
    }

    fn primary_selector(&self) -> String {
        self.selectors
            .first()
            .cloned()
            .unwrap_or_else(|| self.tag.clone())
    }
}

#[derive(Debug, Clone)]
struct Node {
    el: FakeElement,
    /// Host node id when this node lives behind a shadow boundary.
    shadow_host: Option<u64>,
    /// Iframe node id when this node lives inside a frame.
    frame: Option<u64>,
    detached: bool,
}

/// Hand-built DOM snapshot backing a [`FakeDriver`].
#[derive(Debug, Default)]
pub struct FakeDom {
    nodes: Vec<Node>,
}

impl FakeDom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a top-document node, returning its id.
    pub fn insert(&mut self, el: FakeElement) -> u64 {
        self.push(el, None, None)
    }

    /// Insert a node inside the iframe with id `frame`.
    pub fn insert_in_frame(&mut self, frame: u64, el: FakeElement) -> u64 {
        self.push(el, None, Some(frame))
    }

    /// Insert a node behind the shadow boundary of `host`.
    pub fn insert_shadow_child(&mut self, host: u64, el: FakeElement) -> u64 {
        let frame = self.nodes.get(host as usize).and_then(|n| n.frame);
        self.push(el, Some(host), frame)
    }

    fn push(&mut self, el: FakeElement, shadow_host: Option<u64>, frame: Option<u64>) -> u64 {
        let id = self.nodes.len() as u64;
        self.nodes.push(Node {
            el,
            shadow_host,
            frame,
            detached: false,
        });
        id
    }
}

#[derive(Debug, Default)]
struct Inner {
    dom: FakeDom,
    url: String,
    title: String,
    ready_state: String,
    ready_after_polls: u32,
    no_window: bool,
    current_frame: Option<u64>,
    active: Option<u64>,
    journal: Vec<String>,
    quit_called: bool,
}

/// In-memory [`Driver`] implementation.
///
/// Clones are handles to the same DOM and journal, so a test can hand one
/// clone to a session and keep another for assertions.
#[derive(Debug, Default, Clone)]
pub struct FakeDriver {
    inner: Rc<RefCell<Inner>>,
}

impl FakeDriver {
    /// Empty driver; useful when only navigation-level calls matter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dom(FakeDom::new())
    }

    /// Driver over a prepared DOM snapshot.
    #[must_use]
    pub fn with_dom(dom: FakeDom) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                dom,
                ready_state: "complete".to_string(),
                ..Inner::default()
            })),
        }
    }

    /// Handle for a node id returned by the [`FakeDom`] insert methods.
    #[must_use]
    pub const fn handle(id: u64) -> ElementHandle {
        ElementHandle::new(id)
    }

    /// Snapshot of the call journal.
    #[must_use]
    pub fn journal(&self) -> Vec<String> {
        self.inner.borrow().journal.clone()
    }

    /// True when any journal entry starts with `prefix`.
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.inner
            .borrow()
            .journal
            .iter()
            .any(|entry| entry.starts_with(prefix))
    }

    /// Current value of the first node answering to `selector`.
    #[must_use]
    pub fn value_of(&self, selector: &str) -> Option<String> {
        let inner = self.inner.borrow();
        inner
            .dom
            .nodes
            .iter()
            .find(|n| !n.detached && n.el.selectors.iter().any(|s| s == selector))
            .map(|n| n.el.value.clone())
    }

    /// Overwrite the text of the first node answering to `selector`.
    pub fn set_text(&self, selector: &str, text: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(node) = inner
            .dom
            .nodes
            .iter_mut()
            .find(|n| n.el.selectors.iter().any(|s| s == selector))
        {
            node.el.text = text.to_string();
        }
    }

    /// Mark the first node answering to `selector` as removed from the
    /// document; its handles go stale.
    pub fn detach(&self, selector: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(node) = inner
            .dom
            .nodes
            .iter_mut()
            .find(|n| n.el.selectors.iter().any(|s| s == selector))
        {
            node.detached = true;
        }
    }

    /// Report `loading` for the first `polls` ready-state reads.
    pub fn set_ready_after(&self, polls: u32) {
        self.inner.borrow_mut().ready_after_polls = polls;
    }

    /// Make ready-state reads fail as if the window were gone.
    pub fn set_no_window(&self, gone: bool) {
        self.inner.borrow_mut().no_window = gone;
    }

    pub fn set_title(&self, title: &str) {
        self.inner.borrow_mut().title = title.to_string();
    }

    #[must_use]
    pub fn quit_called(&self) -> bool {
        self.inner.borrow().quit_called
    }
}

impl Inner {
    fn node(&self, handle: &ElementHandle) -> VenderResult<&Node> {
        let node = self
            .dom
            .nodes
            .get(handle.id() as usize)
            .ok_or_else(|| VenderError::StaleElement {
                selector: handle.to_string(),
            })?;
        if node.detached {
            return Err(VenderError::StaleElement {
                selector: node.el.primary_selector(),
            });
        }
        Ok(node)
    }

    fn node_mut(&mut self, handle: &ElementHandle) -> VenderResult<&mut Node> {
        let node = self
            .dom
            .nodes
            .get_mut(handle.id() as usize)
            .ok_or_else(|| VenderError::StaleElement {
                selector: handle.to_string(),
            })?;
        if node.detached {
            return Err(VenderError::StaleElement {
                selector: node.el.primary_selector(),
            });
        }
        Ok(node)
    }

    /// Document-level match: attached, not behind a shadow boundary, in the
    /// current browsing context.
    fn document_matches(&self, value: &str) -> Vec<u64> {
        self.dom
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                !n.detached
                    && n.shadow_host.is_none()
                    && n.frame == self.current_frame
                    && n.el.selectors.iter().any(|s| s == value)
            })
            .map(|(id, _)| id as u64)
            .collect()
    }

    fn shadow_matches(&self, host: u64, css: &str) -> Vec<u64> {
        self.dom
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                !n.detached
                    && n.shadow_host == Some(host)
                    && n.el.selectors.iter().any(|s| s == css)
            })
            .map(|(id, _)| id as u64)
            .collect()
    }

    fn currently_visible(&mut self, handle: &ElementHandle) -> VenderResult<bool> {
        let node = self.node_mut(handle)?;
        if node.el.visible_after_polls > 0 {
            node.el.visible_after_polls -= 1;
            return Ok(false);
        }
        Ok(node.el.visible)
    }

    fn log(&mut self, entry: String) {
        self.journal.push(entry);
    }
}

impl Driver for FakeDriver {
    fn navigate(&self, url: &str) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.url = url.to_string();
        inner.log(format!("navigate {url}"));
        Ok(())
    }

    fn current_url(&self) -> VenderResult<String> {
        Ok(self.inner.borrow().url.clone())
    }

    fn title(&self) -> VenderResult<String> {
        Ok(self.inner.borrow().title.clone())
    }

    fn ready_state(&self) -> VenderResult<String> {
        let mut inner = self.inner.borrow_mut();
        if inner.no_window {
            return Err(VenderError::NoWindow);
        }
        if inner.ready_after_polls > 0 {
            inner.ready_after_polls -= 1;
            return Ok("loading".to_string());
        }
        Ok(inner.ready_state.clone())
    }

    fn find(&self, locator: &Locator) -> VenderResult<ElementHandle> {
        let inner = self.inner.borrow();
        inner
            .document_matches(locator.value())
            .first()
            .map(|id| ElementHandle::new(*id))
            .ok_or_else(|| VenderError::ElementNotFound {
                selector: locator.value().to_string(),
            })
    }

    fn find_all(&self, locator: &Locator) -> VenderResult<Vec<ElementHandle>> {
        let inner = self.inner.borrow();
        Ok(inner
            .document_matches(locator.value())
            .into_iter()
            .map(ElementHandle::new)
            .collect())
    }

    fn document_query(&self, css: &str) -> VenderResult<Option<ElementHandle>> {
        let inner = self.inner.borrow();
        Ok(inner
            .document_matches(css)
            .first()
            .map(|id| ElementHandle::new(*id)))
    }

    fn is_displayed(&self, element: &ElementHandle) -> VenderResult<bool> {
        self.inner.borrow_mut().currently_visible(element)
    }

    fn is_enabled(&self, element: &ElementHandle) -> VenderResult<bool> {
        Ok(self.inner.borrow().node(element)?.el.enabled)
    }

    fn text(&self, element: &ElementHandle) -> VenderResult<String> {
        let inner = self.inner.borrow();
        let node = inner.node(element)?;
        if let Some(source) = &node.el.mirror_value_of {
            let mirrored = inner
                .dom
                .nodes
                .iter()
                .find(|n| !n.detached && n.el.selectors.iter().any(|s| s == source))
                .map(|n| n.el.value.clone());
            return Ok(mirrored.unwrap_or_default());
        }
        Ok(node.el.text.clone())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> VenderResult<Option<String>> {
        let inner = self.inner.borrow();
        Ok(inner.node(element)?.el.attrs.get(name).cloned())
    }

    fn click(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let visible = {
            let node = inner.node(element)?;
            node.el.visible && node.el.visible_after_polls == 0
        };
        let selector = inner.node(element)?.el.primary_selector();
        if !visible {
            return Err(VenderError::NotInteractable { selector });
        }
        inner.active = Some(element.id());
        inner.log(format!("click {selector}"));
        Ok(())
    }

    fn js_click(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = inner.node(element)?.el.primary_selector();
        inner.active = Some(element.id());
        inner.log(format!("js_click {selector}"));
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = {
            let node = inner.node_mut(element)?;
            node.el.value.clear();
            node.el.primary_selector()
        };
        inner.log(format!("clear {selector}"));
        Ok(())
    }

    fn type_text(&self, element: &ElementHandle, text: &str) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = {
            let node = inner.node_mut(element)?;
            node.el.value.push_str(text);
            node.el.primary_selector()
        };
        inner.log(format!("type {text} -> {selector}"));
        Ok(())
    }

    fn press_key(&self, element: &ElementHandle, key: Key) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = inner.node(element)?.el.primary_selector();
        inner.log(format!("key {key:?} -> {selector}"));
        Ok(())
    }

    fn js_set_value(&self, element: &ElementHandle, value: &str) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = {
            let node = inner.node_mut(element)?;
            node.el.value = value.to_string();
            node.el.primary_selector()
        };
        inner.log(format!("js_set_value {value} -> {selector}"));
        Ok(())
    }

    fn scroll_into_view(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = inner.node(element)?.el.primary_selector();
        inner.log(format!("scroll {selector}"));
        Ok(())
    }

    fn hover(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = inner.node(element)?.el.primary_selector();
        inner.log(format!("hover {selector}"));
        Ok(())
    }

    fn js_focus(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = inner.node(element)?.el.primary_selector();
        inner.active = Some(element.id());
        inner.log(format!("focus {selector}"));
        Ok(())
    }

    fn active_element(&self) -> VenderResult<ElementHandle> {
        let inner = self.inner.borrow();
        inner
            .active
            .map(ElementHandle::new)
            .ok_or_else(|| VenderError::ElementNotFound {
                selector: "document.activeElement".to_string(),
            })
    }

    fn send_tab(&self) -> VenderResult<()> {
        self.inner.borrow_mut().log("tab".to_string());
        Ok(())
    }

    fn shadow_query(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Option<ElementHandle>> {
        let inner = self.inner.borrow();
        inner.node(host)?;
        Ok(inner
            .shadow_matches(host.id(), css)
            .first()
            .map(|id| ElementHandle::new(*id)))
    }

    fn shadow_query_all(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Vec<ElementHandle>> {
        let inner = self.inner.borrow();
        inner.node(host)?;
        Ok(inner
            .shadow_matches(host.id(), css)
            .into_iter()
            .map(ElementHandle::new)
            .collect())
    }

    fn enter_frame(&self, element: &ElementHandle) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        let selector = inner.node(element)?.el.primary_selector();
        inner.current_frame = Some(element.id());
        inner.log(format!("enter_frame {selector}"));
        Ok(())
    }

    fn leave_frame(&self) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.current_frame = None;
        inner.log("leave_frame".to_string());
        Ok(())
    }

    fn screenshot_png(&self) -> VenderResult<Vec<u8>> {
        self.inner.borrow_mut().log("screenshot".to_string());
        // Smallest valid-enough PNG payload for file-writing tests.
        Ok(vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
    }

    fn quit(&self) -> VenderResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.quit_called = true;
        inner.log("quit".to_string());
        Ok(())
    }
}
