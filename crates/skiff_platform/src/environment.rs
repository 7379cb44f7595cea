//! Host environment abstraction
//!
//! The engine never talks to a browser runtime directly. Everything it reads
//! (user agent, URL, viewport) or writes (document attributes) goes through
//! [`Environment`], so a webview bridge, a test fixture or the CLI can all
//! stand in for `window`/`document`.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

/// Read access to the host runtime, plus the few document writes the
/// platform performs
pub trait Environment {
    /// Raw user agent string
    fn user_agent(&self) -> String;

    /// Raw navigator platform string (e.g. `"iPhone"`, `"MacIntel"`)
    fn navigator_platform(&self) -> String;

    /// Current page URL
    fn url(&self) -> String;

    /// Viewport width in CSS pixels
    fn inner_width(&self) -> f64;

    /// Viewport height in CSS pixels
    fn inner_height(&self) -> f64;

    /// Screen width in CSS pixels
    fn screen_width(&self) -> f64;

    /// Screen height in CSS pixels
    fn screen_height(&self) -> f64;

    /// Read an attribute of the document element (`dir`, `lang`)
    fn document_attribute(&self, name: &str) -> Option<String>;

    /// Write an attribute of the document element
    fn set_document_attribute(&mut self, name: &str, value: &str);

    /// Whether a global object is present (e.g. `cordova`, `webkit`)
    fn has_global(&self, name: &str) -> bool;

    /// Whether a text input currently holds focus
    fn has_focused_text_input(&self) -> bool {
        false
    }

    /// Whether the document has finished loading
    fn document_complete(&self) -> bool {
        false
    }
}

/// In-memory environment with fixed values
///
/// Used by the CLI and tests, and by embedders that read the host values
/// once at startup.
#[derive(Clone, Debug, Default)]
pub struct StaticEnvironment {
    /// User agent string
    pub user_agent: String,
    /// Navigator platform string
    pub navigator_platform: String,
    /// Page URL
    pub url: String,
    /// Viewport width
    pub inner_width: f64,
    /// Viewport height
    pub inner_height: f64,
    /// Screen width
    pub screen_width: f64,
    /// Screen height
    pub screen_height: f64,
    /// Document element attributes
    pub attributes: FxHashMap<String, String>,
    /// Names of globals present on the window
    pub globals: FxHashSet<String>,
    /// Whether a text input holds focus
    pub focused_text_input: bool,
    /// Whether the document has finished loading
    pub document_complete: bool,
}

impl StaticEnvironment {
    /// Create an environment with the given user agent
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Default::default()
        }
    }

    /// Set the navigator platform
    pub fn with_navigator_platform(mut self, platform: impl Into<String>) -> Self {
        self.navigator_platform = platform.into();
        self
    }

    /// Set the page URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set both viewport and screen size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.inner_width = width;
        self.inner_height = height;
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Set a document attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Declare a global as present
    pub fn with_global(mut self, name: impl Into<String>) -> Self {
        self.globals.insert(name.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn navigator_platform(&self) -> String {
        self.navigator_platform.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn inner_width(&self) -> f64 {
        self.inner_width
    }

    fn inner_height(&self) -> f64 {
        self.inner_height
    }

    fn screen_width(&self) -> f64 {
        self.screen_width
    }

    fn screen_height(&self) -> f64 {
        self.screen_height
    }

    fn document_attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_document_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn has_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    fn has_focused_text_input(&self) -> bool {
        self.focused_text_input
    }

    fn document_complete(&self) -> bool {
        self.document_complete
    }
}

/// Shared handle, so the host can keep mutating the environment after the
/// platform has taken it
impl<E: Environment> Environment for Rc<RefCell<E>> {
    fn user_agent(&self) -> String {
        self.borrow().user_agent()
    }

    fn navigator_platform(&self) -> String {
        self.borrow().navigator_platform()
    }

    fn url(&self) -> String {
        self.borrow().url()
    }

    fn inner_width(&self) -> f64 {
        self.borrow().inner_width()
    }

    fn inner_height(&self) -> f64 {
        self.borrow().inner_height()
    }

    fn screen_width(&self) -> f64 {
        self.borrow().screen_width()
    }

    fn screen_height(&self) -> f64 {
        self.borrow().screen_height()
    }

    fn document_attribute(&self, name: &str) -> Option<String> {
        self.borrow().document_attribute(name)
    }

    fn set_document_attribute(&mut self, name: &str, value: &str) {
        self.borrow_mut().set_document_attribute(name, value)
    }

    fn has_global(&self, name: &str) -> bool {
        self.borrow().has_global(name)
    }

    fn has_focused_text_input(&self) -> bool {
        self.borrow().has_focused_text_input()
    }

    fn document_complete(&self) -> bool {
        self.borrow().document_complete()
    }
}
