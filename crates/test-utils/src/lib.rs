//! Navmenu test utilities.
//!
//! Helpers for integration testing: request contexts rooted at
//! `http://test.com`, canonical menu fixtures, a URL generator that records
//! its calls, and string assertions for rendered markup.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;

use navmenu::{
    Builder, ItemOptions, MenuContext, MenuRegistry, MenuResult, MenuSettings, RequestInfo,
    SimpleUrlGenerator, UrlGenerator,
};

/// Base URL of every test context.
pub const BASE_URL: &str = "http://test.com";

/// URL generator with a few named routes and actions.
pub fn test_urls() -> MenuResult<SimpleUrlGenerator> {
    Ok(SimpleUrlGenerator::new(BASE_URL)?
        .route("post.show", "/posts/:id")
        .route("post.index", "/posts")
        .action("PageController@about", "/about"))
}

/// Context for a request to `current` (absolute, or a path under
/// [`BASE_URL`]).
pub fn test_context(current: &str) -> MenuResult<MenuContext> {
    let request = RequestInfo::from_url(&absolute(current))?;
    Ok(MenuContext::new(Arc::new(test_urls()?), request))
}

/// Registry for a request to `current` with settings parsed from YAML.
pub fn test_registry(current: &str, settings_yaml: &str) -> MenuResult<MenuRegistry> {
    Ok(MenuRegistry::new(
        MenuSettings::from_yaml(settings_yaml)?,
        test_context(current)?,
    ))
}

/// The four-item menu: Home, About, Services, Contact.
pub fn basic_menu(menu: &mut Builder) -> MenuResult<()> {
    menu.add("Home", "")?;
    menu.add("About", "about")?;
    menu.add("Services", "services")?;
    menu.add("Contact", "contact")?;
    Ok(())
}

/// A two-level menu with explicit ids and an `order` value on every root.
///
/// ```text
/// home (3)
/// about (1)
///   team
///   history
/// contact (2)
/// ```
pub fn nested_menu(menu: &mut Builder) -> MenuResult<()> {
    menu.add("Home", ItemOptions::url("").id("home"))?
        .set_data("order", json!(3))?;
    let mut about = menu.add("About", ItemOptions::url("about").id("about"))?;
    about.set_data("order", json!(1))?;
    about.add("Team", ItemOptions::url("about/team").id("team"))?;
    about.add("History", ItemOptions::url("about/history").id("history"))?;
    menu.add("Contact", ItemOptions::url("contact").id("contact"))?
        .set_data("order", json!(2))?;
    Ok(())
}

fn absolute(current: &str) -> String {
    if current.contains("://") {
        current.to_string()
    } else {
        format!("{BASE_URL}/{}", current.trim_start_matches('/'))
    }
}

/// One call made to a [`RecordingUrlGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCall {
    pub kind: &'static str,
    pub target: String,
    pub params: Vec<String>,
    pub secure: Option<bool>,
}

/// A [`UrlGenerator`] that delegates to [`test_urls`] and records every call.
#[derive(Debug)]
pub struct RecordingUrlGenerator {
    inner: SimpleUrlGenerator,
    calls: Mutex<Vec<UrlCall>>,
}

impl RecordingUrlGenerator {
    pub fn new() -> MenuResult<Self> {
        Ok(Self {
            inner: test_urls()?,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<UrlCall> {
        self.calls.lock().clone()
    }

    fn record(&self, kind: &'static str, target: &str, params: &[String], secure: Option<bool>) {
        self.calls.lock().push(UrlCall {
            kind,
            target: target.to_string(),
            params: params.to_vec(),
            secure,
        });
    }
}

impl UrlGenerator for RecordingUrlGenerator {
    fn to_url(&self, path: &str, params: &[String], secure: Option<bool>) -> String {
        self.record("url", path, params, secure);
        self.inner.to_url(path, params, secure)
    }

    fn to_route(&self, name: &str, params: &[String]) -> Option<String> {
        self.record("route", name, params, None);
        self.inner.to_route(name, params)
    }

    fn to_action(&self, action: &str, params: &[String]) -> Option<String> {
        self.record("action", action, params, None);
        self.inner.to_action(action, params)
    }
}

/// Assertion helpers for rendered markup.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a substring occurs exactly `expected` times.
    pub fn occurs(haystack: &str, needle: &str, expected: usize) {
        let actual = haystack.matches(needle).count();
        assert_eq!(
            actual, expected,
            "Expected '{needle}' {expected} time(s), found {actual}\nActual: {haystack}"
        );
    }
}
