//! Host-application collaborators: URL generation and the current request.
//!
//! The menu never builds absolute URLs by itself. It hands paths, named
//! routes, and controller actions to a [`UrlGenerator`] and compares the
//! results against the [`RequestInfo`] of the request being served.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;
use url::Url;

use crate::error::{MenuError, MenuResult};

/// Generates URLs for paths, named routes, and controller actions.
pub trait UrlGenerator: fmt::Debug + Send + Sync {
    /// Absolute URL for an application path plus extra path segments.
    fn to_url(&self, path: &str, params: &[String], secure: Option<bool>) -> String;

    /// URL of a named route; `None` when the route is unknown.
    fn to_route(&self, name: &str, params: &[String]) -> Option<String>;

    /// URL of a controller action; `None` when the action is unknown.
    fn to_action(&self, action: &str, params: &[String]) -> Option<String>;
}

/// Whether a path carries its own URL scheme (`https://...`, `mailto:...`).
pub fn is_absolute(path: &str) -> bool {
    Url::parse(path).is_ok()
}

/// A [`UrlGenerator`] rooted at a base URL with registered route patterns.
///
/// Route and action patterns use `:name` placeholders
/// (`/blog/:slug/edit`) that are filled positionally from the parameters;
/// leftover parameters are appended as path segments.
#[derive(Debug, Clone)]
pub struct SimpleUrlGenerator {
    base: Url,
    routes: HashMap<String, String>,
    actions: HashMap<String, String>,
}

impl SimpleUrlGenerator {
    /// Create a generator for the given base URL (`http://example.com`).
    pub fn new(base: &str) -> MenuResult<Self> {
        let base = Url::parse(base).map_err(|e| MenuError::InvalidUrl {
            url: base.to_string(),
            details: e.to_string(),
        })?;
        Ok(Self {
            base,
            routes: HashMap::new(),
            actions: HashMap::new(),
        })
    }

    /// Register a named route.
    pub fn route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name.into(), pattern.into());
        self
    }

    /// Register a controller action (`PageController@about`).
    pub fn action(mut self, action: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.actions.insert(action.into(), pattern.into());
        self
    }

    /// Join a path onto the base root, switching to https when asked.
    ///
    /// Path segments are percent-encoded the way [`Url::parse`] encodes the
    /// current request, so generated URLs compare equal to it. A `?query`
    /// or `#fragment` tail is kept as such.
    fn join(&self, path: &str, secure: Option<bool>) -> String {
        let mut root = self.base.clone();
        if secure == Some(true) && root.scheme() == "http" {
            // http -> https is always a permitted scheme change
            let _ = root.set_scheme("https");
        }

        let (path, fragment) = match path.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (path, None),
        };
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        if let Ok(mut segments) = root.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        root.set_query(query);
        root.set_fragment(fragment);

        let joined = String::from(root);
        if query.is_none() && fragment.is_none() {
            joined.trim_end_matches('/').to_string()
        } else {
            joined
        }
    }
}

impl UrlGenerator for SimpleUrlGenerator {
    fn to_url(&self, path: &str, params: &[String], secure: Option<bool>) -> String {
        if is_absolute(path) {
            return path.to_string();
        }
        let mut segments = vec![path.trim_matches('/').to_string()];
        segments.extend(params.iter().cloned());
        let joined: Vec<String> = segments.into_iter().filter(|s| !s.is_empty()).collect();
        self.join(&joined.join("/"), secure)
    }

    fn to_route(&self, name: &str, params: &[String]) -> Option<String> {
        let Some(pattern) = self.routes.get(name) else {
            warn!(route = %name, "unknown named route");
            return None;
        };
        Some(self.join(&fill_pattern(pattern, params), None))
    }

    fn to_action(&self, action: &str, params: &[String]) -> Option<String> {
        let Some(pattern) = self.actions.get(action) else {
            warn!(action = %action, "unknown controller action");
            return None;
        };
        Some(self.join(&fill_pattern(pattern, params), None))
    }
}

/// Substitute `:param` segments positionally.
///
/// Pattern: "/blog/:slug/edit", params: ["my-post"]
/// Result: "blog/my-post/edit"
fn fill_pattern(pattern: &str, params: &[String]) -> String {
    let mut params = params.iter();
    let mut parts: Vec<String> = pattern
        .split('/')
        .filter(|p| !p.is_empty())
        .map(|part| {
            if part.starts_with(':') {
                params.next().cloned().unwrap_or_default()
            } else {
                part.to_string()
            }
        })
        .collect();
    parts.extend(params.cloned());
    parts.retain(|p| !p.is_empty());
    parts.join("/")
}

/// The request a menu is being built for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// Path without leading slash; `"/"` at the site root.
    pub path: String,
    /// Full URL without query string.
    pub url: String,
    /// Full URL including the query string.
    pub full_url: String,
}

impl RequestInfo {
    /// Derive request information from the absolute URL being served.
    pub fn from_url(current: &str) -> MenuResult<Self> {
        let parsed = Url::parse(current).map_err(|e| MenuError::InvalidUrl {
            url: current.to_string(),
            details: e.to_string(),
        })?;

        let trimmed = parsed.path().trim_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };

        let mut without_query = parsed.clone();
        without_query.set_query(None);
        without_query.set_fragment(None);
        let url = without_query.as_str().trim_end_matches('/').to_string();

        let full_url = match parsed.query() {
            Some(q) => format!("{url}?{q}"),
            None => url.clone(),
        };

        Ok(Self {
            path,
            url,
            full_url,
        })
    }
}

/// Collaborators shared by every menu built for one request.
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub urls: Arc<dyn UrlGenerator>,
    pub request: RequestInfo,
}

impl MenuContext {
    pub fn new(urls: Arc<dyn UrlGenerator>, request: RequestInfo) -> Self {
        Self { urls, request }
    }

    /// A context using [`SimpleUrlGenerator`] at `base`, serving `current`.
    pub fn simple(base: &str, current: &str) -> MenuResult<Self> {
        Ok(Self {
            urls: Arc::new(SimpleUrlGenerator::new(base)?),
            request: RequestInfo::from_url(current)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("https://example.com/x"));
        assert!(is_absolute("mailto:someone@example.com"));
        assert!(!is_absolute("about"));
        assert!(!is_absolute("/about/team"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn to_url_joins_root() {
        let urls = SimpleUrlGenerator::new("http://test.com").unwrap();
        assert_eq!(urls.to_url("/", &[], None), "http://test.com");
        assert_eq!(urls.to_url("/about", &[], None), "http://test.com/about");
        assert_eq!(
            urls.to_url("admin/users", &["5".to_string()], None),
            "http://test.com/admin/users/5"
        );
        assert_eq!(
            urls.to_url("/login", &[], Some(true)),
            "https://test.com/login"
        );
    }

    #[test]
    fn to_url_percent_encodes_like_requests() {
        let urls = SimpleUrlGenerator::new("http://test.com").unwrap();
        let spaced = urls.to_url("about us", &[], None);
        assert_eq!(spaced, "http://test.com/about%20us");
        assert_eq!(spaced, RequestInfo::from_url("http://test.com/about us").unwrap().url);

        let accented = urls.to_url("café", &[], None);
        assert_eq!(accented, "http://test.com/caf%C3%A9");
        assert_eq!(accented, RequestInfo::from_url("http://test.com/caf%C3%A9").unwrap().url);

        assert_eq!(urls.to_url("about%20us", &[], None), "http://test.com/about%20us");
    }

    #[test]
    fn to_url_keeps_query_and_fragment() {
        let urls = SimpleUrlGenerator::new("http://test.com/app/").unwrap();
        assert_eq!(urls.to_url("search?q=a b", &[], None), "http://test.com/app/search?q=a%20b");
        assert_eq!(urls.to_url("docs#intro", &[], None), "http://test.com/app/docs#intro");
        assert_eq!(urls.to_url("", &[], None), "http://test.com/app");
    }

    #[test]
    fn routes_fill_params() {
        let urls = SimpleUrlGenerator::new("http://test.com")
            .unwrap()
            .route("post.edit", "/blog/:slug/edit")
            .action("PageController@about", "/about");
        assert_eq!(
            urls.to_route("post.edit", &["hello".to_string()]),
            Some("http://test.com/blog/hello/edit".to_string())
        );
        assert_eq!(
            urls.to_action("PageController@about", &["team".to_string()]),
            Some("http://test.com/about/team".to_string())
        );
        assert_eq!(urls.to_route("missing", &[]), None);
    }

    #[test]
    fn request_info_from_url() {
        let req = RequestInfo::from_url("http://test.com/posts/5/edit?tab=meta").unwrap();
        assert_eq!(req.path, "posts/5/edit");
        assert_eq!(req.url, "http://test.com/posts/5/edit");
        assert_eq!(req.full_url, "http://test.com/posts/5/edit?tab=meta");

        let root = RequestInfo::from_url("http://test.com/").unwrap();
        assert_eq!(root.path, "/");
        assert_eq!(root.url, "http://test.com");
    }

    #[test]
    fn request_info_rejects_relative() {
        assert!(matches!(
            RequestInfo::from_url("/about"),
            Err(MenuError::InvalidUrl { .. })
        ));
    }
}
