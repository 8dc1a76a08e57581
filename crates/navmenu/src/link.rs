//! Item links: where an item points and how that becomes a URL.

use serde::{Deserialize, Serialize};

use crate::attributes::{Attributes, merge_class};
use crate::url::{UrlGenerator, is_absolute};

/// A path, route name, or action plus positional parameters.
///
/// Deserializes from either a plain string or a list whose first element is
/// the target and the rest are parameters (`["post.show", "42"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TargetRepr", into = "TargetRepr")]
pub struct Target {
    pub name: String,
    pub params: Vec<String>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::new(name)
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::new(name)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Plain(String),
    List(Vec<String>),
}

impl From<TargetRepr> for Target {
    fn from(repr: TargetRepr) -> Self {
        match repr {
            TargetRepr::Plain(name) => Target::new(name),
            TargetRepr::List(mut parts) => {
                if parts.is_empty() {
                    return Target::new("");
                }
                let name = parts.remove(0);
                Target {
                    name,
                    params: parts,
                }
            }
        }
    }
}

impl From<Target> for TargetRepr {
    fn from(target: Target) -> Self {
        if target.params.is_empty() {
            TargetRepr::Plain(target.name)
        } else {
            let mut parts = vec![target.name];
            parts.extend(target.params);
            TargetRepr::List(parts)
        }
    }
}

/// Path specification captured when the item was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPath {
    pub url: Option<Target>,
    pub route: Option<Target>,
    pub action: Option<Target>,
    pub secure: Option<bool>,
    /// Group prefix in effect when the item was added.
    pub prefix: Option<String>,
}

impl LinkPath {
    /// Resolve the path to a URL; `url` wins over `route`, which wins over
    /// `action`. Nothing set resolves to `None`.
    pub fn dispatch(&self, urls: &dyn UrlGenerator) -> Option<String> {
        if let Some(url) = &self.url {
            if is_absolute(&url.name) {
                return Some(url.name.clone());
            }
            let path = format!("{}/{}", self.prefix.as_deref().unwrap_or(""), url.name);
            return Some(urls.to_url(&path, &url.params, self.secure));
        }
        if let Some(route) = &self.route {
            return urls.to_route(&route.name, &route.params);
        }
        if let Some(action) = &self.action {
            return urls.to_action(&action.name, &action.params);
        }
        None
    }
}

/// The anchor of a menu item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub(crate) path: LinkPath,
    pub(crate) href: Option<String>,
    pub(crate) attributes: Attributes,
    pub(crate) is_active: bool,
}

impl Link {
    pub fn new(path: LinkPath) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn path(&self) -> &LinkPath {
        &self.path
    }

    /// Explicit href, bypassing path dispatch.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn set_href(&mut self, href: impl Into<String>) -> &mut Self {
        self.href = Some(href.into());
        self
    }

    /// Force https for `url` paths.
    pub fn secure(&mut self) -> &mut Self {
        self.path.secure = Some(true);
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn merge_attrs(&mut self, attrs: &Attributes) -> &mut Self {
        self.attributes.merge(attrs);
        self
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Add the active class to the anchor.
    pub(crate) fn mark_active(&mut self, active_class: &str) {
        let class = merge_class(
            &Attributes::from([("class", active_class)]),
            &self.attributes,
        );
        self.attributes.set("class", class);
        self.is_active = true;
    }

    /// The link's URL: the explicit href, or the dispatched path.
    pub fn url(&self, urls: &dyn UrlGenerator) -> Option<String> {
        match &self.href {
            Some(href) => Some(href.clone()),
            None => self.path.dispatch(urls),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::url::SimpleUrlGenerator;

    fn urls() -> SimpleUrlGenerator {
        SimpleUrlGenerator::new("http://test.com")
            .unwrap()
            .route("profile", "/users/:id")
            .action("HomeController@index", "/home")
    }

    #[test]
    fn dispatch_url_with_prefix() {
        let path = LinkPath {
            url: Some("users".into()),
            prefix: Some("admin".into()),
            ..LinkPath::default()
        };
        assert_eq!(
            path.dispatch(&urls()),
            Some("http://test.com/admin/users".to_string())
        );
    }

    #[test]
    fn dispatch_absolute_url_verbatim() {
        let path = LinkPath {
            url: Some("https://rust-lang.org".into()),
            prefix: Some("ignored".into()),
            ..LinkPath::default()
        };
        assert_eq!(
            path.dispatch(&urls()),
            Some("https://rust-lang.org".to_string())
        );
    }

    #[test]
    fn dispatch_route_and_action() {
        let route = LinkPath {
            route: Some(Target::with_params("profile", ["7"])),
            ..LinkPath::default()
        };
        assert_eq!(
            route.dispatch(&urls()),
            Some("http://test.com/users/7".to_string())
        );

        let action = LinkPath {
            action: Some("HomeController@index".into()),
            ..LinkPath::default()
        };
        assert_eq!(
            action.dispatch(&urls()),
            Some("http://test.com/home".to_string())
        );
    }

    #[test]
    fn dispatch_nothing_is_none() {
        assert_eq!(LinkPath::default().dispatch(&urls()), None);
    }

    #[test]
    fn href_overrides_path() {
        let mut link = Link::new(LinkPath {
            url: Some("about".into()),
            ..LinkPath::default()
        });
        link.set_href("#top");
        assert_eq!(link.url(&urls()), Some("#top".to_string()));
    }

    #[test]
    fn secure_switches_scheme() {
        let mut link = Link::new(LinkPath {
            url: Some("login".into()),
            ..LinkPath::default()
        });
        link.secure();
        assert_eq!(link.url(&urls()), Some("https://test.com/login".to_string()));
    }

    #[test]
    fn target_deserializes_from_string_or_list() {
        let plain: Target = serde_json::from_str(r#""home""#).unwrap();
        assert_eq!(plain, Target::new("home"));
        let list: Target = serde_json::from_str(r#"["post.show", "42"]"#).unwrap();
        assert_eq!(list, Target::with_params("post.show", ["42"]));
    }
}
