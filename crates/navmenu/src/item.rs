//! Menu items and the options used to create them.

use deunicode::deunicode_with_tofu;
use serde_json::{Map, Value};

use crate::attributes::Attributes;
use crate::link::{Link, Target};

/// Options for a new item.
///
/// A plain string converts to a `url` option, so
/// `menu.add("About", "about")` links to the `about` path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemOptions {
    /// Explicit id; a fresh one is generated when absent.
    pub id: Option<String>,
    pub parent: Option<String>,
    /// Lookup name; derived from the title when absent.
    pub nickname: Option<String>,
    pub url: Option<Target>,
    pub route: Option<Target>,
    pub action: Option<Target>,
    pub secure: Option<bool>,
    /// Plain text item without a link.
    pub raw: bool,
    /// Skip matching against the current request (manual activation still works).
    pub disable_activation_by_url: bool,
    /// HTML attributes of the item element.
    pub attributes: Attributes,
}

impl ItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(target: impl Into<Target>) -> Self {
        Self {
            url: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn route(target: impl Into<Target>) -> Self {
        Self {
            route: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn action(target: impl Into<Target>) -> Self {
        Self {
            action: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = Some(true);
        self
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn without_url_activation(mut self) -> Self {
        self.disable_activation_by_url = true;
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }
}

impl From<&str> for ItemOptions {
    fn from(url: &str) -> Self {
        ItemOptions::url(url)
    }
}

impl From<String> for ItemOptions {
    fn from(url: String) -> Self {
        ItemOptions::url(url)
    }
}

impl From<Option<String>> for ItemOptions {
    fn from(url: Option<String>) -> Self {
        match url {
            Some(url) => ItemOptions::url(url),
            None => ItemOptions::default(),
        }
    }
}

impl From<Target> for ItemOptions {
    fn from(target: Target) -> Self {
        ItemOptions::url(target)
    }
}

/// One node of a menu.
///
/// Items are created through [`Builder::add`](crate::Builder::add) and
/// linked to their parent by id. Operations that need the rest of the tree
/// (children, URL resolution, activation) live on the builder and on
/// [`ItemMut`](crate::ItemMut).
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) id: String,
    pub(crate) parent: Option<String>,
    pub(crate) title: String,
    pub(crate) nickname: String,
    pub(crate) before_html: String,
    pub(crate) after_html: String,
    pub(crate) link: Option<Link>,
    pub(crate) attributes: Attributes,
    pub(crate) data: Map<String, Value>,
    pub(crate) divider: Option<Attributes>,
    /// Exact active item (not set on ancestors).
    pub(crate) active: bool,
    /// Carries the active class.
    pub(crate) is_active: bool,
    pub(crate) disable_activation_by_url: bool,
}

impl Item {
    pub(crate) fn new(id: String, title: &str, options: &ItemOptions, link: Option<Link>) -> Self {
        Self {
            id,
            parent: options.parent.clone(),
            title: title.to_string(),
            nickname: options
                .nickname
                .clone()
                .unwrap_or_else(|| nickname_for(title)),
            before_html: String::new(),
            after_html: String::new(),
            link,
            attributes: Attributes::new(),
            data: Map::new(),
            divider: None,
            active: false,
            is_active: false,
            disable_activation_by_url: options.disable_activation_by_url,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) -> &mut Self {
        self.nickname = nickname.into();
        self
    }

    pub fn before_html(&self) -> &str {
        &self.before_html
    }

    pub fn after_html(&self) -> &str {
        &self.after_html
    }

    /// Prepend text or HTML to the title.
    pub fn prepend(&mut self, html: &str) -> &mut Self {
        self.title.insert_str(0, html);
        self
    }

    /// Append text or HTML to the title.
    pub fn append(&mut self, html: &str) -> &mut Self {
        self.title.push_str(html);
        self
    }

    /// HTML emitted before the anchor.
    pub fn before(&mut self, html: &str) -> &mut Self {
        self.before_html.insert_str(0, html);
        self
    }

    /// HTML emitted after the anchor.
    pub fn after(&mut self, html: &str) -> &mut Self {
        self.after_html.push_str(html);
        self
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn link_mut(&mut self) -> Option<&mut Link> {
        self.link.as_mut()
    }

    pub fn has_link(&self) -> bool {
        self.link.is_some()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// A single attribute; `None` when unset.
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

    /// All metadata.
    pub fn data_all(&self) -> &Map<String, Value> {
        &self.data
    }

    /// One metadata value; keys are case-insensitive.
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(&key.to_lowercase())
    }

    pub fn divider(&self) -> Option<&Attributes> {
        self.divider.as_ref()
    }

    /// Whether this is the item matched by activation itself.
    pub fn is_current(&self) -> bool {
        self.active
    }

    /// Whether the item carries the active class (itself or a descendant matched).
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Two-tier lookup used by attribute queries: declared fields first,
    /// then metadata. Names are case-insensitive.
    ///
    /// A root item reports `parent` as `Value::Null`, so roots can be
    /// queried by a null parent.
    pub fn get(&self, name: &str) -> Option<Value> {
        let name = name.to_lowercase();
        match name.as_str() {
            "id" => Some(Value::String(self.id.clone())),
            "parent" => Some(
                self.parent
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            ),
            "title" => Some(Value::String(self.title.clone())),
            "nickname" => Some(Value::String(self.nickname.clone())),
            "active" => Some(Value::Bool(self.active)),
            "isactive" | "is_active" => Some(Value::Bool(self.is_active)),
            "beforehtml" | "before_html" => Some(Value::String(self.before_html.clone())),
            "afterhtml" | "after_html" => Some(Value::String(self.after_html.clone())),
            _ => self.data.get(&name).cloned(),
        }
    }

    pub(crate) fn set_data(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_lowercase(), value);
    }

    pub(crate) fn mark_active(&mut self, active_class: &str) {
        let class = crate::attributes::merge_class(
            &Attributes::from([("class", active_class)]),
            &self.attributes,
        );
        self.attributes.set("class", class);
        self.is_active = true;
    }
}

/// Derive a lookup nickname from a title: camelCase of its words,
/// transliterated to ASCII.
///
/// "About us" -> "aboutUs", "site-map" -> "siteMap", "Café" -> "cafe"
pub fn nickname_for(title: &str) -> String {
    let ascii = deunicode_with_tofu(title, "");
    let studly: String = ascii
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();

    let mut chars = studly.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str) -> Item {
        Item::new("id-1".into(), title, &ItemOptions::default(), None)
    }

    #[test]
    fn nickname_is_camel_case() {
        assert_eq!(nickname_for("Home"), "home");
        assert_eq!(nickname_for("About us"), "aboutUs");
        assert_eq!(nickname_for("site-map_index"), "siteMapIndex");
        assert_eq!(nickname_for(""), "");
        assert_eq!(nickname_for("Café"), "cafe");
        assert_eq!(nickname_for("Über uns"), "uberUns");
    }

    #[test]
    fn explicit_nickname_wins() {
        let item = Item::new(
            "x".into(),
            "Contact Us",
            &ItemOptions::default().nickname("contact"),
            None,
        );
        assert_eq!(item.nickname(), "contact");
    }

    #[test]
    fn attr_get_returns_last_set() {
        let mut item = item("Home");
        assert!(item.attributes().is_empty());
        item.set_attr("title", "first").set_attr("title", "second");
        assert_eq!(item.attr("title"), Some("second"));
        assert_eq!(item.attr("missing"), None);
    }

    #[test]
    fn title_decoration() {
        let mut item = item("Home");
        item.prepend("<i></i> ").append(" <b>new</b>");
        item.before("<span>").after("</span>");
        assert_eq!(item.title(), "<i></i> Home <b>new</b>");
        assert_eq!(item.before_html(), "<span>");
        assert_eq!(item.after_html(), "</span>");
    }

    #[test]
    fn get_checks_fields_then_data() {
        let mut item = item("Home");
        item.set_data("Weight", json!(3));
        assert_eq!(item.get("ID"), Some(json!("id-1")));
        assert_eq!(item.get("parent"), Some(Value::Null));
        assert_eq!(item.get("weight"), Some(json!(3)));
        assert_eq!(item.data("WEIGHT"), Some(&json!(3)));
        assert_eq!(item.get("unknown"), None);
    }

    #[test]
    fn mark_active_adds_class_once() {
        let mut item = item("Home");
        item.set_attr("class", "nav-item");
        item.mark_active("active");
        item.mark_active("active");
        assert_eq!(item.attr("class"), Some("nav-item active"));
        assert!(item.is_active());
        assert!(!item.is_current());
    }
}
