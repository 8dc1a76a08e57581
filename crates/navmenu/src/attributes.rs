//! Ordered HTML attribute bundles and the group-merge rules.
//!
//! Attribute order is insertion order and survives every merge, so rendered
//! markup is deterministic. Group bundles carry two special keys:
//! `prefix` (URL prefix for nested items) and `class` (space-separated
//! class list, de-duplicated on merge).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Matches `name="value"` pairs in a static attribute string.
#[allow(clippy::expect_used)]
static STATIC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*([\w-]+)\s*=\s*"([^"]+)""#).expect("valid regex literal")
});

/// An ordered mapping of HTML attribute names to optional values.
///
/// A `None` value keeps the key in the bundle but omits it from rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Option<String>)>,
}

impl Attributes {
    /// Create an empty attribute bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style boolean attribute (`disabled`, `hidden`, ...).
    ///
    /// Renders as `name="name"`.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.set(name.clone(), Some(name));
        self
    }

    /// Get the value of a key; absent and null keys both yield `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether the key is present with a non-null value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a key, keeping its position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set a key to a non-null value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, Some(value.into()));
    }

    /// Remove a key, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Overlay `other` onto this bundle; keys from `other` win.
    pub fn merge(&mut self, other: &Attributes) {
        for (k, v) in &other.entries {
            self.set(k.clone(), v.clone());
        }
    }

    /// Union where keys already present here win and `other` only fills gaps.
    pub fn union(&self, other: &Attributes) -> Attributes {
        let mut out = self.clone();
        for (k, v) in &other.entries {
            if !out.entries.iter().any(|(existing, _)| existing == k) {
                out.entries.push((k.clone(), v.clone()));
            }
        }
        out
    }

    /// A copy without the listed keys.
    pub fn without(&self, keys: &[&str]) -> Attributes {
        Attributes {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as ` key="value"` pairs, see [`render_attributes`].
    pub fn render(&self) -> String {
        render_attributes(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute names to scalar values")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Attributes, M::Error> {
                let mut attrs = Attributes::new();
                while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                    let value = match value {
                        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
                        serde_json::Value::Bool(true) => Some(key.clone()),
                        serde_json::Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    };
                    attrs.set(key, value);
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// Merge the `class` of two bundles.
///
/// Without a class in `new` the old class is returned untouched. Otherwise
/// old classes come first, duplicates are dropped keeping the first
/// occurrence, and tokens are joined by single spaces.
pub fn merge_class(new: &Attributes, old: &Attributes) -> Option<String> {
    let Some(new_class) = new.get("class") else {
        return old.get("class").map(str::to_string);
    };

    let combined = format!("{} {}", old.get("class").unwrap_or(""), new_class);
    let mut tokens: Vec<&str> = Vec::new();
    for token in combined.split_whitespace() {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    Some(tokens.join(" "))
}

/// Merge the URL `prefix` of two bundles, outer prefix first.
pub fn merge_prefix(new: &Attributes, old: &Attributes) -> Option<String> {
    let Some(new_prefix) = new.get("prefix") else {
        return old.get("prefix").map(str::to_string);
    };

    Some(format!(
        "{}/{}",
        old.get("prefix").unwrap_or("").trim_matches('/'),
        new_prefix.trim_matches('/')
    ))
}

/// Merge a nested group bundle onto its enclosing one.
///
/// Every key of `new` wins except `prefix` and `class`, which are combined
/// by [`merge_prefix`] and [`merge_class`].
pub fn merge_group(new: &Attributes, old: &Attributes) -> Attributes {
    let mut layered = new.clone();
    layered.set("prefix", merge_prefix(new, old));
    layered.set("class", merge_class(new, old));
    for key in ["prefix", "class"] {
        if layered.get(key).is_none() {
            layered.remove(key);
        }
    }

    let mut merged = old.without(&["prefix", "class"]);
    merged.merge(&layered);
    merged
}

/// Render attributes as a leading-space string of `key="escaped value"` pairs.
///
/// Null-valued keys are skipped; an empty bundle renders as `""`.
pub fn render_attributes(attrs: &Attributes) -> String {
    let parts: Vec<String> = attrs
        .iter()
        .filter_map(|(k, v)| v.map(|v| format!("{k}=\"{}\"", html_escape(v))))
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!(" {}", parts.join(" "))
    }
}

/// Merge a static attribute string written in a template with an item's
/// attributes, combining classes, and render the result.
///
/// `merge_static(r#"class="nav-item" role="menuitem""#, &item_attrs)`
pub fn merge_static(static_attrs: &str, old: &Attributes) -> String {
    let mut parsed = Attributes::new();
    for caps in STATIC_ATTR.captures_iter(static_attrs) {
        parsed.insert(&caps[1], &caps[2]);
    }

    parsed.set("class", merge_class(&parsed, old));

    let mut merged = old.without(&["class"]);
    merged.merge(&parsed);
    render_attributes(&merged)
}

/// Escape a string for use in HTML text or attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn merge_class_without_new_class_keeps_old() {
        let old = Attributes::from([("class", "nav")]);
        assert_eq!(
            merge_class(&Attributes::new(), &old),
            Some("nav".to_string())
        );
        assert_eq!(merge_class(&Attributes::new(), &Attributes::new()), None);
    }

    #[test]
    fn merge_class_dedupes_in_first_seen_order() {
        let old = Attributes::from([("class", "nav  item")]);
        let new = Attributes::from([("class", "item active nav extra")]);
        assert_eq!(
            merge_class(&new, &old),
            Some("nav item active extra".to_string())
        );
    }

    #[test]
    fn merge_prefix_joins_outer_first() {
        let old = Attributes::from([("prefix", "/admin/")]);
        let new = Attributes::from([("prefix", "/users")]);
        assert_eq!(merge_prefix(&new, &old), Some("admin/users".to_string()));
        assert_eq!(
            merge_prefix(&Attributes::new(), &old),
            Some("/admin/".to_string())
        );
        assert_eq!(merge_prefix(&new, &Attributes::new()), Some("/users".to_string()));
    }

    #[test]
    fn merge_group_new_values_win() {
        let old = Attributes::from([("prefix", "p2"), ("class", "a"), ("data-x", "1")]);
        let new = Attributes::from([("prefix", "p1"), ("class", "b"), ("data-x", "2")]);
        let merged = merge_group(&new, &old);
        assert_eq!(merged.get("prefix"), Some("p2/p1"));
        assert_eq!(merged.get("class"), Some("a b"));
        assert_eq!(merged.get("data-x"), Some("2"));
    }

    #[test]
    fn merge_group_keeps_outer_class_when_inner_has_none() {
        let old = Attributes::from([("class", "outer"), ("title", "t")]);
        let new = Attributes::from([("id", "x")]);
        let merged = merge_group(&new, &old);
        assert_eq!(merged.render(), r#" title="t" id="x" class="outer""#);
    }

    #[test]
    fn render_skips_null_and_escapes() {
        let mut attrs = Attributes::new().with("title", "Tom & \"Jerry\"").flag("disabled");
        attrs.set("hidden", None);
        assert_eq!(
            attrs.render(),
            r#" title="Tom &amp; &quot;Jerry&quot;" disabled="disabled""#
        );
        assert_eq!(Attributes::new().render(), "");
    }

    #[test]
    fn set_keeps_position() {
        let mut attrs = Attributes::from([("a", "1"), ("b", "2")]);
        attrs.insert("a", "3");
        assert_eq!(attrs.render(), r#" a="3" b="2""#);
    }

    #[test]
    fn union_left_wins() {
        let item = Attributes::from([("class", "active")]);
        let extra = Attributes::from([("class", "nav-item"), ("role", "menuitem")]);
        assert_eq!(
            item.union(&extra).render(),
            r#" class="active" role="menuitem""#
        );
    }

    #[test]
    fn merged_bundles_render_deduplicated_classes() {
        let a = Attributes::from([("class", "btn btn-primary")]);
        let b = Attributes::from([("class", "btn active"), ("id", "go")]);
        assert_eq!(
            merge_group(&b, &a).render(),
            r#" class="btn btn-primary active" id="go""#
        );
    }

    #[test]
    fn merge_static_combines_classes() {
        let item = Attributes::from([("class", "active"), ("id", "home")]);
        assert_eq!(
            merge_static(r#"class="nav-item" role="menuitem""#, &item),
            r#" id="home" class="active nav-item" role="menuitem""#
        );
    }

    #[test]
    fn deserialize_preserves_order_and_flags() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"z": "1", "a": true, "n": null, "k": 5}"#).unwrap();
        assert_eq!(attrs.render(), r#" z="1" a="a" k="5""#);
    }
}
