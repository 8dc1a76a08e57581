//! Batch updates over the items matched by a query.

use serde_json::{Map, Value};

use super::{Builder, ItemMut};
use crate::attributes::Attributes;
use crate::error::MenuResult;
use crate::item::Item;

/// A mutable selection of items inside one [`Builder`].
///
/// Every operation applies to each selected item in collection order.
/// Data writes go through [`ItemMut::merge_data`] and so still cascade to
/// descendants when `cascade_data` is on.
#[derive(Debug)]
pub struct ItemSet<'a> {
    builder: &'a mut Builder,
    indices: Vec<usize>,
}

impl Builder {
    /// Select the items [`Builder::where_attr`] would return.
    pub fn select_where(&mut self, attribute: &str, value: &Value, recursive: bool) -> ItemSet<'_> {
        let found = self.where_attr(attribute, value, recursive);
        let indices = self.indices_of(&found);
        ItemSet {
            builder: self,
            indices,
        }
    }

    /// Select the children of `parent`, or the roots when `None`.
    pub fn select_parent(&mut self, parent: Option<&str>, recursive: bool) -> ItemSet<'_> {
        let value = parent.map_or(Value::Null, |p| Value::String(p.to_string()));
        self.select_where("parent", &value, recursive)
    }

    /// Select every item.
    pub fn select_all(&mut self) -> ItemSet<'_> {
        let indices = (0..self.items.len()).collect();
        ItemSet {
            builder: self,
            indices,
        }
    }

    fn indices_of(&self, found: &[&Item]) -> Vec<usize> {
        found
            .iter()
            .filter_map(|wanted| {
                self.items
                    .iter()
                    .position(|item| std::ptr::eq(item, *wanted))
            })
            .collect()
    }
}

impl ItemSet<'_> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Ids of the selected items.
    pub fn ids(&self) -> Vec<&str> {
        self.indices
            .iter()
            .map(|&i| self.builder.items[i].id.as_str())
            .collect()
    }

    pub fn set_attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.each(|item| {
            item.set_attr(key, value);
        })
    }

    pub fn merge_attrs(&mut self, attrs: &Attributes) -> &mut Self {
        self.each(|item| {
            item.merge_attrs(attrs);
        })
    }

    /// Append text or HTML to every title.
    pub fn append(&mut self, html: &str) -> &mut Self {
        self.each(|item| {
            item.append(html);
        })
    }

    /// Prepend text or HTML to every title.
    pub fn prepend(&mut self, html: &str) -> &mut Self {
        self.each(|item| {
            item.prepend(html);
        })
    }

    pub fn before(&mut self, html: &str) -> &mut Self {
        self.each(|item| {
            item.before(html);
        })
    }

    pub fn after(&mut self, html: &str) -> &mut Self {
        self.each(|item| {
            item.after(html);
        })
    }

    pub fn set_data(&mut self, key: &str, value: Value) -> MenuResult<&mut Self> {
        let mut data = Map::new();
        data.insert(key.to_string(), value);
        self.merge_data(data)
    }

    pub fn merge_data(&mut self, data: Map<String, Value>) -> MenuResult<&mut Self> {
        self.for_each(|item| {
            item.merge_data(data.clone())?;
            Ok(())
        })
    }

    /// Run `update` on a handle to each selected item.
    pub fn for_each<F>(&mut self, mut update: F) -> MenuResult<&mut Self>
    where
        F: FnMut(&mut ItemMut<'_>) -> MenuResult<()>,
    {
        for &index in &self.indices {
            let mut item = ItemMut::new(&mut *self.builder, index);
            update(&mut item)?;
        }
        Ok(self)
    }

    fn each(&mut self, mut update: impl FnMut(&mut Item)) -> &mut Self {
        for &index in &self.indices {
            update(&mut self.builder.items[index]);
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::item::ItemOptions;
    use crate::url::MenuContext;
    use serde_json::json;

    fn tree() -> Builder {
        let context = MenuContext::simple("http://test.com", "http://test.com/").unwrap();
        let mut menu = Builder::new("main", MenuConfig::default(), context);
        menu.add("Home", ItemOptions::url("").id("home")).unwrap();
        menu.add("About", ItemOptions::url("about").id("about"))
            .unwrap();
        menu.add("Team", ItemOptions::url("about/team").id("team").parent("about"))
            .unwrap();
        menu.add("Alice", ItemOptions::url("about/team/alice").id("alice").parent("team"))
            .unwrap();
        menu.add("History", ItemOptions::url("about/history").id("history").parent("about"))
            .unwrap();
        menu.add("Contact", ItemOptions::url("contact").id("contact"))
            .unwrap();
        menu
    }

    #[test]
    fn selection_follows_query_order() {
        let mut menu = tree();
        assert_eq!(menu.select_parent(None, false).ids(), vec!["home", "about", "contact"]);
        assert_eq!(
            menu.select_parent(Some("about"), true).ids(),
            vec!["team", "alice", "history"]
        );
        assert_eq!(menu.select_all().len(), 6);
        assert!(menu.select_where("id", &json!("ghost"), false).is_empty());
    }

    #[test]
    fn children_get_attribute_and_decoration() {
        let mut menu = tree();
        menu.select_parent(Some("about"), false)
            .set_attr("class", "sub")
            .prepend("- ")
            .append(" +");

        let team = menu.find("team").unwrap();
        assert_eq!(team.title(), "- Team +");
        assert_eq!(team.attr("class"), Some("sub"));
        assert_eq!(menu.find("history").unwrap().attr("class"), Some("sub"));
        assert_eq!(menu.find("alice").unwrap().attr("class"), None);
        assert_eq!(menu.find("home").unwrap().title(), "Home");
    }

    #[test]
    fn data_cascades_then_filter_drops_section() {
        let mut menu = tree();
        menu.select_where("id", &json!("about"), false)
            .set_data("permission", json!("manage"))
            .unwrap();
        for id in ["about", "team", "alice", "history"] {
            assert_eq!(menu.find(id).unwrap().data("permission"), Some(&json!("manage")));
        }

        menu.filter(|item| item.data("permission").is_none());
        let left: Vec<&str> = menu.all().iter().map(Item::id).collect();
        assert_eq!(left, vec!["home", "contact"]);
    }

    #[test]
    fn for_each_sees_tree_context() {
        let mut menu = tree();
        menu.select_all()
            .for_each(|item| {
                if item.has_children() {
                    item.set_attr("class", "dropdown");
                }
                Ok(())
            })
            .unwrap();

        let classed: Vec<&str> = menu
            .all()
            .iter()
            .filter(|item| item.attr("class") == Some("dropdown"))
            .map(Item::id)
            .collect();
        assert_eq!(classed, vec!["about", "team"]);
    }
}
