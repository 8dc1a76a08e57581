//! Per-menu item store and API surface.
//!
//! A [`Builder`] owns the flat, insertion-ordered list of items of one named
//! menu. Hierarchy is expressed through parent ids; every tree operation
//! (children, rendering, activation) is a query over that list.

mod activation;
mod batch;
mod handle;
mod query;
mod render;
mod spawn;

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};
use uuid::Uuid;

pub use batch::ItemSet;
pub use handle::ItemMut;
pub use query::SortDirection;
pub use render::{AfterItemHook, ItemRenderAttrs, RenderOptions};

use crate::attributes::{Attributes, merge_class, merge_group};
use crate::config::MenuConfig;
use crate::error::{MenuError, MenuResult};
use crate::item::{Item, ItemOptions};
use crate::link::{Link, LinkPath};
use crate::url::MenuContext;

/// A named menu and its items.
#[derive(Debug, Clone)]
pub struct Builder {
    name: String,
    items: Vec<Item>,
    conf: MenuConfig,
    /// Merged group bundles, innermost last. Only non-empty while a
    /// [`Builder::group`] callback runs.
    group_stack: Vec<Attributes>,
    context: MenuContext,
}

impl Builder {
    /// Create an empty menu.
    pub fn new(name: impl Into<String>, conf: MenuConfig, context: MenuContext) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            conf,
            group_stack: Vec::new(),
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MenuConfig {
        &self.conf
    }

    /// Configuration value by key; unknown keys are an error.
    pub fn conf(&self, key: &str) -> MenuResult<serde_json::Value> {
        self.conf.conf(key)
    }

    pub fn context(&self) -> &MenuContext {
        &self.context
    }

    /// Add an item.
    ///
    /// Options may be a plain path (`"about"`) or full [`ItemOptions`].
    /// Attributes of the enclosing groups are merged in, and the item is
    /// checked against the current request when `auto_activate` is on.
    pub fn add(
        &mut self,
        title: &str,
        options: impl Into<ItemOptions>,
    ) -> MenuResult<ItemMut<'_>> {
        let options = options.into();

        let id = match &options.id {
            Some(id) => {
                if self.index_of(id).is_some() {
                    return Err(MenuError::DuplicateId {
                        menu: self.name.clone(),
                        id: id.clone(),
                    });
                }
                id.clone()
            }
            None => self.next_id(),
        };

        if let Some(parent) = &options.parent {
            self.check_parent_chain(&id, parent)?;
        }

        let link = if options.raw {
            None
        } else {
            Some(Link::new(LinkPath {
                url: options.url.clone(),
                route: options.route.clone(),
                action: options.action.clone(),
                secure: options.secure,
                prefix: self.last_group_prefix(),
            }))
        };

        let mut item = Item::new(id, title, &options, link);
        item.attributes = self.extract_attributes(&options.attributes);
        trace!(menu = %self.name, id = %item.id, title = %title, "adding item");

        self.items.push(item);
        let index = self.items.len() - 1;

        if self.conf.auto_activate {
            self.check_activation_status(index)?;
        }

        Ok(ItemMut::new(self, index))
    }

    /// Add a plain text item (no link).
    pub fn raw(&mut self, title: &str, options: impl Into<ItemOptions>) -> MenuResult<ItemMut<'_>> {
        let mut options = options.into();
        options.raw = true;
        self.add(title, options)
    }

    /// Run `register` with `attributes` applied to every item it adds.
    ///
    /// Groups nest: prefixes concatenate outer first, classes accumulate,
    /// other keys are overridden by the inner group. The group is popped
    /// when `register` returns, errors, or panics.
    pub fn group<F>(&mut self, attributes: Attributes, register: F) -> MenuResult<()>
    where
        F: FnOnce(&mut Builder) -> MenuResult<()>,
    {
        let merged = match self.group_stack.last() {
            Some(last) => merge_group(&attributes, last),
            None => attributes,
        };
        self.group_stack.push(merged);
        debug!(menu = %self.name, depth = self.group_stack.len(), "entered item group");

        let mut scope = GroupScope { builder: self };
        register(&mut *scope)
    }

    /// Attach a divider after the most recently added item.
    ///
    /// Unlike [`ItemMut::divide`], the caller's classes come before
    /// `divider`.
    pub fn divide(&mut self, attributes: Attributes) -> &mut Self {
        if let Some(last) = self.items.last_mut() {
            let mut divider = attributes;
            let class = merge_class(&Attributes::from([("class", "divider")]), &divider);
            divider.set("class", class);
            last.divider = Some(divider);
        }
        self
    }

    /// Mutable handle to an item by id (first match).
    pub fn item_mut(&mut self, id: &str) -> Option<ItemMut<'_>> {
        let index = self.index_of(id)?;
        Some(ItemMut::new(self, index))
    }

    /// Resolve an item's URL: explicit href, else dispatched path; `None`
    /// for raw items.
    pub fn url_of(&self, item: &Item) -> Option<String> {
        item.link
            .as_ref()
            .and_then(|link| link.url(self.context.urls.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn next_id(&self) -> String {
        loop {
            let id = format!("id-{}", Uuid::now_v7().simple());
            if self.index_of(&id).is_none() {
                return id;
            }
        }
    }

    /// Reject a parent whose ancestor chain reaches the new item's id.
    fn check_parent_chain(&self, id: &str, parent: &str) -> MenuResult<()> {
        let cycle = || MenuError::ParentCycle {
            menu: self.name.clone(),
            id: id.to_string(),
        };

        let mut seen = HashSet::new();
        let mut current = parent.to_string();
        loop {
            if current == id || !seen.insert(current.clone()) {
                return Err(cycle());
            }
            let Some(next) = self
                .index_of(&current)
                .and_then(|i| self.items[i].parent.clone())
            else {
                return Ok(());
            };
            current = next;
        }
    }

    /// Prefix of the innermost group: `None` outside any group.
    fn last_group_prefix(&self) -> Option<String> {
        self.group_stack
            .last()
            .map(|group| group.get("prefix").unwrap_or("").to_string())
    }

    /// Item attributes with the innermost group merged in and the group
    /// `prefix` removed.
    fn extract_attributes(&self, attributes: &Attributes) -> Attributes {
        let merged = match self.group_stack.last() {
            Some(group) => merge_group(attributes, group),
            None => attributes.clone(),
        };
        merged.without(&["prefix"])
    }
}

/// Pops the group stack when the group callback finishes.
struct GroupScope<'a> {
    builder: &'a mut Builder,
}

impl Deref for GroupScope<'_> {
    type Target = Builder;

    fn deref(&self) -> &Builder {
        self.builder
    }
}

impl DerefMut for GroupScope<'_> {
    fn deref_mut(&mut self) -> &mut Builder {
        self.builder
    }
}

impl Drop for GroupScope<'_> {
    fn drop(&mut self) {
        self.builder.group_stack.pop();
        debug!(
            menu = %self.builder.name,
            depth = self.builder.group_stack.len(),
            "left item group"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn builder() -> Builder {
        let context = MenuContext::simple("http://test.com", "http://test.com/").unwrap();
        Builder::new("main", MenuConfig::default(), context)
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut menu = builder();
        let a = menu.add("A", "a").unwrap().id().to_string();
        let b = menu.add("B", "b").unwrap().id().to_string();
        assert_ne!(a, b);
        assert!(a.starts_with("id-"));
    }

    #[test]
    fn duplicate_explicit_id_rejected() {
        let mut menu = builder();
        menu.add("A", ItemOptions::url("a").id("x")).unwrap();
        let err = menu.add("B", ItemOptions::url("b").id("x")).unwrap_err();
        assert!(matches!(err, MenuError::DuplicateId { .. }));
        assert_eq!(menu.len(), 1);
    }

    #[test]
    fn parent_cycle_rejected() {
        let mut menu = builder();
        menu.add("A", ItemOptions::url("a").id("a").parent("b"))
            .unwrap();
        let err = menu
            .add("B", ItemOptions::url("b").id("b").parent("a"))
            .unwrap_err();
        assert!(matches!(err, MenuError::ParentCycle { .. }));

        let err = menu
            .add("C", ItemOptions::url("c").id("c").parent("c"))
            .unwrap_err();
        assert!(matches!(err, MenuError::ParentCycle { .. }));
    }

    #[test]
    fn nested_group_prefix_outer_first() {
        let mut menu = builder();
        menu.group(Attributes::from([("prefix", "p2")]), |menu| {
            menu.group(Attributes::from([("prefix", "p1")]), |menu| {
                menu.add("Inner", "users")?;
                Ok(())
            })?;
            menu.add("Outer", "stats")?;
            Ok(())
        })
        .unwrap();

        let inner = menu.get("inner").unwrap();
        assert_eq!(inner.link().unwrap().path().prefix.as_deref(), Some("p2/p1"));
        assert_eq!(
            menu.url_of(inner),
            Some("http://test.com/p2/p1/users".to_string())
        );
        let outer = menu.get("outer").unwrap();
        assert_eq!(
            menu.url_of(outer),
            Some("http://test.com/p2/stats".to_string())
        );
    }

    #[test]
    fn group_class_and_attributes_inherited() {
        let mut menu = builder();
        menu.group(
            Attributes::from([("class", "nav"), ("data-role", "outer")]),
            |menu| {
                menu.group(
                    Attributes::from([("class", "sub nav"), ("data-role", "inner")]),
                    |menu| {
                        menu.add("Item", ItemOptions::url("x").class("own"))?;
                        Ok(())
                    },
                )
            },
        )
        .unwrap();

        let item = menu.get("item").unwrap();
        assert_eq!(item.attr("class"), Some("nav sub own"));
        assert_eq!(item.attr("data-role"), Some("inner"));
        assert_eq!(item.attr("prefix"), None);
    }

    #[test]
    fn group_stack_popped_on_error() {
        let mut menu = builder();
        let result = menu.group(Attributes::from([("prefix", "admin")]), |menu| {
            menu.add("A", ItemOptions::url("a").id("a"))?;
            menu.add("Again", ItemOptions::url("b").id("a"))?;
            Ok(())
        });
        assert!(result.is_err());

        menu.add("After", "after").unwrap();
        let after = menu.get("after").unwrap();
        assert_eq!(after.link().unwrap().path().prefix, None);
        assert_eq!(
            menu.url_of(after),
            Some("http://test.com/after".to_string())
        );
    }

    #[test]
    fn divide_marks_last_item() {
        let mut menu = builder();
        menu.add("A", "a").unwrap();
        menu.add("B", "b").unwrap();
        menu.divide(Attributes::from([("class", "sep")]));
        assert!(menu.get("a").unwrap().divider().is_none());
        assert_eq!(
            menu.get("b").unwrap().divider().unwrap().get("class"),
            Some("sep divider")
        );
    }

    #[test]
    fn raw_items_have_no_link() {
        let mut menu = builder();
        menu.raw("Heading", ItemOptions::new()).unwrap();
        let item = menu.get("heading").unwrap();
        assert!(!item.has_link());
        assert_eq!(menu.url_of(item), None);
    }
}
