//! Mutable access to one item together with the menu it belongs to.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

use super::Builder;
use crate::attributes::{Attributes, merge_class};
use crate::error::MenuResult;
use crate::item::{Item, ItemOptions};

/// A borrowed item inside its [`Builder`].
///
/// Returned by [`Builder::add`] and [`Builder::item_mut`]. Derefs to
/// [`Item`] for plain field access; operations that need the rest of the
/// tree (children, URL resolution, activation, cascading data) are methods
/// here.
#[derive(Debug)]
pub struct ItemMut<'a> {
    builder: &'a mut Builder,
    index: usize,
}

impl<'a> ItemMut<'a> {
    pub(crate) fn new(builder: &'a mut Builder, index: usize) -> Self {
        Self { builder, index }
    }

    /// The owning menu.
    pub fn builder(&self) -> &Builder {
        self.builder
    }

    /// Add a child item.
    pub fn add(&mut self, title: &str, options: impl Into<ItemOptions>) -> MenuResult<ItemMut<'_>> {
        let mut options = options.into();
        options.parent = Some(self.id().to_string());
        self.builder.add(title, options)
    }

    /// Add a plain text child item.
    pub fn raw(&mut self, title: &str, options: impl Into<ItemOptions>) -> MenuResult<ItemMut<'_>> {
        let mut options = options.into();
        options.parent = Some(self.id().to_string());
        self.builder.raw(title, options)
    }

    /// Attach a divider after this item. The `divider` class comes first.
    pub fn divide(&mut self, attributes: Attributes) -> &mut Self {
        let mut divider = attributes;
        let class = merge_class(&divider, &Attributes::from([("class", "divider")]));
        divider.set("class", class);
        self.item_mut().divider = Some(divider);
        self
    }

    /// Set one metadata value, cascading to descendants when enabled.
    pub fn set_data(&mut self, key: &str, value: Value) -> MenuResult<&mut Self> {
        let mut data = Map::new();
        data.insert(key.to_string(), value);
        self.merge_data(data)
    }

    /// Merge metadata, cascading to descendants when enabled.
    pub fn merge_data(&mut self, data: Map<String, Value>) -> MenuResult<&mut Self> {
        let mut targets = vec![self.index];
        if self.builder.conf.cascade_data {
            let id = self.id().to_string();
            let descendants: Vec<String> = self
                .builder
                .descendants(&id)
                .into_iter()
                .map(|item| item.id.clone())
                .collect();
            targets.extend(
                descendants
                    .iter()
                    .filter_map(|id| self.builder.index_of(id)),
            );
        }

        for index in targets {
            for (key, value) in &data {
                self.builder.items[index].set_data(key, value.clone());
            }
        }
        Ok(self)
    }

    /// This item's URL; `None` for raw items or unresolvable paths.
    pub fn url(&self) -> Option<String> {
        self.builder.url_of(self)
    }

    /// Override the link href. No-op on raw items.
    pub fn href(&mut self, href: impl Into<String>) -> &mut Self {
        if let Some(link) = self.item_mut().link.as_mut() {
            link.set_href(href);
        }
        self
    }

    /// Link attribute setter. No-op on raw items.
    pub fn link_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        if let Some(link) = self.item_mut().link.as_mut() {
            link.set_attr(key, value);
        }
        self
    }

    pub fn has_children(&self) -> bool {
        self.builder.has_children(self.id())
    }

    pub fn children(&self) -> Vec<&Item> {
        self.builder.children_of(self.id())
    }

    pub fn parent(&self) -> Option<&Item> {
        self.builder.parent_of(self)
    }

    /// Activate this item as if it matched the current request.
    pub fn activate(&mut self) -> MenuResult<&mut Self> {
        self.builder.activate(self.index, false)?;
        Ok(self)
    }

    /// Apply the active class unconditionally.
    pub fn active(&mut self) -> &mut Self {
        let class = self.builder.conf.active_class.clone();
        self.item_mut().mark_active(&class);
        self
    }

    /// Activate when the current request path matches `pattern`.
    ///
    /// `*` matches anything; a trailing `/*` also matches the bare prefix,
    /// so `blog/*` covers `blog` and `blog/2024/hello`.
    pub fn active_pattern(&mut self, pattern: &str) -> MenuResult<&mut Self> {
        if self.builder.request_matches(pattern)? {
            self.builder.activate(self.index, false)?;
        }
        Ok(self)
    }

    fn item_mut(&mut self) -> &mut Item {
        &mut self.builder.items[self.index]
    }
}

impl Deref for ItemMut<'_> {
    type Target = Item;

    fn deref(&self) -> &Item {
        &self.builder.items[self.index]
    }
}

impl DerefMut for ItemMut<'_> {
    fn deref_mut(&mut self) -> &mut Item {
        self.item_mut()
    }
}
