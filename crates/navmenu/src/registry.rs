//! Menu registry - the named menus built for one request.
//!
//! Menus are created lazily by [`MenuRegistry::make`] with their resolved
//! configuration and populated by a registration callback. The registry is
//! what gets shared with templates (see [`crate::view::share`]).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use crate::builder::Builder;
use crate::config::MenuSettings;
use crate::error::MenuResult;
use crate::url::MenuContext;

/// Named menus keyed by name.
#[derive(Debug, Clone)]
pub struct MenuRegistry {
    settings: MenuSettings,
    context: MenuContext,
    menus: BTreeMap<String, Builder>,
}

impl MenuRegistry {
    /// Create an empty registry.
    pub fn new(settings: MenuSettings, context: MenuContext) -> Self {
        Self {
            settings,
            context,
            menus: BTreeMap::new(),
        }
    }

    /// Whether a menu named `name` has been made.
    pub fn exists(&self, name: &str) -> bool {
        self.menus.contains_key(name)
    }

    /// Create (or reuse) the menu `name` and run `register` on it.
    ///
    /// An existing menu is not reset: `register` runs on top of whatever
    /// it already holds.
    pub fn make<F>(&mut self, name: &str, register: F) -> MenuResult<&mut Builder>
    where
        F: FnOnce(&mut Builder) -> MenuResult<()>,
    {
        let menu = match self.menus.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let conf = self.settings.resolve(name)?;
                debug!(menu = %name, restful = conf.restful, "creating menu");
                entry.insert(Builder::new(name, conf, self.context.clone()))
            }
        };

        register(&mut *menu)?;
        debug!(menu = %name, items = menu.len(), "registered menu");
        Ok(menu)
    }

    /// Like [`MenuRegistry::make`], but does nothing and returns `None` when
    /// the menu already exists.
    pub fn make_once<F>(&mut self, name: &str, register: F) -> MenuResult<Option<&mut Builder>>
    where
        F: FnOnce(&mut Builder) -> MenuResult<()>,
    {
        if self.exists(name) {
            debug!(menu = %name, "menu already made, skipping");
            return Ok(None);
        }
        self.make(name, register).map(Some)
    }

    pub fn get(&self, name: &str) -> Option<&Builder> {
        self.menus.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Builder> {
        self.menus.get_mut(name)
    }

    /// All menus, ordered by name.
    pub fn all(&self) -> impl Iterator<Item = &Builder> {
        self.menus.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.menus.keys().map(String::as_str)
    }

    pub fn context(&self) -> &MenuContext {
        &self.context
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}
