//! Declarative menu definitions.
//!
//! A definition file is a YAML (or JSON) list of menus:
//!
//! ```yaml
//! - name: main
//!   items:
//!     - title: Home
//!       url: ""
//!     - title: About
//!       url: about
//!       children:
//!         - title: Team
//!           url: about/team
//!     - group: { prefix: admin, class: admin }
//!       items:
//!         - title: Users
//!           url: users
//!           divider: {}
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::attributes::Attributes;
use crate::builder::Builder;
use crate::error::{MenuError, MenuResult};
use crate::item::ItemOptions;
use crate::link::Target;
use crate::registry::MenuRegistry;

/// One named menu and its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDefinition {
    pub name: String,
    #[serde(default)]
    pub items: Vec<Entry>,
}

/// An item, or a group of entries sharing attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Group { group: Attributes, items: Vec<Entry> },
    Item(Box<ItemDefinition>),
}

/// A single item with its link, decoration, and children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefinition {
    pub title: String,
    pub id: Option<String>,
    pub nickname: Option<String>,
    pub url: Option<Target>,
    pub route: Option<Target>,
    pub action: Option<Target>,
    pub secure: Option<bool>,
    /// Plain text item without a link.
    pub raw: bool,
    pub disable_activation_by_url: bool,
    pub attributes: Attributes,
    pub link_attributes: Attributes,
    pub href: Option<String>,
    pub data: Map<String, Value>,
    pub divider: Option<Attributes>,
    /// Activation pattern matched against the request path (`blog/*`).
    pub active: Option<String>,
    pub children: Vec<Entry>,
}

impl ItemDefinition {
    fn options(&self, parent: Option<&str>) -> ItemOptions {
        ItemOptions {
            id: self.id.clone(),
            parent: parent.map(str::to_string),
            nickname: self.nickname.clone(),
            url: self.url.clone(),
            route: self.route.clone(),
            action: self.action.clone(),
            secure: self.secure,
            raw: self.raw,
            disable_activation_by_url: self.disable_activation_by_url,
            attributes: self.attributes.clone(),
        }
    }
}

impl MenuDefinition {
    /// Parse a list of menu definitions from YAML or JSON.
    pub fn list_from_yaml(yaml: &str) -> MenuResult<Vec<MenuDefinition>> {
        serde_yml::from_str(yaml).map_err(|e| MenuError::Definition(e.to_string()))
    }

    /// Load a definition file.
    pub fn list_from_path(path: &Path) -> anyhow::Result<Vec<MenuDefinition>> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read menu definitions {}", path.display()))?;
        let menus = Self::list_from_yaml(&yaml)
            .with_context(|| format!("failed to parse menu definitions {}", path.display()))?;
        debug!(path = %path.display(), menus = menus.len(), "loaded menu definitions");
        Ok(menus)
    }

    /// Parse definitions from several sources, skipping the ones that fail.
    ///
    /// Each element of `sources` is a (source name, document) tuple.
    pub fn from_sources(sources: Vec<(String, String)>) -> Vec<MenuDefinition> {
        let mut menus = Vec::new();
        for (source, yaml) in sources {
            match Self::list_from_yaml(&yaml) {
                Ok(parsed) => menus.extend(parsed),
                Err(e) => {
                    warn!(
                        source = %source,
                        error = %e,
                        "failed to parse menu definitions"
                    );
                }
            }
        }
        menus
    }

    /// Add every entry to `builder`.
    pub fn apply(&self, builder: &mut Builder) -> MenuResult<()> {
        apply_entries(builder, None, &self.items)
    }

    /// Make this menu in `registry`.
    pub fn register(&self, registry: &mut MenuRegistry) -> MenuResult<()> {
        registry.make(&self.name, |builder| self.apply(builder))?;
        Ok(())
    }
}

/// Make every menu in `registry`, in order.
pub fn register_all(menus: &[MenuDefinition], registry: &mut MenuRegistry) -> MenuResult<()> {
    for menu in menus {
        menu.register(registry)?;
    }
    Ok(())
}

fn apply_entries(builder: &mut Builder, parent: Option<&str>, entries: &[Entry]) -> MenuResult<()> {
    for entry in entries {
        match entry {
            Entry::Group { group, items } => {
                builder.group(group.clone(), |builder| apply_entries(builder, parent, items))?;
            }
            Entry::Item(item) => apply_item(builder, parent, item)?,
        }
    }
    Ok(())
}

fn apply_item(builder: &mut Builder, parent: Option<&str>, def: &ItemDefinition) -> MenuResult<()> {
    if def.title.is_empty() {
        return Err(MenuError::Definition(format!(
            "menu '{}': item without a title",
            builder.name()
        )));
    }

    let id = {
        let mut item = builder.add(&def.title, def.options(parent))?;
        if let Some(href) = &def.href {
            item.href(href.clone());
        }
        if let Some(link) = item.link_mut() {
            link.merge_attrs(&def.link_attributes);
        }
        if let Some(divider) = &def.divider {
            item.divide(divider.clone());
        }
        if let Some(pattern) = &def.active {
            item.active_pattern(pattern)?;
        }
        item.id().to_string()
    };

    apply_entries(builder, Some(&id), &def.children)?;

    // After the children, so cascading data reaches them.
    if !def.data.is_empty()
        && let Some(mut item) = builder.item_mut(&id)
    {
        item.merge_data(def.data.clone())?;
    }
    Ok(())
}
