//! Menu configuration: per-menu options and the settings file they come from.
//!
//! Settings hold a `default` block and optional per-menu override blocks
//! keyed by lower-cased menu name:
//!
//! ```yaml
//! default:
//!   auto_activate: true
//!   active_class: active
//! sidebar:
//!   restful: true
//!   rest_base: [admin, api]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MenuError, MenuResult};

/// Which element receives the active class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveElement {
    #[default]
    Item,
    Link,
}

/// Prefix(es) stripped from paths before RESTful comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RestBase {
    One(String),
    Many(Vec<String>),
}

impl Default for RestBase {
    fn default() -> Self {
        RestBase::One(String::new())
    }
}

impl RestBase {
    /// The non-empty alternatives, in configured order.
    pub fn alternatives(&self) -> Vec<&str> {
        match self {
            RestBase::One(base) => vec![base.as_str()],
            RestBase::Many(bases) => bases.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect()
    }
}

/// Resolved configuration of one named menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Check each new link item against the current request.
    pub auto_activate: bool,
    /// Apply the active class to every ancestor of an activated item.
    pub activate_parents: bool,
    /// CSS class applied on activation.
    pub active_class: String,
    /// Prefix matching instead of exact URL matching.
    pub restful: bool,
    /// Propagate `data` writes to descendants.
    pub cascade_data: bool,
    pub rest_base: RestBase,
    pub active_element: ActiveElement,
    /// Attribute used by dropdown toggles in the bundled navbar template.
    #[serde(rename = "data-toggle-attribute")]
    pub data_toggle_attribute: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            auto_activate: true,
            activate_parents: true,
            active_class: "active".to_string(),
            restful: false,
            cascade_data: true,
            rest_base: RestBase::default(),
            active_element: ActiveElement::Item,
            data_toggle_attribute: "data-toggle".to_string(),
        }
    }
}

impl MenuConfig {
    /// Look up a configuration value by its key.
    ///
    /// There is no fallback: an unknown key is an error.
    pub fn conf(&self, key: &str) -> MenuResult<serde_json::Value> {
        let value =
            serde_json::to_value(self).map_err(|e| MenuError::Settings(e.to_string()))?;
        value
            .get(key)
            .cloned()
            .ok_or_else(|| MenuError::UnknownConfigKey {
                key: key.to_string(),
            })
    }
}

/// The settings file: defaults plus per-menu overrides.
///
/// Top-level keys other than `default` whose values are not maps
/// (`icon_family: null`) are not menu blocks and are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawSettings")]
pub struct MenuSettings {
    pub default: MenuConfig,
    /// Raw override blocks, keyed by lower-cased menu name.
    #[serde(flatten)]
    pub menus: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    default: MenuConfig,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

impl From<RawSettings> for MenuSettings {
    fn from(raw: RawSettings) -> Self {
        let menus = raw
            .rest
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::Object(block) => Some((name.to_lowercase(), block)),
                _ => {
                    debug!(key = %name, "skipping non-menu settings key");
                    None
                }
            })
            .collect();
        Self {
            default: raw.default,
            menus,
        }
    }
}

impl MenuSettings {
    /// Parse settings from a YAML document.
    pub fn from_yaml(yaml: &str) -> MenuResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| MenuError::Settings(e.to_string()))
    }

    /// Load settings from a YAML file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read menu settings {}", path.display()))?;
        let settings = Self::from_yaml(&yaml)
            .with_context(|| format!("failed to parse menu settings {}", path.display()))?;
        debug!(path = %path.display(), overrides = settings.menus.len(), "loaded menu settings");
        Ok(settings)
    }

    /// Resolve the configuration for a menu: defaults overlaid with the
    /// menu's own block, if any.
    pub fn resolve(&self, name: &str) -> MenuResult<MenuConfig> {
        let Some(overrides) = self.menus.get(&name.to_lowercase()) else {
            return Ok(self.default.clone());
        };

        let mut merged =
            serde_json::to_value(&self.default).map_err(|e| MenuError::Settings(e.to_string()))?;
        if let Some(base) = merged.as_object_mut() {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(merged)
            .map_err(|e| MenuError::Settings(format!("menu '{name}': {e}")))
    }
}
