//! Tera integration: serializable menu trees, the `menu_attrs` filter, and
//! the bundled Bootstrap navbar templates.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tera::Tera;
use tracing::debug;

use crate::attributes::{Attributes, merge_static, render_attributes};
use crate::builder::Builder;
use crate::error::{MenuError, MenuResult};
use crate::item::Item;
use crate::registry::MenuRegistry;

/// Name of the bundled navbar template.
pub const NAVBAR_TEMPLATE: &str = "navmenu/bootstrap-navbar.html";
const NAVBAR_ITEMS_TEMPLATE: &str = "navmenu/bootstrap-navbar-items.html";

/// One item as seen by templates.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub nickname: String,
    pub url: Option<String>,
    pub has_link: bool,
    /// Item attributes, rendered.
    pub attributes: String,
    pub attribute_map: Attributes,
    /// Link attributes, rendered.
    pub link_attributes: String,
    pub link_attribute_map: Attributes,
    /// Exact active item.
    pub active: bool,
    /// Carries the active class.
    pub is_active: bool,
    pub has_children: bool,
    /// Divider attributes, rendered.
    pub divider: Option<String>,
    pub data: Map<String, Value>,
    pub before_html: String,
    pub after_html: String,
    pub children: Vec<ItemView>,
}

/// A menu as seen by templates.
#[derive(Debug, Clone, Serialize)]
pub struct MenuView {
    pub name: String,
    pub items: Vec<ItemView>,
}

impl MenuView {
    /// Snapshot `menu` as a tree of views.
    pub fn from_builder(menu: &Builder) -> MenuResult<Self> {
        let mut ancestors = Vec::new();
        Ok(Self {
            name: menu.name().to_string(),
            items: views(menu, None, &mut ancestors)?,
        })
    }
}

fn views(menu: &Builder, parent: Option<&str>, ancestors: &mut Vec<String>) -> MenuResult<Vec<ItemView>> {
    let mut out = Vec::new();
    for item in menu.where_parent(parent, false) {
        let has_children = menu.has_children(item.id());
        let children = if has_children {
            if ancestors.iter().any(|id| id == item.id()) {
                return Err(MenuError::ParentCycle {
                    menu: menu.name().to_string(),
                    id: item.id().to_string(),
                });
            }
            ancestors.push(item.id().to_string());
            let children = views(menu, Some(item.id()), ancestors)?;
            ancestors.pop();
            children
        } else {
            Vec::new()
        };
        out.push(item_view(menu, item, has_children, children));
    }
    Ok(out)
}

fn item_view(menu: &Builder, item: &Item, has_children: bool, children: Vec<ItemView>) -> ItemView {
    let link_attribute_map = item
        .link()
        .map(|link| link.attributes().clone())
        .unwrap_or_default();

    ItemView {
        id: item.id().to_string(),
        title: item.title().to_string(),
        nickname: item.nickname().to_string(),
        url: menu.url_of(item),
        has_link: item.has_link(),
        attributes: render_attributes(item.attributes()),
        attribute_map: item.attributes().clone(),
        link_attributes: render_attributes(&link_attribute_map),
        link_attribute_map,
        active: item.is_current(),
        is_active: item.is_active(),
        has_children,
        divider: item.divider().map(render_attributes),
        data: item.data_all().clone(),
        before_html: item.before_html().to_string(),
        after_html: item.after_html().to_string(),
        children,
    }
}

/// Expose every menu of `registry` to templates under its own name.
pub fn share(registry: &MenuRegistry, context: &mut tera::Context) -> MenuResult<()> {
    for menu in registry.all() {
        context.insert(menu.name(), &MenuView::from_builder(menu)?);
    }
    debug!(menus = registry.len(), "shared menus with template context");
    Ok(())
}

/// Install the `menu_attrs` filter and the bundled templates.
pub fn register(tera: &mut Tera) -> MenuResult<()> {
    register_filters(tera);
    tera.add_raw_templates(vec![
        (
            NAVBAR_ITEMS_TEMPLATE,
            include_str!("../templates/navmenu/bootstrap-navbar-items.html"),
        ),
        (
            NAVBAR_TEMPLATE,
            include_str!("../templates/navmenu/bootstrap-navbar.html"),
        ),
    ])?;
    Ok(())
}

/// Register the `menu_attrs` filter.
///
/// `{{ item.attribute_map | menu_attrs(base='class="nav-item"') | safe }}`
/// merges the static attributes with the item's, combining classes.
fn register_filters(tera: &mut Tera) {
    tera.register_filter(
        "menu_attrs",
        |value: &tera::Value, args: &HashMap<String, tera::Value>| {
            let attrs: Attributes = match value {
                tera::Value::Null => Attributes::new(),
                other => serde_json::from_value(other.clone()).map_err(|e| {
                    tera::Error::msg(format!("menu_attrs expects an attribute map: {e}"))
                })?,
            };
            let base = args.get("base").and_then(|v| v.as_str()).unwrap_or("");
            Ok(tera::Value::String(merge_static(base, &attrs)))
        },
    );
}

/// Render `menu` with the bundled Bootstrap navbar template.
///
/// `tera` must have been set up with [`register`].
pub fn render_navbar(tera: &Tera, menu: &Builder) -> MenuResult<String> {
    let view = MenuView::from_builder(menu)?;
    let mut context = tera::Context::new();
    context.insert("menu", &view.name);
    context.insert("items", &view.items);
    context.insert("toggle", &menu.config().data_toggle_attribute);
    Ok(tera.render(NAVBAR_TEMPLATE, &context)?)
}
