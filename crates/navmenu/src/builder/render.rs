//! Recursive HTML rendering of a menu as nested lists or containers.

use serde_json::Value;

use super::Builder;
use crate::attributes::{Attributes, html_escape, render_attributes};
use crate::error::{MenuError, MenuResult};
use crate::item::Item;

/// Attribute bundles handed to an [`AfterItemHook`] for each link item.
///
/// Changes to `children`, `item`, and `params` carry over to the items
/// rendered after it at the same level and below; `link` is rebuilt from
/// the item for every call.
#[derive(Debug, Clone, Default)]
pub struct ItemRenderAttrs {
    pub children: Attributes,
    pub item: Attributes,
    pub link: Attributes,
    pub params: Value,
}

/// Called before each link item's wrapper tag is opened.
pub type AfterItemHook<'a> = Box<dyn FnMut(&Item, &mut ItemRenderAttrs) + 'a>;

/// Options for [`Builder::render`] and the `as_*` helpers.
#[derive(Default)]
pub struct RenderOptions<'a> {
    /// Attributes of the outermost tag.
    pub attributes: Attributes,
    /// Attributes of every nested child list.
    pub child_attributes: Attributes,
    /// Attributes added to every item wrapper. Item attributes win.
    pub item_attributes: Attributes,
    /// Free-form parameters passed through to the hook.
    pub params: Value,
    pub after_item: Option<AfterItemHook<'a>>,
}

impl std::fmt::Debug for RenderOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("attributes", &self.attributes)
            .field("child_attributes", &self.child_attributes)
            .field("item_attributes", &self.item_attributes)
            .field("params", &self.params)
            .field("after_item", &self.after_item.is_some())
            .finish()
    }
}

impl<'a> RenderOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn child_attributes(mut self, attributes: Attributes) -> Self {
        self.child_attributes = attributes;
        self
    }

    pub fn item_attributes(mut self, attributes: Attributes) -> Self {
        self.item_attributes = attributes;
        self
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn after_item<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Item, &mut ItemRenderAttrs) + 'a,
    {
        self.after_item = Some(Box::new(hook));
        self
    }
}

impl Builder {
    /// Render the children of `parent` (the roots when `None`) as `tag`
    /// markup, without the surrounding list tag.
    ///
    /// `ul` and `ol` wrap each item in `li`; any other tag wraps items in
    /// itself.
    pub fn render(
        &self,
        tag: &str,
        parent: Option<&str>,
        options: &mut RenderOptions<'_>,
    ) -> MenuResult<String> {
        let state = ItemRenderAttrs {
            children: options.child_attributes.clone(),
            item: options.item_attributes.clone(),
            link: Attributes::new(),
            params: options.params.clone(),
        };
        let mut ancestors = Vec::new();
        self.render_level(tag, parent, state, &mut options.after_item, &mut ancestors)
    }

    fn render_level(
        &self,
        tag: &str,
        parent: Option<&str>,
        mut state: ItemRenderAttrs,
        hook: &mut Option<AfterItemHook<'_>>,
        ancestors: &mut Vec<String>,
    ) -> MenuResult<String> {
        let item_tag = if matches!(tag, "ul" | "ol") { "li" } else { tag };
        let mut html = String::new();

        for item in self.where_parent(parent, false) {
            let url = self.url_of(item);

            if let Some(link) = &item.link {
                state.link = link.attributes.clone();
                if let Some(hook) = hook.as_mut() {
                    hook(item, &mut state);
                }
            }

            let wrapper = item.attributes.union(&state.item);
            html.push_str(&format!("<{item_tag}{}>", render_attributes(&wrapper)));

            if item.link.is_some() {
                let href = match url.as_deref() {
                    Some(url) if !url.is_empty() => format!(" href=\"{}\"", html_escape(url)),
                    _ => String::new(),
                };
                html.push_str(&format!(
                    "{}<a{}{href}>{}</a>{}",
                    item.before_html,
                    render_attributes(&state.link),
                    item.title,
                    item.after_html
                ));
            } else {
                html.push_str(&item.title);
            }

            if self.has_children(&item.id) {
                if ancestors.contains(&item.id) {
                    return Err(MenuError::ParentCycle {
                        menu: self.name.clone(),
                        id: item.id.clone(),
                    });
                }
                ancestors.push(item.id.clone());
                let children =
                    self.render_level(tag, Some(&item.id), state.clone(), hook, ancestors)?;
                ancestors.pop();

                html.push_str(&format!(
                    "<{tag}{}>{children}</{tag}>",
                    render_attributes(&state.children)
                ));
            }

            html.push_str(&format!("</{item_tag}>"));

            if let Some(divider) = &item.divider {
                html.push_str(&format!(
                    "<{item_tag}{}></{item_tag}>",
                    render_attributes(divider)
                ));
            }
        }

        Ok(html)
    }

    /// Render as an unordered list.
    pub fn as_ul(&self, attributes: Attributes) -> MenuResult<String> {
        self.as_ul_with(RenderOptions::new().attributes(attributes))
    }

    pub fn as_ul_with(&self, options: RenderOptions<'_>) -> MenuResult<String> {
        self.wrap("ul", options)
    }

    /// Render as an ordered list.
    pub fn as_ol(&self, attributes: Attributes) -> MenuResult<String> {
        self.as_ol_with(RenderOptions::new().attributes(attributes))
    }

    pub fn as_ol_with(&self, options: RenderOptions<'_>) -> MenuResult<String> {
        self.wrap("ol", options)
    }

    /// Render as nested `div` containers.
    pub fn as_div(&self, attributes: Attributes) -> MenuResult<String> {
        self.as_div_with(RenderOptions::new().attributes(attributes))
    }

    pub fn as_div_with(&self, options: RenderOptions<'_>) -> MenuResult<String> {
        self.wrap("div", options)
    }

    fn wrap(&self, tag: &str, mut options: RenderOptions<'_>) -> MenuResult<String> {
        let inner = self.render(tag, None, &mut options)?;
        Ok(format!(
            "<{tag}{}>{inner}</{tag}>",
            render_attributes(&options.attributes)
        ))
    }
}
