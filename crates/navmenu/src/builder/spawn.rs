//! Secondary menus projected from an existing one.

use super::Builder;
use crate::error::MenuResult;
use crate::item::{Item, ItemOptions};

impl Builder {
    /// A new menu with this menu's configuration and context, holding
    /// `items` as is.
    pub fn spawn(&self, name: &str, items: Vec<Item>) -> Builder {
        let mut spawned = Builder::new(name, self.conf.clone(), self.context.clone());
        spawned.items = items;
        spawned
    }

    /// The root items only.
    pub fn top_menu(&self) -> Builder {
        let roots = self.roots().into_iter().cloned().collect();
        self.spawn("topLevel", roots)
    }

    /// The children of the active item, or `None` without an active item.
    pub fn sub_menu(&self) -> MenuResult<Option<Builder>> {
        let Some(active) = self.active() else {
            return Ok(None);
        };
        let children = self.children_of(&active.id);
        self.project("subMenu", &children).map(Some)
    }

    /// The active item and its siblings.
    ///
    /// The menu is empty when the active item has no siblings; `None`
    /// without an active item.
    pub fn sibling_menu(&self) -> MenuResult<Option<Builder>> {
        let Some(active) = self.active() else {
            return Ok(None);
        };
        let siblings = match self.parent_of(active) {
            Some(parent) => self.children_of(&parent.id),
            None => self.roots(),
        };
        if siblings.len() > 1 {
            self.project("siblingMenu", &siblings).map(Some)
        } else {
            Ok(Some(self.spawn("siblingMenu", Vec::new())))
        }
    }

    /// Breadcrumbs: the active item's ancestors, root first, then the item
    /// itself. `None` without an active item.
    pub fn crumb_menu(&self) -> MenuResult<Option<Builder>> {
        let Some(active) = self.active() else {
            return Ok(None);
        };
        let mut chain = self.ancestors(active)?;
        chain.push(active);
        self.project("crumbMenu", &chain).map(Some)
    }

    /// A flat menu re-adding `items` by title and resolved URL.
    fn project(&self, name: &str, items: &[&Item]) -> MenuResult<Builder> {
        let mut projected = self.spawn(name, Vec::new());
        for item in items {
            projected.add(&item.title, ItemOptions::from(self.url_of(item)))?;
        }
        Ok(projected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::url::MenuContext;

    fn site(current: &str) -> Builder {
        let context = MenuContext::simple("http://test.com", current).unwrap();
        let mut menu = Builder::new("main", MenuConfig::default(), context);
        menu.add("Home", ItemOptions::url("").id("home")).unwrap();
        menu.add("About", ItemOptions::url("about").id("about"))
            .unwrap();
        menu.add("Team", ItemOptions::url("about/team").id("team").parent("about"))
            .unwrap();
        menu.add("History", ItemOptions::url("about/history").id("history").parent("about"))
            .unwrap();
        menu
    }

    fn titles(menu: &Builder) -> Vec<&str> {
        menu.all().iter().map(Item::title).collect()
    }

    #[test]
    fn top_menu_keeps_roots() {
        let menu = site("http://test.com/");
        let top = menu.top_menu();
        assert_eq!(top.name(), "topLevel");
        assert_eq!(titles(&top), vec!["Home", "About"]);
    }

    #[test]
    fn sub_menu_lists_active_children() {
        let menu = site("http://test.com/about");
        let sub = menu.sub_menu().unwrap().unwrap();
        assert_eq!(titles(&sub), vec!["Team", "History"]);
        assert_eq!(
            sub.url_of(sub.get("team").unwrap()),
            Some("http://test.com/about/team".to_string())
        );
    }

    #[test]
    fn sibling_menu_requires_siblings() {
        let menu = site("http://test.com/about/team");
        let siblings = menu.sibling_menu().unwrap().unwrap();
        assert_eq!(titles(&siblings), vec!["Team", "History"]);
        assert!(siblings.get("team").unwrap().is_current());

        let context = MenuContext::simple("http://test.com", "http://test.com/solo").unwrap();
        let mut lonely = Builder::new("main", MenuConfig::default(), context);
        lonely.add("Solo", "solo").unwrap();
        assert!(lonely.sibling_menu().unwrap().unwrap().is_empty());
    }

    #[test]
    fn crumb_menu_root_to_active() {
        let menu = site("http://test.com/about/history");
        let crumbs = menu.crumb_menu().unwrap().unwrap();
        assert_eq!(titles(&crumbs), vec!["About", "History"]);
        assert_eq!(crumbs.roots().len(), 2);
    }

    #[test]
    fn projections_need_an_active_item() {
        let menu = site("http://test.com/elsewhere");
        assert!(menu.sub_menu().unwrap().is_none());
        assert!(menu.sibling_menu().unwrap().is_none());
        assert!(menu.crumb_menu().unwrap().is_none());
    }
}
