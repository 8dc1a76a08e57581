#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Parent cycles.
//!
//! `add` refuses to close a cycle, but `sort_with` replaces the whole
//! collection, so items cloned from two menus can still point at each
//! other. Every traversal must report the cycle instead of looping.

use navmenu::{Attributes, Builder, ItemOptions, MenuConfig, MenuError, MenuView, RenderOptions};
use navmenu_test_utils::test_context;

fn empty(name: &str, conf: MenuConfig) -> Builder {
    Builder::new(name, conf, test_context("/elsewhere").unwrap())
}

/// A menu holding `home` (a root) plus `x -> y` and `y -> x`.
fn cyclic_menu() -> Builder {
    let mut menu = empty("main", MenuConfig::default());
    menu.add("Home", ItemOptions::url("").id("home")).unwrap();
    menu.add("X", ItemOptions::url("x").id("x").parent("y"))
        .unwrap();

    let mut other = empty("other", MenuConfig::default());
    other
        .add("Y", ItemOptions::url("y").id("y").parent("x"))
        .unwrap();
    let borrowed = other.all().to_vec();

    menu.sort_with(|mut items| {
        items.extend(borrowed);
        items
    });
    menu
}

fn is_cycle<T>(result: Result<T, MenuError>) -> bool {
    matches!(result, Err(MenuError::ParentCycle { .. }))
}

#[test]
fn test_render_reports_cycle() {
    let menu = cyclic_menu();
    assert!(is_cycle(menu.render(
        "ul",
        Some("x"),
        &mut RenderOptions::new()
    )));
}

#[test]
fn test_ancestors_report_cycle() {
    let menu = cyclic_menu();
    let x = menu.find("x").unwrap();
    assert!(is_cycle(menu.ancestors(x)));
}

#[test]
fn test_activation_reports_cycle() {
    let mut menu = cyclic_menu();
    let mut x = menu.item_mut("x").unwrap();
    assert!(is_cycle(x.activate().map(|_| ())));
}

#[test]
fn test_activation_without_parents_ignores_cycle() {
    let menu = cyclic_menu();
    let conf = MenuConfig {
        activate_parents: false,
        ..MenuConfig::default()
    };
    let mut flat = empty("flat", conf);
    flat.sort_with(|_| menu.all().to_vec());

    flat.item_mut("x").unwrap().activate().unwrap();
    assert!(flat.find("x").unwrap().is_current());
    assert!(!flat.find("y").unwrap().is_active());
}

#[test]
fn test_cycles_unreachable_from_roots() {
    let menu = cyclic_menu();
    assert_eq!(
        menu.as_ul(Attributes::new()).unwrap(),
        r#"<ul><li><a href="http://test.com">Home</a></li></ul>"#
    );

    let view = MenuView::from_builder(&menu).unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].id, "home");
}
