//! Navmenu
//!
//! Hierarchical navigation menus: items grouped under shared attributes,
//! resolved to URLs, matched against the current request, and rendered as
//! nested HTML lists or through Tera templates.
//!
//! ```ignore
//! let mut registry = MenuRegistry::new(MenuSettings::default(), context);
//! registry.make("main", |menu| {
//!     menu.add("Home", "")?;
//!     menu.add("About", "about")?.add("Team", "about/team")?;
//!     Ok(())
//! })?;
//! let html = registry.get("main").map(|m| m.as_ul(Attributes::new()));
//! ```

pub mod attributes;
pub mod builder;
pub mod config;
pub mod definition;
pub mod error;
pub mod item;
pub mod link;
pub mod registry;
pub mod url;
pub mod view;

pub use attributes::{Attributes, merge_class, merge_group, merge_prefix, merge_static, render_attributes};
pub use builder::{
    AfterItemHook, Builder, ItemMut, ItemRenderAttrs, ItemSet, RenderOptions, SortDirection,
};
pub use config::{ActiveElement, MenuConfig, MenuSettings, RestBase};
pub use definition::{Entry, ItemDefinition, MenuDefinition};
pub use error::{MenuError, MenuResult};
pub use item::{Item, ItemOptions};
pub use link::{Link, LinkPath, Target};
pub use registry::MenuRegistry;
pub use self::url::{MenuContext, RequestInfo, SimpleUrlGenerator, UrlGenerator};
pub use view::{ItemView, MenuView};
