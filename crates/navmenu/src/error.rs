//! Menu error types.

use thiserror::Error;

/// Errors raised while building, querying, or rendering menus.
#[derive(Debug, Error)]
pub enum MenuError {
    /// A configuration key was requested that the menu configuration does not define.
    #[error("unknown menu configuration key '{key}'")]
    UnknownConfigKey { key: String },

    /// An explicit item id was reused inside one menu.
    #[error("menu '{menu}': item id '{id}' is already in use")]
    DuplicateId { menu: String, id: String },

    /// Parent links would loop back onto an item.
    #[error("menu '{menu}': parent chain of item '{id}' forms a cycle")]
    ParentCycle { menu: String, id: String },

    /// An activation pattern or rest base could not be compiled.
    #[error("invalid pattern '{pattern}': {details}")]
    InvalidPattern { pattern: String, details: String },

    /// A base or request URL could not be parsed.
    #[error("invalid url '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    /// Menu settings could not be parsed or resolved.
    #[error("invalid menu settings: {0}")]
    Settings(String),

    /// A menu definition could not be parsed or applied.
    #[error("invalid menu definition: {0}")]
    Definition(String),

    #[error("template error")]
    Template(#[from] tera::Error),
}

/// Result type alias using MenuError.
pub type MenuResult<T> = Result<T, MenuError>;
