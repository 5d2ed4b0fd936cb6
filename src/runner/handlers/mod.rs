//! Standard binding handlers.
//!
//! Each module registers one family of handlers. Handlers read their
//! options from the sibling `<name>Options` directive.

pub mod attr;
pub mod checked;
pub mod core;
pub mod css;
pub mod currency;
pub mod enable;
pub mod focus;
pub mod options;
pub mod text;
pub mod value;
pub mod visibility;

pub use self::core::{register_standard_handlers, STANDARD_HANDLER_NAMES};
