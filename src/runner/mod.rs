//! The binding runtime.
//!
//! - [`ds`]: values, directive trees, data sources and errors
//! - [`binding`]: declaration resolution, accessors and the binder
//! - [`plugin`]: handler plugin types, registry and configuration
//! - [`handlers`]: the standard handler set

pub mod api;
pub mod binding;
pub mod ds;
pub mod handlers;
pub mod plugin;
