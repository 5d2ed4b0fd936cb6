//! Standard handler registration.

use crate::runner::plugin::registry::HandlerRegistry;

use super::attr;
use super::checked;
use super::css;
use super::currency;
use super::enable;
use super::focus;
use super::options;
use super::text;
use super::value;
use super::visibility;

lazy_static! {
    /// Directive names claimed by the standard handlers.
    pub static ref STANDARD_HANDLER_NAMES: Vec<&'static str> = vec![
        "attr", "checked", "css", "currency", "disable", "enable", "hasfocus", "html",
        "invisible", "options", "text", "value", "visible",
    ];
}

/// Register every standard handler with the registry.
pub fn register_standard_handlers(registry: &mut HandlerRegistry) {
    visibility::register(registry);
    text::register(registry);
    value::register(registry);
    checked::register(registry);
    enable::register(registry);
    focus::register(registry);
    css::register(registry);
    attr::register(registry);
    currency::register(registry);
    options::register(registry);
}
