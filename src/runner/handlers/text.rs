//! `text` and `html`: element content.

use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("text", BindingHandler::new().with_update(text_update));
    registry.register("html", BindingHandler::new().with_update(html_update));
}

/// Text content, HTML-escaped unless `textOptions.escape` is false.
fn text_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let escape = binding.all_bindings().option_boolean("text", "escape", true);
    binding.element.set_text(&binding.display_value(escape));
    Ok(())
}

/// Raw inner markup.
fn html_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    binding.element.set_html(&binding.display_value(false));
    Ok(())
}
