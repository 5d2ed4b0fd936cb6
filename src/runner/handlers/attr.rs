//! `attr`: set element attributes, e.g. `attr: { href: @url }`.
//!
//! Values are HTML-escaped unless `attrOptions.escape` is false. Null,
//! undefined, empty strings and empty arrays remove the attribute.

use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("attr", BindingHandler::new().with_update(attr_update));
}

fn attr_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let name = binding.parents().first().ok_or_else(|| {
        HandlerError::Message(format!(
            "attr binding on `{}` needs an attribute name key",
            binding.model_attr_name()
        ))
    })?;
    if binding.value().is_blank() {
        binding.element.remove_attr(name);
    } else {
        let escape = binding.all_bindings().option_boolean("attr", "escape", true);
        binding.element.set_attr(name, &binding.display_value(escape));
    }
    Ok(())
}
