//! `css`: toggle classes by truthiness, e.g. `css: { active: @isActive }`.

use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("css", BindingHandler::new().with_update(css_update));
}

fn css_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let class = binding.parents().first().ok_or_else(|| {
        HandlerError::Message(format!(
            "css binding on `{}` needs a class name key",
            binding.model_attr_name()
        ))
    })?;
    binding.element.toggle_class(class, binding.value().is_truthy());
    Ok(())
}
