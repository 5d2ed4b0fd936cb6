//! `enable` and `disable`: the element's disabled state.

use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("enable", BindingHandler::new().with_update(enable_update));
    registry.register("disable", BindingHandler::new().with_update(disable_update));
}

fn enable_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    binding.element.set_enabled(binding.value().is_truthy());
    Ok(())
}

fn disable_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    binding.element.set_enabled(!binding.value().is_truthy());
    Ok(())
}
