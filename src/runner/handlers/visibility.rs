//! `visible` and `invisible`: show or hide by truthiness.

use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("visible", BindingHandler::new().with_update(visible_update));
    registry.register("invisible", BindingHandler::new().with_update(invisible_update));
}

fn set_visible(binding: &ExecutableBinding, visible: bool) {
    if visible {
        binding.element.show();
    } else {
        binding.element.hide();
    }
}

fn visible_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    set_visible(binding, binding.value().is_truthy());
    Ok(())
}

fn invisible_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    set_visible(binding, !binding.value().is_truthy());
    Ok(())
}
