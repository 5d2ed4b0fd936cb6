//! `hasfocus`: focus follows a boolean attribute and focus changes write
//! it back.

use std::rc::Rc;

use tracing::error;

use crate::dom::DomEvent;
use crate::runner::binding::accessor::AccessorOptions;
use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register(
        "hasfocus",
        BindingHandler::new()
            .with_init(hasfocus_init)
            .with_update(hasfocus_update)
            .with_remove(hasfocus_remove),
    );
}

fn hasfocus_init(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    for (event_name, focused) in [("focus", true), ("blur", false)].iter() {
        let accessor = binding.value_accessor(AccessorOptions::new().preview_error(true));
        let attribute = binding.model_attr_name().to_string();
        let focused = *focused;
        binding.element.on(
            event_name,
            Some(binding.binding_id.as_str()),
            Rc::new(move |_: &DomEvent| {
                if let Err(e) = accessor.set(focused) {
                    error!("hasfocus write to {} rejected: {}", attribute, e);
                }
            }),
        );
    }
    Ok(())
}

fn hasfocus_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    if binding.value().is_truthy() {
        binding.element.focus();
    } else {
        binding.element.blur();
    }
    Ok(())
}

fn hasfocus_remove(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    binding.element.off("focus", Some(binding.binding_id.as_str()));
    binding.element.off("blur", Some(binding.binding_id.as_str()));
    Ok(())
}
