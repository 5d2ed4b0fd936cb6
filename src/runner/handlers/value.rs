//! `value`: two-way sync between a form control's value and an attribute.
//!
//! The DOM event that writes back defaults to `change` and can be changed
//! with a sibling `valueUpdate` directive, e.g.
//! `value: @name, valueUpdate: 'keyup'`.

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
        "value",
        BindingHandler::new()
            .with_init(value_init)
            .with_update(value_update)
            .with_remove(value_remove),
    );
}

fn update_event(binding: &ExecutableBinding) -> String {
    binding.all_bindings().test_string("valueUpdate", "change")
}

fn value_init(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let accessor = binding.value_accessor(AccessorOptions::new().preview_error(true));
    let attribute = binding.model_attr_name().to_string();
    binding.element.on(
        &update_event(binding),
        Some(binding.binding_id.as_str()),
        Rc::new(move |event: &DomEvent| {
            if let Err(e) = accessor.set(event.target.value()) {
                error!("value write to {} rejected: {}", attribute, e);
            }
        }),
    );
    Ok(())
}

/// Element value, HTML-escaped unless `valueOptions.escape` is false.
fn value_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let escape = binding.all_bindings().option_boolean("value", "escape", true);
    binding.element.set_value(&binding.display_value(escape));
    Ok(())
}

fn value_remove(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    binding
        .element
        .off(&update_event(binding), Some(binding.binding_id.as_str()));
    Ok(())
}
