//! `checked`: checkboxes bind a boolean, radio buttons bind the `value`
//! attribute of the checked button.

use std::rc::Rc;

use tracing::error;

use crate::dom::{DomEvent, Element};
use crate::runner::binding::accessor::AccessorOptions;
use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register(
        "checked",
        BindingHandler::new()
            .with_init(checked_init)
            .with_update(checked_update)
            .with_remove(checked_remove),
    );
}

fn is_radio(element: &Element) -> bool {
    element.attr("type").as_deref() == Some("radio")
}

fn checked_init(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let accessor = binding.value_accessor(AccessorOptions::new().preview_error(true));
    let attribute = binding.model_attr_name().to_string();
    binding.element.on(
        "change",
        Some(binding.binding_id.as_str()),
        Rc::new(move |event: &DomEvent| {
            let target = &event.target;
            let result = if is_radio(target) {
                if !target.is_checked() {
                    return;
                }
                accessor.set(target.attr("value").unwrap_or_default())
            } else {
                accessor.set(Value::Bool(target.is_checked()))
            };
            if let Err(e) = result {
                error!("checked write to {} rejected: {}", attribute, e);
            }
        }),
    );
    Ok(())
}

fn checked_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let element = &binding.element;
    let value = binding.value();
    if is_radio(element) {
        let own = element.attr("value").unwrap_or_default();
        element.set_checked(value.to_display_string() == own);
    } else {
        element.set_checked(value.is_truthy());
    }
    Ok(())
}

fn checked_remove(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    binding.element.off("change", Some(binding.binding_id.as_str()));
    Ok(())
}
