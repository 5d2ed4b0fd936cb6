//! `options`: populate a select element.
//!
//! A string value is a selector for a template element (searched from the
//! view root) whose children are cloned in as options. An object value maps
//! option values to `{ label }` entries. Either way the option matching the
//! select's current value ends up selected.

use crate::dom::Element;
use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("options", BindingHandler::new().with_update(options_update));
}

fn options_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    let select = &binding.element;
    select.clear_children();
    match binding.value() {
        Value::String(selector) => {
            let template = binding.root.select(&selector)?;
            let template = template.first().ok_or_else(|| {
                HandlerError::Dom(format!("options template `{}` not found", selector))
            })?;
            for child in template.children() {
                select.append_child(child.deep_clone());
            }
        }
        Value::Object(entries) => {
            for (value, entry) in entries.iter() {
                let label = entry
                    .as_object()
                    .and_then(|e| e.get("label"))
                    .map(Value::to_display_string)
                    .unwrap_or_else(|| value.clone());
                select.append_child(
                    Element::new("option")
                        .with_attr("value", value)
                        .with_text(&label),
                );
            }
        }
        Value::Undefined | Value::Null => {}
        other => {
            return Err(HandlerError::Message(format!(
                "options expects a selector or an object, got {}",
                other
            )))
        }
    }
    select.sync_selected_option();
    Ok(())
}
