//! Binding handler plugins.
//!
//! A directive key becomes an executable binding only when a handler with
//! that name is registered. Handlers are plain values built from optional
//! lifecycle operations:
//!
//! ```text
//! init           wire DOM-to-model listeners
//! update         push the model value into the DOM (required)
//! remove         undo init
//! preview_error  inspect rejected writes, optionally prevent_default()
//! ```
//!
//! Registries are explicit instances handed to the binder through
//! [`BinderConfig`]; the default configuration shares one standard registry
//! per thread.
//!
//! ## Example: Custom Handler
//!
//! ```
//! use std::rc::Rc;
//! use outback::dom::Element;
//! use outback::runner::api::bind;
//! use outback::runner::binding::view::View;
//! use outback::runner::ds::model::Model;
//! use outback::runner::plugin::config::BinderConfig;
//! use outback::runner::plugin::registry::HandlerRegistry;
//! use outback::runner::plugin::types::BindingHandler;
//!
//! let mut registry = HandlerRegistry::with_standard();
//! registry.register(
//!     "shout",
//!     BindingHandler::new().on_update(|binding| {
//!         let text = binding.display_value(true).to_uppercase();
//!         binding.element.set_text(&text);
//!         Ok(())
//!     }),
//! );
//!
//! let label = Element::new("span").with_attr("data-bind", "shout: @greeting");
//! let model = Model::from_pairs(vec![("greeting", "hello")]).shared();
//! let mut view = View::new(Element::new("div").with_child(label.clone()))
//!     .with_model(model.clone())
//!     .with_config(BinderConfig::new().with_registry(Rc::new(registry)));
//!
//! bind(&mut view).unwrap();
//! assert_eq!(label.text(), "HELLO");
//!
//! model.set_attr("greeting", "bye").unwrap();
//! assert_eq!(label.text(), "BYE");
//! ```

pub mod config;
pub mod registry;
pub mod types;

pub use config::{BinderConfig, BindingContextConfig, ErrorPolicy};
pub use registry::HandlerRegistry;
pub use types::{BindingHandler, LifecycleFn, PreviewFn};
