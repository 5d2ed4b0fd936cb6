//! # outback - declarative data binding
//!
//! Binds elements of a view to attributes of observable data sources:
//! - Inline declarations in element attributes (`data-bind="text: @name"`)
//!   parsed by a PEG grammar
//! - Unobtrusive declarations kept on the view, keyed by selector
//! - Pluggable binding handlers with `init`/`update`/`remove` lifecycles
//! - Staged installation (all inits, then all updates, then change
//!   subscriptions) and clean teardown
//!
//! ## Quick Start
//!
//! ```
//! use outback::dom::Element;
//! use outback::runner::api::{bind, unbind};
//! use outback::runner::binding::view::View;
//! use outback::runner::ds::model::{DataSource, Model};
//! use outback::runner::ds::value::Value;
//!
//! let input = Element::new("input")
//!     .with_attr("type", "text")
//!     .with_attr("data-bind", "value: @name");
//! let model = Model::from_pairs(vec![("name", "Abram")]).shared();
//! let mut view = View::new(Element::new("div").with_child(input.clone()))
//!     .with_model(model.clone());
//!
//! let summary = bind(&mut view).unwrap();
//! assert_eq!(summary.executable_bindings_installed, 1);
//! assert_eq!(input.value(), "Abram");
//!
//! // model to DOM
//! model.set_attr("name", "Abraham").unwrap();
//! assert_eq!(input.value(), "Abraham");
//!
//! // DOM to model
//! input.set_value("Carl");
//! input.trigger("change");
//! assert_eq!(model.get("name"), Value::from("Carl"));
//!
//! unbind(&mut view).unwrap();
//! ```
//!
//! ### Unobtrusive Declarations
//!
//! ```
//! use outback::dom::Element;
//! use outback::runner::api::{bind, model_ref};
//! use outback::runner::binding::view::View;
//! use outback::runner::ds::directive::Directives;
//! use outback::runner::ds::model::Model;
//!
//! let price = Element::new("span");
//! let model = Model::from_pairs(vec![("price", 0)]).shared();
//! let mut view = View::new(Element::new("div").with_child(price.clone()))
//!     .with_model(model.clone())
//!     .with_bindings("modelBindings", "span", Directives::new().with("currency", model_ref("price")));
//!
//! bind(&mut view).unwrap();
//! assert_eq!(price.text(), "$0.00");
//! model.set_attr("price", 1).unwrap();
//! assert_eq!(price.text(), "$1.00");
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG parser for inline binding expressions
//! - **[`dom`]** - In-memory element tree and selector engine
//! - **[`runner`]** - The binding runtime
//!   - **[`runner::binding`]** - Declarations, accessors and the binder
//!   - **[`runner::plugin`]** - Handler plugins, registry and configuration
//!   - **[`runner::handlers`]** - Standard handlers
//!   - **[`runner::ds`]** - Values, directive trees, data sources, errors

#[macro_use]
extern crate lazy_static;

pub mod dom;
pub mod parser;
pub mod runner;

pub use runner::api::{bind, model_ref, unbind};
pub use runner::binding::{BindableView, Binder, BindingSummary, View};
pub use runner::ds::{BindError, DataSource, Model, Value};
