//! Data structures shared across the binding engine: values, directive
//! trees, symbol references, data sources and errors.

pub mod directive;
pub mod error;
pub mod model;
pub mod symbol;
pub mod value;

pub use directive::{DirectiveNode, Directives};
pub use error::{BindError, ConfigError, HandlerError, ValidationError};
pub use model::{Attributes, DataSource, Model, ModelEvent, SetOptions};
pub use symbol::{model_ref, SymbolReference};
pub use value::{OrderedMap, Value};
