//! Value accessors: live read/write handles on one data source attribute.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::runner::ds::error::ValidationError;
use crate::runner::ds::model::{change_event_name, Attributes, DataSource, Listener, ListenerId, SetOptions};
use crate::runner::ds::value::Value;

/// Options for [`AccessorFactory::accessor`]. All default to false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessorOptions {
    pub escape: bool,
    pub parents: bool,
    pub silent: bool,
    pub preview_error: bool,
}

impl AccessorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read through the HTML-escaping path.
    pub fn escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// Reads return the parents path instead of the attribute value.
    pub fn parents(mut self, parents: bool) -> Self {
        self.parents = parents;
        self
    }

    /// Writes do not fire change events.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Failed writes go through the error preview hook, if one is attached.
    pub fn preview_error(mut self, preview_error: bool) -> Self {
        self.preview_error = preview_error;
        self
    }
}

/// A rejected write, handed to a handler's error preview.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPreview {
    pub error: ValidationError,
    pub attribute: String,
    pub value: Value,
    default_prevented: bool,
}

impl ErrorPreview {
    pub fn new(error: ValidationError, attribute: impl Into<String>, value: Value) -> Self {
        ErrorPreview {
            error,
            attribute: attribute.into(),
            value,
            default_prevented: false,
        }
    }

    /// Keep the error from being re-emitted on the data source.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type ErrorPreviewHook = Rc<dyn Fn(&mut ErrorPreview)>;

/// Produces [`ValueAccessor`]s for one attribute. Cloning is cheap and the
/// only shared state is immutable.
#[derive(Clone)]
pub struct AccessorFactory {
    data_source: Rc<dyn DataSource>,
    model_attr_name: String,
    parents: Rc<[String]>,
    error_preview: Option<ErrorPreviewHook>,
}

impl AccessorFactory {
    pub fn new(data_source: Rc<dyn DataSource>, model_attr_name: impl Into<String>) -> Self {
        AccessorFactory {
            data_source,
            model_attr_name: model_attr_name.into(),
            parents: Rc::from(Vec::new()),
            error_preview: None,
        }
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = Rc::from(parents);
        self
    }

    pub fn with_error_preview(mut self, hook: ErrorPreviewHook) -> Self {
        self.error_preview = Some(hook);
        self
    }

    pub fn has_error_preview(&self) -> bool {
        self.error_preview.is_some()
    }

    pub fn model_attr_name(&self) -> &str {
        &self.model_attr_name
    }

    pub fn accessor(&self, options: AccessorOptions) -> ValueAccessor {
        ValueAccessor {
            factory: self.clone(),
            options,
        }
    }
}

/// A read/write handle on an attribute. Every read is live.
#[derive(Clone)]
pub struct ValueAccessor {
    factory: AccessorFactory,
    options: AccessorOptions,
}

impl ValueAccessor {
    pub fn options(&self) -> AccessorOptions {
        self.options
    }

    pub fn get(&self) -> Value {
        let factory = &self.factory;
        if self.options.parents {
            return Value::Array(factory.parents.iter().map(Value::from).collect());
        }
        if self.options.escape {
            Value::String(factory.data_source.escape(&factory.model_attr_name))
        } else {
            factory.data_source.get(&factory.model_attr_name)
        }
    }

    /// Write `value` back as a single-key change set.
    ///
    /// A validation failure is previewed and re-emitted as an `error` event
    /// when the accessor asked for preview and a hook is attached; the write
    /// then reports success. Otherwise the error is returned.
    pub fn set(&self, value: impl Into<Value>) -> Result<(), ValidationError> {
        let factory = &self.factory;
        let value = value.into();
        let changes = Attributes::new().with(factory.model_attr_name.as_str(), value.clone());
        let options = SetOptions {
            silent: self.options.silent,
            preview_error: self.options.preview_error,
        };
        let error = match factory.data_source.set(changes, options) {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };
        match (&factory.error_preview, self.options.preview_error) {
            (Some(hook), true) => {
                let mut preview = ErrorPreview::new(error, factory.model_attr_name.as_str(), value);
                hook(&mut preview);
                if preview.is_default_prevented() {
                    debug!("Error preview suppressed failed write to {}", factory.model_attr_name);
                } else {
                    factory.data_source.emit_error(&preview.error);
                }
                Ok(())
            }
            _ => Err(error),
        }
    }
}

/// A registered change listener, returned by [`ModelEvents::subscribe`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    event_name: String,
    id: ListenerId,
}

/// Subscribe/unsubscribe pair bound to `change:<attr>`.
#[derive(Clone)]
pub struct ModelEvents {
    event_name: String,
    data_source: Rc<dyn DataSource>,
}

impl ModelEvents {
    pub fn new(data_source: Rc<dyn DataSource>, model_attr_name: &str) -> Self {
        ModelEvents {
            event_name: change_event_name(model_attr_name),
            data_source,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.data_source.on(&self.event_name, listener);
        Subscription {
            event_name: self.event_name.clone(),
            id,
        }
    }

    /// Remove exactly the listener behind `subscription`.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.data_source.off(&subscription.event_name, subscription.id)
    }
}

/// A directive leaf referring to one data source attribute.
#[derive(Clone)]
pub struct ResolvedBinding {
    pub model_attr_name: String,
    pub value_accessor: AccessorFactory,
    pub model_events: ModelEvents,
    /// Keys between the handler key and this leaf, nearest container first.
    pub parents: Vec<String>,
}

impl ResolvedBinding {
    pub fn new(data_source: Rc<dyn DataSource>, model_attr_name: &str) -> Self {
        ResolvedBinding {
            model_attr_name: model_attr_name.to_string(),
            value_accessor: AccessorFactory::new(data_source.clone(), model_attr_name),
            model_events: ModelEvents::new(data_source, model_attr_name),
            parents: Vec::new(),
        }
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.value_accessor = self.value_accessor.with_parents(parents.clone());
        self.parents = parents;
        self
    }
}

impl fmt::Debug for ResolvedBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("model_attr_name", &self.model_attr_name)
            .field("event_name", &self.model_events.event_name)
            .field("parents", &self.parents)
            .finish()
    }
}
