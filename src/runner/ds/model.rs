//! Observable data sources.
//!
//! [`DataSource`] is the contract the binder talks to: named attribute reads
//! and writes plus per-attribute change notification. [`Model`] is an
//! observable attribute bag implementing it.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use outback::runner::ds::model::{DataSource, Model, ModelEvent};
//!
//! let model = Model::from_pairs(vec![("count", 0)]);
//! let seen = Rc::new(Cell::new(0));
//! let counter = seen.clone();
//! model.on("change:count", Rc::new(move |_: &ModelEvent| counter.set(counter.get() + 1)));
//!
//! model.set_attr("count", 1).unwrap();
//! model.set_attr("count", 1).unwrap();
//! assert_eq!(seen.get(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::runner::ds::error::ValidationError;
use crate::runner::ds::value::{escape_html, OrderedMap, Value};

/// Attribute name → value.
pub type Attributes = OrderedMap<Value>;

/// Callback registered for a data source event.
pub type Listener = Rc<dyn Fn(&ModelEvent)>;

/// Validator run against the merged attributes before a change is applied.
pub type Validator = Box<dyn Fn(&Attributes) -> Result<(), String>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Native write options of a data source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Apply the change without firing change events.
    pub silent: bool,
    /// The caller routes validation failures through an error preview.
    pub preview_error: bool,
}

/// An event delivered to data source listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelEvent {
    pub name: String,
    pub attribute: Option<String>,
    pub value: Value,
    pub error: Option<ValidationError>,
}

impl ModelEvent {
    pub fn change(attribute: &str, value: Value) -> Self {
        ModelEvent {
            name: change_event_name(attribute),
            attribute: Some(attribute.to_string()),
            value,
            error: None,
        }
    }

    pub fn changed() -> Self {
        ModelEvent {
            name: "change".to_string(),
            attribute: None,
            value: Value::Undefined,
            error: None,
        }
    }

    pub fn error(error: &ValidationError) -> Self {
        ModelEvent {
            name: "error".to_string(),
            attribute: None,
            value: Value::Undefined,
            error: Some(error.clone()),
        }
    }
}

/// Name of the event fired when `attribute` changes.
pub fn change_event_name(attribute: &str) -> String {
    format!("change:{}", attribute)
}

/// An observable attribute bag.
///
/// A successful non-silent `set` fires `change:<attr>` for every attribute
/// whose value actually changed, then a single `change`.
pub trait DataSource {
    /// Current value, `Value::Undefined` when the attribute is absent.
    fn get(&self, attribute: &str) -> Value;

    fn has(&self, attribute: &str) -> bool;

    /// HTML-escaped string form of the current value.
    fn escape(&self, attribute: &str) -> String {
        escape_html(&self.get(attribute).to_display_string())
    }

    fn set(&self, changes: Attributes, options: SetOptions) -> Result<(), ValidationError>;

    fn on(&self, event: &str, listener: Listener) -> ListenerId;

    /// Remove one listener. Returns false if it was not registered.
    fn off(&self, event: &str, id: ListenerId) -> bool;

    /// Publish a validation failure as an `error` event.
    fn emit_error(&self, error: &ValidationError);
}

struct ModelState {
    attributes: Attributes,
    listeners: Vec<(String, ListenerId, Listener)>,
    next_listener_id: u64,
}

pub struct Model {
    state: RefCell<ModelState>,
    validator: Option<Validator>,
}

impl Model {
    pub fn new() -> Self {
        Model {
            state: RefCell::new(ModelState {
                attributes: Attributes::new(),
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
            validator: None,
        }
    }

    /// A model with initial attributes. No events are fired.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let model = Model::new();
        {
            let mut state = model.state.borrow_mut();
            for (k, v) in pairs {
                state.attributes.insert(k, v.into());
            }
        }
        model
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Attributes) -> Result<(), String> + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn shared(self) -> Rc<Model> {
        Rc::new(self)
    }

    /// Set a single attribute with default options.
    pub fn set_attr(&self, attribute: &str, value: impl Into<Value>) -> Result<(), ValidationError> {
        self.set(
            Attributes::new().with(attribute, value),
            SetOptions::default(),
        )
    }

    pub fn attributes(&self) -> Attributes {
        self.state.borrow().attributes.clone()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _, _)| name == event)
            .count()
    }

    /// Deliver `event` to its listeners. The listener list is copied first,
    /// so listeners may write to the model or unsubscribe while running.
    pub fn trigger(&self, event: &ModelEvent) {
        let listeners: Vec<Listener> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _, _)| *name == event.name)
            .map(|(_, _, listener)| listener.clone())
            .collect();
        trace!("Dispatching {} to {} listener(s)", event.name, listeners.len());
        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for Model {
    fn get(&self, attribute: &str) -> Value {
        self.state
            .borrow()
            .attributes
            .get(attribute)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    fn has(&self, attribute: &str) -> bool {
        self.state.borrow().attributes.contains_key(attribute)
    }

    fn set(&self, changes: Attributes, options: SetOptions) -> Result<(), ValidationError> {
        if let Some(validator) = &self.validator {
            let mut candidate = self.attributes();
            for (k, v) in changes.iter() {
                candidate.insert(k.clone(), v.clone());
            }
            validator(&candidate).map_err(ValidationError::new)?;
        }

        let mut changed = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            for (k, v) in changes {
                let current = state.attributes.get(&k).cloned().unwrap_or(Value::Undefined);
                if current != v {
                    state.attributes.insert(k.clone(), v.clone());
                    changed.push((k, v));
                }
            }
        }

        if options.silent || changed.is_empty() {
            return Ok(());
        }
        for (attribute, value) in changed {
            self.trigger(&ModelEvent::change(&attribute, value));
        }
        self.trigger(&ModelEvent::changed());
        Ok(())
    }

    fn on(&self, event: &str, listener: Listener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_listener_id);
        state.next_listener_id += 1;
        state.listeners.push((event.to_string(), id, listener));
        id
    }

    fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state
            .listeners
            .retain(|(name, listener_id, _)| !(name == event && *listener_id == id));
        state.listeners.len() != before
    }

    fn emit_error(&self, error: &ValidationError) {
        self.trigger(&ModelEvent::error(error));
    }
}
