//! Handler registry mapping directive names to binding handlers.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::types::BindingHandler;
use crate::runner::handlers::{register_standard_handlers, STANDARD_HANDLER_NAMES};

thread_local! {
    static STANDARD: Rc<HandlerRegistry> = Rc::new(HandlerRegistry::with_standard());
}

/// Registry for binding handlers.
/// A directive key names a handler exactly when it is registered here.
pub struct HandlerRegistry {
    handlers: HashMap<String, Rc<BindingHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        HandlerRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Create a registry with every standard handler.
    pub fn with_standard() -> Self {
        let mut registry = Self::new();
        register_standard_handlers(&mut registry);
        registry
    }

    /// The standard registry shared by every binder on this thread.
    pub fn standard() -> Rc<HandlerRegistry> {
        STANDARD.with(Rc::clone)
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, handler: BindingHandler) -> &mut Self {
        let name = name.into();
        if self.handlers.insert(name.clone(), Rc::new(handler)).is_some() && is_standard(&name) {
            debug!("Standard handler {} overridden", name);
        }
        self
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Rc<BindingHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Whether `name` is claimed by one of the standard handlers.
pub fn is_standard(name: &str) -> bool {
    STANDARD_HANDLER_NAMES.contains(&name)
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("text").is_none());
    }

    #[test]
    fn test_standard_registry_has_every_standard_handler() {
        let registry = HandlerRegistry::with_standard();
        for name in STANDARD_HANDLER_NAMES.iter() {
            assert!(registry.has(name), "missing {}", name);
        }
        assert_eq!(registry.len(), STANDARD_HANDLER_NAMES.len());
    }

    #[test]
    fn test_register_replaces_and_unregister_removes() {
        let mut registry = HandlerRegistry::new();
        registry.register("shout", BindingHandler::new());
        assert!(!registry.get("shout").unwrap().has_update());
        registry.register("shout", BindingHandler::new().on_update(|_| Ok(())));
        assert!(registry.get("shout").unwrap().has_update());
        assert_eq!(registry.names(), vec!["shout"]);
        assert!(registry.unregister("shout"));
        assert!(!registry.unregister("shout"));
    }

    #[test]
    fn test_standard_names() {
        assert!(is_standard("currency"));
        assert!(!is_standard("shout"));
        let mut registry = HandlerRegistry::with_standard();
        registry.register("text", BindingHandler::new());
        assert!(!registry.get("text").unwrap().has_update());
        assert_eq!(registry.len(), STANDARD_HANDLER_NAMES.len());
    }

    #[test]
    fn test_shared_standard_registry_is_reused() {
        assert!(Rc::ptr_eq(&HandlerRegistry::standard(), &HandlerRegistry::standard()));
    }
}
