//! Executable binding extraction: matching directive keys against the
//! handler registry.

use std::fmt;
use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

use super::accessor::{AccessorOptions, ResolvedBinding, ValueAccessor};
use super::declaration::BindingDeclaration;
use crate::dom::Element;
use crate::runner::ds::directive::{DirectiveNode, Directives};
use crate::runner::ds::error::ValidationError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::HandlerRegistry;
use crate::runner::plugin::types::BindingHandler;

/// Read-only view over every directive declared on one element, keyed by
/// directive name.
#[derive(Clone, Debug, Default)]
pub struct AllBindings {
    directives: Directives,
}

impl AllBindings {
    pub fn new(directives: Directives) -> Self {
        AllBindings { directives }
    }

    pub fn all(&self) -> &Directives {
        &self.directives
    }

    pub fn get(&self, key: &str) -> Option<&DirectiveNode> {
        self.directives.get(key)
    }

    /// Literal string (or number/boolean in display form) under `key`.
    pub fn test_string(&self, key: &str, default: &str) -> String {
        literal_string(self.get(key)).unwrap_or_else(|| default.to_string())
    }

    /// Literal boolean under `key`.
    pub fn test_boolean(&self, key: &str, default: bool) -> bool {
        literal_boolean(self.get(key)).unwrap_or(default)
    }

    /// Field `option` of the `<key>Options` mapping.
    pub fn option_string(&self, key: &str, option: &str, default: &str) -> String {
        literal_string(self.option(key, option)).unwrap_or_else(|| default.to_string())
    }

    /// Field `option` of the `<key>Options` mapping.
    pub fn option_boolean(&self, key: &str, option: &str, default: bool) -> bool {
        literal_boolean(self.option(key, option)).unwrap_or(default)
    }

    /// Raw field `option` of the `<key>Options` mapping.
    pub fn option(&self, key: &str, option: &str) -> Option<&DirectiveNode> {
        self.get(&format!("{}Options", key))
            .and_then(DirectiveNode::as_branch)
            .and_then(|options| options.get(option))
    }
}

fn literal_string(node: Option<&DirectiveNode>) -> Option<String> {
    match node.and_then(DirectiveNode::as_literal)? {
        Value::String(s) => Some(s.clone()),
        v @ Value::Number(_) | v @ Value::Bool(_) => Some(v.to_display_string()),
        _ => None,
    }
}

fn literal_boolean(node: Option<&DirectiveNode>) -> Option<bool> {
    node.and_then(DirectiveNode::as_literal).and_then(Value::as_bool)
}

/// A resolved binding matched against a handler, ready to be installed.
#[derive(Clone)]
pub struct ExecutableBinding {
    /// Unique id; namespaces DOM listeners installed by the handler.
    pub binding_id: String,
    /// Directive key naming the handler.
    pub directive: String,
    /// Binding context the declaration came from.
    pub context: String,
    pub resolved: ResolvedBinding,
    pub element: Element,
    /// Root element of the bound view.
    pub root: Element,
    pub handler: Rc<BindingHandler>,
    pub all_bindings: Rc<AllBindings>,
}

impl ExecutableBinding {
    pub fn model_attr_name(&self) -> &str {
        &self.resolved.model_attr_name
    }

    pub fn parents(&self) -> &[String] {
        &self.resolved.parents
    }

    pub fn value_accessor(&self, options: AccessorOptions) -> ValueAccessor {
        self.resolved.value_accessor.accessor(options)
    }

    /// Raw current value.
    pub fn value(&self) -> Value {
        self.value_accessor(AccessorOptions::new()).get()
    }

    /// Current value in display form, escaped unless `escape` is false.
    pub fn display_value(&self, escape: bool) -> String {
        self.value_accessor(AccessorOptions::new().escape(escape))
            .get()
            .to_display_string()
    }

    /// Write back with error preview enabled.
    pub fn write(&self, value: impl Into<Value>) -> Result<(), ValidationError> {
        self.value_accessor(AccessorOptions::new().preview_error(true))
            .set(value)
    }

    pub fn all_bindings(&self) -> &AllBindings {
        &self.all_bindings
    }
}

impl fmt::Debug for ExecutableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableBinding")
            .field("binding_id", &self.binding_id)
            .field("directive", &self.directive)
            .field("context", &self.context)
            .field("resolved", &self.resolved)
            .field("element", &self.element)
            .finish()
    }
}

/// Find every leaf under a registered handler key of `declaration`.
///
/// Keys that do not name a handler are inert configuration; they only show
/// up in the [`AllBindings`] snapshot.
pub fn extract_executable_bindings(
    declaration: &BindingDeclaration,
    registry: &HandlerRegistry,
) -> Vec<ExecutableBinding> {
    let all_bindings = Rc::new(AllBindings::new(declaration.directives.clone()));
    let mut bindings = Vec::new();

    for (key, node) in declaration.directives.iter() {
        let handler = match registry.get(key) {
            Some(handler) => handler,
            None => continue,
        };
        let mut leaves = Vec::new();
        collect_leaves(node, &mut Vec::new(), &mut leaves);
        if leaves.is_empty() {
            debug!("Directive {} has no attribute reference", key);
        }
        for resolved in leaves {
            bindings.push(ExecutableBinding {
                binding_id: Uuid::new_v4().to_hyphenated().to_string(),
                directive: key.clone(),
                context: declaration.context.clone(),
                resolved,
                element: declaration.element.clone(),
                root: declaration.root.clone(),
                handler: handler.clone(),
                all_bindings: all_bindings.clone(),
            });
        }
    }

    bindings
}

// `path` holds the keys from the handler key down to `node`, outermost first.
fn collect_leaves(node: &DirectiveNode, path: &mut Vec<String>, leaves: &mut Vec<ResolvedBinding>) {
    match node {
        DirectiveNode::Leaf(resolved) => {
            let parents = path.iter().rev().cloned().collect();
            leaves.push(resolved.clone().with_parents(parents));
        }
        DirectiveNode::Branch(children) => {
            for (key, child) in children.iter() {
                path.push(key.clone());
                collect_leaves(child, path, leaves);
                path.pop();
            }
        }
        DirectiveNode::Literal(_) | DirectiveNode::Symbol(_) => {}
    }
}
