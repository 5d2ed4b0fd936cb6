//! Directive trees: the parsed (or configured) shape of a binding declaration.

use crate::runner::binding::accessor::ResolvedBinding;
use crate::runner::ds::symbol::SymbolReference;
use crate::runner::ds::value::{OrderedMap, Value};

/// Directive name → node, in declaration order.
pub type Directives = OrderedMap<DirectiveNode>;

/// One node of a directive tree.
///
/// `Symbol` only exists between parsing and revival; revival against a data
/// source turns every symbol into a `Leaf`.
#[derive(Clone, Debug)]
pub enum DirectiveNode {
    Leaf(ResolvedBinding),
    Branch(Directives),
    Literal(Value),
    Symbol(SymbolReference),
}

impl DirectiveNode {
    pub fn as_leaf(&self) -> Option<&ResolvedBinding> {
        match self {
            DirectiveNode::Leaf(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Directives> {
        match self {
            DirectiveNode::Branch(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            DirectiveNode::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Plain value form of this node, or `None` if it holds a symbol or a
    /// resolved binding anywhere inside.
    pub fn to_literal(&self) -> Option<Value> {
        match self {
            DirectiveNode::Literal(value) => Some(value.clone()),
            DirectiveNode::Branch(children) => {
                let mut object = OrderedMap::new();
                for (key, child) in children.iter() {
                    object.insert(key.clone(), child.to_literal()?);
                }
                Some(Value::Object(object))
            }
            DirectiveNode::Leaf(_) | DirectiveNode::Symbol(_) => None,
        }
    }
}

impl From<Value> for DirectiveNode {
    fn from(value: Value) -> Self {
        DirectiveNode::Literal(value)
    }
}

impl From<bool> for DirectiveNode {
    fn from(b: bool) -> Self {
        DirectiveNode::Literal(Value::Bool(b))
    }
}

impl From<f64> for DirectiveNode {
    fn from(n: f64) -> Self {
        DirectiveNode::Literal(Value::Number(n))
    }
}

impl From<i32> for DirectiveNode {
    fn from(n: i32) -> Self {
        DirectiveNode::Literal(Value::from(n))
    }
}

impl From<&str> for DirectiveNode {
    fn from(s: &str) -> Self {
        DirectiveNode::Literal(Value::from(s))
    }
}

impl From<String> for DirectiveNode {
    fn from(s: String) -> Self {
        DirectiveNode::Literal(Value::String(s))
    }
}

impl From<SymbolReference> for DirectiveNode {
    fn from(symbol: SymbolReference) -> Self {
        DirectiveNode::Symbol(symbol)
    }
}

impl From<Directives> for DirectiveNode {
    fn from(children: Directives) -> Self {
        DirectiveNode::Branch(children)
    }
}

impl From<ResolvedBinding> for DirectiveNode {
    fn from(binding: ResolvedBinding) -> Self {
        DirectiveNode::Leaf(binding)
    }
}
