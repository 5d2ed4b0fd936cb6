use std::fmt;
use std::fmt::{Display, Formatter};

/// A reference to a data source attribute, as written by a view author.
///
/// Inline declarations produce `Inline` from `@name` tokens; unobtrusive
/// configuration produces `Unobtrusive` through [`model_ref`]. Both resolve
/// the same way during revival.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolReference {
    Inline(String),
    Unobtrusive(String),
}

impl SymbolReference {
    pub fn name(&self) -> &str {
        match self {
            SymbolReference::Inline(name) | SymbolReference::Unobtrusive(name) => name,
        }
    }
}

impl Display for SymbolReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// Marker for unobtrusive configuration: `model_ref("firstName")` stands for
/// the `firstName` attribute of the binding context's data source.
pub fn model_ref(attr_name: impl Into<String>) -> SymbolReference {
    SymbolReference::Unobtrusive(attr_name.into())
}
