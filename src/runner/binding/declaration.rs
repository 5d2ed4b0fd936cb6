//! Binding declaration resolution: inline attributes and unobtrusive view
//! configuration turned into (element, directives, data source) triples.

use std::rc::Rc;

use tracing::debug;

use super::accessor::ResolvedBinding;
use super::view::BindableView;
use crate::dom::Element;
use crate::parser::{revive_directives, BindingParser};
use crate::runner::ds::directive::{DirectiveNode, Directives};
use crate::runner::ds::error::BindError;
use crate::runner::ds::model::DataSource;
use crate::runner::plugin::config::{BinderConfig, BindingContextConfig};

/// One element's directives against one data source.
pub struct BindingDeclaration {
    pub element: Element,
    pub directives: Directives,
    pub data_source: Rc<dyn DataSource>,
    /// Name of the binding context.
    pub context: String,
    /// Root element of the view.
    pub root: Element,
}

/// Reviver turning every symbol reference into a resolved binding against
/// `data_source`. The attribute does not have to exist yet.
pub fn make_reviver(
    data_source: Rc<dyn DataSource>,
) -> impl FnMut(&str, DirectiveNode) -> Option<DirectiveNode> {
    move |_key: &str, node: DirectiveNode| match node {
        DirectiveNode::Symbol(symbol) => Some(DirectiveNode::Leaf(ResolvedBinding::new(
            data_source.clone(),
            symbol.name(),
        ))),
        other => Some(other),
    }
}

/// Every declaration of `view`: contexts in configuration order, inline
/// declarations before unobtrusive ones within a context.
pub fn resolve_declarations<V>(
    view: &V,
    config: &BinderConfig,
) -> Result<Vec<BindingDeclaration>, BindError>
where
    V: BindableView + ?Sized,
{
    let mut declarations = Vec::new();
    for context in &config.contexts {
        let data_source = match view.data_source(&context.name) {
            Some(data_source) => data_source,
            None => {
                debug!("No data source for binding context {}", context.name);
                continue;
            }
        };
        resolve_inline(view.root(), context, &data_source, &mut declarations)?;
        for property in context.properties() {
            if let Some(bindings) = view.unobtrusive_bindings(property) {
                for (selector, directives) in bindings.iter() {
                    let elements = view.root().select(selector)?;
                    if elements.is_empty() {
                        debug!("Selector {} matched no elements", selector);
                        continue;
                    }
                    let directives =
                        revive_directives(directives.clone(), &mut make_reviver(data_source.clone()));
                    for element in elements {
                        declarations.push(BindingDeclaration {
                            element,
                            directives: directives.clone(),
                            data_source: data_source.clone(),
                            context: context.name.clone(),
                            root: view.root().clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(declarations)
}

fn resolve_inline(
    root: &Element,
    context: &BindingContextConfig,
    data_source: &Rc<dyn DataSource>,
    declarations: &mut Vec<BindingDeclaration>,
) -> Result<(), BindError> {
    let attribute = &context.attribute;
    for element in root.select(&format!("[{}]", attribute))? {
        let expression = element.attr(attribute).unwrap_or_default();
        let mut reviver = make_reviver(data_source.clone());
        let directives = BindingParser::parse_with_reviver(&expression, &mut reviver)?;
        debug!(
            "Parsed {} directive(s) from {}=\"{}\"",
            directives.len(),
            attribute,
            expression
        );
        declarations.push(BindingDeclaration {
            element,
            directives,
            data_source: data_source.clone(),
            context: context.name.clone(),
            root: root.clone(),
        });
    }
    Ok(())
}
