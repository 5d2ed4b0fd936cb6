use std::time::Instant;

use pest::error::{Error, ErrorVariant};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::trace;

use crate::runner::ds::directive::{DirectiveNode, Directives};
use crate::runner::ds::symbol::SymbolReference;
use crate::runner::ds::value::Value;

#[derive(Parser)]
#[grammar = "parser/binding_grammar.pest"] // relative to src
pub struct BindingParser;

impl BindingParser {
    /// Parse a binding expression into an unrevived directive tree.
    /// Symbol references stay as `DirectiveNode::Symbol`.
    pub fn parse_to_directives(expression: &str) -> Result<Directives, Error<Rule>> {
        let start = Instant::now();
        let mut pairs = BindingParser::parse(Rule::binding_expression, expression)?;
        let mut directives = Directives::new();
        if let Some(root) = pairs.next() {
            for pair in root.into_inner() {
                match pair.as_rule() {
                    Rule::object => directives = build_object(pair)?,
                    Rule::members => directives = build_members(pair)?,
                    Rule::EOI => { /* Do nothing */ }
                    _ => return Err(get_unexpected_error(1, &pair)),
                }
            }
        }
        trace!(
            "Parsed binding expression in {}us",
            Instant::now().saturating_duration_since(start).as_micros()
        );
        Ok(directives)
    }

    /// Parse and revive in one step.
    ///
    /// The reviver is called bottom-up for every node with the raw key
    /// (`""` for the root). Returning `None` drops the node; `Some` puts the
    /// returned node in its place.
    pub fn parse_with_reviver<F>(expression: &str, reviver: &mut F) -> Result<Directives, Error<Rule>>
    where
        F: FnMut(&str, DirectiveNode) -> Option<DirectiveNode>,
    {
        let directives = Self::parse_to_directives(expression)?;
        Ok(revive_directives(directives, reviver))
    }
}

/// Revive a single node and everything below it.
pub fn revive<F>(key: &str, node: DirectiveNode, reviver: &mut F) -> Option<DirectiveNode>
where
    F: FnMut(&str, DirectiveNode) -> Option<DirectiveNode>,
{
    let node = match node {
        DirectiveNode::Branch(children) => {
            let mut revived = Directives::new();
            for (child_key, child) in children {
                if let Some(child) = revive(&child_key, child, reviver) {
                    revived.insert(child_key, child);
                }
            }
            DirectiveNode::Branch(revived)
        }
        other => other,
    };
    reviver(key, node)
}

/// Revive a whole directive mapping, treating it as the root node.
/// A root replaced by anything other than a mapping yields no directives.
pub fn revive_directives<F>(directives: Directives, reviver: &mut F) -> Directives
where
    F: FnMut(&str, DirectiveNode) -> Option<DirectiveNode>,
{
    match revive("", DirectiveNode::Branch(directives), reviver) {
        Some(DirectiveNode::Branch(revived)) => revived,
        _ => Directives::new(),
    }
}

fn build_object(pair: Pair<Rule>) -> Result<Directives, Error<Rule>> {
    match pair.into_inner().next() {
        Some(members) => build_members(members),
        None => Ok(Directives::new()),
    }
}

fn build_members(pair: Pair<Rule>) -> Result<Directives, Error<Rule>> {
    let mut directives = Directives::new();
    for member in pair.into_inner() {
        let err = get_unexpected_error(2, &member);
        let mut inner = member.into_inner();
        let (key_pair, value_pair) = match (inner.next(), inner.next()) {
            (Some(k), Some(v)) => (k, v),
            _ => return Err(err),
        };
        let key = match key_pair.as_rule() {
            Rule::identifier => key_pair.as_str().to_string(),
            Rule::string => build_string(key_pair),
            _ => return Err(get_unexpected_error(3, &key_pair)),
        };
        directives.insert(key, build_node(value_pair)?);
    }
    Ok(directives)
}

fn build_node(pair: Pair<Rule>) -> Result<DirectiveNode, Error<Rule>> {
    Ok(match pair.as_rule() {
        Rule::object => DirectiveNode::Branch(build_object(pair)?),
        Rule::array => {
            let mut items = Vec::new();
            for item in pair.into_inner() {
                let err = get_custom_error(
                    "symbol references are not allowed inside arrays",
                    &item,
                );
                match build_node(item)?.to_literal() {
                    Some(value) => items.push(value),
                    None => return Err(err),
                }
            }
            DirectiveNode::Literal(Value::Array(items))
        }
        Rule::symbol => {
            let name = pair
                .into_inner()
                .next()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            DirectiveNode::Symbol(SymbolReference::Inline(name))
        }
        Rule::string => DirectiveNode::Literal(Value::String(build_string(pair))),
        Rule::number => {
            let err = get_custom_error("invalid number", &pair);
            let n = pair.as_str().parse::<f64>().map_err(|_| err)?;
            DirectiveNode::Literal(Value::Number(n))
        }
        Rule::true_lit => DirectiveNode::Literal(Value::Bool(true)),
        Rule::false_lit => DirectiveNode::Literal(Value::Bool(false)),
        Rule::null_lit => DirectiveNode::Literal(Value::Null),
        Rule::undefined_lit => DirectiveNode::Literal(Value::Undefined),
        _ => return Err(get_unexpected_error(4, &pair)),
    })
}

fn build_string(pair: Pair<Rule>) -> String {
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    unescape(raw)
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => result.push(decoded),
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

fn get_unexpected_error(src: u32, pair: &Pair<Rule>) -> Error<Rule> {
    get_custom_error(
        &format!("Unexpected state reached in the parser at \"{:?}\". This indicates internal logic error in the parser. Source: {}", pair.as_rule(), src),
        pair,
    )
}

fn get_custom_error(message: &str, pair: &Pair<Rule>) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.to_string(),
        },
        pair.as_span(),
    )
}
