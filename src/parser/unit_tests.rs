use super::api::{revive_directives, BindingParser, Rule};

use crate::runner::ds::directive::DirectiveNode;
use crate::runner::ds::symbol::SymbolReference;
use crate::runner::ds::value::Value;

use pest::consumes_to;
use pest::parses_to;

fn symbol_name(node: &DirectiveNode) -> Option<&str> {
    match node {
        DirectiveNode::Symbol(symbol) => Some(symbol.name()),
        _ => None,
    }
}

#[test]
fn test_symbol_token() {
    parses_to! {
        parser: BindingParser,
        input: "@firstName",
        rule: Rule::symbol,
        tokens: [
            symbol(0, 10, [
                identifier(1, 10)
            ])
        ]
    };
}

#[test]
fn test_keyword_does_not_swallow_identifier_prefix() {
    assert!(BindingParser::parse_to_directives("visible: trueish").is_err());
    assert!(BindingParser::parse_to_directives("visible: true").is_ok());
}

#[test]
fn test_bare_members() {
    let directives = BindingParser::parse_to_directives("text: @name, textOptions: { escape: false }").unwrap();
    assert_eq!(directives.keys().collect::<Vec<_>>(), vec!["text", "textOptions"]);
    assert_eq!(symbol_name(directives.get("text").unwrap()), Some("name"));
    let options = directives.get("textOptions").unwrap().as_branch().unwrap();
    assert_eq!(options.get("escape").unwrap().as_literal(), Some(&Value::Bool(false)));
}

#[test]
fn test_outer_braces_and_trailing_comma() {
    let directives = BindingParser::parse_to_directives("{ value: @a, 'is-cool': \"yes\", }").unwrap();
    assert_eq!(directives.len(), 2);
    assert_eq!(
        directives.get("is-cool").unwrap().as_literal(),
        Some(&Value::from("yes"))
    );
}

#[test]
fn test_empty_expression() {
    assert!(BindingParser::parse_to_directives("").unwrap().is_empty());
    assert!(BindingParser::parse_to_directives("  {} ").unwrap().is_empty());
}

#[test]
fn test_literals() {
    let directives = BindingParser::parse_to_directives(
        "a: -1.5, b: null, c: undefined, d: [1, 'x', { y: true }], e: 'it\\'s\\n'",
    )
    .unwrap();
    assert_eq!(directives.get("a").unwrap().as_literal(), Some(&Value::Number(-1.5)));
    assert_eq!(directives.get("b").unwrap().as_literal(), Some(&Value::Null));
    assert_eq!(directives.get("c").unwrap().as_literal(), Some(&Value::Undefined));
    match directives.get("d").unwrap().as_literal() {
        Some(Value::Array(items)) => {
            assert_eq!(items.len(), 3);
            assert_eq!(items[1], Value::from("x"));
            assert_eq!(items[2].as_object().unwrap().get("y"), Some(&Value::Bool(true)));
        }
        other => panic!("expected array, got {:?}", other),
    }
    assert_eq!(directives.get("e").unwrap().as_literal(), Some(&Value::from("it's\n")));
}

#[test]
fn test_symbol_inside_array_is_rejected() {
    assert!(BindingParser::parse_to_directives("options: [@a]").is_err());
}

#[test]
fn test_syntax_errors() {
    assert!(BindingParser::parse_to_directives("text @a").is_err());
    assert!(BindingParser::parse_to_directives("text: ").is_err());
    assert!(BindingParser::parse_to_directives("text: @").is_err());
    assert!(BindingParser::parse_to_directives("{ text: @a").is_err());
}

#[test]
fn test_reviver_runs_bottom_up_with_root_last() {
    let mut seen = Vec::new();
    let mut reviver = |key: &str, node: DirectiveNode| {
        seen.push(key.to_string());
        Some(node)
    };
    BindingParser::parse_with_reviver("css: { active: @a }, text: @b", &mut reviver).unwrap();
    assert_eq!(seen, vec!["active", "css", "text", ""]);
}

#[test]
fn test_reviver_can_drop_and_substitute() {
    let mut reviver = |key: &str, node: DirectiveNode| match key {
        "skip" => None,
        _ => match node {
            DirectiveNode::Symbol(symbol) => Some(DirectiveNode::Literal(Value::from(symbol.name()))),
            other => Some(other),
        },
    };
    let directives = BindingParser::parse_with_reviver("skip: 1, text: @b", &mut reviver).unwrap();
    assert!(!directives.contains_key("skip"));
    assert_eq!(directives.get("text").unwrap().as_literal(), Some(&Value::from("b")));
}

#[test]
fn test_root_replacement_yields_empty() {
    let directives = BindingParser::parse_to_directives("text: @b").unwrap();
    let mut reviver = |key: &str, node: DirectiveNode| {
        if key.is_empty() {
            Some(DirectiveNode::Literal(Value::Null))
        } else {
            Some(node)
        }
    };
    assert!(revive_directives(directives, &mut reviver).is_empty());
}

#[test]
fn test_unobtrusive_symbols_are_revived_too() {
    let directives = crate::runner::ds::directive::Directives::new()
        .with("value", SymbolReference::Unobtrusive("price".to_string()));
    let mut names = Vec::new();
    let mut reviver = |_: &str, node: DirectiveNode| {
        if let Some(name) = symbol_name(&node) {
            names.push(name.to_string());
        }
        Some(node)
    };
    revive_directives(directives, &mut reviver);
    assert_eq!(names, vec!["price"]);
}
