//! Selector parsing and matching.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::Element;
use crate::runner::ds::error::SelectorError;

#[derive(Parser)]
#[grammar = "dom/selector_grammar.pest"] // relative to src
struct SelectorParser;

#[derive(Debug, Clone, PartialEq)]
struct AttributeTest {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeTest>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|test| match element.attr(&test.name) {
            Some(actual) => test.value.as_ref().map_or(true, |v| *v == actual),
            None => false,
        })
    }
}

/// A parsed selector group such as `#anchor p, input[type=text]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    // Each entry is a descendant chain, outermost compound first.
    chains: Vec<Vec<Compound>>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let mut pairs = SelectorParser::parse(Rule::selector_group, selector)?;
        let mut chains = Vec::new();
        if let Some(group) = pairs.next() {
            for complex in group.into_inner() {
                if complex.as_rule() == Rule::complex {
                    chains.push(complex.into_inner().map(build_compound).collect());
                }
            }
        }
        Ok(Selector { chains })
    }

    /// Does `element` match, given its ancestors ordered root first?
    pub fn matches(&self, element: &Element, ancestors: &[Element]) -> bool {
        self.chains
            .iter()
            .any(|chain| chain_matches(chain, element, ancestors))
    }
}

fn chain_matches(chain: &[Compound], element: &Element, ancestors: &[Element]) -> bool {
    let (last, outer) = match chain.split_last() {
        Some(split) => split,
        None => return false,
    };
    if !last.matches(element) {
        return false;
    }
    let mut remaining = ancestors.len();
    for compound in outer.iter().rev() {
        loop {
            if remaining == 0 {
                return false;
            }
            remaining -= 1;
            if compound.matches(&ancestors[remaining]) {
                break;
            }
        }
    }
    true
}

fn build_compound(pair: Pair<Rule>) -> Compound {
    let mut compound = Compound::default();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::tag => compound.tag = Some(part.as_str().to_string()),
            Rule::id => compound.id = Some(part.as_str()[1..].to_string()),
            Rule::class => compound.classes.push(part.as_str()[1..].to_string()),
            Rule::attribute => {
                let mut inner = part.into_inner();
                let name = inner.next().map(|p| p.as_str().to_string()).unwrap_or_default();
                let value = inner.next().map(|p| p.as_str().to_string());
                compound.attributes.push(AttributeTest { name, value });
            }
            _ => { /* universal matches everything */ }
        }
    }
    compound
}
