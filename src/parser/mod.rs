mod api;
#[cfg(test)]
mod unit_tests;

pub use api::{revive, revive_directives, BindingParser, Rule};
