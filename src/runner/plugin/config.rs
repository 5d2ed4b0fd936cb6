//! Binder configuration: binding contexts, handler registry and error policy.

use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use super::registry::HandlerRegistry;
use crate::runner::ds::error::ConfigError;

/// What `bind` does when a handler fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// The first failure aborts the rest of the stage and is returned.
    Propagate,
    /// Every binding runs; failures are collected into the summary.
    Isolate,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Propagate
    }
}

impl FromStr for ErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "propagate" => Ok(ErrorPolicy::Propagate),
            "isolate" => Ok(ErrorPolicy::Isolate),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// One named data source a view can bind against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingContextConfig {
    /// Context name, used to look up the view's data source.
    pub name: String,
    /// Element attribute holding inline declarations.
    pub attribute: String,
    /// View property holding unobtrusive declarations.
    pub property: String,
    /// Further view properties read after `property`.
    pub aliases: Vec<String>,
}

impl BindingContextConfig {
    pub fn new(
        name: impl Into<String>,
        attribute: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        BindingContextConfig {
            name: name.into(),
            attribute: attribute.into(),
            property: property.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// `data-bind` / `modelBindings`, with the `dataBindings` alias.
    pub fn model() -> Self {
        Self::new("model", "data-bind", "modelBindings").with_alias("dataBindings")
    }

    /// `data-bind-view` / `viewModelBindings`.
    pub fn view_model() -> Self {
        Self::new("viewModel", "data-bind-view", "viewModelBindings")
    }

    /// The unobtrusive property followed by its aliases.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.property.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Complete binder configuration.
#[derive(Clone)]
pub struct BinderConfig {
    /// Binding contexts, in resolution order.
    pub contexts: Vec<BindingContextConfig>,
    pub registry: Rc<HandlerRegistry>,
    pub error_policy: ErrorPolicy,
}

impl BinderConfig {
    /// `model` and `viewModel` contexts, the shared standard registry and
    /// the propagate policy.
    pub fn new() -> Self {
        BinderConfig {
            contexts: vec![BindingContextConfig::model(), BindingContextConfig::view_model()],
            registry: HandlerRegistry::standard(),
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_registry(mut self, registry: Rc<HandlerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Add a context, replacing an existing one with the same name in place.
    pub fn with_context(mut self, context: BindingContextConfig) -> Self {
        match self.contexts.iter_mut().find(|c| c.name == context.name) {
            Some(existing) => *existing = context,
            None => self.contexts.push(context),
        }
        self
    }

    pub fn context(&self, name: &str) -> Option<&BindingContextConfig> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// error_policy = "isolate"
    ///
    /// [context.model]
    /// attribute = "data-bind"
    /// property = "modelBindings"
    /// aliases = ["dataBindings"]
    /// ```
    ///
    /// When any `[context.<name>]` section is present, the declared contexts
    /// replace the defaults, in file order.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    /// Only the subset shown in [`BinderConfig::load`] is understood.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = BinderConfig::new();
        let mut contexts: Vec<PartialContext> = Vec::new();
        let mut current_section = String::new();

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Section headers
            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                if let Some(name) = current_section.strip_prefix("context.") {
                    contexts.push(PartialContext::new(name.trim_matches('"')));
                }
                continue;
            }

            let (key, value) = Self::parse_key_value(line).ok_or_else(|| ConfigError::Syntax {
                line: line_no,
                message: format!("expected `key = value`, found `{}`", line),
            })?;

            if current_section.is_empty() {
                if key == "error_policy" {
                    config.error_policy = Self::parse_string(value, line_no)?.parse()?;
                }
                continue;
            }

            if let Some(context) = contexts.last_mut() {
                if current_section.starts_with("context.") {
                    match key {
                        "attribute" => context.attribute = Some(Self::parse_string(value, line_no)?),
                        "property" => context.property = Some(Self::parse_string(value, line_no)?),
                        "aliases" => context.aliases = Self::parse_string_array(value, line_no)?,
                        _ => {}
                    }
                }
            }
        }

        if !contexts.is_empty() {
            config.contexts = contexts
                .into_iter()
                .map(PartialContext::finish)
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    /// Split a line like: attribute = "data-bind"
    fn parse_key_value(line: &str) -> Option<(&str, &str)> {
        let mut parts = line.splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if key.is_empty() {
            None
        } else {
            Some((key, value))
        }
    }

    fn parse_string(value: &str, line: usize) -> Result<String, ConfigError> {
        let quoted = (value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\''));
        if value.len() < 2 || !quoted {
            return Err(ConfigError::Syntax {
                line,
                message: format!("expected a quoted string, found `{}`", value),
            });
        }
        Ok(value[1..value.len() - 1].to_string())
    }

    /// Parse an array like: ["dataBindings", "bindings"]
    fn parse_string_array(value: &str, line: usize) -> Result<Vec<String>, ConfigError> {
        if !(value.starts_with('[') && value.ends_with(']')) {
            return Err(ConfigError::Syntax {
                line,
                message: format!("expected an array of strings, found `{}`", value),
            });
        }
        value[1..value.len() - 1]
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Self::parse_string(item, line))
            .collect()
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderConfig")
            .field("contexts", &self.contexts)
            .field("handlers", &self.registry.names())
            .field("error_policy", &self.error_policy)
            .finish()
    }
}

struct PartialContext {
    name: String,
    attribute: Option<String>,
    property: Option<String>,
    aliases: Vec<String>,
}

impl PartialContext {
    fn new(name: &str) -> Self {
        PartialContext {
            name: name.to_string(),
            attribute: None,
            property: None,
            aliases: Vec::new(),
        }
    }

    fn finish(self) -> Result<BindingContextConfig, ConfigError> {
        let name = self.name;
        let missing = |key: &str| ConfigError::MissingKey {
            context: name.clone(),
            key: key.to_string(),
        };
        let attribute = self.attribute.ok_or_else(|| missing("attribute"))?;
        let property = self.property.ok_or_else(|| missing("property"))?;
        Ok(BindingContextConfig {
            name: name.clone(),
            attribute,
            property,
            aliases: self.aliases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_keeps_defaults() {
        let config = BinderConfig::parse("").unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Propagate);
        assert_eq!(
            config.contexts,
            vec![BindingContextConfig::model(), BindingContextConfig::view_model()]
        );
    }

    #[test]
    fn test_parse_contexts_and_policy() {
        let config = BinderConfig::parse(
            r#"
            # hardened binder
            error_policy = "isolate"

            [context.form]
            attribute = "data-form"
            property = 'formBindings'
            aliases = ["legacyForm", "oldForm"]

            [context.model]
            attribute = "data-bind"
            property = "modelBindings"
            "#,
        )
        .unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Isolate);
        assert_eq!(config.contexts.len(), 2);
        let form = &config.contexts[0];
        assert_eq!(form.name, "form");
        assert_eq!(form.attribute, "data-form");
        assert_eq!(
            form.properties().collect::<Vec<_>>(),
            vec!["formBindings", "legacyForm", "oldForm"]
        );
        assert!(config.context("model").unwrap().aliases.is_empty());
        assert!(config.context("viewModel").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            BinderConfig::parse("error_policy = \"explode\""),
            Err(ConfigError::UnknownPolicy(_))
        ));
        assert!(matches!(
            BinderConfig::parse("[context.x]\nattribute = \"data-x\""),
            Err(ConfigError::MissingKey { .. })
        ));
        assert!(matches!(
            BinderConfig::parse("\nerror_policy"),
            Err(ConfigError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            BinderConfig::parse("error_policy = isolate"),
            Err(ConfigError::Syntax { .. })
        ));
    }

    #[test]
    fn test_with_context_replaces_in_place() {
        let config = BinderConfig::new()
            .with_context(BindingContextConfig::new("model", "data-m", "m"))
            .with_context(BindingContextConfig::new("extra", "data-e", "e"));
        let names: Vec<&str> = config.contexts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["model", "viewModel", "extra"]);
        assert_eq!(config.contexts[0].attribute, "data-m");
    }

    #[test]
    fn test_load_missing_file() {
        let result = BinderConfig::load(Path::new("/nonexistent/outback.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
