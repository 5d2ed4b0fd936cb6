//! The view contract the binder works against, and a ready-made view.

use std::fmt;
use std::rc::Rc;

use super::binder::{Binder, BindingSummary};
use super::extract::ExecutableBinding;
use crate::dom::Element;
use crate::runner::ds::directive::Directives;
use crate::runner::ds::model::DataSource;
use crate::runner::ds::value::OrderedMap;
use crate::runner::plugin::config::BinderConfig;

/// Unobtrusive declarations: selector → directives, in insertion order.
pub type UnobtrusiveBindings = OrderedMap<Directives>;

/// Something that can be bound.
pub trait BindableView {
    /// Root of the view's element tree. Only descendants are bound.
    fn root(&self) -> &Element;

    /// Data source for a binding context, `None` to skip that context.
    fn data_source(&self, context: &str) -> Option<Rc<dyn DataSource>>;

    fn unobtrusive_bindings(&self, property: &str) -> Option<&UnobtrusiveBindings>;

    fn binder_config(&self) -> BinderConfig;

    /// Where [`crate::runner::api::bind`] keeps the binder.
    fn binder_slot(&mut self) -> &mut Option<Binder>;

    /// Pre-commit filter, called once per executable binding.
    fn preview_binding(&self, _binding: &ExecutableBinding) -> bool {
        true
    }

    /// Called once at the end of every bind pass.
    fn binding_summary(&self, _summary: &BindingSummary) {}
}

type PreviewBindingFn = Box<dyn Fn(&ExecutableBinding) -> bool>;
type BindingSummaryFn = Box<dyn Fn(&BindingSummary)>;

/// A plain view: an element tree plus data sources and unobtrusive
/// declarations registered through builder methods.
pub struct View {
    root: Element,
    data_sources: OrderedMap<Rc<dyn DataSource>>,
    bindings: OrderedMap<UnobtrusiveBindings>,
    config: BinderConfig,
    binder: Option<Binder>,
    preview_binding: Option<PreviewBindingFn>,
    binding_summary: Option<BindingSummaryFn>,
}

impl View {
    pub fn new(root: Element) -> Self {
        View {
            root,
            data_sources: OrderedMap::new(),
            bindings: OrderedMap::new(),
            config: BinderConfig::new(),
            binder: None,
            preview_binding: None,
            binding_summary: None,
        }
    }

    pub fn with_data_source(mut self, context: &str, data_source: Rc<dyn DataSource>) -> Self {
        self.data_sources.insert(context, data_source);
        self
    }

    /// Data source of the `model` context.
    pub fn with_model(self, model: Rc<dyn DataSource>) -> Self {
        self.with_data_source("model", model)
    }

    /// Data source of the `viewModel` context.
    pub fn with_view_model(self, view_model: Rc<dyn DataSource>) -> Self {
        self.with_data_source("viewModel", view_model)
    }

    /// Add one unobtrusive declaration under `property`.
    pub fn with_bindings(mut self, property: &str, selector: &str, directives: Directives) -> Self {
        match self.bindings.get_mut(property) {
            Some(existing) => {
                existing.insert(selector, directives);
            }
            None => {
                self.bindings
                    .insert(property, UnobtrusiveBindings::new().with(selector, directives));
            }
        }
        self
    }

    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_preview_binding<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ExecutableBinding) -> bool + 'static,
    {
        self.preview_binding = Some(Box::new(filter));
        self
    }

    pub fn with_binding_summary<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BindingSummary) + 'static,
    {
        self.binding_summary = Some(Box::new(hook));
        self
    }

    pub fn is_bound(&self) -> bool {
        self.binder.is_some()
    }

    pub fn binder(&self) -> Option<&Binder> {
        self.binder.as_ref()
    }
}

impl BindableView for View {
    fn root(&self) -> &Element {
        &self.root
    }

    fn data_source(&self, context: &str) -> Option<Rc<dyn DataSource>> {
        self.data_sources.get(context).cloned()
    }

    fn unobtrusive_bindings(&self, property: &str) -> Option<&UnobtrusiveBindings> {
        self.bindings.get(property)
    }

    fn binder_config(&self) -> BinderConfig {
        self.config.clone()
    }

    fn binder_slot(&mut self) -> &mut Option<Binder> {
        &mut self.binder
    }

    fn preview_binding(&self, binding: &ExecutableBinding) -> bool {
        self.preview_binding.as_ref().map_or(true, |filter| filter(binding))
    }

    fn binding_summary(&self, summary: &BindingSummary) {
        if let Some(hook) = &self.binding_summary {
            hook(summary);
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("root", &self.root)
            .field("contexts", &self.data_sources.keys().collect::<Vec<_>>())
            .field("bound", &self.binder.is_some())
            .finish()
    }
}
