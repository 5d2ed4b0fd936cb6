//! The binder: lifecycle orchestration for one bound view.
//!
//! `bind` resolves declarations, extracts executable bindings and then runs
//! three strictly ordered stages over one list of [`LifecycleHooks`]: every
//! `init`, then every `update`, then every change subscription. Subscribing
//! last keeps initial synchronization writes from re-entering the bindings
//! that caused them. `unbind` unsubscribes everything before running any
//! `remove`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::accessor::{ErrorPreview, ErrorPreviewHook, Subscription};
use super::declaration::resolve_declarations;
use super::extract::{extract_executable_bindings, ExecutableBinding};
use super::view::BindableView;
use crate::runner::ds::error::{BindError, HandlerError};
use crate::runner::ds::model::ModelEvent;
use crate::runner::plugin::config::{BinderConfig, ErrorPolicy};

/// A lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    Update,
    Subscribe,
    Unsubscribe,
    Remove,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Update => "update",
            Stage::Subscribe => "subscribe",
            Stage::Unsubscribe => "unsubscribe",
            Stage::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// A handler failure tied to the binding and stage it happened in.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingFailure {
    pub directive: String,
    pub attribute: String,
    pub stage: Stage,
    pub error: HandlerError,
}

impl BindingFailure {
    fn new(binding: &ExecutableBinding, stage: Stage, error: HandlerError) -> Self {
        BindingFailure {
            directive: binding.directive.clone(),
            attribute: binding.model_attr_name().to_string(),
            stage,
            error,
        }
    }
}

impl fmt::Display for BindingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed for `{}` bound to `{}`: {}",
            self.stage, self.directive, self.attribute, self.error
        )
    }
}

impl From<BindingFailure> for BindError {
    fn from(failure: BindingFailure) -> Self {
        BindError::Handler {
            directive: failure.directive,
            attribute: failure.attribute,
            stage: failure.stage,
            source: failure.error,
        }
    }
}

/// Result of one bind pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSummary {
    pub executable_bindings_installed: usize,
    /// Bindings rejected by the view's filter or whose handler has no
    /// `update`.
    pub executable_bindings_skipped: usize,
    /// Failures collected under [`ErrorPolicy::Isolate`].
    pub failures: Vec<BindingFailure>,
}

/// Lifecycle operations of one installed binding.
pub struct LifecycleHooks {
    binding: Rc<ExecutableBinding>,
    subscription: RefCell<Option<Subscription>>,
}

impl LifecycleHooks {
    fn new(binding: Rc<ExecutableBinding>) -> Self {
        LifecycleHooks {
            binding,
            subscription: RefCell::new(None),
        }
    }

    pub fn binding(&self) -> &ExecutableBinding {
        &self.binding
    }

    fn init(&self) -> Result<(), HandlerError> {
        match &self.binding.handler.init {
            Some(init) => init.call(&self.binding),
            None => Ok(()),
        }
    }

    fn update(&self) -> Result<(), HandlerError> {
        run_update(&self.binding)
    }

    /// Re-run `update` on every change of the bound attribute.
    fn subscribe(&self) -> Result<(), HandlerError> {
        let weak: Weak<ExecutableBinding> = Rc::downgrade(&self.binding);
        let subscription = self
            .binding
            .resolved
            .model_events
            .subscribe(Rc::new(move |_: &ModelEvent| {
                if let Some(binding) = weak.upgrade() {
                    if let Err(e) = run_update(&binding) {
                        error!(
                            "update failed for `{}` bound to `{}`: {}",
                            binding.directive,
                            binding.model_attr_name(),
                            e
                        );
                    }
                }
            }));
        self.subscription.replace(Some(subscription));
        Ok(())
    }

    fn unsubscribe(&self) -> Result<(), HandlerError> {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            if !self.binding.resolved.model_events.unsubscribe(&subscription) {
                debug!(
                    "Listener for {} was already gone",
                    self.binding.resolved.model_events.event_name()
                );
            }
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), HandlerError> {
        match &self.binding.handler.remove {
            Some(remove) => remove.call(&self.binding),
            None => Ok(()),
        }
    }

    fn run(&self, stage: Stage) -> Result<(), HandlerError> {
        match stage {
            Stage::Init => self.init(),
            Stage::Update => self.update(),
            Stage::Subscribe => self.subscribe(),
            Stage::Unsubscribe => self.unsubscribe(),
            Stage::Remove => self.remove(),
        }
    }
}

fn run_update(binding: &ExecutableBinding) -> Result<(), HandlerError> {
    match &binding.handler.update {
        Some(update) => update.call(binding),
        None => Ok(()),
    }
}

/// Give the binding's accessors an error preview routed to its handler.
fn attach_error_preview(binding: ExecutableBinding) -> Rc<ExecutableBinding> {
    if !binding.handler.has_preview_error() {
        return Rc::new(binding);
    }
    Rc::new_cyclic(move |weak: &Weak<ExecutableBinding>| {
        let weak = weak.clone();
        let hook: ErrorPreviewHook = Rc::new(move |preview: &mut ErrorPreview| {
            if let Some(binding) = weak.upgrade() {
                if let Some(preview_error) = &binding.handler.preview_error {
                    preview_error.call(&binding, preview);
                }
            }
        });
        let mut binding = binding;
        binding.resolved.value_accessor = binding.resolved.value_accessor.clone().with_error_preview(hook);
        binding
    })
}

/// Owns the installed bindings of one view.
pub struct Binder {
    id: String,
    config: BinderConfig,
    hooks: Vec<LifecycleHooks>,
    bound: bool,
}

impl Binder {
    pub fn new(config: BinderConfig) -> Self {
        Binder {
            id: Uuid::new_v4().to_hyphenated().to_string(),
            config,
            hooks: Vec::new(),
            bound: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Installed bindings, in discovery order.
    pub fn bindings(&self) -> impl Iterator<Item = &ExecutableBinding> {
        self.hooks.iter().map(LifecycleHooks::binding)
    }

    pub fn bind<V>(&mut self, view: &V) -> Result<BindingSummary, BindError>
    where
        V: BindableView + ?Sized,
    {
        if self.bound {
            return Err(BindError::AlreadyBound);
        }
        self.bound = true;

        let registry = self.config.registry.clone();
        let mut summary = BindingSummary::default();

        for declaration in resolve_declarations(view, &self.config)? {
            for binding in extract_executable_bindings(&declaration, &registry) {
                if !view.preview_binding(&binding) {
                    debug!("View rejected binding {} on {}", binding.directive, binding.model_attr_name());
                    summary.executable_bindings_skipped += 1;
                    continue;
                }
                let binding = attach_error_preview(binding);
                if !binding.handler.has_update() {
                    debug!("Handler {} has no update", binding.directive);
                    summary.executable_bindings_skipped += 1;
                    continue;
                }
                debug!(
                    "Installing {} on <{}> for {}.{}",
                    binding.directive,
                    binding.element.tag_name(),
                    binding.context,
                    binding.model_attr_name()
                );
                self.hooks.push(LifecycleHooks::new(binding));
            }
        }
        summary.executable_bindings_installed = self.hooks.len();

        for stage in [Stage::Init, Stage::Update, Stage::Subscribe].iter() {
            self.run_stage(*stage, &mut summary.failures)?;
        }

        info!(
            "Binder {} installed {} binding(s), skipped {}, {} failure(s)",
            self.id,
            summary.executable_bindings_installed,
            summary.executable_bindings_skipped,
            summary.failures.len()
        );
        view.binding_summary(&summary);
        Ok(summary)
    }

    fn run_stage(&self, stage: Stage, failures: &mut Vec<BindingFailure>) -> Result<(), BindError> {
        for hooks in &self.hooks {
            if let Err(e) = hooks.run(stage) {
                let failure = BindingFailure::new(hooks.binding(), stage, e);
                match self.config.error_policy {
                    ErrorPolicy::Propagate => return Err(failure.into()),
                    ErrorPolicy::Isolate => {
                        warn!("Binder {}: {}", self.id, failure);
                        failures.push(failure);
                    }
                }
            }
        }
        Ok(())
    }

    /// Unsubscribe every binding, then run every `remove`. Every callback
    /// runs; failures are returned together at the end.
    pub fn unbind(self) -> Result<(), BindError> {
        let mut failures = Vec::new();
        for stage in [Stage::Unsubscribe, Stage::Remove].iter() {
            for hooks in &self.hooks {
                if let Err(e) = hooks.run(*stage) {
                    let failure = BindingFailure::new(hooks.binding(), *stage, e);
                    warn!("Binder {}: {}", self.id, failure);
                    failures.push(failure);
                }
            }
        }
        info!("Binder {} removed {} binding(s)", self.id, self.hooks.len());
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BindError::Unbind { failures })
        }
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("id", &self.id)
            .field("bound", &self.bound)
            .field("bindings", &self.hooks.len())
            .finish()
    }
}
