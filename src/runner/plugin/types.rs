//! Core types for binding handler plugins.

use crate::runner::binding::accessor::ErrorPreview;
use crate::runner::binding::extract::ExecutableBinding;
use crate::runner::ds::error::HandlerError;

/// Function signature for compiled-in lifecycle operations.
pub type NativeLifecycleFn = fn(binding: &ExecutableBinding) -> Result<(), HandlerError>;

/// Function signature for compiled-in error previews.
pub type NativePreviewFn = fn(binding: &ExecutableBinding, preview: &mut ErrorPreview);

/// A lifecycle operation - either compiled-in or plugin-provided.
pub enum LifecycleFn {
    /// Direct function pointer.
    Native(NativeLifecycleFn),

    /// Plugin-provided closure.
    Plugin(Box<dyn Fn(&ExecutableBinding) -> Result<(), HandlerError>>),
}

impl LifecycleFn {
    pub fn call(&self, binding: &ExecutableBinding) -> Result<(), HandlerError> {
        match self {
            LifecycleFn::Native(f) => f(binding),
            LifecycleFn::Plugin(f) => f(binding),
        }
    }
}

/// An error preview - either compiled-in or plugin-provided.
pub enum PreviewFn {
    Native(NativePreviewFn),
    Plugin(Box<dyn Fn(&ExecutableBinding, &mut ErrorPreview)>),
}

impl PreviewFn {
    pub fn call(&self, binding: &ExecutableBinding, preview: &mut ErrorPreview) {
        match self {
            PreviewFn::Native(f) => f(binding, preview),
            PreviewFn::Plugin(f) => f(binding, preview),
        }
    }
}

/// The implementation behind one directive name.
///
/// Every capability is optional. A handler without `update` never gets
/// installed; bindings to it are counted as skipped.
#[derive(Default)]
pub struct BindingHandler {
    /// Sets up DOM-to-model listening.
    pub init: Option<LifecycleFn>,

    /// Pushes the current model value into the DOM.
    pub update: Option<LifecycleFn>,

    /// Undoes whatever `init` set up.
    pub remove: Option<LifecycleFn>,

    /// Sees validation failures of writes made through this binding.
    pub preview_error: Option<PreviewFn>,
}

impl BindingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init(mut self, init: NativeLifecycleFn) -> Self {
        self.init = Some(LifecycleFn::Native(init));
        self
    }

    pub fn with_update(mut self, update: NativeLifecycleFn) -> Self {
        self.update = Some(LifecycleFn::Native(update));
        self
    }

    pub fn with_remove(mut self, remove: NativeLifecycleFn) -> Self {
        self.remove = Some(LifecycleFn::Native(remove));
        self
    }

    pub fn with_preview_error(mut self, preview: NativePreviewFn) -> Self {
        self.preview_error = Some(PreviewFn::Native(preview));
        self
    }

    pub fn on_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&ExecutableBinding) -> Result<(), HandlerError> + 'static,
    {
        self.init = Some(LifecycleFn::Plugin(Box::new(init)));
        self
    }

    pub fn on_update<F>(mut self, update: F) -> Self
    where
        F: Fn(&ExecutableBinding) -> Result<(), HandlerError> + 'static,
    {
        self.update = Some(LifecycleFn::Plugin(Box::new(update)));
        self
    }

    pub fn on_remove<F>(mut self, remove: F) -> Self
    where
        F: Fn(&ExecutableBinding) -> Result<(), HandlerError> + 'static,
    {
        self.remove = Some(LifecycleFn::Plugin(Box::new(remove)));
        self
    }

    pub fn on_preview_error<F>(mut self, preview: F) -> Self
    where
        F: Fn(&ExecutableBinding, &mut ErrorPreview) + 'static,
    {
        self.preview_error = Some(PreviewFn::Plugin(Box::new(preview)));
        self
    }

    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }

    pub fn has_update(&self) -> bool {
        self.update.is_some()
    }

    pub fn has_remove(&self) -> bool {
        self.remove.is_some()
    }

    pub fn has_preview_error(&self) -> bool {
        self.preview_error.is_some()
    }
}
