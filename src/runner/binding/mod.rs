//! The binding engine: declaration resolution, value accessors, executable
//! binding extraction and the lifecycle orchestrating binder.

pub mod accessor;
pub mod binder;
pub mod declaration;
pub mod extract;
pub mod view;

pub use accessor::{AccessorFactory, AccessorOptions, ErrorPreview, ModelEvents, ResolvedBinding, ValueAccessor};
pub use binder::{Binder, BindingFailure, BindingSummary, Stage};
pub use declaration::BindingDeclaration;
pub use extract::{AllBindings, ExecutableBinding};
pub use view::{BindableView, UnobtrusiveBindings, View};
