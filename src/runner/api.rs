//! Entry points for binding views.

use tracing::{debug, warn};

use super::binding::binder::{Binder, BindingSummary};
use super::binding::view::BindableView;
use super::ds::error::BindError;

pub use super::ds::symbol::model_ref;

/// Resolve, extract and install every binding of `view`.
///
/// A binder already in the slot is torn down first; its teardown failures
/// are logged and do not stop the new bind. The new binder is stored in the
/// view's slot even when a handler fails, so a later [`unbind`] still tears
/// down whatever got installed.
pub fn bind<V>(view: &mut V) -> Result<BindingSummary, BindError>
where
    V: BindableView + ?Sized,
{
    if let Some(previous) = view.binder_slot().take() {
        debug!("Tearing down binder {} before rebinding", previous.id());
        if let Err(e) = previous.unbind() {
            warn!("Teardown before rebinding: {}", e);
        }
    }
    let mut binder = Binder::new(view.binder_config());
    let result = binder.bind(&*view);
    *view.binder_slot() = Some(binder);
    result
}

/// Tear down the binder stored on `view`. Does nothing when there is none.
pub fn unbind<V>(view: &mut V) -> Result<(), BindError>
where
    V: BindableView + ?Sized,
{
    match view.binder_slot().take() {
        Some(binder) => binder.unbind(),
        None => Ok(()),
    }
}
