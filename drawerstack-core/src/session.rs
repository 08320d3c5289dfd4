//! Session-lifetime drawer controller for the UI thread.
//!
//! One controller per thread, installed explicitly and reached only through
//! `with`. All mutation goes through the controller's methods; there is no
//! other global state.

use std::any::Any;
use std::cell::RefCell;

use crate::controller::DrawerController;
use crate::error::DrawerError;
use crate::mount::DrawerContent;

thread_local! {
    static SESSION: RefCell<Option<Box<dyn Any>>> = const { RefCell::new(None) };
}

/// Install the controller for this thread, replacing any previous one.
pub fn install<C>(controller: DrawerController<C>)
where
    C: ?Sized + DrawerContent + 'static,
{
    SESSION.with(|slot| {
        let previous = slot.borrow_mut().replace(Box::new(controller));
        if previous.is_some() {
            tracing::debug!("drawer session replaced");
        }
    });
}

/// Remove this thread's controller, handing it back if it had content type `C`.
pub fn uninstall<C>() -> Option<DrawerController<C>>
where
    C: ?Sized + DrawerContent + 'static,
{
    SESSION.with(|slot| {
        let boxed = slot.borrow_mut().take()?;
        boxed.downcast::<DrawerController<C>>().ok().map(|b| *b)
    })
}

pub fn is_installed() -> bool {
    SESSION.with(|slot| slot.try_borrow().map_or(true, |s| s.is_some()))
}

/// Run `f` against the installed controller.
///
/// Fails with `SessionNotInstalled` when nothing (or a controller for another
/// content type) is installed, and with `SessionBusy` when called from inside
/// another `with` on the same thread.
pub fn with<C, R>(f: impl FnOnce(&mut DrawerController<C>) -> R) -> Result<R, DrawerError>
where
    C: ?Sized + DrawerContent + 'static,
{
    SESSION.with(|slot| {
        let mut guard = slot.try_borrow_mut().map_err(|_| DrawerError::SessionBusy)?;
        let controller = guard
            .as_mut()
            .and_then(|b| b.downcast_mut::<DrawerController<C>>())
            .ok_or(DrawerError::SessionNotInstalled)?;
        Ok(f(controller))
    })
}
