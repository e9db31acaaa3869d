//! Modal presentation state machine and deferred-dismissal registry.
//!
//! At most one sheet and one full-cover route can be active. The two slots
//! are independent options, but the protocol keeps them effectively
//! mutually exclusive: callers dismiss both before presenting a new one,
//! and presenting a new child coordinator clears both.
//!
//! A dismissal action registered at presentation time fires exactly once
//! when its route's modal presentation is dismissed, then leaves the
//! registry.

use std::collections::HashMap;
use std::fmt;

use waypoint_core::Route;

/// Action to run when a modal presentation is dismissed.
pub type DismissalAction = Box<dyn FnOnce() + Send>;

/// Sheet and full-cover slots plus the deferred-dismissal registry.
pub struct ModalState<R: Route> {
    sheet: Option<R>,
    full_cover: Option<R>,
    deferred: HashMap<R, DismissalAction>,
}

impl<R: Route> Default for ModalState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Route> ModalState<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheet: None,
            full_cover: None,
            deferred: HashMap::new(),
        }
    }

    /// The active sheet route, if any.
    #[must_use]
    pub fn sheet_route(&self) -> Option<&R> {
        self.sheet.as_ref()
    }

    /// The active full-cover route, if any.
    #[must_use]
    pub fn full_cover_route(&self) -> Option<&R> {
        self.full_cover.as_ref()
    }

    /// Whether a dismissal action is registered for `route`.
    #[must_use]
    pub fn has_deferred(&self, route: &R) -> bool {
        self.deferred.contains_key(route)
    }

    /// Activate a sheet for `route`.
    ///
    /// Clears the entire registry first, then registers `on_dismiss` for
    /// `route`. Whole-registry clearing is preserved source behavior; see
    /// DESIGN.md for the recorded decision.
    pub fn present_sheet(&mut self, route: R, on_dismiss: Option<DismissalAction>) {
        self.clear_registry();
        if let Some(action) = on_dismiss {
            self.deferred.insert(route.clone(), action);
        }
        self.sheet = Some(route);
    }

    /// Deactivate the sheet, returning the registered dismissal action for
    /// the route that was active. The caller invokes it exactly once,
    /// outside any state lock.
    pub fn dismiss_sheet(&mut self) -> Option<DismissalAction> {
        let route = self.sheet.take()?;
        self.deferred.remove(&route)
    }

    /// Activate a full-cover modal for `route`; registry handling matches
    /// [`present_sheet`](Self::present_sheet).
    pub fn present_full_cover(&mut self, route: R, on_dismiss: Option<DismissalAction>) {
        self.clear_registry();
        if let Some(action) = on_dismiss {
            self.deferred.insert(route.clone(), action);
        }
        self.full_cover = Some(route);
    }

    /// Deactivate the full-cover modal; see
    /// [`dismiss_sheet`](Self::dismiss_sheet).
    pub fn dismiss_full_cover(&mut self) -> Option<DismissalAction> {
        let route = self.full_cover.take()?;
        self.deferred.remove(&route)
    }

    /// Drop every registered dismissal action without firing it.
    pub fn clear_registry(&mut self) {
        self.deferred.clear();
    }
}

impl<R: Route> fmt::Debug for ModalState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalState")
            .field("sheet", &self.sheet)
            .field("full_cover", &self.full_cover)
            .field("deferred", &self.deferred.keys().collect::<Vec<_>>())
            .finish()
    }
}
