//! Coordinator tree nodes.
//!
//! A coordinator owns the navigation state for one subtree of the
//! application: its navigation stack, its modal slots, its deferred
//! dismissal registry, and its child coordinators. Coordinators compose
//! into a tree via [`present_child`](Coordinator::present_child) /
//! [`dismiss_child`](Coordinator::dismiss_child); the parent link is a
//! non-owning weak reference used only for identity comparison.
//!
//! All state lives behind one uncontended lock per node on a single
//! logical timeline. Locks are always released before user callbacks run,
//! so a callback may re-enter the same coordinator.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use waypoint_core::{Domain, NavError, NavResult, Presentation, RouterHandle};

use crate::modal::{DismissalAction, ModalState};
use crate::schedule::{Scheduler, Task, TaskHandle, SETTLE_DELAY};
use crate::stack::{NavStack, SeekOutcome};

/// Outcome of presenting a child coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The child was attached and started.
    Presented,
    /// A child of the same kind already exists; nothing changed.
    AlreadyPresented,
}

/// Timing for the push half of [`Coordinator::pop_and_push`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushTiming {
    /// Push in the same call, right after the pop.
    Immediate,
    /// Push after [`SETTLE_DELAY`], letting the pop transition settle.
    AfterSettleDelay,
}

/// One-shot setup hook run by [`Coordinator::start`].
pub type StartHook<D> = Box<dyn FnOnce(&Coordinator<D>) + Send>;

/// Snapshot of a coordinator's currently composed visible state.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinatorView<R, C> {
    /// Effective base content: the adopted child root when a child is
    /// presented, the coordinator's own root content otherwise.
    pub root: C,
    /// Routes pushed above the root, bottom first.
    pub stack: Vec<R>,
    /// Active sheet route, if any.
    pub sheet: Option<R>,
    /// Active full-cover route, if any.
    pub full_cover: Option<R>,
    /// Transient overlay content, if currently shown.
    pub overlay: Option<C>,
}

struct Inner<D: Domain> {
    router: RouterHandle<D>,
    root_route: D::Route,
    stack: NavStack<D::Route>,
    modal: ModalState<D::Route>,
    children: Vec<Coordinator<D>>,
    parent: Weak<Mutex<Inner<D>>>,
    // Set when a child's root (or a tab child's view) is adopted as this
    // coordinator's visible content; None means "render own root route".
    adopted_content: Option<D::Content>,
    overlay: Option<D::Content>,
    overlay_timer: Option<TaskHandle>,
    pending_push: Option<TaskHandle>,
    scheduler: Arc<dyn Scheduler>,
    on_start: Option<StartHook<D>>,
    started: bool,
}

impl<D: Domain> Drop for Inner<D> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_push.take() {
            handle.cancel();
        }
        if let Some(handle) = self.overlay_timer.take() {
            handle.cancel();
        }
    }
}

/// Cloneable handle to one coordinator tree node.
pub struct Coordinator<D: Domain> {
    kind: D::Kind,
    inner: Arc<Mutex<Inner<D>>>,
}

impl<D: Domain> Clone for Coordinator<D> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Domain> Coordinator<D> {
    /// New detached coordinator rooted at `root_route`.
    pub fn new(
        kind: D::Kind,
        root_route: D::Route,
        router: RouterHandle<D>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            kind,
            inner: Arc::new(Mutex::new(Inner {
                router,
                root_route,
                stack: NavStack::new(),
                modal: ModalState::new(),
                children: Vec::new(),
                parent: Weak::new(),
                adopted_content: None,
                overlay: None,
                overlay_timer: None,
                pending_push: None,
                scheduler,
                on_start: None,
                started: false,
            })),
        }
    }

    /// Install a one-shot hook run by the first [`start`](Self::start).
    #[must_use]
    pub fn with_on_start(self, hook: impl FnOnce(&Coordinator<D>) + Send + 'static) -> Self {
        self.inner.lock().on_start = Some(Box::new(hook));
        self
    }

    /// This coordinator's kind tag.
    #[must_use]
    pub fn kind(&self) -> D::Kind {
        self.kind
    }

    /// The entry route fixed at construction.
    #[must_use]
    pub fn root_route(&self) -> D::Route {
        self.inner.lock().root_route.clone()
    }

    /// Tail of the navigation stack, or the root route when the stack is
    /// empty.
    #[must_use]
    pub fn current_route(&self) -> D::Route {
        let inner = self.inner.lock();
        inner
            .stack
            .current()
            .cloned()
            .unwrap_or_else(|| inner.root_route.clone())
    }

    /// The pushed routes, bottom first.
    #[must_use]
    pub fn stack_routes(&self) -> Vec<D::Route> {
        self.inner.lock().stack.entries().to_vec()
    }

    #[must_use]
    pub fn sheet_route(&self) -> Option<D::Route> {
        self.inner.lock().modal.sheet_route().cloned()
    }

    #[must_use]
    pub fn full_cover_route(&self) -> Option<D::Route> {
        self.inner.lock().modal.full_cover_route().cloned()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.inner.lock().started
    }

    /// Run one-time setup. Subsequent calls are no-ops.
    pub fn start(&self) {
        let hook = {
            let mut inner = self.inner.lock();
            if inner.started {
                return;
            }
            inner.started = true;
            inner.on_start.take()
        };
        if let Some(hook) = hook {
            hook(self);
        }
    }

    // ─── Navigation stack ────────────────────────────────────

    /// Push `route` onto the stack.
    pub fn push(&self, route: D::Route) {
        trace!(route = ?route, "push");
        self.inner.lock().stack.push(route);
    }

    /// Pop the tail; no-op on an empty stack.
    pub fn pop(&self) {
        trace!("pop");
        self.inner.lock().stack.pop();
    }

    /// Remove all stack entries equal to `route`.
    pub fn pop_route(&self, route: &D::Route) {
        trace!(route = ?route, "pop route");
        self.inner.lock().stack.pop_route(route);
    }

    /// Clear the stack, exposing the root route.
    pub fn pop_to_root(&self) {
        trace!("pop to root");
        self.inner.lock().stack.pop_to_root();
    }

    /// Pop everything above the first occurrence of `route`, scanning from
    /// the top.
    pub fn pop_to(&self, route: &D::Route) {
        trace!(route = ?route, "pop to");
        self.inner.lock().stack.pop_to(route);
    }

    /// Pop to `route` when it is on the stack, push it otherwise.
    pub fn seek_out(&self, route: D::Route) -> SeekOutcome {
        trace!(route = ?route, "seek out");
        self.inner.lock().stack.seek_out(route)
    }

    /// Pop the tail now, then push `route` — immediately or after the
    /// settle delay, depending on `timing`. `on_push` runs right after the
    /// push actually occurs. No-op when the stack is empty.
    ///
    /// A pending delayed push is superseded (cancelled) by a newer
    /// `pop_and_push` or by [`navigate_to`](Self::navigate_to), and by
    /// coordinator teardown.
    pub fn pop_and_push(&self, route: D::Route, timing: PushTiming, on_push: Option<Task>) {
        let mut inner = self.inner.lock();
        if inner.stack.is_empty() {
            return;
        }
        if let Some(pending) = inner.pending_push.take() {
            pending.cancel();
        }
        inner.stack.pop();

        if timing == PushTiming::Immediate {
            inner.stack.push(route);
            drop(inner);
            if let Some(on_push) = on_push {
                on_push();
            }
            return;
        }

        debug!(route = ?route, "scheduling settle-delay push");
        // Scheduled while the state lock is held: the task itself takes
        // the lock, so the handle lands in `pending_push` before the task
        // can observe or clear the slot.
        let weak = Arc::downgrade(&self.inner);
        let scheduler = Arc::clone(&inner.scheduler);
        let handle = scheduler.schedule(
            SETTLE_DELAY,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                {
                    let mut inner = inner.lock();
                    inner.stack.push(route);
                    inner.pending_push = None;
                }
                if let Some(on_push) = on_push {
                    on_push();
                }
            }),
        );
        inner.pending_push = Some(handle);
    }

    // ─── Modal presentation ──────────────────────────────────

    /// Present a sheet for `route`, registering `on_dismiss` to fire when
    /// it is dismissed.
    pub fn present_sheet(&self, route: D::Route, on_dismiss: Option<DismissalAction>) {
        debug!(route = ?route, "present sheet");
        self.inner.lock().modal.present_sheet(route, on_dismiss);
    }

    /// Dismiss the active sheet, firing its registered dismissal action
    /// exactly once. No-op when no sheet is active.
    pub fn dismiss_sheet(&self) {
        let action = self.inner.lock().modal.dismiss_sheet();
        if let Some(action) = action {
            action();
        }
    }

    /// Present a full-cover modal for `route`.
    pub fn present_full_cover(&self, route: D::Route, on_dismiss: Option<DismissalAction>) {
        debug!(route = ?route, "present full cover");
        self.inner.lock().modal.present_full_cover(route, on_dismiss);
    }

    /// Dismiss the active full-cover modal, firing its registered
    /// dismissal action exactly once.
    pub fn dismiss_full_cover(&self) {
        let action = self.inner.lock().modal.dismiss_full_cover();
        if let Some(action) = action {
            action();
        }
    }

    pub(crate) fn clear_dismissal_registry(&self) {
        self.inner.lock().modal.clear_registry();
    }

    // ─── Child coordinators ──────────────────────────────────

    /// Attach and start `child`, adopting its root content as this
    /// coordinator's visible content.
    ///
    /// Idempotent per kind: when a child of the same kind already exists
    /// the call changes nothing and reports
    /// [`PresentOutcome::AlreadyPresented`]. Any active sheet or
    /// full-cover is dismissed first and the dismissal registry cleared.
    pub fn present_child(&self, child: &Coordinator<D>) -> PresentOutcome {
        {
            let inner = self.inner.lock();
            if inner.children.iter().any(|c| c.kind == child.kind) {
                debug!(kind = ?child.kind, "child of this kind is already presented");
                return PresentOutcome::AlreadyPresented;
            }
        }

        let (sheet_action, cover_action) = {
            let mut inner = self.inner.lock();
            let sheet = inner.modal.dismiss_sheet();
            let cover = inner.modal.dismiss_full_cover();
            inner.modal.clear_registry();
            (sheet, cover)
        };
        if let Some(action) = sheet_action {
            action();
        }
        if let Some(action) = cover_action {
            action();
        }

        child.inner.lock().parent = Arc::downgrade(&self.inner);
        self.inner.lock().children.push(child.clone());
        child.start();

        debug!(kind = ?child.kind, "presented child coordinator");
        match child.visible_content() {
            Ok(content) => self.inner.lock().adopted_content = Some(content),
            Err(err) => warn!(error = %err, "child root content unavailable"),
        }
        PresentOutcome::Presented
    }

    /// Detach `child`, restoring this coordinator's own root content.
    ///
    /// Refused with [`NavError::InvalidDismiss`] when `child`'s parent is
    /// identical to this coordinator's own parent — that shape means
    /// `child` is a structural root (or a sibling), and structural roots
    /// are never dismissible. Outstanding scheduled work on the child is
    /// cancelled.
    pub fn dismiss_child(&self, child: &Coordinator<D>) -> NavResult<(), D> {
        let same_parent = {
            let own = self.inner.lock().parent.clone();
            let other = child.inner.lock().parent.clone();
            Weak::ptr_eq(&own, &other)
        };
        if same_parent {
            warn!(kind = ?child.kind, "refusing to dismiss a structural root coordinator");
            return Err(NavError::InvalidDismiss);
        }

        child.cancel_scheduled();
        let mut inner = self.inner.lock();
        inner.adopted_content = None;
        inner
            .children
            .retain(|c| !Arc::ptr_eq(&c.inner, &child.inner));
        debug!(kind = ?child.kind, "dismissed child coordinator");
        Ok(())
    }

    /// Whether a child of `kind` is attached.
    #[must_use]
    pub fn has_child(&self, kind: D::Kind) -> bool {
        self.inner.lock().children.iter().any(|c| c.kind == kind)
    }

    /// The attached child of `kind`, if any.
    #[must_use]
    pub fn child(&self, kind: D::Kind) -> Option<Coordinator<D>> {
        self.inner
            .lock()
            .children
            .iter()
            .find(|c| c.kind == kind)
            .cloned()
    }

    #[must_use]
    pub fn child_at(&self, index: usize) -> Option<Coordinator<D>> {
        self.inner.lock().children.get(index).cloned()
    }

    #[must_use]
    pub fn first_child(&self) -> Option<Coordinator<D>> {
        self.inner.lock().children.first().cloned()
    }

    #[must_use]
    pub fn last_child(&self) -> Option<Coordinator<D>> {
        self.inner.lock().children.last().cloned()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.lock().children.len()
    }

    /// Attach `child` without presentation side effects; used for
    /// persistent tab children. Returns false when a child of the same
    /// kind already exists.
    pub(crate) fn attach_child(&self, child: &Coordinator<D>) -> bool {
        {
            let inner = self.inner.lock();
            if inner.children.iter().any(|c| c.kind == child.kind) {
                return false;
            }
        }
        child.inner.lock().parent = Arc::downgrade(&self.inner);
        self.inner.lock().children.push(child.clone());
        true
    }

    // ─── Graph-directed traversal ────────────────────────────

    /// Move to `target` along the router's canonical path.
    ///
    /// Backward moves (target at or before the current position) pop down
    /// to the target. Forward moves present every route strictly after the
    /// current position, each in its preferred method: stack routes are
    /// pushed; sheet and full-cover routes first dismiss both active
    /// modals, then present. A forward multi-hop traversal can therefore
    /// end with a modal on top of a partially built stack.
    ///
    /// When the current position or the target is not on the path, the
    /// call falls back to [`pop_to_root`](Self::pop_to_root) if `target`
    /// is the root route, and otherwise reports
    /// [`NavError::RouteUnreachable`] without changing any state. A
    /// pending settle-delay push is superseded only when the navigation
    /// actually transitions; a failed resolution leaves it scheduled.
    pub fn navigate_to(&self, target: D::Route) -> NavResult<(), D> {
        let path = self.inner.lock().router.path_to(&target);

        let current = self.current_route();
        let current_index = path.iter().position(|route| *route == current);
        let target_index = path.iter().position(|route| *route == target);
        let (current_index, target_index) = match (current_index, target_index) {
            (Some(current_index), Some(target_index)) => (current_index, target_index),
            _ => {
                if target == self.root_route() {
                    self.cancel_pending_push();
                    self.pop_to_root();
                    return Ok(());
                }
                warn!(route = ?target, "route unreachable from current position");
                return Err(NavError::RouteUnreachable(target));
            }
        };

        self.cancel_pending_push();
        if current_index >= target_index {
            // Traverse backward.
            self.pop_to(&target);
            return Ok(());
        }

        // Traverse forward over everything strictly after the current
        // position; the path ends at the target.
        for route in path.into_iter().skip(current_index + 1) {
            let method = {
                let inner = self.inner.lock();
                inner.router.presentation(&route)
            };
            match method {
                Presentation::Stack => self.push(route),
                Presentation::Sheet => {
                    self.dismiss_sheet();
                    self.dismiss_full_cover();
                    self.present_sheet(route, None);
                }
                Presentation::FullCover => {
                    self.dismiss_sheet();
                    self.dismiss_full_cover();
                    self.present_full_cover(route, None);
                }
            }
        }
        Ok(())
    }

    // ─── Visible content ─────────────────────────────────────

    /// The content currently at the base of this coordinator's hierarchy.
    pub fn visible_content(&self) -> NavResult<D::Content, D> {
        let inner = self.inner.lock();
        if let Some(content) = &inner.adopted_content {
            return Ok(content.clone());
        }
        inner.router.content_for(&inner.root_route)
    }

    /// Snapshot of the composed visible state: base content, stack, active
    /// modals, and transient overlay.
    pub fn coordinator_view(&self) -> NavResult<CoordinatorView<D::Route, D::Content>, D> {
        let root = self.visible_content()?;
        let inner = self.inner.lock();
        Ok(CoordinatorView {
            root,
            stack: inner.stack.entries().to_vec(),
            sheet: inner.modal.sheet_route().cloned(),
            full_cover: inner.modal.full_cover_route().cloned(),
            overlay: inner.overlay.clone(),
        })
    }

    /// Reset the visible content to this coordinator's own root route.
    /// (Tab coordinators rebase differently; see `TabCoordinator`.)
    pub fn rebase_root_view(&self) {
        self.inner.lock().adopted_content = None;
    }

    /// Rebase and clear the stack; used when switching scenes.
    pub fn rebase_and_pop_to_root(&self) {
        let mut inner = self.inner.lock();
        inner.adopted_content = None;
        inner.stack.pop_to_root();
    }

    pub(crate) fn adopt_content(&self, content: D::Content) {
        self.inner.lock().adopted_content = Some(content);
    }

    // ─── Transient overlay ───────────────────────────────────

    /// Show ephemeral content above everything else, auto-clearing after
    /// `duration`. Replaces (and cancels the timer of) any previous
    /// overlay.
    pub fn show_transient_overlay(&self, content: D::Content, duration: Duration) {
        let scheduler = Arc::clone(&self.inner.lock().scheduler);
        let weak = Arc::downgrade(&self.inner);
        let handle = scheduler.schedule(
            duration,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = inner.lock();
                    inner.overlay = None;
                    inner.overlay_timer = None;
                }
            }),
        );

        let mut inner = self.inner.lock();
        if let Some(previous) = inner.overlay_timer.take() {
            previous.cancel();
        }
        inner.overlay = Some(content);
        inner.overlay_timer = Some(handle);
    }

    /// Clear the overlay now and cancel its auto-clear timer.
    pub fn clear_transient_overlay(&self) {
        let mut inner = self.inner.lock();
        if let Some(timer) = inner.overlay_timer.take() {
            timer.cancel();
        }
        inner.overlay = None;
    }

    #[must_use]
    pub fn has_transient_overlay(&self) -> bool {
        self.inner.lock().overlay.is_some()
    }

    fn cancel_pending_push(&self) {
        if let Some(pending) = self.inner.lock().pending_push.take() {
            pending.cancel();
        }
    }

    fn cancel_scheduled(&self) {
        let mut inner = self.inner.lock();
        if let Some(pending) = inner.pending_push.take() {
            pending.cancel();
        }
        if let Some(timer) = inner.overlay_timer.take() {
            timer.cancel();
        }
    }
}
