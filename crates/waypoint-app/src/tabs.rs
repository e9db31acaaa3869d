//! Tab coordinator: a fixed, persistently resident set of children.
//!
//! A tab coordinator declares its tabs as a table mapping tab identifier
//! (a route) to a coordinator factory, so adding a tab is a data change.
//! Tab children are created once — lazily on first access, or eagerly via
//! [`populate`](TabCoordinator::populate) — and are never detached for the
//! lifetime of the tab coordinator; switching tabs only changes which
//! child's state is visible, preserving every other tab's own stack and
//! modal state.

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use waypoint_core::{Domain, NavError, NavResult};

use crate::coordinator::{Coordinator, CoordinatorView};

/// Builds a tab's coordinator on first access.
pub type TabFactory<D> = Box<dyn Fn() -> Coordinator<D> + Send>;

/// Declared tab table, in display order.
pub struct TabLayout<D: Domain> {
    factories: IndexMap<D::Route, TabFactory<D>>,
}

impl<D: Domain> Default for TabLayout<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Domain> TabLayout<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Declare a tab; later declarations with the same identifier replace
    /// earlier ones.
    #[must_use]
    pub fn tab(
        mut self,
        id: D::Route,
        factory: impl Fn() -> Coordinator<D> + Send + 'static,
    ) -> Self {
        self.factories.insert(id, Box::new(factory));
        self
    }
}

struct TabState<D: Domain> {
    factories: IndexMap<D::Route, TabFactory<D>>,
    resident: IndexMap<D::Route, Coordinator<D>>,
    current_tab: Option<D::Route>,
}

/// Coordinator variant with one persistent child per declared tab.
pub struct TabCoordinator<D: Domain> {
    base: Coordinator<D>,
    tabs: Mutex<TabState<D>>,
}

impl<D: Domain> TabCoordinator<D> {
    /// Wrap `base` with the declared tab table. No children are created
    /// yet; call [`populate`](Self::populate) or touch a tab.
    pub fn new(base: Coordinator<D>, layout: TabLayout<D>) -> Self {
        Self {
            base,
            tabs: Mutex::new(TabState {
                factories: layout.factories,
                resident: IndexMap::new(),
                current_tab: None,
            }),
        }
    }

    /// The underlying coordinator node.
    #[must_use]
    pub fn base(&self) -> &Coordinator<D> {
        &self.base
    }

    /// Declared tab identifiers, in declaration order.
    #[must_use]
    pub fn tab_ids(&self) -> Vec<D::Route> {
        self.tabs.lock().factories.keys().cloned().collect()
    }

    /// The currently selected tab, if one has been switched to.
    #[must_use]
    pub fn current_tab(&self) -> Option<D::Route> {
        self.tabs.lock().current_tab.clone()
    }

    /// Whether `tab` is declared in the layout.
    #[must_use]
    pub fn has_tab(&self, tab: &D::Route) -> bool {
        self.tabs.lock().factories.contains_key(tab)
    }

    /// Whether `tab`'s child has been created.
    #[must_use]
    pub fn is_resident(&self, tab: &D::Route) -> bool {
        self.tabs.lock().resident.contains_key(tab)
    }

    /// The coordinator for `tab`, creating and attaching it on first
    /// access. `None` when `tab` is not declared.
    pub fn tab_coordinator(&self, tab: &D::Route) -> Option<Coordinator<D>> {
        let mut state = self.tabs.lock();
        if let Some(child) = state.resident.get(tab) {
            return Some(child.clone());
        }
        let factory = state.factories.get(tab)?;
        let child = factory();
        debug!(tab = ?tab, "created resident tab child");
        self.base.attach_child(&child);
        state.resident.insert(tab.clone(), child.clone());
        Some(child)
    }

    /// Eagerly create every declared tab child.
    pub fn populate(&self) {
        for tab in self.tab_ids() {
            let _ = self.tab_coordinator(&tab);
        }
    }

    /// Make `tab`'s child the visible one.
    ///
    /// Requires the child to already be resident. Starts the child if
    /// needed and resolves its visible content; only then dismisses any
    /// active shell modal, clears the dismissal registry, and adopts the
    /// content, so the shell's modal state and selection survive a failed
    /// resolution intact. The previously selected tab keeps its entire
    /// navigation state: its child is never detached.
    pub fn switch_to(&self, tab: &D::Route) -> NavResult<(), D> {
        let child = self.tabs.lock().resident.get(tab).cloned();
        let Some(child) = child else {
            warn!(tab = ?tab, "switch target is not a resident tab child");
            return Err(NavError::UnknownRoute(tab.clone()));
        };

        child.start();
        let content = child.visible_content()?;

        self.base.dismiss_sheet();
        self.base.dismiss_full_cover();
        self.base.clear_dismissal_registry();
        self.base.adopt_content(content);
        self.tabs.lock().current_tab = Some(tab.clone());
        debug!(tab = ?tab, "switched tab");
        Ok(())
    }

    /// Composed view of the currently selected tab's child.
    pub fn active_tab_view(&self) -> Option<NavResult<CoordinatorView<D::Route, D::Content>, D>> {
        let child = {
            let state = self.tabs.lock();
            let tab = state.current_tab.clone()?;
            state.resident.get(&tab).cloned()?
        };
        Some(child.coordinator_view())
    }

    /// Tab coordinators rebase by navigating to their root route rather
    /// than resetting content directly; the asymmetry with
    /// [`Coordinator::rebase_root_view`] is deliberate.
    pub fn rebase_root_view(&self) -> NavResult<(), D> {
        self.base.navigate_to(self.base.root_route())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use waypoint_core::{Presentation, Router};

    use crate::schedule::ManualScheduler;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum TabRoute {
        Main,
        Feed,
        FeedDetail,
        Search,
        Library,
        Drafts,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum TabKind {
        Shell,
        Feed,
        Search,
        Library,
        Drafts,
    }

    struct TabDomain;

    impl Domain for TabDomain {
        type Route = TabRoute;
        type Content = &'static str;
        type Kind = TabKind;
    }

    struct TabRouter;

    impl Router<TabDomain> for TabRouter {
        fn path_to(&self, route: &TabRoute) -> Vec<TabRoute> {
            match route {
                TabRoute::Main => vec![TabRoute::Main],
                TabRoute::Feed => vec![TabRoute::Feed],
                TabRoute::FeedDetail => vec![TabRoute::Feed, TabRoute::FeedDetail],
                TabRoute::Search => vec![TabRoute::Search],
                TabRoute::Library => vec![TabRoute::Library],
                TabRoute::Drafts => vec![TabRoute::Drafts],
            }
        }

        fn presentation(&self, _route: &TabRoute) -> Presentation {
            Presentation::Stack
        }

        fn content_for(&self, route: &TabRoute) -> NavResult<&'static str, TabDomain> {
            let mut contents = HashMap::new();
            contents.insert(TabRoute::Main, "main");
            contents.insert(TabRoute::Feed, "feed");
            contents.insert(TabRoute::FeedDetail, "feed detail");
            contents.insert(TabRoute::Search, "search");
            contents.insert(TabRoute::Library, "library");
            contents
                .get(route)
                .copied()
                .ok_or(NavError::UnknownRoute(*route))
        }
    }

    fn tab_coordinator(scheduler: &ManualScheduler) -> TabCoordinator<TabDomain> {
        let router: Arc<dyn Router<TabDomain>> = Arc::new(TabRouter);
        let sched: Arc<dyn crate::schedule::Scheduler> = Arc::new(scheduler.clone());
        let base = Coordinator::new(
            TabKind::Shell,
            TabRoute::Main,
            Arc::clone(&router),
            Arc::clone(&sched),
        );

        let layout = TabLayout::new()
            .tab(TabRoute::Feed, {
                let router = Arc::clone(&router);
                let sched = Arc::clone(&sched);
                move || {
                    Coordinator::new(
                        TabKind::Feed,
                        TabRoute::Feed,
                        Arc::clone(&router),
                        Arc::clone(&sched),
                    )
                }
            })
            .tab(TabRoute::Search, {
                let router = Arc::clone(&router);
                let sched = Arc::clone(&sched);
                move || {
                    Coordinator::new(
                        TabKind::Search,
                        TabRoute::Search,
                        Arc::clone(&router),
                        Arc::clone(&sched),
                    )
                }
            })
            .tab(TabRoute::Library, {
                let router = Arc::clone(&router);
                let sched = Arc::clone(&sched);
                move || {
                    Coordinator::new(
                        TabKind::Library,
                        TabRoute::Library,
                        Arc::clone(&router),
                        Arc::clone(&sched),
                    )
                }
            });

        TabCoordinator::new(base, layout)
    }

    #[test]
    fn test_populate_creates_every_tab_once() {
        let scheduler = ManualScheduler::new();
        let tabs = tab_coordinator(&scheduler);
        assert!(!tabs.is_resident(&TabRoute::Feed));

        tabs.populate();
        assert!(tabs.is_resident(&TabRoute::Feed));
        assert!(tabs.is_resident(&TabRoute::Search));
        assert!(tabs.is_resident(&TabRoute::Library));
        assert_eq!(tabs.base().child_count(), 3);

        // populate again: still one child per tab
        tabs.populate();
        assert_eq!(tabs.base().child_count(), 3);
    }

    #[test]
    fn test_lazy_creation_caches() {
        let scheduler = ManualScheduler::new();
        let tabs = tab_coordinator(&scheduler);

        let first = tabs.tab_coordinator(&TabRoute::Feed).unwrap();
        let second = tabs.tab_coordinator(&TabRoute::Feed).unwrap();
        first.push(TabRoute::FeedDetail);
        // same underlying node, so the push is visible through both handles
        assert_eq!(second.stack_routes(), vec![TabRoute::FeedDetail]);
        assert_eq!(tabs.base().child_count(), 1);
    }

    #[test]
    fn test_switch_requires_resident_child() {
        let scheduler = ManualScheduler::new();
        let tabs = tab_coordinator(&scheduler);
        assert_matches!(
            tabs.switch_to(&TabRoute::Feed),
            Err(NavError::UnknownRoute(TabRoute::Feed))
        );

        tabs.populate();
        tabs.switch_to(&TabRoute::Feed).unwrap();
        assert_eq!(tabs.current_tab(), Some(TabRoute::Feed));
        assert_eq!(tabs.base().visible_content().unwrap(), "feed");
    }

    #[test]
    fn test_switch_preserves_previous_tab_state() {
        let scheduler = ManualScheduler::new();
        let tabs = tab_coordinator(&scheduler);
        tabs.populate();

        tabs.switch_to(&TabRoute::Feed).unwrap();
        let feed = tabs.tab_coordinator(&TabRoute::Feed).unwrap();
        feed.push(TabRoute::FeedDetail);
        feed.present_sheet(TabRoute::Library, None);

        tabs.switch_to(&TabRoute::Search).unwrap();
        assert_eq!(tabs.current_tab(), Some(TabRoute::Search));

        // the feed tab's own stack and modal state survive untouched
        assert_eq!(feed.stack_routes(), vec![TabRoute::FeedDetail]);
        assert_eq!(feed.sheet_route(), Some(TabRoute::Library));

        tabs.switch_to(&TabRoute::Feed).unwrap();
        let view = tabs.active_tab_view().unwrap().unwrap();
        assert_eq!(view.stack, vec![TabRoute::FeedDetail]);
        assert_eq!(view.sheet, Some(TabRoute::Library));
    }

    #[test]
    fn test_failed_switch_leaves_shell_state_untouched() {
        let scheduler = ManualScheduler::new();
        let router: Arc<dyn Router<TabDomain>> = Arc::new(TabRouter);
        let sched: Arc<dyn crate::schedule::Scheduler> = Arc::new(scheduler.clone());
        let base = Coordinator::new(
            TabKind::Shell,
            TabRoute::Main,
            Arc::clone(&router),
            Arc::clone(&sched),
        );
        let layout = TabLayout::new()
            .tab(TabRoute::Feed, {
                let router = Arc::clone(&router);
                let sched = Arc::clone(&sched);
                move || {
                    Coordinator::new(
                        TabKind::Feed,
                        TabRoute::Feed,
                        Arc::clone(&router),
                        Arc::clone(&sched),
                    )
                }
            })
            // the drafts tab's root content does not resolve
            .tab(TabRoute::Drafts, {
                let router = Arc::clone(&router);
                let sched = Arc::clone(&sched);
                move || {
                    Coordinator::new(
                        TabKind::Drafts,
                        TabRoute::Drafts,
                        Arc::clone(&router),
                        Arc::clone(&sched),
                    )
                }
            });
        let tabs = TabCoordinator::new(base, layout);
        tabs.populate();
        tabs.switch_to(&TabRoute::Feed).unwrap();

        tabs.base().present_sheet(TabRoute::Library, None);
        assert_matches!(
            tabs.switch_to(&TabRoute::Drafts),
            Err(NavError::UnknownRoute(TabRoute::Drafts))
        );

        // the shell's sheet, selection, and adopted content all survive
        assert_eq!(tabs.base().sheet_route(), Some(TabRoute::Library));
        assert_eq!(tabs.current_tab(), Some(TabRoute::Feed));
        assert_eq!(tabs.base().visible_content().unwrap(), "feed");
    }

    #[test]
    fn test_switch_dismisses_shell_modals() {
        let scheduler = ManualScheduler::new();
        let tabs = tab_coordinator(&scheduler);
        tabs.populate();

        tabs.base().present_sheet(TabRoute::Library, None);
        tabs.switch_to(&TabRoute::Search).unwrap();
        assert_eq!(tabs.base().sheet_route(), None);
    }

    #[test]
    fn test_tab_rebase_navigates_to_root() {
        let scheduler = ManualScheduler::new();
        let tabs = tab_coordinator(&scheduler);
        tabs.populate();
        tabs.base().push(TabRoute::Main);
        tabs.base().push(TabRoute::Search);

        // rebasing routes through navigate_to(Main), which lands on the
        // pop-to-root fallback here
        tabs.rebase_root_view().unwrap();
        assert_eq!(tabs.base().current_route(), TabRoute::Main);
    }
}
