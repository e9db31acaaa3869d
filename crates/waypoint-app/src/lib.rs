//! Waypoint App - Hierarchical Navigation Orchestrator
//!
//! A tree of cooperating coordinators that decide, for an application
//! built from discrete screens, what is currently visible, how it got
//! there, and how to move between arbitrary screens while respecting each
//! screen's preferred presentation method.
//!
//! # Pieces
//!
//! - [`NavStack`]: the navigation-stack state machine (push / pop /
//!   pop-to / seek-out)
//! - [`ModalState`]: sheet and full-cover slots plus the
//!   deferred-dismissal registry
//! - [`Scheduler`] / [`TaskHandle`]: cancelable scheduled continuations
//!   (settle-delay pushes, overlay expiry)
//! - [`Coordinator`]: the tree node tying the above together, with
//!   graph-directed [`navigate_to`](Coordinator::navigate_to)
//! - [`TabCoordinator`]: the tab variant with persistently resident
//!   children
//!
//! The contracts (routes, routers, domains, errors) live in
//! [`waypoint_core`] and are re-exported here for convenience.
//!
//! This crate renders nothing and performs no I/O; it computes which
//! logical screen state is active and sequences the transitions to reach
//! it on a single logical timeline.

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod modal;
pub mod schedule;
pub mod stack;
pub mod tabs;

pub use coordinator::{Coordinator, CoordinatorView, PresentOutcome, PushTiming, StartHook};
pub use modal::{DismissalAction, ModalState};
pub use schedule::{ManualScheduler, Scheduler, Task, TaskHandle, TokioScheduler, SETTLE_DELAY};
pub use stack::{NavStack, SeekOutcome};
pub use tabs::{TabCoordinator, TabFactory, TabLayout};

pub use waypoint_core::{Domain, NavError, NavResult, Presentation, Route, Router, RouterHandle};
