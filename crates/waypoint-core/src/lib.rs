//! Waypoint Core - Navigation Contracts
//!
//! Pure contracts shared by every Waypoint coordinator:
//!
//! - [`Route`]: opaque, equatable identifier for a navigable destination
//! - [`Presentation`]: how a route prefers to be shown (stack push, modal
//!   sheet, full-cover modal)
//! - [`Domain`]: binds an application's route set, renderable content type,
//!   and coordinator kind tags into one navigation universe
//! - [`Router`]: per-domain service resolving canonical paths, presentation
//!   methods, and content
//! - [`NavError`]: the locally-recovered navigation error conditions
//!
//! This crate holds no mutable state and performs no scheduling; the
//! stateful machinery lives in `waypoint-app`.

#![forbid(unsafe_code)]

pub mod errors;
pub mod route;
pub mod router;

pub use errors::{NavError, NavResult};
pub use route::{Presentation, Route};
pub use router::{Domain, Router, RouterHandle};
