//! Navigation error conditions.
//!
//! All of these are detected and recovered locally by the coordinator that
//! reports them; none are fatal, and the reporting operation leaves all
//! navigation state untouched.

use std::fmt;

use thiserror::Error;

use crate::router::Domain;

/// Result alias bound to a navigation domain's route and kind types.
pub type NavResult<T, D> =
    Result<T, NavError<<D as Domain>::Route, <D as Domain>::Kind>>;

/// Conditions a coordinator detects and recovers from locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError<R: fmt::Debug, K: fmt::Debug> {
    /// The target route cannot be reached from the current position via the
    /// router's canonical path.
    #[error("route {0:?} is unreachable from the current position")]
    RouteUnreachable(R),

    /// The route is not part of this router's graph.
    #[error("route {0:?} is not part of this router's graph")]
    UnknownRoute(R),

    /// A child coordinator of this kind is already presented.
    #[error("a child coordinator of kind {0:?} is already presented")]
    DuplicateChild(K),

    /// The coordinator is a structural root (or shares the caller's own
    /// parent) and cannot be dismissed.
    #[error("refusing to dismiss a structural root coordinator")]
    InvalidDismiss,
}
