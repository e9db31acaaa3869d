//! Router contract and the domain binding trait.

use std::fmt;
use std::sync::Arc;

use crate::errors::NavResult;
use crate::route::{Presentation, Route};

/// Binds an application's navigation universe.
///
/// A domain names the closed route set, the opaque renderable content a
/// router resolves per route, and the closed set of coordinator kind tags.
/// Sibling-uniqueness inside the coordinator tree is checked by `Kind` tag
/// equality rather than runtime type identity.
pub trait Domain: 'static {
    /// Destination identifiers for this domain.
    type Route: Route;
    /// Opaque renderable content; this crate never inspects it.
    type Content: Clone + Send;
    /// Coordinator kind tag, one variant per concrete coordinator kind.
    type Kind: Copy + Eq + fmt::Debug + Send + 'static;
}

/// Per-domain navigation service.
///
/// Routers are stateless; one instance serves one navigation domain. The
/// canonical path reflects the application's intended navigation graph,
/// which must be a tree rooted at the domain's structural root (cycles are
/// not supported by the traversal algorithm).
pub trait Router<D: Domain>: Send + Sync {
    /// Canonical path from the domain's structural root to `route`,
    /// inclusive of both ends. Empty when `route` is not part of this
    /// router's graph.
    fn path_to(&self, route: &D::Route) -> Vec<D::Route>;

    /// Preferred presentation method for `route`; stacked push unless
    /// overridden.
    fn presentation(&self, _route: &D::Route) -> Presentation {
        Presentation::Stack
    }

    /// Renderable content for `route`.
    ///
    /// Returns [`NavError::UnknownRoute`](crate::NavError::UnknownRoute)
    /// when the route is outside this router's graph; there is no
    /// unchecked coercion anywhere on this path.
    fn content_for(&self, route: &D::Route) -> NavResult<D::Content, D>;
}

/// Shared router handle, cloned into every coordinator of a domain.
pub type RouterHandle<D> = Arc<dyn Router<D>>;
