//! Route identity and preferred presentation methods.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Identifier for a navigable destination.
///
/// Routes are opaque, equatable, hashable values drawn from a closed
/// per-application enumeration; they carry no mutable state of their own.
/// The blanket implementation covers any suitable enum, so applications
/// only derive the standard traits.
pub trait Route: Clone + Eq + Hash + fmt::Debug + Send + 'static {}

impl<T> Route for T where T: Clone + Eq + Hash + fmt::Debug + Send + 'static {}

/// How a route prefers to be presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presentation {
    /// Pushed onto the navigation stack.
    #[default]
    Stack,
    /// Presented as a modal sheet above the stack.
    Sheet,
    /// Presented as a full-cover modal above the stack.
    FullCover,
}

impl Presentation {
    /// Whether this method presents outside the push/pop stack.
    #[must_use]
    pub fn is_modal(self) -> bool {
        matches!(self, Self::Sheet | Self::FullCover)
    }
}
