//! Navigation stack state machine.
//!
//! An ordered, tail-mutable sequence of routes representing the screens
//! currently pushed above a coordinator's root screen. The structure is
//! pure data; completion sequencing and the settle-delay variant live on
//! the coordinator.

use serde::{Deserialize, Serialize};

use waypoint_core::Route;

/// Which branch [`NavStack::seek_out`] took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeekOutcome {
    /// The route was already on the stack; everything above it was popped.
    PoppedTo,
    /// The route was absent and has been pushed onto the tail.
    Pushed,
}

/// Routes currently pushed above a coordinator's root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavStack<R: Route> {
    entries: Vec<R>,
}

impl<R: Route> Default for NavStack<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Route> NavStack<R> {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The pushed routes, bottom first.
    #[must_use]
    pub fn entries(&self) -> &[R] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, route: &R) -> bool {
        self.entries.contains(route)
    }

    /// The route at the tail, if any.
    #[must_use]
    pub fn current(&self) -> Option<&R> {
        self.entries.last()
    }

    /// Append `route` at the tail.
    pub fn push(&mut self, route: R) {
        self.entries.push(route);
    }

    /// Remove and return the tail; no-op on an empty stack.
    pub fn pop(&mut self) -> Option<R> {
        self.entries.pop()
    }

    /// Remove **all** occurrences equal to `route`.
    ///
    /// Not strictly LIFO: a deliberate relaxation so out-of-order
    /// dismissal still converges, at the cost of stack-discipline purity.
    pub fn pop_route(&mut self, route: &R) {
        self.entries.retain(|entry| entry != route);
    }

    /// Clear the stack entirely.
    pub fn pop_to_root(&mut self) {
        self.entries.clear();
    }

    /// Pop every entry from the tail down to, but not including, the first
    /// occurrence of `route` scanning from the top. Drains the whole stack
    /// when `route` is absent.
    pub fn pop_to(&mut self, route: &R) {
        while let Some(tail) = self.entries.last() {
            if tail == route {
                break;
            }
            self.entries.pop();
        }
    }

    /// Pop to `route` when it is already somewhere on the stack, push it
    /// otherwise. The stack never grows when the destination is already
    /// reachable by popping.
    pub fn seek_out(&mut self, route: R) -> SeekOutcome {
        if !self.is_empty() && self.contains(&route) {
            self.pop_to(&route);
            SeekOutcome::PoppedTo
        } else {
            self.push(route);
            SeekOutcome::Pushed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(routes: &[&'static str]) -> NavStack<&'static str> {
        let mut stack = NavStack::new();
        for route in routes {
            stack.push(*route);
        }
        stack
    }

    #[test]
    fn test_push_and_pop() {
        let mut stack = stack(&["a", "b"]);
        assert_eq!(stack.current(), Some(&"b"));
        assert_eq!(stack.pop(), Some("b"));
        assert_eq!(stack.pop(), Some("a"));
        // no-op on empty
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_route_removes_all_occurrences() {
        let mut stack = stack(&["a", "b", "a", "c"]);
        stack.pop_route(&"a");
        assert_eq!(stack.entries(), &["b", "c"]);
    }

    #[test]
    fn test_pop_to_root_clears() {
        let mut stack = stack(&["a", "b", "c"]);
        stack.pop_to_root();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_to_exposes_first_occurrence_from_top() {
        // Scenario: [Home, A, B, C], popTo(A) => [Home, A]
        let mut stack = stack(&["home", "a", "b", "c"]);
        stack.pop_to(&"a");
        assert_eq!(stack.entries(), &["home", "a"]);
    }

    #[test]
    fn test_pop_to_with_duplicates_stops_at_topmost() {
        let mut stack = stack(&["a", "b", "a", "c"]);
        stack.pop_to(&"a");
        assert_eq!(stack.entries(), &["a", "b", "a"]);
    }

    #[test]
    fn test_pop_to_absent_route_drains() {
        let mut stack = stack(&["a", "b"]);
        stack.pop_to(&"missing");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_seek_out_present_never_grows() {
        let mut stack = stack(&["a", "b", "c"]);
        let len = stack.len();
        assert_eq!(stack.seek_out("b"), SeekOutcome::PoppedTo);
        assert!(stack.len() <= len);
        assert_eq!(stack.current(), Some(&"b"));
    }

    #[test]
    fn test_seek_out_absent_grows_by_one() {
        let mut stack = stack(&["a"]);
        assert_eq!(stack.seek_out("z"), SeekOutcome::Pushed);
        assert_eq!(stack.entries(), &["a", "z"]);
    }

    #[test]
    fn test_seek_out_on_empty_pushes() {
        let mut stack: NavStack<&str> = NavStack::new();
        assert_eq!(stack.seek_out("a"), SeekOutcome::Pushed);
        assert_eq!(stack.entries(), &["a"]);
    }
}
