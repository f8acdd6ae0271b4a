//! Positions handed out by the linked containers.

use std::fmt;

/// The slot index used as "no node" in link fields.
pub(crate) const NIL: u32 = u32::MAX;

/// Position of an element in a linked container.
///
/// Stays valid until that element is removed, regardless of what happens
/// to its neighbours. Using an id after its element was removed panics;
/// using an id from a different list is not detected and finds whatever
/// occupies that slot there.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
