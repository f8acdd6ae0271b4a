//! Owned-or-borrowed arena handles for containers.
//!
//! A container can either carve nodes out of a caller's arena or bring its
//! own. [`ArenaRef`] captures that choice as an enum, so ownership is
//! visible in the type instead of a flag checked at drop time.

use crate::arena::Arena;

/// An arena a container allocates from: borrowed from a caller or owned
/// outright.
///
/// An owned arena is dropped (and its blocks released) together with the
/// holder. A borrowed arena must outlive the holder, which the lifetime
/// enforces.
#[derive(Debug)]
pub enum ArenaRef<'a> {
    /// The holder owns the arena and drops it when it goes away.
    Owned(Arena),
    /// The holder allocates from an arena owned elsewhere.
    Borrowed(&'a Arena),
}

impl ArenaRef<'_> {
    /// The arena to allocate from.
    #[must_use]
    pub fn get(&self) -> &Arena {
        match self {
            ArenaRef::Owned(arena) => arena,
            ArenaRef::Borrowed(arena) => arena,
        }
    }

    /// Whether the holder owns the arena.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, ArenaRef::Owned(_))
    }
}

impl From<Arena> for ArenaRef<'_> {
    fn from(arena: Arena) -> Self {
        ArenaRef::Owned(arena)
    }
}

impl<'a> From<&'a Arena> for ArenaRef<'a> {
    fn from(arena: &'a Arena) -> Self {
        ArenaRef::Borrowed(arena)
    }
}
