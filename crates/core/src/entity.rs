//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A node of one of the host's hierarchical trees (categories, locations).
///
/// The host orders tree nodes depth-first, siblings by name. Implementors
/// expose just enough to reproduce that ordering and the display path.
pub trait TreeNode: Entity {
    fn name(&self) -> &str;

    fn parent(&self) -> Option<&Self::Id>;

    /// Ancestor names joined with `/`, ending with this node's name.
    fn pathstring(&self) -> &str;
}
