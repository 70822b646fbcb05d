use super::types::DockableId;

/// Hard failures of [`super::DockContext`] and [`crate::DockBuilder`].
///
/// Everything else (stale ids, vetoed closes, empty drop targets...) is a silent no-op reported
/// through `bool`/`Option` return values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockError {
    /// The content handed to `create_dockable` is unusable (e.g. blank id).
    InvalidArgument(&'static str),

    /// A live dockable already uses this id, or a builder docks it into two leaves.
    DuplicateDockable(DockableId),

    /// No live dockable has this id.
    UnknownDockable(DockableId),

    /// A builder node id that was never created.
    UnknownNode(u64),

    /// Dockables can only be docked into leaf nodes.
    NotALeaf(u64),

    /// The main region still holds dockables.
    RegionNotEmpty,
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::DuplicateDockable(id) => write!(f, "a dockable with id {id:?} already exists"),
            Self::UnknownDockable(id) => write!(f, "no dockable with id {id:?}"),
            Self::UnknownNode(node) => write!(f, "unknown dock node {node}"),
            Self::NotALeaf(node) => write!(f, "dock node {node} is a split, not a leaf"),
            Self::RegionNotEmpty => write!(f, "the main region still contains dockables"),
        }
    }
}

impl std::error::Error for DockError {}
