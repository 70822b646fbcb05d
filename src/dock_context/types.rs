use std::fmt;

/// Stable identity of a [`super::Dockable`], taken from its content's id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DockableId(String);

impl DockableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DockableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DockableId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for DockableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of a [`super::DockableHost`] (one tab strip / "dockable area").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HostId(pub(crate) u64);

/// Identity of a [`super::Region`] (one layout tree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RegionId(pub(crate) u64);

/// Identity of a floating [`super::HostWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WindowId(pub(crate) u64);

impl HostId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl RegionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl WindowId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic id allocation. Ids are never reused within one context.
#[derive(Clone, Copy, Debug)]
pub(super) struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub(super) fn alloc(&mut self) -> u64 {
        let id = self.next.max(1);
        self.next = id.saturating_add(1);
        id
    }

    /// Never hand out `used` (or anything below it) again.
    pub(super) fn reserve(&mut self, used: u64) {
        self.next = self.next.max(used.saturating_add(1));
    }
}

/// Notifications raised by [`super::DockContext`].
///
/// Events are queued while a mutation runs and handed out by
/// [`super::DockContext::drain_events`], so observers never run in the middle of a cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockEvent {
    /// `focused_target` changed value.
    FocusedTargetChanged(Option<HostId>),

    /// A dockable became the active member of `host`.
    Docked { dockable: DockableId, host: HostId },

    /// A dockable was detached into `window`.
    Floated { dockable: DockableId, window: WindowId },

    /// A dockable was closed and dropped by the context.
    Closed(DockableId),

    HostCreated(HostId),
    HostRemoved(HostId),

    WindowOpened(WindowId),
    WindowClosed(WindowId),
}
