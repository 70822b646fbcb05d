use super::picker::DockingDirection;
use super::types::{DockableId, HostId, RegionId};

/// Hover pseudo-state exposed to the renderer while something is dragged over a host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DockFeedback {
    /// Something dockable is over this host.
    pub dockable_over: bool,

    /// The zone currently under the pointer, if any.
    pub zone: Option<DockingDirection>,
}

impl DockFeedback {
    pub fn is_zone(&self, direction: DockingDirection) -> bool {
        self.zone == Some(direction)
    }

    pub(super) fn clear_zones(&mut self) {
        self.zone = None;
    }
}

/// An ordered set of dockables sharing one tab strip, with one active selection.
///
/// Membership changes that have to keep the rest of the arrangement consistent (back-references,
/// host removal when the last member leaves) go through [`super::DockContext`]; this type only
/// maintains its own sequence and the active-selection invariant.
#[derive(Clone, Debug)]
pub struct DockableHost {
    id: HostId,
    region: RegionId,
    dockables: Vec<DockableId>,
    active: Option<DockableId>,
    pub(super) feedback: DockFeedback,
    pub(super) last_direction: Option<DockingDirection>,
}

impl DockableHost {
    pub(super) fn new(id: HostId, region: RegionId) -> Self {
        Self {
            id,
            region,
            dockables: Vec::new(),
            active: None,
            feedback: DockFeedback::default(),
            last_direction: None,
        }
    }

    pub fn id(&self) -> HostId {
        self.id
    }

    /// The region tree this host is a leaf of.
    pub fn region(&self) -> RegionId {
        self.region
    }

    /// Members in tab order.
    pub fn dockables(&self) -> &[DockableId] {
        &self.dockables
    }

    pub fn active_dockable(&self) -> Option<&DockableId> {
        self.active.as_ref()
    }

    pub fn contains(&self, dockable: &DockableId) -> bool {
        self.dockables.contains(dockable)
    }

    pub fn len(&self) -> usize {
        self.dockables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dockables.is_empty()
    }

    pub fn feedback(&self) -> DockFeedback {
        self.feedback
    }

    /// Direction resolved by the last drag-over, used by a subsequent drop.
    pub fn last_direction(&self) -> Option<DockingDirection> {
        self.last_direction
    }

    /// Append `dockable`. Returns `false` if it already is a member.
    ///
    /// The first member of an empty host becomes active.
    pub(super) fn insert(&mut self, dockable: DockableId) -> bool {
        if self.contains(&dockable) {
            return false;
        }
        if self.active.is_none() {
            self.active = Some(dockable.clone());
        }
        self.dockables.push(dockable);
        true
    }

    /// Remove `dockable`, moving the active selection to the first remaining member if needed.
    pub(super) fn remove(&mut self, dockable: &DockableId) -> bool {
        let Some(index) = self.dockables.iter().position(|d| d == dockable) else {
            return false;
        };
        self.dockables.remove(index);
        if self.active.as_ref() == Some(dockable) {
            self.active = self.dockables.first().cloned();
        }
        true
    }

    /// Make `dockable` active. Only members can be active.
    pub(super) fn set_active(&mut self, dockable: &DockableId) -> bool {
        if !self.contains(dockable) {
            return false;
        }
        self.active = Some(dockable.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> DockableHost {
        DockableHost::new(HostId(1), RegionId(1))
    }

    #[test]
    fn insert_is_idempotent() {
        let mut host = host();
        assert!(host.insert("a".into()));
        assert!(!host.insert("a".into()));
        assert_eq!(host.dockables(), &[DockableId::from("a")]);
        assert_eq!(host.active_dockable(), Some(&DockableId::from("a")));
    }

    #[test]
    fn removing_active_falls_back_to_first_member() {
        let mut host = host();
        host.insert("a".into());
        host.insert("b".into());
        host.insert("c".into());
        assert!(host.set_active(&"c".into()));

        assert!(host.remove(&"c".into()));
        assert_eq!(host.active_dockable(), Some(&DockableId::from("a")));

        assert!(host.remove(&"a".into()));
        assert_eq!(host.active_dockable(), Some(&DockableId::from("b")));

        assert!(host.remove(&"b".into()));
        assert_eq!(host.active_dockable(), None);
        assert!(host.is_empty());
    }

    #[test]
    fn removing_non_member_is_a_no_op() {
        let mut host = host();
        host.insert("a".into());
        host.set_active(&"a".into());
        assert!(!host.remove(&"zzz".into()));
        assert_eq!(host.active_dockable(), Some(&DockableId::from("a")));
    }

    #[test]
    fn only_members_can_be_active() {
        let mut host = host();
        assert!(!host.set_active(&"a".into()));
        assert_eq!(host.active_dockable(), None);
    }
}
