use std::collections::BTreeMap;

use itertools::Itertools as _;

use crate::dock_context::{DockContext, DockError, DockableId, DockingDirection, HostId};

/// Split direction with Dear ImGui `DockBuilder::SplitNode`-like semantics.
///
/// The direction indicates where the *side* node is placed relative to the *main* node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitDirection {
    Left,
    Right,
    Up,
    Down,
}

impl From<SplitDirection> for DockingDirection {
    fn from(dir: SplitDirection) -> Self {
        match dir {
            SplitDirection::Left => Self::Left,
            SplitDirection::Right => Self::Right,
            SplitDirection::Up => Self::Top,
            SplitDirection::Down => Self::Bottom,
        }
    }
}

/// A logical node id used by [`DockBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u64);

#[derive(Clone, Debug)]
enum BuilderNode {
    Tabs {
        dockables: Vec<DockableId>,
    },
    Split {
        dir: SplitDirection,
        side_fraction: f32,
        main: DockNodeId,
        side: DockNodeId,
    },
}

/// Describe the main region's layout in code, Dear ImGui `DockBuilder` style:
/// create empty nodes, split them, dock dockables into leaf nodes, then [`Self::finish`].
///
/// Leaves become hosts. Empty leaves are allowed and become empty hosts, which is useful for
/// "reserved" areas in scripted layouts.
#[derive(Debug)]
pub struct DockBuilder {
    next_node_id: u64,
    nodes: BTreeMap<DockNodeId, BuilderNode>,
}

impl Default for DockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DockBuilder {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            nodes: BTreeMap::new(),
        }
    }

    fn alloc_node_id(&mut self) -> DockNodeId {
        let id = DockNodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    /// Create an empty leaf node.
    #[must_use]
    pub fn add_node(&mut self) -> DockNodeId {
        let id = self.alloc_node_id();
        self.nodes.insert(
            id,
            BuilderNode::Tabs {
                dockables: Vec::new(),
            },
        );
        id
    }

    /// Split an existing node and return `(side, main)` (Dear ImGui semantics).
    ///
    /// The `node` itself becomes the split, and its original content moves into the returned
    /// `main` child. `side_fraction` (clamped to `0.05..=0.95`) is the share given to `side`.
    pub fn split_node(
        &mut self,
        node: DockNodeId,
        dir: SplitDirection,
        side_fraction: f32,
    ) -> Result<(DockNodeId, DockNodeId), DockError> {
        let old = self
            .nodes
            .remove(&node)
            .ok_or(DockError::UnknownNode(node.0))?;
        let main = self.alloc_node_id();
        self.nodes.insert(main, old);

        let side = self.add_node();
        let side_fraction = if side_fraction.is_finite() {
            side_fraction.clamp(0.05, 0.95)
        } else {
            0.5
        };

        self.nodes.insert(
            node,
            BuilderNode::Split {
                dir,
                side_fraction,
                main,
                side,
            },
        );
        Ok((side, main))
    }

    /// Dock a dockable into a leaf node, after the ones already there.
    pub fn dock_content(
        &mut self,
        dockable: impl Into<DockableId>,
        node: DockNodeId,
    ) -> Result<(), DockError> {
        match self.nodes.get_mut(&node) {
            Some(BuilderNode::Tabs { dockables }) => {
                dockables.push(dockable.into());
                Ok(())
            }
            Some(BuilderNode::Split { .. }) => Err(DockError::NotALeaf(node.0)),
            None => Err(DockError::UnknownNode(node.0)),
        }
    }

    /// Dock several dockables into a leaf node (tabbed together).
    pub fn dock_contents<Id: Into<DockableId>>(
        &mut self,
        dockables: impl IntoIterator<Item = Id>,
        node: DockNodeId,
    ) -> Result<(), DockError> {
        for dockable in dockables {
            self.dock_content(dockable, node)?;
        }
        Ok(())
    }

    /// Replace the main region of `ctx` with the built layout, rooted at `root`.
    ///
    /// Everything is validated first; on error `ctx` is unchanged. The main region must not hold
    /// any dockable yet, every docked id must be a dockable of `ctx` (it may currently be
    /// floating), and no id may be docked into more than one leaf. The first dockable of each
    /// leaf ends up active.
    pub fn finish(self, ctx: &mut DockContext, root: DockNodeId) -> Result<(), DockError> {
        if !self.nodes.contains_key(&root) {
            return Err(DockError::UnknownNode(root.0));
        }
        if ctx.region_dockable_count(ctx.main_region()) > 0 {
            return Err(DockError::RegionNotEmpty);
        }
        let docked = self
            .nodes
            .values()
            .filter_map(|node| match node {
                BuilderNode::Tabs { dockables } => Some(dockables),
                BuilderNode::Split { .. } => None,
            })
            .flatten()
            .collect_vec();
        if let Some(missing) = docked.iter().find(|id| ctx.dockable(id).is_none()) {
            return Err(DockError::UnknownDockable((*missing).clone()));
        }
        if let Some(repeated) = docked.iter().duplicates().next() {
            return Err(DockError::DuplicateDockable((*repeated).clone()));
        }

        let main_region = ctx.main_region();
        let stale: Vec<HostId> = ctx
            .region(main_region)
            .map(|region| region.hosts())
            .unwrap_or_default();
        for host in stale {
            ctx.remove_dockable_area(host);
        }

        let Some(host) = ctx.ensure_host(main_region) else {
            return Err(DockError::InvalidArgument("context has no main region"));
        };
        let mut nodes = self.nodes;
        build(ctx, &mut nodes, root, host);
        log::debug!("dock builder installed main layout");
        Ok(())
    }
}

fn build(
    ctx: &mut DockContext,
    nodes: &mut BTreeMap<DockNodeId, BuilderNode>,
    node: DockNodeId,
    host: HostId,
) {
    match nodes.remove(&node) {
        Some(BuilderNode::Tabs { dockables }) => {
            for dockable in &dockables {
                ctx.dock(dockable, host);
            }
            if let Some(first) = dockables.first() {
                ctx.set_active_dockable(host, first);
            }
        }
        Some(BuilderNode::Split {
            dir,
            side_fraction,
            main,
            side,
        }) => {
            let side_host = ctx.split_dockable_area(host, dir.into());
            let first_fraction = match dir {
                SplitDirection::Left | SplitDirection::Up => side_fraction,
                SplitDirection::Right | SplitDirection::Down => 1.0 - side_fraction,
            };
            ctx.set_split_ratio(host, first_fraction);

            build(ctx, nodes, main, host);
            build(ctx, nodes, side, side_host);
        }
        None => {}
    }
}
