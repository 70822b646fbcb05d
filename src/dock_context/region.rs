use std::collections::BTreeMap;

use egui::{Pos2, Rect, pos2};

use super::picker::DockingDirection;
use super::types::{HostId, RegionId, WindowId};

/// Axis along which a split lays out its two children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Children side by side, `first` on the left.
    Horizontal,

    /// Children stacked, `first` on top.
    Vertical,
}

impl Orientation {
    pub fn for_direction(direction: DockingDirection) -> Option<Self> {
        match direction {
            DockingDirection::Left | DockingDirection::Right => Some(Self::Horizontal),
            DockingDirection::Top | DockingDirection::Bottom => Some(Self::Vertical),
            DockingDirection::Center => None,
        }
    }
}

/// A node of a layout tree: a host, or a binary split of two subtrees.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Leaf(HostId),
    Split {
        orientation: Orientation,

        /// Fraction of the split given to `first` (0.0..=1.0).
        ratio: f32,
        first: Box<Node>,
        second: Box<Node>,
    },
}

impl Node {
    pub fn split(orientation: Orientation, ratio: f32, first: Self, second: Self) -> Self {
        Self::Split {
            orientation,
            ratio,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Leaves depth-first, left to right.
    pub fn leaves(&self) -> Vec<HostId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<HostId>) {
        match self {
            Self::Leaf(host) => out.push(*host),
            Self::Split { first, second, .. } => {
                first.collect_leaves(out);
                second.collect_leaves(out);
            }
        }
    }

    pub fn contains(&self, host: HostId) -> bool {
        match self {
            Self::Leaf(h) => *h == host,
            Self::Split { first, second, .. } => first.contains(host) || second.contains(host),
        }
    }

    fn split_leaf(
        &mut self,
        host: HostId,
        orientation: Orientation,
        new_first: bool,
        new_host: HostId,
        ratio: f32,
    ) -> bool {
        match self {
            Self::Leaf(h) if *h == host => {
                let original = Self::Leaf(host);
                let added = Self::Leaf(new_host);
                *self = if new_first {
                    Self::split(orientation, ratio, added, original)
                } else {
                    Self::split(orientation, ratio, original, added)
                };
                true
            }
            Self::Leaf(_) => false,
            Self::Split { first, second, .. } => {
                first.split_leaf(host, orientation, new_first, new_host, ratio)
                    || second.split_leaf(host, orientation, new_first, new_host, ratio)
            }
        }
    }

    /// Rebuild without the leaf of `host`. A split that loses a child is replaced by the sibling.
    fn without_leaf(self, host: HostId, removed: &mut bool) -> Option<Self> {
        match self {
            Self::Leaf(h) if h == host => {
                *removed = true;
                None
            }
            Self::Leaf(_) => Some(self),
            Self::Split {
                orientation,
                ratio,
                first,
                second,
            } => {
                let first = first.without_leaf(host, removed);
                let second = second.without_leaf(host, removed);
                match (first, second) {
                    (Some(first), Some(second)) => {
                        Some(Self::split(orientation, ratio, first, second))
                    }
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            }
        }
    }

    /// Set the ratio of the split whose direct child is the leaf of `host`.
    fn set_ratio_of_parent(&mut self, host: HostId, new_ratio: f32) -> bool {
        let Self::Split {
            ratio,
            first,
            second,
            ..
        } = self
        else {
            return false;
        };

        if **first == Self::Leaf(host) || **second == Self::Leaf(host) {
            *ratio = new_ratio;
            return true;
        }
        first.set_ratio_of_parent(host, new_ratio) || second.set_ratio_of_parent(host, new_ratio)
    }

    fn layout(&self, rect: Rect, out: &mut BTreeMap<HostId, Rect>) {
        match self {
            Self::Leaf(host) => {
                out.insert(*host, rect);
            }
            Self::Split {
                orientation,
                ratio,
                first,
                second,
            } => {
                let (a, b) = split_rect(rect, *orientation, *ratio);
                first.layout(a, out);
                second.layout(b, out);
            }
        }
    }
}

fn split_rect(rect: Rect, orientation: Orientation, ratio: f32) -> (Rect, Rect) {
    let ratio = ratio.clamp(0.0, 1.0);
    match orientation {
        Orientation::Horizontal => {
            let x = rect.min.x + rect.width() * ratio;
            (
                Rect::from_min_max(rect.min, pos2(x, rect.max.y)),
                Rect::from_min_max(pos2(x, rect.min.y), rect.max),
            )
        }
        Orientation::Vertical => {
            let y = rect.min.y + rect.height() * ratio;
            (
                Rect::from_min_max(rect.min, pos2(rect.max.x, y)),
                Rect::from_min_max(pos2(rect.min.x, y), rect.max),
            )
        }
    }
}

/// One layout tree: the main dock area, or the content of a floating window.
///
/// Geometry is optional: once [`super::DockContext::layout_region`] has been given the region's
/// screen rect, every leaf gets a rect in region-local coordinates (origin at the region's top
/// left corner). Structural changes re-run the layout.
#[derive(Clone, Debug)]
pub struct Region {
    id: RegionId,
    root: Option<Node>,
    window: Option<WindowId>,
    rect: Option<Rect>,
    host_rects: BTreeMap<HostId, Rect>,
}

impl Region {
    pub(super) fn new(id: RegionId, window: Option<WindowId>) -> Self {
        Self {
            id,
            root: None,
            window,
            rect: None,
            host_rects: BTreeMap::new(),
        }
    }

    pub(super) fn with_root(mut self, root: Node) -> Self {
        self.root = Some(root);
        self.relayout();
        self
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// The floating window owning this tree, `None` for the main dock area.
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Screen rect of the whole tree, if known.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn hosts(&self) -> Vec<HostId> {
        self.root.as_ref().map(Node::leaves).unwrap_or_default()
    }

    pub fn contains_host(&self, host: HostId) -> bool {
        self.root.as_ref().is_some_and(|root| root.contains(host))
    }

    /// Region-local rect of `host`, if laid out.
    pub fn host_rect(&self, host: HostId) -> Option<Rect> {
        self.host_rects.get(&host).copied()
    }

    /// Replace the whole tree.
    pub(super) fn set_root(&mut self, root: Option<Node>) {
        self.root = root;
        self.relayout();
    }

    /// Give an empty tree its first host.
    pub(super) fn set_root_leaf(&mut self, host: HostId) -> bool {
        if self.root.is_some() {
            return false;
        }
        self.root = Some(Node::Leaf(host));
        self.relayout();
        true
    }

    /// Replace the leaf of `host` with a split holding `host` and `new_host`.
    ///
    /// Returns `false` (and changes nothing) if `host` is not in this tree or `direction` is
    /// [`DockingDirection::Center`].
    pub(super) fn split_dockable_area(
        &mut self,
        host: HostId,
        direction: DockingDirection,
        new_host: HostId,
        ratio: f32,
    ) -> bool {
        let Some(orientation) = Orientation::for_direction(direction) else {
            return false;
        };
        let Some(root) = &mut self.root else {
            return false;
        };
        let split = root.split_leaf(
            host,
            orientation,
            direction.places_new_first(),
            new_host,
            ratio,
        );
        if split {
            self.relayout();
        }
        split
    }

    /// Remove the leaf of `host`, collapsing its parent split. Returns `false` if not found.
    pub(super) fn remove_dockable_area(&mut self, host: HostId) -> bool {
        let Some(root) = self.root.take() else {
            return false;
        };
        let mut removed = false;
        self.root = root.without_leaf(host, &mut removed);
        if removed {
            self.host_rects.remove(&host);
            self.relayout();
        }
        removed
    }

    pub(super) fn set_split_ratio(&mut self, host: HostId, ratio: f32) -> bool {
        let Some(root) = &mut self.root else {
            return false;
        };
        let changed = root.set_ratio_of_parent(host, ratio.clamp(0.05, 0.95));
        if changed {
            self.relayout();
        }
        changed
    }

    pub(super) fn layout(&mut self, rect: Rect) {
        self.rect = Some(rect);
        self.relayout();
    }

    fn relayout(&mut self) {
        self.host_rects.clear();
        let (Some(root), Some(rect)) = (&self.root, self.rect) else {
            return;
        };
        root.layout(Rect::from_min_size(Pos2::ZERO, rect.size()), &mut self.host_rects);
    }

    /// Screen point → region-local point.
    pub fn to_local(&self, screen: Pos2) -> Option<Pos2> {
        let rect = self.rect?;
        Some(Pos2::ZERO + (screen - rect.min))
    }

    /// Region-local point → point relative to `host`'s top left corner.
    pub fn point_in_host(&self, local: Pos2, host: HostId) -> Option<Pos2> {
        let rect = self.host_rect(host)?;
        Some(Pos2::ZERO + (local - rect.min))
    }

    /// Re-express `point`, relative to host `from`, relative to host `to`.
    pub fn translate_point_relative(&self, point: Pos2, from: HostId, to: HostId) -> Option<Pos2> {
        let from = self.host_rect(from)?;
        let to = self.host_rect(to)?;
        Some(point + (from.min - to.min))
    }

    /// The host under a region-local point.
    pub fn host_at(&self, local: Pos2) -> Option<HostId> {
        self.host_rects
            .iter()
            .find(|(_host, rect)| rect.contains(local))
            .map(|(host, _rect)| *host)
    }
}
