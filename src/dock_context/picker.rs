use egui::{Pos2, Rect, Vec2};

/// Resolved drop intent over a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DockingDirection {
    /// Merge into the host as a new tab.
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl DockingDirection {
    pub const ALL: [Self; 5] = [Self::Center, Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Splitting along this side places the new host before the original one.
    pub fn places_new_first(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    pub fn is_side(self) -> bool {
        self != Self::Center
    }
}

/// The five drop targets ("picker") drawn over a host while something is dragged over it.
///
/// A cross of square boxes around the host center. Each box is hit-tested with a slightly
/// expanded rect so the pointer does not have to be pixel-exact.
#[derive(Clone, Copy, Debug)]
pub struct DockingPicker {
    center: Rect,
    left: Option<Rect>,
    right: Option<Rect>,
    top: Option<Rect>,
    bottom: Option<Rect>,
}

impl DockingPicker {
    pub fn for_rect(host_rect: Rect) -> Self {
        let min_dim = host_rect.width().min(host_rect.height()).max(0.0);
        let size = (min_dim * 0.16).clamp(24.0, 56.0);
        let gap = (size * 0.25).clamp(6.0, 18.0);

        let arm = |offset: Vec2| {
            Some(Rect::from_center_size(host_rect.center() + offset, Vec2::splat(size)))
                .map(|r| r.intersect(host_rect))
                .filter(|r| r.is_positive())
        };

        Self {
            center: Rect::from_center_size(host_rect.center(), Vec2::splat(size))
                .intersect(host_rect),
            left: arm(Vec2::new(-(size + gap), 0.0)),
            right: arm(Vec2::new(size + gap, 0.0)),
            top: arm(Vec2::new(0.0, -(size + gap))),
            bottom: arm(Vec2::new(0.0, size + gap)),
        }
    }

    /// Every target box that fits inside the host.
    pub fn zones(&self) -> impl Iterator<Item = (DockingDirection, Rect)> {
        [
            Some((DockingDirection::Center, self.center)),
            self.left.map(|r| (DockingDirection::Left, r)),
            self.right.map(|r| (DockingDirection::Right, r)),
            self.top.map(|r| (DockingDirection::Top, r)),
            self.bottom.map(|r| (DockingDirection::Bottom, r)),
        ]
        .into_iter()
        .flatten()
    }

    /// Bounding box of all zones.
    pub fn rect(&self) -> Rect {
        self.zones()
            .fold(self.center, |acc, (_direction, rect)| acc.union(rect))
    }

    pub fn zone_rect(&self, direction: DockingDirection) -> Option<Rect> {
        self.zones()
            .find(|(d, _rect)| *d == direction)
            .map(|(_d, rect)| rect)
    }

    /// The zone under `pointer`, if any.
    pub fn direction_at(&self, pointer: Pos2) -> Option<DockingDirection> {
        if !self.center.is_positive() {
            return None;
        }
        let expand = (self.center.width() * 0.5 * 0.30).round();
        self.zones()
            .find(|(_direction, rect)| rect.expand(expand).contains(pointer))
            .map(|(direction, _rect)| direction)
    }
}
