use egui::Pos2;

use super::DockContext;
use super::host::DockFeedback;
use super::picker::{DockingDirection, DockingPicker};
use super::types::{DockableId, HostId, RegionId, WindowId};

impl DockContext {
    /// Whether content dragged out of `dragged_region` may be docked into `host`.
    ///
    /// The dragged region must be live and non-empty, and must not be the region `host` is in.
    pub fn can_dock(&self, dragged_region: RegionId, host: HostId) -> bool {
        let Some(host_region) = self.hosts.get(&host).map(|h| h.region()) else {
            return false;
        };
        host_region != dragged_region
            && self
                .regions
                .get(&dragged_region)
                .is_some_and(|region| !region.is_empty())
    }

    /// A drag carrying `dragged_region` entered `host`. Returns whether it may dock there.
    pub fn on_dockable_entered(&mut self, host: HostId, dragged_region: RegionId) -> bool {
        let allowed = self.can_dock(dragged_region, host);
        if let Some(h) = self.hosts.get_mut(&host) {
            h.feedback = DockFeedback {
                dockable_over: allowed,
                zone: None,
            };
            if !allowed {
                h.last_direction = None;
            }
        }
        allowed
    }

    /// The drag moved over `host`; resolve the zone under the screen point `pointer`.
    ///
    /// The host's tab strip means [`DockingDirection::Center`]; elsewhere the picker decides.
    /// The resolved direction is kept for [`Self::drop_dockable_on`] /
    /// [`Self::drop_window_on`].
    pub fn on_dockable_over(
        &mut self,
        host: HostId,
        dragged_region: RegionId,
        pointer: Pos2,
    ) -> Option<DockingDirection> {
        let allowed = self.can_dock(dragged_region, host);
        let direction = if allowed {
            self.direction_at(host, pointer)
        } else {
            None
        };

        let h = self.hosts.get_mut(&host)?;
        h.feedback.dockable_over = allowed;
        h.feedback.zone = direction;
        h.last_direction = direction;
        direction
    }

    fn direction_at(&self, host: HostId, pointer: Pos2) -> Option<DockingDirection> {
        let rect = self.host_screen_rect(host)?;
        let tab_strip = rect.with_max_y(rect.min.y + self.options.tab_strip_height);
        if tab_strip.contains(pointer) {
            return Some(DockingDirection::Center);
        }
        DockingPicker::for_rect(rect).direction_at(pointer)
    }

    /// The drag left `host`. Clears the hover flags; the last direction survives for a drop
    /// delivered right after.
    pub fn on_dockable_exited(&mut self, host: HostId) {
        if let Some(h) = self.hosts.get_mut(&host) {
            h.feedback.dockable_over = false;
            h.feedback.clear_zones();
        }
    }

    /// Drop `dockable` on `host` using the direction resolved by the last drag-over.
    pub fn drop_dockable_on(&mut self, host: HostId, dockable: &DockableId) -> bool {
        let Some(direction) = self.take_drop_direction(host) else {
            return false;
        };
        self.dock_in_direction(host, dockable, Some(direction))
    }

    /// Drop a whole floating window on `host`: every dockable it holds moves into `host` (or into
    /// one new host split off it) and the emptied window closes.
    pub fn drop_window_on(&mut self, host: HostId, window: WindowId) -> bool {
        let Some(region) = self.windows.get(&window).map(|w| w.region()) else {
            return false;
        };
        if !self.can_dock(region, host) {
            self.take_drop_direction(host);
            return false;
        }
        let Some(direction) = self.take_drop_direction(host) else {
            return false;
        };

        let host_ids = self
            .regions
            .get(&region)
            .map(|r| r.hosts())
            .unwrap_or_default();
        let previously_active = host_ids
            .first()
            .and_then(|h| self.hosts.get(h)?.active_dockable().cloned());
        let moving: Vec<DockableId> = host_ids
            .iter()
            .filter_map(|h| self.hosts.get(h))
            .flat_map(|h| h.dockables().iter().cloned())
            .collect();

        let target = match direction {
            DockingDirection::Center => host,
            side => self.split_dockable_area(host, side),
        };
        for dockable in &moving {
            self.dock(dockable, target);
        }
        if let Some(active) = previously_active {
            self.set_active_dockable(target, &active);
        }
        log::debug!("drop {window:?} ({} dockables) on {host:?} {direction:?}", moving.len());
        true
    }

    fn take_drop_direction(&mut self, host: HostId) -> Option<DockingDirection> {
        let h = self.hosts.get_mut(&host)?;
        h.feedback = DockFeedback::default();
        h.last_direction.take()
    }
}
