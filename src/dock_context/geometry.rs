use egui::{Pos2, Rect};

use super::DockContext;
use super::types::{HostId, WindowId};

impl DockContext {
    /// Screen rect of `host`, if its region has been laid out.
    pub fn host_screen_rect(&self, host: HostId) -> Option<Rect> {
        let region = self.regions.get(&self.hosts.get(&host)?.region())?;
        let origin = region.rect()?.min;
        Some(region.host_rect(host)?.translate(origin.to_vec2()))
    }

    /// The platform moved or resized `window`; lay its region out over `rect`.
    pub fn set_window_rect(&mut self, window: WindowId, rect: Rect) -> bool {
        let Some(w) = self.windows.get_mut(&window) else {
            return false;
        };
        w.position = rect.min;
        w.size = rect.size();
        let region = w.region();
        self.layout_region(region, rect)
    }

    /// Re-express `point`, relative to the top left corner of host `from`, relative to host `to`.
    ///
    /// Works across regions as long as both have been laid out.
    pub fn translate_point_relative(&self, point: Pos2, from: HostId, to: HostId) -> Option<Pos2> {
        let from_region = self.hosts.get(&from)?.region();
        if from_region == self.hosts.get(&to)?.region() {
            return self
                .regions
                .get(&from_region)?
                .translate_point_relative(point, from, to);
        }
        let from = self.host_screen_rect(from)?;
        let to = self.host_screen_rect(to)?;
        Some(point + (from.min - to.min))
    }

    /// The host under a screen point. Floating windows are checked before the main region.
    pub fn host_at(&self, screen: Pos2) -> Option<HostId> {
        let floating = self
            .all_regions
            .iter()
            .rev()
            .filter(|id| **id != self.main_region);
        floating
            .chain(std::iter::once(&self.main_region))
            .filter_map(|id| self.regions.get(id))
            .find_map(|region| region.host_at(region.to_local(screen)?))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use egui::{Rect, Vec2, pos2};

    use crate::dock_context::{DockContext, DockingDirection, SimpleContent};

    #[test]
    fn translate_point_between_regions() {
        let mut ctx = DockContext::new();
        let main = ctx.main_region();
        let left = ctx.ensure_host(main).unwrap();
        let right = ctx.split_dockable_area(left, DockingDirection::Right);
        ctx.layout_region(main, Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(200.0, 100.0)));

        assert_eq!(
            ctx.translate_point_relative(pos2(10.0, 10.0), right, left),
            Some(pos2(110.0, 10.0))
        );

        let id = ctx
            .create_dockable(Rc::new(SimpleContent::new("a", "A", ())))
            .unwrap();
        let window = ctx.float(&id, 0.0, 0.0).unwrap();
        ctx.set_window_rect(
            window,
            Rect::from_min_size(pos2(500.0, 300.0), Vec2::new(100.0, 100.0)),
        );
        let floating_host = ctx.host_of(&id).unwrap();

        assert_eq!(
            ctx.translate_point_relative(pos2(0.0, 0.0), floating_host, left),
            Some(pos2(500.0, 300.0))
        );
        assert_eq!(ctx.host_at(pos2(550.0, 350.0)), Some(floating_host));
        assert_eq!(ctx.host_at(pos2(150.0, 50.0)), Some(right));
        assert_eq!(ctx.host_at(pos2(1000.0, 1000.0)), None);
    }
}
