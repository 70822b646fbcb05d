use egui::Vec2;

/// Options for [`super::DockContext`].
#[derive(Clone, Debug)]
pub struct DockContextOptions {
    /// Fraction given to the first child when a host is split.
    pub split_ratio: f32,

    /// Offset from the dockable's on-screen origin to the top left corner of the window it is
    /// floated into (so the pointer ends up over the new window's title bar).
    pub float_anchor_offset: Vec2,

    /// Size of a freshly floated window when the dockable had no laid-out rect.
    pub default_floating_size: Vec2,

    /// Floated windows are never smaller than this.
    pub min_floating_size: Vec2,

    /// Height of the tab strip at the top of each host. Hovering it while dragging means
    /// "dock as tab" ([`super::DockingDirection::Center`]).
    pub tab_strip_height: f32,

    /// If true, focusing a host (docking into it) moves it to the front of
    /// [`super::DockContext::all_targets`], like window activation does.
    pub promote_focused_target: bool,

    /// If true, record structural events in a small ring buffer (see
    /// [`super::DockContext::debug_log_text`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep.
    pub debug_event_log_capacity: usize,

    /// If true, run the integrity checks after every structural mutation.
    pub debug_integrity: bool,

    /// If true, panic on integrity issues (only with `debug_integrity`).
    pub debug_integrity_panic: bool,
}

impl Default for DockContextOptions {
    fn default() -> Self {
        Self {
            split_ratio: 0.5,
            float_anchor_offset: Vec2::new(-20.0, -70.0),
            default_floating_size: Vec2::new(480.0, 360.0),
            min_floating_size: Vec2::new(200.0, 120.0),
            tab_strip_height: 24.0,
            promote_focused_target: true,
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}

impl DockContextOptions {
    pub(crate) fn clamped_split_ratio(&self) -> f32 {
        if self.split_ratio.is_finite() {
            self.split_ratio.clamp(0.05, 0.95)
        } else {
            0.5
        }
    }

    pub(crate) fn floating_size_for(&self, pane_size: Option<Vec2>) -> Vec2 {
        pane_size
            .unwrap_or(self.default_floating_size)
            .max(self.min_floating_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_ratio_is_clamped() {
        let opt = DockContextOptions {
            split_ratio: 1.5,
            ..Default::default()
        };
        assert_eq!(opt.clamped_split_ratio(), 0.95);

        let opt = DockContextOptions {
            split_ratio: f32::NAN,
            ..Default::default()
        };
        assert_eq!(opt.clamped_split_ratio(), 0.5);
    }

    #[test]
    fn floating_size_respects_minimum() {
        let opt = DockContextOptions::default();
        assert_eq!(
            opt.floating_size_for(Some(Vec2::new(50.0, 500.0))),
            Vec2::new(200.0, 500.0)
        );
        assert_eq!(opt.floating_size_for(None), Vec2::new(480.0, 360.0));
    }
}
