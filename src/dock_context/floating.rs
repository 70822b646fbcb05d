use egui::{Pos2, Vec2, pos2};

use super::DockContext;
use super::types::{DockEvent, DockableId, HostId, WindowId};
use super::window::HostWindow;

impl DockContext {
    /// Detach `dockable` into a new floating window and return it.
    ///
    /// `(x, y)` is the anchor relative to the dockable's on-screen content origin, shifted by
    /// [`super::DockContextOptions::float_anchor_offset`]. A dockable that was never laid out
    /// has no origin: `(x, y)` is then used as the screen position as is.
    ///
    /// Floating the sole tenant of a floating window returns that window unchanged. Returns
    /// `None` for unknown dockables and dockables that cannot float.
    pub fn float(&mut self, dockable: &DockableId, x: f32, y: f32) -> Option<WindowId> {
        let d = self.dockables.get(dockable)?;
        if !d.can_float() {
            log::debug!("float {dockable}: refused (can_float == false)");
            return None;
        }
        let current = d.host();

        if let Some(window) = self.floating_window_of(dockable) {
            if self.window_dockable_count(window) == 1 {
                return Some(window);
            }
        }

        let pane_rect = current.and_then(|host| self.host_screen_rect(host));
        if let Some(host) = current {
            self.set_active_dockable(host, dockable);
        }

        let position = match pane_rect {
            Some(rect) => {
                rect.min
                    + Vec2::new(0.0, self.options.tab_strip_height)
                    + self.options.float_anchor_offset
                    + Vec2::new(x, y)
            }
            None => pos2(x, y),
        };
        let size = self.options.floating_size_for(pane_rect.map(|rect| rect.size()));

        if let Some(host) = current {
            self.remove_dockable(host, dockable);
        }

        let (window, host) = self.open_window(position, size);
        self.attach(host, dockable);
        self.floating_windows.insert(dockable.clone(), window);
        self.refresh_window_title(window);

        log::debug!("float {dockable} -> {window:?} at {position:?} size {size:?}");
        self.emit(DockEvent::Floated {
            dockable: dockable.clone(),
            window,
        });
        self.after_mutation("float");
        Some(window)
    }

    /// Create and show a floating window around a fresh region holding one empty host.
    pub(super) fn open_window(&mut self, position: Pos2, size: Vec2) -> (WindowId, HostId) {
        let window = WindowId(self.window_ids.alloc());
        let region = self.alloc_region(Some(window));
        let host = self.alloc_host(region);
        if let Some(r) = self.regions.get_mut(&region) {
            r.set_root_leaf(host);
        }

        let platform = self.window_factory.create(window);
        let mut host_window = HostWindow::new(window, region, position, size, platform);
        host_window.show();
        self.windows.insert(window, host_window);

        self.emit(DockEvent::WindowOpened(window));
        (window, host)
    }

    /// Close a floating window from the context side: tear it down, then close the platform
    /// window.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        let Some(mut host_window) = self.teardown_window(window) else {
            return false;
        };
        host_window.close_platform();
        self.after_mutation("close_window");
        true
    }

    /// The platform closed `window` (e.g. the user clicked its close button).
    ///
    /// Its hosts are torn down and the dockables still inside are dropped without consulting
    /// their close hooks.
    pub fn on_window_closing(&mut self, window: WindowId) -> bool {
        if self.teardown_window(window).is_none() {
            return false;
        }
        self.after_mutation("on_window_closing");
        true
    }

    /// The platform activated `window`: its hosts move to the front of
    /// [`Self::all_targets`] in tree order, and its region is (re-)registered.
    pub fn on_window_activated(&mut self, window: WindowId) -> bool {
        let Some(region) = self.windows.get(&window).map(HostWindow::region) else {
            return false;
        };
        let hosts = self
            .regions
            .get(&region)
            .map(|r| r.hosts())
            .unwrap_or_default();

        for host in hosts.iter().rev() {
            self.promote_target(*host);
        }
        self.register_region(region);
        log::debug!("activated {window:?}");
        true
    }

    /// Deregister and drop everything `window` owns. Each step tolerates its input being gone,
    /// so this may run from inside a removal cascade.
    fn teardown_window(&mut self, window: WindowId) -> Option<HostWindow> {
        let host_window = self.windows.remove(&window)?;
        let region_id = host_window.region();

        self.deregister_region(region_id);
        self.floating_windows.retain(|_, w| *w != window);

        let hosts = self
            .regions
            .remove(&region_id)
            .map(|region| region.hosts())
            .unwrap_or_default();

        for host_id in hosts {
            let Some(host) = self.hosts.remove(&host_id) else {
                continue;
            };
            for dockable in host.dockables() {
                self.drop_dockable(dockable);
            }
            self.deregister_target(host_id);
            self.emit(DockEvent::HostRemoved(host_id));
        }

        log::debug!("teardown {window:?} ({region_id:?})");
        self.emit(DockEvent::WindowClosed(window));
        Some(host_window)
    }
}
