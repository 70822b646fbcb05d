use super::DockContext;
use super::dockable::Dockable;
use super::types::{HostId, WindowId};

impl DockContext {
    /// The dockable a floating window is named after: the active dockable of its first host
    /// (tree order) that has one.
    fn title_dockable(&self, window: WindowId) -> Option<&Dockable> {
        let region = self.regions.get(&self.windows.get(&window)?.region())?;
        region
            .hosts()
            .iter()
            .filter_map(|host| self.hosts.get(host)?.active_dockable())
            .find_map(|id| self.dockables.get(id))
    }

    /// Title a floating window should show.
    pub fn title_for_window(&self, window: WindowId) -> String {
        if !self.windows.contains_key(&window) {
            return "Floating".to_owned();
        }
        self.title_dockable(window)
            .map_or_else(|| format!("Floating {}", window.value()), Dockable::title)
    }

    /// Push the current title to `window`'s platform window and follow renames of the dockable
    /// it is named after until the next refresh.
    pub fn refresh_window_title(&mut self, window: WindowId) {
        let title = self.title_for_window(window);
        let source = self
            .title_dockable(window)
            .map(|d| d.title_observable().clone());
        if let Some(w) = self.windows.get_mut(&window) {
            w.follow_title(&title, source.as_ref());
        }
    }

    /// Refresh every window title.
    pub fn refresh_window_titles(&mut self) {
        let windows: Vec<WindowId> = self.windows.keys().copied().collect();
        for window in windows {
            self.refresh_window_title(window);
        }
    }

    pub(super) fn refresh_title_of_host(&mut self, host: HostId) {
        if let Some(window) = self.window_of_host(host) {
            self.refresh_window_title(window);
        }
    }
}
