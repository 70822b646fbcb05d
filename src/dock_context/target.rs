use super::DockContext;
use super::types::{HostId, RegionId, WindowId};

/// Anything that can receive a docked pane.
///
/// The context only ever docks into hosts; the other variants resolve to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockTarget {
    Host(HostId),

    /// The most recently focused host of a floating window.
    Window(WindowId),

    /// The most recently focused host of a region. An empty region gets a fresh root host.
    Region(RegionId),
}

impl From<HostId> for DockTarget {
    fn from(host: HostId) -> Self {
        Self::Host(host)
    }
}

impl From<WindowId> for DockTarget {
    fn from(window: WindowId) -> Self {
        Self::Window(window)
    }
}

impl From<RegionId> for DockTarget {
    fn from(region: RegionId) -> Self {
        Self::Region(region)
    }
}

impl DockContext {
    /// Resolve `target` to a live host. `None` means "empty target".
    pub fn resolve_target(&mut self, target: DockTarget) -> Option<HostId> {
        match target {
            DockTarget::Host(host) => self.hosts.contains_key(&host).then_some(host),
            DockTarget::Window(window) => {
                let region = self.windows.get(&window)?.region();
                self.ensure_host(region)
            }
            DockTarget::Region(region) => self.ensure_host(region),
        }
    }

    /// The most recently focused host of `region`, creating a root host if the region is empty.
    pub fn ensure_host(&mut self, region_id: RegionId) -> Option<HostId> {
        let region = self.regions.get(&region_id)?;
        if region.is_empty() {
            let host = self.alloc_host(region_id);
            if let Some(region) = self.regions.get_mut(&region_id) {
                region.set_root_leaf(host);
            }
            self.after_mutation("ensure_host");
            return Some(host);
        }

        let hosts = region.hosts();
        self.all_targets
            .iter()
            .copied()
            .find(|host| hosts.contains(host))
            .or_else(|| hosts.first().copied())
    }
}
