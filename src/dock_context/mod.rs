use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use egui::Rect;

mod binding;
mod command;
mod content;
mod content_registry;
mod debug;
mod dockable;
mod drag;
mod error;
mod floating;
mod geometry;
mod host;
mod integrity;
mod options;
mod persistence;
mod picker;
mod region;
mod target;
mod title;
mod types;
mod window;

#[cfg(test)]
mod model_tests;

pub use binding::{Observable, Subscription};
pub use command::DockCommand;
pub use content::{DockableContent, SimpleContent, TabCustomization};
pub use content_registry::{ContentRegistry, SimpleContentRegistry};
pub use dockable::Dockable;
pub use error::DockError;
pub use host::{DockFeedback, DockableHost};
pub use options::DockContextOptions;
pub use persistence::{
    HostSnapshot, LAYOUT_SNAPSHOT_VERSION, LayoutPersistenceError, LayoutSnapshot, LayoutTree,
    SerializedLayout, WindowSnapshot,
};
pub use picker::{DockingDirection, DockingPicker};
pub use region::{Node, Orientation, Region};
pub use target::DockTarget;
pub use types::{DockEvent, DockableId, HostId, RegionId, WindowId};
pub use window::{DefaultWindowFactory, HeadlessWindow, HostWindow, HostWindowFactory, PlatformWindow};

use types::IdAllocator;

/// The coordinator of a docking session.
///
/// Owns every dockable, host, region tree and floating window, plus the registries that keep
/// them consistent:
/// - `all_targets`: every live host, most recently focused first,
/// - `all_regions`: registered region trees (the main one and one per floating window),
/// - `focused_target`,
/// - the floating-window registry (dockable → window hosting it).
///
/// A dockable lives in at most one host at a time; moving it is always remove-then-add. Removing
/// the last dockable of a host removes the host from its tree, and emptying the tree of a floating
/// window closes that window. These cascades run as explicit steps, each of which tolerates its
/// input already being gone.
pub struct DockContext {
    pub options: DockContextOptions,

    dockables: BTreeMap<DockableId, Dockable>,
    hosts: BTreeMap<HostId, DockableHost>,
    regions: BTreeMap<RegionId, Region>,
    windows: BTreeMap<WindowId, HostWindow>,

    all_targets: Vec<HostId>,
    all_regions: Vec<RegionId>,
    focused_target: Option<HostId>,
    floating_windows: ahash::HashMap<DockableId, WindowId>,

    main_region: RegionId,
    window_factory: Box<dyn HostWindowFactory>,

    events: VecDeque<DockEvent>,
    host_ids: IdAllocator,
    region_ids: IdAllocator,
    window_ids: IdAllocator,

    debug_log: VecDeque<String>,
    debug_mutation: u64,
    debug_last_integrity_hash: Option<u64>,
}

impl std::fmt::Debug for DockContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockContext")
            .field("dockables", &self.dockables)
            .field("hosts", &self.hosts)
            .field("regions", &self.regions)
            .field("windows", &self.windows)
            .field("all_targets", &self.all_targets)
            .field("all_regions", &self.all_regions)
            .field("focused_target", &self.focused_target)
            .field("main_region", &self.main_region)
            .finish_non_exhaustive()
    }
}

impl Default for DockContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DockContext {
    pub fn new() -> Self {
        Self::new_with_options(DockContextOptions::default())
    }

    /// A session with a main region holding one empty host.
    pub fn new_with_options(options: DockContextOptions) -> Self {
        let mut ctx = Self::bare(options);
        let main = ctx.alloc_region(None);
        ctx.main_region = main;
        ctx.ensure_host(main);
        ctx
    }

    /// No regions at all; the caller installs the main region.
    pub(super) fn bare(options: DockContextOptions) -> Self {
        Self {
            options,
            dockables: BTreeMap::new(),
            hosts: BTreeMap::new(),
            regions: BTreeMap::new(),
            windows: BTreeMap::new(),
            all_targets: Vec::new(),
            all_regions: Vec::new(),
            focused_target: None,
            floating_windows: ahash::HashMap::default(),
            main_region: RegionId(0),
            window_factory: Box::new(DefaultWindowFactory),
            events: VecDeque::new(),
            host_ids: IdAllocator::default(),
            region_ids: IdAllocator::default(),
            window_ids: IdAllocator::default(),
            debug_log: VecDeque::new(),
            debug_mutation: 0,
            debug_last_integrity_hash: None,
        }
    }

    #[must_use]
    pub fn with_window_factory(mut self, factory: impl HostWindowFactory + 'static) -> Self {
        self.window_factory = Box::new(factory);
        self
    }

    pub fn set_window_factory(&mut self, factory: impl HostWindowFactory + 'static) {
        self.window_factory = Box::new(factory);
    }

    // ------------------------------------------------------------------------------------------
    // Queries

    pub fn dockable(&self, id: &DockableId) -> Option<&Dockable> {
        self.dockables.get(id)
    }

    pub fn dockables(&self) -> impl Iterator<Item = &Dockable> {
        self.dockables.values()
    }

    pub fn host(&self, id: HostId) -> Option<&DockableHost> {
        self.hosts.get(&id)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &DockableHost> {
        self.hosts.values()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    pub fn window(&self, id: WindowId) -> Option<&HostWindow> {
        self.windows.get(&id)
    }

    pub fn windows(&self) -> impl Iterator<Item = &HostWindow> {
        self.windows.values()
    }

    /// The region embedded in the main window.
    pub fn main_region(&self) -> RegionId {
        self.main_region
    }

    /// Every live host, most recently focused first.
    pub fn all_targets(&self) -> &[HostId] {
        &self.all_targets
    }

    /// Every registered region tree.
    pub fn all_regions(&self) -> &[RegionId] {
        &self.all_regions
    }

    pub fn focused_target(&self) -> Option<HostId> {
        self.focused_target
    }

    /// The floating window `dockable` is registered under.
    pub fn floating_window_of(&self, dockable: &DockableId) -> Option<WindowId> {
        self.floating_windows.get(dockable).copied()
    }

    pub fn floating_window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn host_of(&self, dockable: &DockableId) -> Option<HostId> {
        self.dockables.get(dockable)?.host
    }

    /// The floating window `host` lives in, `None` for hosts of the main region.
    pub fn window_of_host(&self, host: HostId) -> Option<WindowId> {
        let region = self.hosts.get(&host)?.region();
        self.regions.get(&region)?.window()
    }

    /// Number of dockables across all hosts of a region.
    pub fn region_dockable_count(&self, region: RegionId) -> usize {
        self.regions.get(&region).map_or(0, |region| {
            region
                .hosts()
                .iter()
                .filter_map(|host| self.hosts.get(host))
                .map(DockableHost::len)
                .sum()
        })
    }

    /// Number of dockables across all hosts of a floating window.
    pub fn window_dockable_count(&self, window: WindowId) -> usize {
        self.windows
            .get(&window)
            .map_or(0, |w| self.region_dockable_count(w.region()))
    }

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<DockEvent> {
        self.events.drain(..).collect()
    }

    // ------------------------------------------------------------------------------------------
    // Registries

    fn emit(&mut self, event: DockEvent) {
        log::trace!("event {event:?}");
        self.debug_log_event(format!("{event:?}"));
        self.events.push_back(event);
    }

    fn alloc_region(&mut self, window: Option<WindowId>) -> RegionId {
        let id = RegionId(self.region_ids.alloc());
        self.regions.insert(id, Region::new(id, window));
        self.register_region(id);
        id
    }

    /// Create an (empty) host belonging to `region` and register it as a dock target.
    ///
    /// The caller is responsible for putting the host into the region's tree.
    fn alloc_host(&mut self, region: RegionId) -> HostId {
        let id = HostId(self.host_ids.alloc());
        self.hosts.insert(id, DockableHost::new(id, region));
        self.register_target(id);
        self.emit(DockEvent::HostCreated(id));
        id
    }

    fn register_target(&mut self, host: HostId) {
        if !self.all_targets.contains(&host) {
            self.all_targets.push(host);
        }
    }

    fn deregister_target(&mut self, host: HostId) {
        self.all_targets.retain(|&h| h != host);
        if self.focused_target == Some(host) {
            let next = self.all_targets.first().copied();
            self.set_focused_target(next);
        }
    }

    fn register_region(&mut self, region: RegionId) {
        if self.regions.contains_key(&region) && !self.all_regions.contains(&region) {
            self.all_regions.push(region);
        }
    }

    fn deregister_region(&mut self, region: RegionId) {
        self.all_regions.retain(|&r| r != region);
    }

    fn promote_target(&mut self, host: HostId) {
        if let Some(index) = self.all_targets.iter().position(|&h| h == host) {
            self.all_targets.remove(index);
            self.all_targets.insert(0, host);
        }
    }

    /// Set the focused host. Notifies only when the value actually changes.
    pub fn set_focused_target(&mut self, target: Option<HostId>) -> bool {
        let target = target.filter(|host| self.hosts.contains_key(host));
        if let Some(host) = target {
            if self.options.promote_focused_target {
                self.promote_target(host);
            }
        }
        if self.focused_target == target {
            return false;
        }
        self.focused_target = target;
        log::debug!("focused target -> {target:?}");
        self.emit(DockEvent::FocusedTargetChanged(target));
        true
    }

    // ------------------------------------------------------------------------------------------
    // Dockables

    /// Create the dockable for `content`.
    ///
    /// Permission flags are copied once; title and tab customization stay bound to the content
    /// in both directions until the dockable is closed.
    pub fn create_dockable(
        &mut self,
        content: Rc<dyn DockableContent>,
    ) -> Result<DockableId, DockError> {
        if content.id().trim().is_empty() {
            return Err(DockError::InvalidArgument("dockable content has an empty id"));
        }
        let id = DockableId::new(content.id());
        if self.dockables.contains_key(&id) {
            return Err(DockError::DuplicateDockable(id));
        }

        let dockable = Dockable::new(content);
        log::debug!("create dockable {id} ({:?})", dockable.title());
        self.dockables.insert(id.clone(), dockable);
        Ok(id)
    }

    /// Drop a dockable from the context. Does not cascade host removal.
    fn drop_dockable(&mut self, id: &DockableId) -> bool {
        let Some(dockable) = self.dockables.remove(id) else {
            return false;
        };
        if let Some(host) = dockable.host {
            if let Some(host) = self.hosts.get_mut(&host) {
                host.remove(id);
            }
        }
        self.floating_windows.remove(id);
        self.emit(DockEvent::Closed(id.clone()));
        true
    }

    // ------------------------------------------------------------------------------------------
    // Host membership

    /// Append `dockable` to `host`, moving it out of its previous host first.
    ///
    /// No-op if it already is a member of `host`.
    pub fn add_dockable(&mut self, host: HostId, dockable: &DockableId) -> bool {
        if !self.hosts.contains_key(&host) {
            return false;
        }
        let Some(current) = self.dockables.get(dockable).map(Dockable::host) else {
            return false;
        };
        match current {
            Some(current) if current == host => return false,
            Some(current) => {
                self.remove_dockable(current, dockable);
            }
            None => {}
        }

        if !self.attach(host, dockable) {
            return false;
        }
        self.sync_floating_registration(dockable);
        self.refresh_title_of_host(host);
        self.after_mutation("add_dockable");
        true
    }

    /// Remove `dockable` from `host`. An emptied host removes itself from its tree.
    pub fn remove_dockable(&mut self, host: HostId, dockable: &DockableId) -> bool {
        let Some(h) = self.hosts.get_mut(&host) else {
            return false;
        };
        if !h.remove(dockable) {
            return false;
        }
        let now_empty = h.is_empty();

        if let Some(d) = self.dockables.get_mut(dockable) {
            if d.host == Some(host) {
                d.host = None;
            }
        }
        self.floating_windows.remove(dockable);
        log::debug!("remove dockable {dockable} from {host:?}");

        if now_empty {
            self.remove_host(host);
        } else {
            self.refresh_title_of_host(host);
        }
        self.after_mutation("remove_dockable");
        true
    }

    /// Make `dockable` the active member of `host`, adopting it first if needed.
    pub fn set_active_dockable(&mut self, host: HostId, dockable: &DockableId) -> bool {
        if !self.hosts.contains_key(&host) || !self.dockables.contains_key(dockable) {
            return false;
        }
        if self.host_of(dockable) != Some(host) && !self.add_dockable(host, dockable) {
            return false;
        }
        let Some(h) = self.hosts.get_mut(&host) else {
            return false;
        };
        let changed = h.active_dockable() != Some(dockable);
        h.set_active(dockable);
        if changed {
            self.refresh_title_of_host(host);
        }
        true
    }

    /// Insert into `host` and set the back-reference. The dockable must not be in another host.
    fn attach(&mut self, host: HostId, dockable: &DockableId) -> bool {
        let (Some(h), Some(d)) = (self.hosts.get_mut(&host), self.dockables.get_mut(dockable))
        else {
            return false;
        };
        h.insert(dockable.clone());
        d.host = Some(host);
        true
    }

    /// Keep the floating registry in line with where `dockable` lives now.
    fn sync_floating_registration(&mut self, dockable: &DockableId) {
        match self.host_of(dockable).and_then(|host| self.window_of_host(host)) {
            Some(window) => {
                self.floating_windows.insert(dockable.clone(), window);
            }
            None => {
                self.floating_windows.remove(dockable);
            }
        }
    }

    /// Remove `host` from the registries and its tree, closing an emptied floating window.
    fn remove_host(&mut self, host: HostId) {
        let Some(removed) = self.hosts.remove(&host) else {
            return;
        };
        for dockable in removed.dockables() {
            if let Some(d) = self.dockables.get_mut(dockable) {
                if d.host == Some(host) {
                    d.host = None;
                }
            }
        }

        let region_id = removed.region();
        let emptied_window = match self.regions.get_mut(&region_id) {
            Some(region) => {
                region.remove_dockable_area(host);
                region.window().filter(|_| region.is_empty())
            }
            None => None,
        };

        self.deregister_target(host);
        log::debug!("remove host {host:?} from {region_id:?}");
        self.emit(DockEvent::HostRemoved(host));

        if let Some(window) = emptied_window {
            self.close_window(window);
        } else if let Some(window) = self.regions.get(&region_id).and_then(Region::window) {
            self.refresh_window_title(window);
        }
    }

    // ------------------------------------------------------------------------------------------
    // Layout

    /// Split `host` along `direction`, returning the new empty host.
    ///
    /// Returns `host` itself (and changes nothing) when it cannot be split: unknown host, or
    /// [`DockingDirection::Center`].
    pub fn split_dockable_area(&mut self, host: HostId, direction: DockingDirection) -> HostId {
        let Some(region_id) = self.hosts.get(&host).map(DockableHost::region) else {
            return host;
        };
        let splittable = direction.is_side()
            && self
                .regions
                .get(&region_id)
                .is_some_and(|region| region.contains_host(host));
        if !splittable {
            return host;
        }

        let new_host = self.alloc_host(region_id);
        let ratio = self.options.clamped_split_ratio();
        if let Some(region) = self.regions.get_mut(&region_id) {
            region.split_dockable_area(host, direction, new_host, ratio);
        }
        log::debug!("split {host:?} {direction:?} -> {new_host:?}");
        self.after_mutation("split_dockable_area");
        new_host
    }

    /// Remove an empty host from its tree. Hosts with dockables are left alone.
    pub fn remove_dockable_area(&mut self, host: HostId) -> bool {
        if !self.hosts.get(&host).is_some_and(DockableHost::is_empty) {
            return false;
        }
        self.remove_host(host);
        self.after_mutation("remove_dockable_area");
        true
    }

    /// Set the ratio of the split directly containing `host`.
    pub fn set_split_ratio(&mut self, host: HostId, ratio: f32) -> bool {
        let Some(region) = self.hosts.get(&host).map(DockableHost::region) else {
            return false;
        };
        self.regions
            .get_mut(&region)
            .is_some_and(|region| region.set_split_ratio(host, ratio))
    }

    /// Hand the screen rect of a region to the layout tree.
    pub fn layout_region(&mut self, region: RegionId, rect: Rect) -> bool {
        let Some(r) = self.regions.get_mut(&region) else {
            return false;
        };
        r.layout(rect);
        true
    }

    // ------------------------------------------------------------------------------------------
    // Dock / close

    /// Dock `dockable` into `target` and focus it.
    ///
    /// Steps, in order:
    /// 1. remove it from its current host,
    /// 2. if it was registered to another floating window that is now empty, close that window,
    /// 3. register it under the target's floating window, if any,
    /// 4. add it to the target and make it active there,
    /// 5. focus the target.
    ///
    /// No-op for an empty (unresolvable) target or an unknown dockable.
    pub fn dock(&mut self, dockable: &DockableId, target: impl Into<DockTarget>) -> bool {
        let Some(current) = self.dockables.get(dockable).map(Dockable::host) else {
            return false;
        };
        let target = target.into();
        let Some(target_host) = self.resolve_target(target) else {
            log::debug!("dock {dockable}: empty target {target:?}");
            return false;
        };

        if current == Some(target_host) {
            self.set_active_dockable(target_host, dockable);
            self.set_focused_target(Some(target_host));
            self.emit(DockEvent::Docked {
                dockable: dockable.clone(),
                host: target_host,
            });
            return true;
        }

        let previous_window = self.floating_window_of(dockable);
        let target_window = self.window_of_host(target_host);

        // 1
        if let Some(current) = current {
            self.remove_dockable(current, dockable);
        }

        // 2
        if let Some(window) = previous_window.filter(|&w| Some(w) != target_window) {
            self.floating_windows.remove(dockable);
            if self.windows.contains_key(&window) && self.window_dockable_count(window) == 0 {
                self.close_window(window);
            }
        }

        if !self.hosts.contains_key(&target_host) {
            log::debug!("dock {dockable}: target {target_host:?} vanished");
            return false;
        }

        // 3
        if let Some(window) = target_window {
            self.floating_windows.insert(dockable.clone(), window);
        }

        // 4
        self.attach(target_host, dockable);
        if let Some(host) = self.hosts.get_mut(&target_host) {
            host.set_active(dockable);
        }
        self.refresh_title_of_host(target_host);

        // 5
        self.set_focused_target(Some(target_host));

        log::debug!("dock {dockable} -> {target_host:?}");
        self.emit(DockEvent::Docked {
            dockable: dockable.clone(),
            host: target_host,
        });
        self.after_mutation("dock");
        true
    }

    /// Dock into `host` (`Center`) or into a new host split off `host` (sides).
    ///
    /// `None` is a no-op.
    pub fn dock_in_direction(
        &mut self,
        host: HostId,
        dockable: &DockableId,
        direction: Option<DockingDirection>,
    ) -> bool {
        let Some(direction) = direction else {
            return false;
        };
        if !self.hosts.contains_key(&host) || !self.dockables.contains_key(dockable) {
            return false;
        }
        match direction {
            DockingDirection::Center => self.dock(dockable, host),
            side => {
                let new_host = self.split_dockable_area(host, side);
                self.dock(dockable, new_host)
            }
        }
    }

    pub fn split_left(&mut self, host: HostId, dockable: &DockableId) -> bool {
        self.dock_in_direction(host, dockable, Some(DockingDirection::Left))
    }

    pub fn split_right(&mut self, host: HostId, dockable: &DockableId) -> bool {
        self.dock_in_direction(host, dockable, Some(DockingDirection::Right))
    }

    pub fn split_up(&mut self, host: HostId, dockable: &DockableId) -> bool {
        self.dock_in_direction(host, dockable, Some(DockingDirection::Top))
    }

    pub fn split_down(&mut self, host: HostId, dockable: &DockableId) -> bool {
        self.dock_in_direction(host, dockable, Some(DockingDirection::Bottom))
    }

    /// Close `dockable`.
    ///
    /// Refused when the dockable cannot be closed or its content vetoes the close. Closing the
    /// sole tenant of a floating window closes that window.
    pub fn close(&mut self, dockable: &DockableId) -> bool {
        let Some(d) = self.dockables.get(dockable) else {
            return false;
        };
        if !d.can_close() {
            log::debug!("close {dockable}: refused (can_close == false)");
            return false;
        }
        let content = Rc::clone(d.content());
        if !content.on_close() {
            log::debug!("close {dockable}: vetoed by content");
            return false;
        }

        if let Some(window) = self.floating_window_of(dockable) {
            if self.window_dockable_count(window) <= 1 {
                self.close_window(window);
            }
        }
        self.floating_windows.remove(dockable);

        if let Some(host) = self.host_of(dockable) {
            self.remove_dockable(host, dockable);
        }
        self.drop_dockable(dockable);
        log::debug!("closed {dockable}");
        self.after_mutation("close");
        true
    }

    /// Close every dockable of `host`. Returns how many were closed.
    pub fn close_all(&mut self, host: HostId) -> usize {
        self.close_members(host, None)
    }

    /// Close every dockable of `host` but `keep`. Returns how many were closed.
    pub fn close_all_except(&mut self, host: HostId, keep: &DockableId) -> usize {
        self.close_members(host, Some(keep))
    }

    fn close_members(&mut self, host: HostId, keep: Option<&DockableId>) -> usize {
        // Closing may remove the host (and more) mid-way: iterate over a snapshot.
        let members: Vec<DockableId> = self
            .hosts
            .get(&host)
            .map(|h| h.dockables().to_vec())
            .unwrap_or_default();

        members
            .iter()
            .filter(|d| Some(*d) != keep)
            .filter(|d| self.close(d))
            .count()
    }

    // ------------------------------------------------------------------------------------------
    // Serialization

    /// The shape of every registered region tree, keyed by region id.
    pub fn serialize(&self) -> SerializedLayout {
        SerializedLayout {
            layout_regions: self
                .all_regions
                .iter()
                .filter_map(|id| {
                    let region = self.regions.get(id)?;
                    Some((
                        *id,
                        LayoutTree {
                            root: region.root().cloned(),
                        },
                    ))
                })
                .collect(),
        }
    }

    /// Companion of [`Self::serialize`]: the dockables of every host, in tab order.
    pub fn host_membership(&self) -> BTreeMap<HostId, Vec<DockableId>> {
        self.hosts
            .iter()
            .map(|(id, host)| (*id, host.dockables().to_vec()))
            .collect()
    }
}
