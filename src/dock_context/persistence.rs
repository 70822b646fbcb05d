use std::collections::BTreeMap;

#[cfg(feature = "persistence")]
use std::path::Path;

use egui::{Pos2, Vec2};

use super::content_registry::ContentRegistry;
use super::host::DockableHost;
use super::region::{Node, Region};
use super::types::{DockEvent, DockableId, HostId, RegionId, WindowId};
use super::window::{DefaultWindowFactory, HostWindow, HostWindowFactory};
use super::{DockContext, DockContextOptions};

pub const LAYOUT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum LayoutPersistenceError {
    UnsupportedVersion { found: u32, expected: u32 },

    /// The snapshot has no tree for the region it names as main.
    UnknownMainRegion(RegionId),

    #[cfg(feature = "persistence")]
    RonSerialize(ron::Error),

    #[cfg(feature = "persistence")]
    RonDeserialize(ron::error::SpannedError),

    Io(std::io::Error),
}

impl std::fmt::Display for LayoutPersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported layout snapshot version: {found} (expected {expected})"
                )
            }
            Self::UnknownMainRegion(region) => {
                write!(f, "main region {} missing from snapshot", region.value())
            }
            #[cfg(feature = "persistence")]
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            #[cfg(feature = "persistence")]
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for LayoutPersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. } | Self::UnknownMainRegion(_) => None,
            #[cfg(feature = "persistence")]
            Self::RonSerialize(err) => Some(err),
            #[cfg(feature = "persistence")]
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LayoutPersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "persistence")]
impl From<ron::Error> for LayoutPersistenceError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

#[cfg(feature = "persistence")]
impl From<ron::error::SpannedError> for LayoutPersistenceError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

/// The shape of one region tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutTree {
    pub root: Option<Node>,
}

/// Shape of every registered region tree, keyed by region id. See [`DockContext::serialize`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializedLayout {
    pub layout_regions: BTreeMap<RegionId, LayoutTree>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostSnapshot {
    /// Tab order.
    pub dockables: Vec<DockableId>,
    pub active: Option<DockableId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub region: RegionId,
    pub position: Pos2,
    pub size: Vec2,
}

/// Everything needed to rebuild an arrangement. Content is referenced by id only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSnapshot {
    pub version: u32,
    pub main_region: RegionId,
    pub layout: SerializedLayout,
    pub hosts: BTreeMap<HostId, HostSnapshot>,
    pub windows: Vec<WindowSnapshot>,

    /// Dock targets, most recently focused first.
    pub targets: Vec<HostId>,
    pub focused_target: Option<HostId>,
}

impl LayoutSnapshot {
    fn validate(&self) -> Result<(), LayoutPersistenceError> {
        if self.version != LAYOUT_SNAPSHOT_VERSION {
            return Err(LayoutPersistenceError::UnsupportedVersion {
                found: self.version,
                expected: LAYOUT_SNAPSHOT_VERSION,
            });
        }
        if !self.layout.layout_regions.contains_key(&self.main_region) {
            return Err(LayoutPersistenceError::UnknownMainRegion(self.main_region));
        }
        Ok(())
    }
}

#[cfg(feature = "persistence")]
fn pretty_ron_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(128)
        .separate_tuple_members(true)
        .enumerate_arrays(true)
}

impl DockContext {
    pub fn snapshot_layout(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            version: LAYOUT_SNAPSHOT_VERSION,
            main_region: self.main_region,
            layout: self.serialize(),
            hosts: self
                .hosts
                .iter()
                .map(|(id, host)| {
                    (
                        *id,
                        HostSnapshot {
                            dockables: host.dockables().to_vec(),
                            active: host.active_dockable().cloned(),
                        },
                    )
                })
                .collect(),
            windows: self
                .windows
                .values()
                .map(|w| WindowSnapshot {
                    id: w.id(),
                    region: w.region(),
                    position: w.position(),
                    size: w.size(),
                })
                .collect(),
            targets: self.all_targets.clone(),
            focused_target: self.focused_target,
        }
    }

    /// Build a context from `snapshot`, asking `registry` for the content of every dockable.
    ///
    /// Dockables the registry does not know are dropped. A host that loses every dockable it was
    /// saved with is pruned (collapsing its parent split); hosts saved empty are kept. Floating
    /// windows left without any host are not opened.
    pub fn from_snapshot(
        snapshot: &LayoutSnapshot,
        registry: &mut impl ContentRegistry,
        options: DockContextOptions,
    ) -> Result<Self, LayoutPersistenceError> {
        snapshot.validate()?;
        Ok(Self::restore(
            snapshot,
            registry,
            options,
            Box::new(DefaultWindowFactory),
        ))
    }

    /// Replace the whole arrangement with `snapshot`. Options and window factory are kept.
    ///
    /// On error nothing changes.
    pub fn load_layout_snapshot(
        &mut self,
        snapshot: &LayoutSnapshot,
        registry: &mut impl ContentRegistry,
    ) -> Result<(), LayoutPersistenceError> {
        snapshot.validate()?;

        for window in self.windows.values_mut() {
            window.close_platform();
        }
        let factory = std::mem::replace(&mut self.window_factory, Box::new(DefaultWindowFactory));
        *self = Self::restore(snapshot, registry, self.options.clone(), factory);
        Ok(())
    }

    fn restore(
        snapshot: &LayoutSnapshot,
        registry: &mut impl ContentRegistry,
        options: DockContextOptions,
        window_factory: Box<dyn HostWindowFactory>,
    ) -> Self {
        let mut ctx = Self::bare(options);
        ctx.window_factory = window_factory;
        ctx.main_region = snapshot.main_region;

        let window_of_region: BTreeMap<RegionId, &WindowSnapshot> =
            snapshot.windows.iter().map(|w| (w.region, w)).collect();

        for (region_id, tree) in &snapshot.layout.layout_regions {
            let window = if *region_id == snapshot.main_region {
                None
            } else if let Some(window) = window_of_region.get(region_id) {
                Some(**window)
            } else {
                log::warn!("restore: region {region_id:?} has no window, skipping");
                continue;
            };
            if let Some(window) = &window {
                if ctx.windows.contains_key(&window.id) {
                    log::warn!("restore: window {:?} listed twice, skipping", window.id);
                    continue;
                }
            }

            ctx.region_ids.reserve(region_id.value());
            ctx.regions
                .insert(*region_id, Region::new(*region_id, window.map(|w| w.id)));
            ctx.register_region(*region_id);

            let root = tree
                .root
                .as_ref()
                .and_then(|node| ctx.restore_node(node, *region_id, snapshot, registry));
            let empty = root.is_none();
            if let Some(region) = ctx.regions.get_mut(region_id) {
                region.set_root(root);
            }

            let Some(window) = window else {
                continue;
            };
            if empty {
                log::debug!("restore: window {:?} is empty, not opening it", window.id);
                ctx.regions.remove(region_id);
                ctx.deregister_region(*region_id);
                continue;
            }
            ctx.restore_window(window);
        }

        // Most recently focused first, as saved; anything not mentioned keeps creation order.
        let mut targets: Vec<HostId> = snapshot
            .targets
            .iter()
            .copied()
            .filter(|host| ctx.hosts.contains_key(host))
            .collect();
        for host in &ctx.all_targets {
            if !targets.contains(host) {
                targets.push(*host);
            }
        }
        ctx.all_targets = targets;

        if let Some(focused) = snapshot.focused_target {
            ctx.set_focused_target(Some(focused));
        }
        if ctx.regions.get(&ctx.main_region).is_some_and(Region::is_empty) {
            ctx.ensure_host(ctx.main_region);
        }

        log::debug!(
            "restored {} regions, {} hosts, {} dockables",
            ctx.regions.len(),
            ctx.hosts.len(),
            ctx.dockables.len()
        );
        ctx.after_mutation("restore");
        ctx
    }

    /// Rebuild a subtree bottom-up. `None` when every host in it lost all of its saved dockables.
    fn restore_node(
        &mut self,
        node: &Node,
        region: RegionId,
        snapshot: &LayoutSnapshot,
        registry: &mut impl ContentRegistry,
    ) -> Option<Node> {
        match node {
            Node::Leaf(host_id) => {
                if self.hosts.contains_key(host_id) {
                    log::warn!("restore: host {host_id:?} appears twice, skipping");
                    return None;
                }
                let saved = snapshot.hosts.get(host_id)?;

                let mut host = DockableHost::new(*host_id, region);
                for id in &saved.dockables {
                    if self.restore_dockable(id, registry) {
                        host.insert(id.clone());
                    }
                }
                // Hosts saved empty are reserved areas and survive; hosts emptied by missing
                // content are pruned.
                if host.is_empty() && !saved.dockables.is_empty() {
                    return None;
                }
                if let Some(active) = &saved.active {
                    host.set_active(active);
                }
                for id in host.dockables() {
                    if let Some(d) = self.dockables.get_mut(id) {
                        d.host = Some(*host_id);
                    }
                }

                self.host_ids.reserve(host_id.value());
                self.hosts.insert(*host_id, host);
                self.register_target(*host_id);
                self.emit(DockEvent::HostCreated(*host_id));
                Some(Node::Leaf(*host_id))
            }
            Node::Split {
                orientation,
                ratio,
                first,
                second,
            } => {
                let first = self.restore_node(first, region, snapshot, registry);
                let second = self.restore_node(second, region, snapshot, registry);
                let ratio = if ratio.is_finite() {
                    ratio.clamp(0.05, 0.95)
                } else {
                    0.5
                };
                match (first, second) {
                    (Some(first), Some(second)) => {
                        Some(Node::split(*orientation, ratio, first, second))
                    }
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            }
        }
    }

    /// Create the dockable for `id` unless it already exists in some host.
    fn restore_dockable(&mut self, id: &DockableId, registry: &mut impl ContentRegistry) -> bool {
        if self.dockables.contains_key(id) {
            log::warn!("restore: dockable {id} listed in more than one host, keeping the first");
            return false;
        }
        let Some(content) = registry.try_content_from_id(id) else {
            log::debug!("restore: dropping unknown dockable {id}");
            return false;
        };
        if content.id() != id.as_str() {
            log::warn!("restore: registry returned {:?} for {id}", content.id());
            return false;
        }
        match self.create_dockable(content) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("restore: {err}");
                false
            }
        }
    }

    fn restore_window(&mut self, saved: WindowSnapshot) {
        self.window_ids.reserve(saved.id.value());
        let size = saved.size.max(self.options.min_floating_size);
        let platform = self.window_factory.create(saved.id);
        let mut window = HostWindow::new(saved.id, saved.region, saved.position, size, platform);
        window.show();
        self.windows.insert(saved.id, window);

        let members: Vec<DockableId> = self
            .regions
            .get(&saved.region)
            .map(|r| r.hosts())
            .unwrap_or_default()
            .iter()
            .filter_map(|host| self.hosts.get(host))
            .flat_map(|host| host.dockables().iter().cloned())
            .collect();
        for dockable in members {
            self.floating_windows.insert(dockable, saved.id);
        }

        self.refresh_window_title(saved.id);
        self.emit(DockEvent::WindowOpened(saved.id));
    }

    #[cfg(feature = "persistence")]
    pub fn snapshot_layout_to_ron_string(&self) -> Result<String, LayoutPersistenceError> {
        let snapshot = self.snapshot_layout();
        Ok(ron::ser::to_string_pretty(&snapshot, pretty_ron_config())?)
    }

    #[cfg(feature = "persistence")]
    pub fn save_layout_to_ron_file(&self, path: impl AsRef<Path>) -> Result<(), LayoutPersistenceError> {
        let ron = self.snapshot_layout_to_ron_string()?;
        std::fs::write(path, ron)?;
        Ok(())
    }

    #[cfg(feature = "persistence")]
    pub fn load_layout_from_ron_str(
        &mut self,
        ron_str: &str,
        registry: &mut impl ContentRegistry,
    ) -> Result<(), LayoutPersistenceError> {
        let snapshot: LayoutSnapshot = ron::from_str(ron_str)?;
        self.load_layout_snapshot(&snapshot, registry)
    }

    #[cfg(feature = "persistence")]
    pub fn load_layout_from_ron_file(
        &mut self,
        path: impl AsRef<Path>,
        registry: &mut impl ContentRegistry,
    ) -> Result<(), LayoutPersistenceError> {
        let ron_str = std::fs::read_to_string(path)?;
        self.load_layout_from_ron_str(&ron_str, registry)
    }
}

#[cfg(all(test, feature = "persistence"))]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::dock_context::{
        DockableContent, DockingDirection, SimpleContent, SimpleContentRegistry,
    };

    fn content(id: &DockableId) -> Option<Rc<dyn DockableContent>> {
        Some(Rc::new(SimpleContent::new(id.as_str(), id.as_str().to_uppercase(), ())))
    }

    /// Main region: `a b | c`, plus a floating window holding `d`.
    fn sample() -> DockContext {
        let mut ctx = DockContext::new();
        let main = ctx.main_region();
        let left = ctx.ensure_host(main).unwrap();
        for id in ["a", "b", "c", "d"] {
            ctx.create_dockable(content(&id.into()).unwrap()).unwrap();
        }
        ctx.dock(&"a".into(), left);
        ctx.dock(&"b".into(), left);
        ctx.split_right(left, &"c".into());
        ctx.set_active_dockable(left, &"a".into());
        ctx.float(&"d".into(), 10.0, 20.0).unwrap();
        ctx
    }

    fn shape(ctx: &DockContext) -> (SerializedLayout, BTreeMap<HostId, Vec<DockableId>>) {
        (ctx.serialize(), ctx.host_membership())
    }

    #[test]
    fn ron_roundtrip_restores_layout() {
        let ctx = sample();
        let ron = ctx.snapshot_layout_to_ron_string().unwrap();

        let mut restored = DockContext::new();
        restored
            .load_layout_from_ron_str(&ron, &mut SimpleContentRegistry::new(content))
            .unwrap();

        assert_eq!(shape(&restored), shape(&ctx));
        assert_eq!(restored.all_targets(), ctx.all_targets());
        assert_eq!(restored.focused_target(), ctx.focused_target());
        assert_eq!(restored.floating_window_count(), 1);
        let window = restored.floating_window_of(&"d".into()).unwrap();
        assert_eq!(restored.window(window).unwrap().position(), egui::pos2(10.0, 20.0));
        assert_eq!(restored.window(window).unwrap().title(), "D");
        assert!(restored.integrity_issues().is_empty());

        let left = restored.host_of(&"a".into()).unwrap();
        assert_eq!(
            restored.host(left).unwrap().active_dockable(),
            Some(&DockableId::from("a"))
        );
    }

    #[test]
    fn json_roundtrip_of_snapshot() {
        let snapshot = sample().snapshot_layout();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn missing_content_is_dropped_on_load() {
        let ctx = sample();
        let snapshot = ctx.snapshot_layout();

        let mut registry = SimpleContentRegistry::new(|id: &DockableId| {
            if id.as_str() == "c" || id.as_str() == "d" {
                None
            } else {
                content(id)
            }
        });
        let restored =
            DockContext::from_snapshot(&snapshot, &mut registry, DockContextOptions::default())
                .unwrap();

        // The host of `c` is pruned and its split collapses; `d`'s window is never opened.
        let main = restored.region(restored.main_region()).unwrap();
        assert_eq!(main.hosts().len(), 1);
        assert!(matches!(main.root(), Some(Node::Leaf(_))));
        assert_eq!(restored.floating_window_count(), 0);
        assert!(restored.dockable(&"c".into()).is_none());
        assert_eq!(restored.dockables().count(), 2);
        assert!(restored.integrity_issues().is_empty());
    }

    #[test]
    fn hosts_saved_empty_survive_a_roundtrip() {
        let mut ctx = sample();
        let right = ctx.host_of(&"c".into()).unwrap();
        let reserved_main = ctx.split_dockable_area(right, DockingDirection::Bottom);
        let floating = ctx.host_of(&"d".into()).unwrap();
        let reserved_window = ctx.split_dockable_area(floating, DockingDirection::Right);
        assert!(ctx.integrity_issues().is_empty());

        let ron = ctx.snapshot_layout_to_ron_string().unwrap();
        let mut restored = DockContext::new();
        restored
            .load_layout_from_ron_str(&ron, &mut SimpleContentRegistry::new(content))
            .unwrap();

        assert_eq!(shape(&restored), shape(&ctx));
        assert!(restored.host(reserved_main).unwrap().is_empty());
        assert!(restored.host(reserved_window).unwrap().is_empty());
        assert_eq!(restored.window_of_host(reserved_window), restored.floating_window_of(&"d".into()));
        assert!(restored.integrity_issues().is_empty());
    }

    #[test]
    fn unsupported_version_leaves_context_untouched() {
        let mut snapshot = sample().snapshot_layout();
        snapshot.version = 999;

        let mut ctx = sample();
        let before = shape(&ctx);
        let err = ctx
            .load_layout_snapshot(&snapshot, &mut SimpleContentRegistry::new(content))
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutPersistenceError::UnsupportedVersion { found: 999, .. }
        ));
        assert_eq!(shape(&ctx), before);
    }

    #[test]
    fn unknown_main_region_is_an_error() {
        let mut snapshot = sample().snapshot_layout();
        snapshot.main_region = RegionId(4242);
        let err = DockContext::from_snapshot(
            &snapshot,
            &mut SimpleContentRegistry::new(content),
            DockContextOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutPersistenceError::UnknownMainRegion(_)));
    }

    #[test]
    fn ids_allocated_after_restore_do_not_collide() {
        let ctx = sample();
        let snapshot = ctx.snapshot_layout();
        let mut restored = DockContext::from_snapshot(
            &snapshot,
            &mut SimpleContentRegistry::new(content),
            DockContextOptions::default(),
        )
        .unwrap();

        let host = restored.host_of(&"a".into()).unwrap();
        let fresh = restored.split_dockable_area(host, DockingDirection::Bottom);
        assert!(!snapshot.hosts.contains_key(&fresh));

        restored.create_dockable(content(&"e".into()).unwrap()).unwrap();
        let window = restored.float(&"e".into(), 0.0, 0.0).unwrap();
        assert!(snapshot.windows.iter().all(|w| w.id != window));
        assert!(restored.integrity_issues().is_empty());
    }
}
