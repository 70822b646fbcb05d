//! Docking layout core: dockable panes grouped in tabbed hosts, hosts arranged in binary split
//! trees, floating host windows, drag-and-drop docking decisions and layout persistence.
//!
//! Rendering is left to the application: it lays regions out with
//! [`DockContext::layout_region`], draws hosts and their [`DockFeedback`], and forwards platform
//! window events back to the [`DockContext`].

#![forbid(unsafe_code)]

pub mod dock_builder;
pub mod dock_context;

pub use dock_builder::{DockBuilder, DockNodeId, SplitDirection};
pub use dock_context::{
    ContentRegistry, DefaultWindowFactory, DockCommand, DockContext, DockContextOptions,
    DockError, DockEvent, DockFeedback, DockTarget, Dockable, DockableContent, DockableHost,
    DockableId, DockingDirection, DockingPicker, HeadlessWindow, HostId, HostWindow,
    HostWindowFactory, Node, Observable, Orientation, PlatformWindow, Region, RegionId,
    SerializedLayout, SimpleContent, SimpleContentRegistry, Subscription, TabCustomization,
    WindowId,
};
pub use dock_context::{
    HostSnapshot, LAYOUT_SNAPSHOT_VERSION, LayoutPersistenceError, LayoutSnapshot, LayoutTree,
    WindowSnapshot,
};
