use std::cell::RefCell;
use std::rc::Rc;

use egui::{Pos2, Vec2};

use super::binding::{Observable, Subscription};
use super::types::{RegionId, WindowId};

/// The platform side of a floating host window (window chrome, OS window, egui viewport...).
///
/// The context only asks it to show, close and retitle itself. User-initiated closing and
/// activation are reported back through [`super::DockContext::on_window_closing`] and
/// [`super::DockContext::on_window_activated`].
pub trait PlatformWindow {
    fn show(&mut self, position: Pos2, size: Vec2);

    fn close(&mut self);

    fn set_title(&mut self, _title: &str) {}
}

/// Creates the platform window for every new floating [`HostWindow`].
pub trait HostWindowFactory {
    fn create(&mut self, window: WindowId) -> Box<dyn PlatformWindow>;
}

impl<F> HostWindowFactory for F
where
    F: FnMut(WindowId) -> Box<dyn PlatformWindow>,
{
    fn create(&mut self, window: WindowId) -> Box<dyn PlatformWindow> {
        self(window)
    }
}

/// The standard window produced by [`DefaultWindowFactory`]: it only records its state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessWindow {
    pub visible: bool,
    pub position: Option<Pos2>,
    pub size: Option<Vec2>,
    pub title: String,
}

impl PlatformWindow for HeadlessWindow {
    fn show(&mut self, position: Pos2, size: Vec2) {
        self.visible = true;
        self.position = Some(position);
        self.size = Some(size);
    }

    fn close(&mut self) {
        self.visible = false;
    }

    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultWindowFactory;

impl HostWindowFactory for DefaultWindowFactory {
    fn create(&mut self, _window: WindowId) -> Box<dyn PlatformWindow> {
        Box::<HeadlessWindow>::default()
    }
}

/// Title and platform handle of a [`HostWindow`], shared with the title subscription so a
/// renamed dockable reaches the platform window without a structural change.
struct WindowChrome {
    title: String,
    platform: Box<dyn PlatformWindow>,
}

impl WindowChrome {
    fn set_title(&mut self, title: &str) {
        if self.title == title {
            return;
        }
        self.platform.set_title(title);
        title.clone_into(&mut self.title);
    }
}

/// A floating top-level container wrapping one region tree.
pub struct HostWindow {
    id: WindowId,
    region: RegionId,
    pub(super) position: Pos2,
    pub(super) size: Vec2,
    chrome: Rc<RefCell<WindowChrome>>,

    /// Live link to the title of the dockable the window is named after.
    title_source: Option<Subscription>,
}

impl std::fmt::Debug for HostWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostWindow")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("title", &self.chrome.borrow().title)
            .finish_non_exhaustive()
    }
}

impl HostWindow {
    pub(super) fn new(
        id: WindowId,
        region: RegionId,
        position: Pos2,
        size: Vec2,
        platform: Box<dyn PlatformWindow>,
    ) -> Self {
        Self {
            id,
            region,
            position,
            size,
            chrome: Rc::new(RefCell::new(WindowChrome {
                title: String::new(),
                platform,
            })),
            title_source: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn title(&self) -> String {
        self.chrome.borrow().title.clone()
    }

    pub(super) fn show(&mut self) {
        let (position, size) = (self.position, self.size);
        self.chrome.borrow_mut().platform.show(position, size);
    }

    pub(super) fn close_platform(&mut self) {
        self.title_source = None;
        self.chrome.borrow_mut().platform.close();
    }

    /// Show `title` now and, with a `source`, keep following it until the next call.
    pub(super) fn follow_title(&mut self, title: &str, source: Option<&Observable<String>>) {
        self.title_source = None;
        self.chrome.borrow_mut().set_title(title);

        self.title_source = source.map(|source| {
            let chrome = Rc::downgrade(&self.chrome);
            source.subscribe(move |title| {
                if let Some(chrome) = chrome.upgrade() {
                    chrome.borrow_mut().set_title(title);
                }
            })
        });
    }
}
