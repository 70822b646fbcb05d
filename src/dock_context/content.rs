use std::any::Any;

use egui::Color32;

use super::binding::Observable;

/// Per-tab presentation hints, owned by the content and mirrored onto its dockable.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabCustomization {
    /// Icon name understood by the renderer.
    pub icon: Option<String>,

    /// Accent color of the tab (e.g. a "modified" marker).
    pub accent: Option<Color32>,

    /// Show the close button only while hovered.
    pub close_button_on_hover: bool,
}

/// What the application hands to [`super::DockContext::create_dockable`].
///
/// The context never inspects or drops the payload behind it: it only reads the identity and
/// permission flags once, binds to the observable title and tab customization, and calls
/// [`Self::on_close`] before closing.
pub trait DockableContent {
    fn id(&self) -> &str;

    fn title(&self) -> &Observable<String>;

    fn tab_customization(&self) -> &Observable<TabCustomization>;

    fn can_float(&self) -> bool {
        true
    }

    fn can_close(&self) -> bool {
        true
    }

    /// Pre-close hook. Return `false` to veto the close (e.g. unsaved changes).
    fn on_close(&self) -> bool {
        true
    }

    /// Access the application payload (see [`SimpleContent::payload`]).
    fn as_any(&self) -> &dyn Any;
}

/// Ready-made [`DockableContent`] wrapping an application payload.
pub struct SimpleContent<Payload> {
    id: String,
    title: Observable<String>,
    tab_customization: Observable<TabCustomization>,
    can_float: bool,
    can_close: bool,
    close_hook: Option<Box<dyn Fn(&Payload) -> bool>>,
    payload: Payload,
}

impl<Payload: std::fmt::Debug> std::fmt::Debug for SimpleContent<Payload> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleContent")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("can_float", &self.can_float)
            .field("can_close", &self.can_close)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

impl<Payload> SimpleContent<Payload> {
    pub fn new(id: impl Into<String>, title: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            title: Observable::new(title.into()),
            tab_customization: Observable::default(),
            can_float: true,
            can_close: true,
            close_hook: None,
            payload,
        }
    }

    #[must_use]
    pub fn with_can_float(mut self, can_float: bool) -> Self {
        self.can_float = can_float;
        self
    }

    #[must_use]
    pub fn with_can_close(mut self, can_close: bool) -> Self {
        self.can_close = can_close;
        self
    }

    #[must_use]
    pub fn with_tab_customization(self, tab_customization: TabCustomization) -> Self {
        self.tab_customization.set(tab_customization);
        self
    }

    /// Install a pre-close hook; returning `false` vetoes the close.
    #[must_use]
    pub fn with_close_hook(mut self, hook: impl Fn(&Payload) -> bool + 'static) -> Self {
        self.close_hook = Some(Box::new(hook));
        self
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(title.into());
    }
}

impl<Payload: 'static> DockableContent for SimpleContent<Payload> {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &Observable<String> {
        &self.title
    }

    fn tab_customization(&self) -> &Observable<TabCustomization> {
        &self.tab_customization
    }

    fn can_float(&self) -> bool {
        self.can_float
    }

    fn can_close(&self) -> bool {
        self.can_close
    }

    fn on_close(&self) -> bool {
        self.close_hook
            .as_ref()
            .is_none_or(|hook| hook(&self.payload))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
