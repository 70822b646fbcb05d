use std::rc::Rc;

use super::binding::{Observable, Subscription};
use super::command::DockCommand;
use super::content::{DockableContent, TabCustomization};
use super::types::{DockableId, HostId};

/// One content pane managed by a [`super::DockContext`].
///
/// The title and tab customization are live mirrors of the content's observables (both
/// directions). The bindings are torn down when the dockable is dropped.
pub struct Dockable {
    id: DockableId,
    title: Observable<String>,
    tab_customization: Observable<TabCustomization>,
    can_float: bool,
    can_close: bool,
    pub(super) host: Option<HostId>,
    content: Rc<dyn DockableContent>,
    _bindings: Vec<Subscription>,
}

impl std::fmt::Debug for Dockable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dockable")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("can_float", &self.can_float)
            .field("can_close", &self.can_close)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl Dockable {
    pub(super) fn new(content: Rc<dyn DockableContent>) -> Self {
        let title = Observable::new(String::new());
        let tab_customization = Observable::default();

        let mut bindings = Vec::with_capacity(4);
        bindings.extend(content.title().bind_two_way(&title));
        bindings.extend(content.tab_customization().bind_two_way(&tab_customization));

        Self {
            id: DockableId::new(content.id()),
            title,
            tab_customization,
            can_float: content.can_float(),
            can_close: content.can_close(),
            host: None,
            content,
            _bindings: bindings,
        }
    }

    pub fn id(&self) -> &DockableId {
        &self.id
    }

    pub fn title(&self) -> String {
        self.title.get()
    }

    /// Rename the tab. The content sees the new title too.
    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(title.into());
    }

    pub(super) fn title_observable(&self) -> &Observable<String> {
        &self.title
    }

    pub fn tab_customization(&self) -> TabCustomization {
        self.tab_customization.get()
    }

    pub fn set_tab_customization(&self, tab_customization: TabCustomization) {
        self.tab_customization.set(tab_customization);
    }

    pub fn can_float(&self) -> bool {
        self.can_float
    }

    pub fn can_close(&self) -> bool {
        self.can_close
    }

    /// The host currently containing this dockable, if any.
    pub fn host(&self) -> Option<HostId> {
        self.host
    }

    pub fn content(&self) -> &Rc<dyn DockableContent> {
        &self.content
    }

    /// The action bound to the dockable's default trigger (e.g. a title-bar button).
    pub fn default_command(&self) -> DockCommand {
        DockCommand::Float {
            dockable: self.id.clone(),
        }
    }
}
