use std::rc::Rc;

use super::content::DockableContent;
use super::types::DockableId;

/// Maps dockable ids back to live content when a layout is restored.
///
/// Layout snapshots store only [`DockableId`]s, never the content itself. The application decides
/// how to produce content for an id (lazy loading, placeholders, migrations...). Return `None` to
/// drop a dockable that no longer exists; its host is pruned if that leaves it empty.
pub trait ContentRegistry {
    fn try_content_from_id(&mut self, id: &DockableId) -> Option<Rc<dyn DockableContent>>;
}

/// Convenience helper: build a [`ContentRegistry`] from a closure.
pub struct SimpleContentRegistry<FromId> {
    pub from_id: FromId,
}

impl<FromId> SimpleContentRegistry<FromId> {
    pub fn new(from_id: FromId) -> Self {
        Self { from_id }
    }
}

impl<FromId> ContentRegistry for SimpleContentRegistry<FromId>
where
    FromId: FnMut(&DockableId) -> Option<Rc<dyn DockableContent>>,
{
    fn try_content_from_id(&mut self, id: &DockableId) -> Option<Rc<dyn DockableContent>> {
        (self.from_id)(id)
    }
}
