use super::DockContext;
use super::picker::DockingDirection;
use super::types::{DockableId, HostId};

/// Actions external triggers (buttons, menus, shortcuts) can bind to without holding any
/// other wiring than the ids involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockCommand {
    /// Detach into a new floating window (the default action of every dockable).
    Float { dockable: DockableId },

    Close { dockable: DockableId },

    CloseAll { host: HostId },

    CloseAllExcept { host: HostId, keep: DockableId },

    /// Dock `dockable` into `host` (`Center`) or into a new host split off `host`.
    Split {
        host: HostId,
        dockable: DockableId,
        direction: DockingDirection,
    },

    Activate { host: HostId, dockable: DockableId },
}

impl DockContext {
    /// Run `command`. Returns `false` if it turned out to be a no-op.
    pub fn execute(&mut self, command: DockCommand) -> bool {
        log::debug!("execute {command:?}");
        match command {
            DockCommand::Float { dockable } => self.float(&dockable, 0.0, 0.0).is_some(),
            DockCommand::Close { dockable } => self.close(&dockable),
            DockCommand::CloseAll { host } => self.close_all(host) > 0,
            DockCommand::CloseAllExcept { host, keep } => self.close_all_except(host, &keep) > 0,
            DockCommand::Split {
                host,
                dockable,
                direction,
            } => self.dock_in_direction(host, &dockable, Some(direction)),
            DockCommand::Activate { host, dockable } => self.set_active_dockable(host, &dockable),
        }
    }
}
