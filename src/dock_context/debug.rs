use itertools::Itertools as _;

use super::DockContext;
use super::region::Node;

fn debug_node_summary(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Leaf(host) => lines.push(format!("{indent}Leaf({})", host.value())),
        Node::Split {
            orientation,
            ratio,
            first,
            second,
        } => {
            lines.push(format!("{indent}Split({orientation:?}, {ratio:.2})"));
            debug_node_summary(first, depth + 1, lines);
            debug_node_summary(second, depth + 1, lines);
        }
    }
}

impl DockContext {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message.into());
    }

    pub(super) fn debug_integrity_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_integrity {
            return;
        }
        self.push_debug_log_line(message.into());
    }

    fn push_debug_log_line(&mut self, message: String) {
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[mutation {}] {}", self.debug_mutation, message));
    }

    /// The debug ring buffer, oldest line first.
    pub fn debug_log_text(&self) -> String {
        self.debug_log.iter().join("\n")
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// A human readable dump of every region tree and host, for bug reports.
    pub fn debug_summary(&self) -> String {
        let mut lines = Vec::new();
        for region_id in &self.all_regions {
            let Some(region) = self.regions.get(region_id) else {
                lines.push(format!("region {} MISSING", region_id.value()));
                continue;
            };
            let owner = match region.window() {
                Some(window) => format!("window {}", window.value()),
                None => "main".to_owned(),
            };
            lines.push(format!("region {} ({owner})", region_id.value()));
            match region.root() {
                Some(root) => debug_node_summary(root, 1, &mut lines),
                None => lines.push("  (empty)".to_owned()),
            }
        }

        for (id, host) in &self.hosts {
            let active = host.active_dockable().map_or("-", |d| d.as_str());
            lines.push(format!(
                "host {} [{}] active={active}",
                id.value(),
                host.dockables().iter().join(", ")
            ));
        }

        lines.push(format!(
            "targets={:?} focused={:?}",
            self.all_targets.iter().map(|h| h.value()).collect_vec(),
            self.focused_target.map(|h| h.value())
        ));
        lines.join("\n")
    }
}
