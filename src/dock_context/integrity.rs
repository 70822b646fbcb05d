use std::collections::BTreeMap;
use std::hash::{Hash as _, Hasher as _};

use itertools::Itertools as _;

use super::DockContext;
use super::region::Region;
use super::types::{HostId, RegionId};

/// Issues local to one layout tree: every leaf is a live host that belongs to this region, and
/// appears once.
fn region_integrity_issues(ctx: &DockContext, region: &Region) -> Vec<String> {
    let mut issues = Vec::new();
    let leaves = region.hosts();

    for host in leaves.iter().duplicates() {
        issues.push(format!(
            "integrity: region {:?} has duplicate leaf {host:?}",
            region.id()
        ));
    }

    for host_id in &leaves {
        match ctx.hosts.get(host_id) {
            None => issues.push(format!(
                "integrity: region {:?} leaf {host_id:?} has no host",
                region.id()
            )),
            Some(host) if host.region() != region.id() => issues.push(format!(
                "integrity: leaf {host_id:?} in region {:?} but host says {:?}",
                region.id(),
                host.region()
            )),
            Some(_) => {}
        }
    }

    match region.window() {
        Some(window) => {
            if !ctx.windows.contains_key(&window) {
                issues.push(format!(
                    "integrity: region {:?} owned by missing window {window:?}",
                    region.id()
                ));
            }
            if region.is_empty() {
                issues.push(format!(
                    "integrity: floating region {:?} is empty but window {window:?} is open",
                    region.id()
                ));
            }
        }
        None if region.id() != ctx.main_region => issues.push(format!(
            "integrity: region {:?} has no window and is not the main region",
            region.id()
        )),
        None => {}
    }

    issues
}

pub(super) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}

impl DockContext {
    /// Every violated structural invariant, as one line each. Empty means consistent.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        // Membership and back-references.
        let mut member_of: BTreeMap<&_, HostId> = BTreeMap::new();
        for (host_id, host) in &self.hosts {
            for dockable in host.dockables().iter().duplicates() {
                issues.push(format!(
                    "integrity: host {host_id:?} lists {dockable} twice"
                ));
            }
            for dockable in host.dockables() {
                if let Some(prev) = member_of.insert(dockable, *host_id) {
                    issues.push(format!(
                        "integrity: {dockable} is in hosts {prev:?} and {host_id:?}"
                    ));
                }
                match self.dockables.get(dockable) {
                    None => issues.push(format!(
                        "integrity: host {host_id:?} lists unknown dockable {dockable}"
                    )),
                    Some(d) if d.host() != Some(*host_id) => issues.push(format!(
                        "integrity: {dockable} in host {host_id:?} points at {:?}",
                        d.host()
                    )),
                    Some(_) => {}
                }
            }

            match (host.active_dockable(), host.is_empty()) {
                (None, false) => {
                    issues.push(format!("integrity: non-empty host {host_id:?} has no active"));
                }
                (Some(active), _) if !host.contains(active) => issues.push(format!(
                    "integrity: host {host_id:?} active {active} is not a member"
                )),
                _ => {}
            }

            let in_tree = self
                .regions
                .get(&host.region())
                .is_some_and(|region| region.contains_host(*host_id));
            if !in_tree {
                issues.push(format!(
                    "integrity: host {host_id:?} is not a leaf of its region {:?}",
                    host.region()
                ));
            }
        }

        for (id, dockable) in &self.dockables {
            if let Some(host) = dockable.host() {
                if member_of.get(id) != Some(&host) {
                    issues.push(format!(
                        "integrity: {id} points at host {host:?} which does not list it"
                    ));
                }
            }
        }

        // Layout trees and windows.
        for region in self.regions.values() {
            issues.extend(region_integrity_issues(self, region));
        }
        for (window_id, window) in &self.windows {
            let owner = self.regions.get(&window.region()).and_then(Region::window);
            if owner != Some(*window_id) {
                issues.push(format!(
                    "integrity: window {window_id:?} region {:?} is owned by {owner:?}",
                    window.region()
                ));
            }
        }

        // Registries.
        for host in self.all_targets.iter().duplicates() {
            issues.push(format!("integrity: target {host:?} registered twice"));
        }
        let registered_targets = self.all_targets.iter().sorted().dedup().collect_vec();
        let live_hosts = self.hosts.keys().collect_vec();
        if registered_targets != live_hosts {
            issues.push(format!(
                "integrity: targets {registered_targets:?} != hosts {live_hosts:?}"
            ));
        }

        let registered_regions: Vec<&RegionId> =
            self.all_regions.iter().sorted().dedup().collect_vec();
        let live_regions = self.regions.keys().collect_vec();
        if registered_regions.len() != self.all_regions.len() || registered_regions != live_regions
        {
            issues.push(format!(
                "integrity: registered regions {:?} != regions {live_regions:?}",
                self.all_regions
            ));
        }

        if let Some(focused) = self.focused_target {
            if !self.hosts.contains_key(&focused) {
                issues.push(format!("integrity: focused target {focused:?} is gone"));
            }
        }

        // Floating registrations: exactly the dockables living in a floating window.
        for (dockable, window) in &self.floating_windows {
            let actual = self
                .host_of(dockable)
                .and_then(|host| self.window_of_host(host));
            if actual != Some(*window) {
                issues.push(format!(
                    "integrity: {dockable} registered to {window:?} but lives in {actual:?}"
                ));
            }
        }
        for (id, dockable) in &self.dockables {
            let Some(window) = dockable.host().and_then(|host| self.window_of_host(host)) else {
                continue;
            };
            if !self.floating_windows.contains_key(id) {
                issues.push(format!(
                    "integrity: {id} lives in {window:?} but is not registered"
                ));
            }
        }

        issues
    }

    /// Bookkeeping after a structural mutation: bump the mutation counter and, in debug mode,
    /// check (and report) integrity.
    pub(super) fn after_mutation(&mut self, what: &str) {
        self.debug_mutation = self.debug_mutation.wrapping_add(1);
        if !self.options.debug_integrity {
            return;
        }

        let issues = self.integrity_issues();
        let hash = hash_issues(&issues);
        let prev = self.debug_last_integrity_hash.replace(hash);
        if prev == Some(hash) {
            return;
        }

        if issues.is_empty() {
            if prev.is_some() {
                self.debug_integrity_log_event(format!("integrity OK after {what}"));
            }
            return;
        }

        log::warn!(
            "dock integrity failure after {what}:\n{}",
            issues.iter().join("\n")
        );
        self.debug_integrity_log_event(format!(
            "integrity FAIL after {what} issues={}",
            issues.len()
        ));
        for issue in &issues {
            self.debug_integrity_log_event(issue.clone());
        }
        let summary = self.debug_summary();
        self.debug_integrity_log_event(format!("integrity summary:\n{summary}"));

        if self.options.debug_integrity_panic && cfg!(debug_assertions) {
            panic!(
                "dock integrity failure after {what}\n{}",
                issues.join("\n")
            );
        }
    }
}
