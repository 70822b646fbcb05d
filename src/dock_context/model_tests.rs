use std::rc::Rc;

use egui::{Rect, Vec2, pos2};

use super::*;

fn assert_ctx_ok(ctx: &DockContext, seed: u64, step: usize, op: &str) {
    let issues = ctx.integrity_issues();
    assert!(
        issues.is_empty(),
        "seed {seed} step {step} ({op}) integrity failed:\n{}\n{}",
        issues.join("\n"),
        ctx.debug_summary()
    );
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        // Simple LCG: deterministic, fast, no dependency.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0 >> 16
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() & 1) != 0
    }

    fn pick<T: Clone>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        Some(items[self.next_usize(items.len())].clone())
    }

    fn direction(&mut self) -> DockingDirection {
        DockingDirection::ALL[self.next_usize(DockingDirection::ALL.len())]
    }
}

/// Every fourth dockable vetoes closing, every fifth cannot be closed, every seventh cannot float.
fn new_content(n: usize) -> Rc<dyn DockableContent> {
    Rc::new(
        SimpleContent::new(format!("pane{n}"), format!("Pane {n}"), n)
            .with_close_hook(|n: &usize| n % 4 != 3)
            .with_can_close(n % 5 != 4)
            .with_can_float(n % 7 != 6),
    )
}

fn dockable_ids(ctx: &DockContext) -> Vec<DockableId> {
    ctx.dockables().map(|d| d.id().clone()).collect()
}

fn window_ids(ctx: &DockContext) -> Vec<WindowId> {
    ctx.windows().map(HostWindow::id).collect()
}

#[test]
fn model_random_operations_keep_integrity() {
    for seed in 1u64..=16u64 {
        let mut rng = Rng::new(seed);
        let mut ctx = DockContext::new();
        let mut created = 0usize;

        for _ in 0..6 {
            ctx.create_dockable(new_content(created)).unwrap();
            created += 1;
        }
        assert_ctx_ok(&ctx, seed, 0, "setup");

        for step in 1..=300usize {
            let hosts = ctx.all_targets().to_vec();
            let dockables = dockable_ids(&ctx);
            let windows = window_ids(&ctx);

            let op = match rng.next_usize(14) {
                0 | 1 => {
                    if let (Some(d), Some(h)) = (rng.pick(&dockables), rng.pick(&hosts)) {
                        ctx.dock(&d, h);
                    }
                    "dock"
                }
                2 => {
                    if let Some(d) = rng.pick(&dockables) {
                        let target = match rng.pick(&windows) {
                            Some(w) if rng.next_bool() => DockTarget::Window(w),
                            _ => DockTarget::Region(ctx.main_region()),
                        };
                        ctx.dock(&d, target);
                    }
                    "dock_target"
                }
                3 => {
                    if let Some(d) = rng.pick(&dockables) {
                        ctx.float(&d, 10.0, 10.0);
                    }
                    "float"
                }
                4 => {
                    if let Some(d) = rng.pick(&dockables) {
                        ctx.close(&d);
                    }
                    "close"
                }
                5 => {
                    if let (Some(d), Some(h)) = (rng.pick(&dockables), rng.pick(&hosts)) {
                        let direction = rng.direction();
                        ctx.dock_in_direction(h, &d, Some(direction));
                    }
                    "dock_in_direction"
                }
                6 => {
                    if let (Some(d), Some(h)) = (rng.pick(&dockables), rng.pick(&hosts)) {
                        ctx.add_dockable(h, &d);
                    }
                    "add_dockable"
                }
                7 => {
                    if let Some(d) = rng.pick(&dockables) {
                        if let Some(h) = ctx.host_of(&d) {
                            ctx.remove_dockable(h, &d);
                        }
                    }
                    "remove_dockable"
                }
                8 => {
                    if let (Some(d), Some(h)) = (rng.pick(&dockables), rng.pick(&hosts)) {
                        ctx.set_active_dockable(h, &d);
                    }
                    "set_active_dockable"
                }
                9 => {
                    if let Some(w) = rng.pick(&windows) {
                        if rng.next_bool() {
                            ctx.on_window_closing(w);
                        } else {
                            ctx.close_window(w);
                        }
                    }
                    "window_close"
                }
                10 => {
                    if let Some(w) = rng.pick(&windows) {
                        ctx.on_window_activated(w);
                    }
                    "window_activate"
                }
                11 => {
                    if let Some(h) = rng.pick(&hosts) {
                        if rng.next_bool() {
                            let direction = rng.direction();
                            ctx.split_dockable_area(h, direction);
                        } else {
                            ctx.remove_dockable_area(h);
                        }
                    }
                    "split_or_remove_area"
                }
                12 => {
                    if let Some(h) = rng.pick(&hosts) {
                        match ctx.host(h).and_then(|host| host.active_dockable().cloned()) {
                            Some(keep) if rng.next_bool() => {
                                ctx.close_all_except(h, &keep);
                            }
                            _ => {
                                ctx.close_all(h);
                            }
                        }
                    }
                    "close_all"
                }
                _ => {
                    if dockables.len() < 10 {
                        ctx.create_dockable(new_content(created)).unwrap();
                        created += 1;
                    }
                    "create"
                }
            };

            assert_ctx_ok(&ctx, seed, step, op);
        }
    }
}

#[test]
fn model_random_window_drops_keep_integrity() {
    for seed in 1u64..=8u64 {
        let mut rng = Rng::new(seed);
        let mut ctx = DockContext::new();
        ctx.layout_region(
            ctx.main_region(),
            Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(800.0, 600.0)),
        );
        for n in 0..8 {
            ctx.create_dockable(new_content(n)).unwrap();
        }
        let main_host = ctx.ensure_host(ctx.main_region()).unwrap();
        for d in dockable_ids(&ctx) {
            ctx.dock(&d, main_host);
        }

        for step in 1..=120usize {
            let dockables = dockable_ids(&ctx);
            if rng.next_bool() {
                if let Some(d) = rng.pick(&dockables) {
                    ctx.float(&d, 0.0, 0.0);
                }
                assert_ctx_ok(&ctx, seed, step, "float");
                continue;
            }

            let windows = window_ids(&ctx);
            let Some(window) = rng.pick(&windows) else {
                continue;
            };
            let main_hosts = ctx
                .region(ctx.main_region())
                .map(|r| r.hosts())
                .unwrap_or_default();
            let Some(host) = rng.pick(&main_hosts) else {
                continue;
            };
            let Some(rect) = ctx.host_screen_rect(host) else {
                continue;
            };
            let dragged = match ctx.window(window) {
                Some(w) => w.region(),
                None => continue,
            };

            let picker = DockingPicker::for_rect(rect);
            let direction = rng.direction();
            let pointer = picker
                .zone_rect(direction)
                .map_or(rect.center(), |zone| zone.center());

            ctx.on_dockable_entered(host, dragged);
            ctx.on_dockable_over(host, dragged, pointer);
            ctx.drop_window_on(host, window);
            assert_ctx_ok(&ctx, seed, step, "drop_window_on");
        }

        // Nothing was closed: every dockable survived the drags.
        assert_eq!(ctx.dockables().count(), 8);
    }
}
