//! The render tick.
//!
//! One tick: fade (or clear) the canvas, step and draw every particle
//! against a single gesture snapshot, then lay the hand skeleton on top.
//! Scheduling the next tick is the caller's job (the visualizer's frame
//! limiter); the tick itself never waits on detection.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use hand_pose::HAND_CONNECTIONS;

use crate::canvas::{Canvas, Extent};
use crate::config::SwarmConfig;
use crate::field::ParticleField;
use crate::notify::Notifier;
use crate::particle::Physics;
use crate::shared::{GestureSnapshot, SharedGesture};

const BONE_COLOR:  u32 = 0xFF00FF00;
const JOINT_COLOR: u32 = 0xFFFF0000;
const JOINT_R:     f32 = 3.0;

pub struct RenderLoop {
    shared:        SharedGesture,
    notifier:      Notifier,
    field:         ParticleField,
    physics:       Physics,
    rng:           StdRng,
    trail_alpha:   Option<f32>,
    background:    u32,
    show_skeleton: bool,
    stale_after:   Option<Duration>,
    ticks:         u64,
}

impl RenderLoop {
    pub fn new(cfg: &SwarmConfig, shared: SharedGesture, notifier: Notifier) -> Self {
        let mut rng = match cfg.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        let field = ParticleField::new(cfg.population, cfg.spawn.clone(), shared.extent(), &mut rng);
        RenderLoop {
            shared,
            notifier,
            field,
            physics:       cfg.physics.clone(),
            rng,
            trail_alpha:   cfg.trail_alpha,
            background:    cfg.background,
            show_skeleton: cfg.show_skeleton,
            stale_after:   cfg.stale_after_ms.map(Duration::from_millis),
            ticks:         0,
        }
    }

    /// Resize signal: new canvas, new population, target back to center.
    pub fn resize(&mut self, extent: Extent, canvas: &mut Canvas) {
        log::info!("resize → {}x{}", extent.width, extent.height);
        canvas.resize(extent, self.background);
        self.field.reinitialize(extent, &mut self.rng);
        self.shared.resize(extent);
    }

    /// Run one tick against `canvas`.  Returns the snapshot the particles saw.
    pub fn tick(&mut self, canvas: &mut Canvas) -> GestureSnapshot {
        if let Some(after) = self.stale_after {
            if let Some(mode) = self.shared.expire_stale(Instant::now(), after) {
                log::info!("no hand for {:?}, reverting to {}", after, mode.tag());
                self.notifier.notify(mode);
            }
        }

        let snap = self.shared.snapshot();

        match self.trail_alpha {
            Some(alpha) => canvas.fade(self.background, alpha),
            None        => canvas.clear(self.background),
        }

        self.field.tick(&snap, &self.physics, canvas, &mut self.rng);

        if self.show_skeleton {
            if let Some(points) = &snap.overlay {
                draw_skeleton(canvas, points);
            }
        }

        self.ticks += 1;
        snap
    }

    pub fn field(&self) -> &ParticleField { &self.field }
    pub fn ticks(&self)  -> u64           { self.ticks }
}

fn draw_skeleton(canvas: &mut Canvas, points: &[hand_pose::Point2]) {
    for &(a, b) in HAND_CONNECTIONS.iter() {
        if let (Some(p), Some(q)) = (points.get(a), points.get(b)) {
            canvas.draw_line(p.x, p.y, q.x, q.y, BONE_COLOR);
        }
    }
    for p in points {
        canvas.fill_disc(p.x, p.y, JOINT_R, JOINT_COLOR);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DetectionAdapter;
    use crate::notify::NullSink;
    use hand_pose::{synthetic_hand, GestureMode, Point2};

    fn rig(cfg: &SwarmConfig) -> (RenderLoop, SharedGesture, Canvas) {
        let shared = SharedGesture::new(cfg.extent(), cfg.hysteresis);
        let notifier = Notifier::spawn(Box::new(NullSink));
        let render = RenderLoop::new(cfg, shared.clone(), notifier);
        let canvas = Canvas::new(cfg.extent(), cfg.background);
        (render, shared, canvas)
    }

    fn small() -> SwarmConfig {
        SwarmConfig { width: 640, height: 480, population: 250, seed: Some(21), ..SwarmConfig::default() }
    }

    #[test]
    fn resize_scenario_640_to_1280() {
        let cfg = small();
        let (mut render, shared, mut canvas) = rig(&cfg);
        for _ in 0..10 { render.tick(&mut canvas); }

        render.resize(Extent::new(1280, 720), &mut canvas);
        assert_eq!(render.field().len(), 250);
        assert!(render.field().particles().iter().all(|p| (0.0..=1280.0).contains(&p.x) && (0.0..=720.0).contains(&p.y)));
        assert_eq!(shared.target(), Point2::new(640.0, 360.0));
        assert_eq!(canvas.extent(), Extent::new(1280, 720));

        // Ticks after the resize use the new bounds.
        for _ in 0..50 { render.tick(&mut canvas); }
        assert!(render.field().particles().iter().all(|p| p.x <= 1280.0 && p.y <= 720.0));
    }

    #[test]
    fn fist_gathers_the_swarm_at_the_palm() {
        let cfg = small();
        let (mut render, shared, mut canvas) = rig(&cfg);
        let mut adapter = DetectionAdapter::new(shared.clone(), Notifier::spawn(Box::new(NullSink)), false, true);
        adapter.on_results(Some(&synthetic_hand(Point2::new(0.5, 0.5), 0, 1.0)));
        assert_eq!(shared.mode(), GestureMode::Converge);

        for _ in 0..400 { render.tick(&mut canvas); }
        let target = shared.target();
        for p in render.field().particles() {
            assert!(p.position().distance(target) < 1.0);
        }
    }

    #[test]
    fn particles_keep_animating_without_detections() {
        let cfg = small();
        let (mut render, shared, mut canvas) = rig(&cfg);
        let mut adapter = DetectionAdapter::new(shared.clone(), Notifier::spawn(Box::new(NullSink)), false, false);
        adapter.on_results(Some(&synthetic_hand(Point2::new(0.3, 0.3), 4, 1.0)));
        let before = shared.snapshot();

        let start: Vec<_> = render.field().particles().to_vec();
        for _ in 0..100 {
            adapter.on_results(None);
            let snap = render.tick(&mut canvas);
            assert_eq!(snap.mode, before.mode);
            assert_eq!(snap.target, before.target);
        }
        let moved = render.field().particles().iter().zip(&start).filter(|(a, b)| a != b).count();
        assert_eq!(moved, start.len());
        assert_eq!(render.ticks(), 100);
    }

    #[test]
    fn full_clear_when_trails_disabled() {
        let cfg = SwarmConfig { trail_alpha: None, population: 1, ..small() };
        let (mut render, _shared, mut canvas) = rig(&cfg);
        render.tick(&mut canvas);
        let lit = canvas.buffer().iter().filter(|&&px| px != 0xFF000000 | cfg.background).count();
        // One disc of radius < 3 px.
        assert!(lit > 0 && lit < 40, "lit pixels: {}", lit);
    }

    #[test]
    fn skeleton_drawn_over_particles() {
        let cfg = SwarmConfig { population: 1, ..small() };
        let (mut render, shared, mut canvas) = rig(&cfg);
        let mut adapter = DetectionAdapter::new(shared.clone(), Notifier::spawn(Box::new(NullSink)), false, true);
        adapter.on_results(Some(&synthetic_hand(Point2::new(0.5, 0.5), 4, 1.0)));
        let snap = render.tick(&mut canvas);
        let wrist = snap.overlay.unwrap()[0];
        assert_eq!(canvas.pixel(wrist.x as usize, wrist.y as usize), Some(JOINT_COLOR));
    }

    #[test]
    fn stale_policy_reverts_mode() {
        let cfg = SwarmConfig { stale_after_ms: Some(0), ..small() };
        let (mut render, shared, mut canvas) = rig(&cfg);
        shared.write(|b| {
            b.state.update_gesture(0, Point2::new(10.0, 10.0));
            b.last_detection = Some(Instant::now());
        });
        let snap = render.tick(&mut canvas);
        assert_eq!(snap.mode, GestureMode::Disperse);
    }
}
