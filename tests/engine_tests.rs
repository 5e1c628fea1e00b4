//! Behavioral tests for the particle engine.

use std::time::Duration;

use fireworks::config::ParticleConfig;
use fireworks::Particle;
use fireworks::prelude::*;
use fireworks::spawn::{BIG_COUNT, NORMAL_COUNT};

#[derive(Default)]
struct CueLog {
    launches: usize,
    bursts: Vec<(bool, Duration)>,
}

impl SoundCues for CueLog {
    fn launch(&mut self) {
        self.launches += 1;
    }
    fn burst(&mut self, big: bool, delay: Duration) {
        self.bursts.push((big, delay));
    }
}

fn quiet_engine(seed: u64) -> FireworksEngine {
    let mut engine = FireworksEngine::seeded(seed, 1000.0, 800.0);
    engine.set_paused(true);
    engine
}

fn red() -> BurstColor {
    BurstColor::from_hex("#FF0000").unwrap()
}

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn test_spawn_adds_exactly_the_reported_count() {
    let mut engine = quiet_engine(1);
    for _ in 0..20 {
        let before = engine.live_count();
        let added = engine.spawn(&mut (), DVec2::new(100.0, 100.0), red(), BurstKind::Normal);
        assert!(NORMAL_COUNT.contains(&added));
        assert_eq!(engine.live_count(), before + added);
    }

    let before = engine.live_count();
    let added = engine.spawn(&mut (), DVec2::new(100.0, 100.0), red(), BurstKind::Big);
    assert_eq!(added, BIG_COUNT);
    assert_eq!(engine.live_count(), before + 600);
}

#[test]
fn test_burst_speeds_within_range() {
    let mut engine = quiet_engine(2);
    engine.spawn(&mut (), DVec2::ZERO, red(), BurstKind::Normal);
    assert!(engine.particles().iter().all(|p| p.velocity.length() < 10.0));

    let mut engine = quiet_engine(3);
    engine.trigger_big(&mut (), Some(0.0), Some(0.0));
    for p in engine.particles() {
        let speed = p.velocity.length();
        assert!(speed >= 1.0 - 1e-9 && speed < 16.0, "speed {speed}");
    }
}

#[test]
fn test_seeded_spawn_is_reproducible() {
    let velocities = |seed| {
        let mut engine = quiet_engine(seed);
        engine.spawn(&mut (), DVec2::new(100.0, 100.0), red(), BurstKind::Normal);
        engine.particles().iter().map(|p| p.velocity).collect::<Vec<_>>()
    };

    assert_eq!(red(), BurstColor::Single(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(velocities(99), velocities(99));
    assert_ne!(velocities(99), velocities(100));
}

#[test]
fn test_trigger_big_defaults() {
    let mut engine = quiet_engine(4);
    engine.trigger_big(&mut (), None, None);

    assert_eq!(engine.live_count(), 600);
    for p in engine.particles() {
        assert_eq!(p.position, DVec2::new(500.0, 320.0));
        assert!(PALETTE.contains(&p.color));
    }

    let distinct = PALETTE
        .iter()
        .filter(|c| engine.particles().iter().any(|p| p.color == **c))
        .count();
    assert!(distinct >= 8, "only {distinct} palette colors used");
}

#[test]
fn test_trigger_big_partial_coordinates() {
    let mut engine = quiet_engine(5);
    engine.trigger_big(&mut (), Some(42.0), None);
    assert!(engine.particles().iter().all(|p| p.position == DVec2::new(42.0, 320.0)));
}

#[test]
fn test_spawn_cues_sound() {
    let mut engine = quiet_engine(6);
    let mut cues = CueLog::default();

    engine.spawn(&mut cues, DVec2::ZERO, red(), BurstKind::Normal);
    engine.trigger_big(&mut cues, None, None);

    assert_eq!(cues.launches, 2);
    assert_eq!(
        cues.bursts,
        vec![(false, Duration::from_millis(150)), (true, Duration::from_millis(150))]
    );
}

// ============================================================================
// Integration
// ============================================================================

#[test]
fn test_alpha_and_velocity_follow_closed_form() {
    let mut engine = quiet_engine(7);
    engine.trigger_big(&mut (), Some(0.0), Some(0.0));
    let initial: Vec<Particle> = engine.particles().to_vec();

    // Follow a few sparks by hand; removal reorders the engine's list.
    for spark in initial.iter().take(25) {
        let mut p = spark.clone();
        for n in 1..=100u32 {
            p.integrate();
            let n_f = n as f64;

            let alpha = spark.alpha - n_f * spark.decay;
            assert!((p.alpha - alpha).abs() < 1e-9);

            let fric_n = spark.friction.powi(n as i32);
            let gravity_sum: f64 = (0..n).map(|k| spark.gravity * spark.friction.powi(k as i32)).sum();
            assert!((p.velocity.x - spark.velocity.x * fric_n).abs() < 1e-9);
            assert!((p.velocity.y - (spark.velocity.y * fric_n + gravity_sum)).abs() < 1e-9);
        }
    }
}

#[test]
fn test_position_is_running_sum_of_velocity() {
    let mut engine = quiet_engine(8);
    engine.spawn(&mut (), DVec2::new(300.0, 300.0), red(), BurstKind::Normal);
    let mut p = engine.particles()[0].clone();

    let mut expected = p.position;
    for _ in 0..30 {
        let last = expected;
        p.integrate();
        expected += p.velocity;
        assert_eq!(p.position, expected);
        assert_eq!(p.previous, last);
    }
}

#[test]
fn test_expired_sparks_leave_the_live_set() {
    let mut engine = quiet_engine(9);
    engine.spawn(&mut (), DVec2::ZERO, red(), BurstKind::Normal);

    let mut shadow: Vec<Particle> = engine.particles().to_vec();
    let mut draw = DrawList::new();
    for _ in 0..250 {
        shadow.retain_mut(|p| p.integrate());
        let stats = engine.tick(&mut (), &mut draw);

        assert_eq!(engine.live_count(), shadow.len());
        assert_eq!(stats.live, shadow.len());
        assert!(engine.particles().iter().all(|p| p.alpha > 0.0));
    }
}

#[test]
fn test_normal_burst_gone_after_inverse_min_decay_ticks() {
    let mut engine = quiet_engine(10);
    engine.spawn(&mut (), DVec2::new(500.0, 100.0), red(), BurstKind::Normal);

    let mut draw = DrawList::new();
    let mut expired = 0;
    for _ in 0..200 {
        expired += engine.tick(&mut (), &mut draw).expired;
    }
    assert_eq!(engine.live_count(), 0);
    assert!(NORMAL_COUNT.contains(&expired));
}

#[test]
fn test_big_burst_gone_after_inverse_min_decay_ticks() {
    let mut engine = quiet_engine(11);
    engine.trigger_big(&mut (), None, None);

    let mut draw = DrawList::new();
    for _ in 0..500 {
        engine.tick(&mut (), &mut draw);
    }
    assert_eq!(engine.live_count(), 0);
}

// ============================================================================
// Tick output
// ============================================================================

#[test]
fn test_one_stroke_per_live_spark() {
    let mut engine = quiet_engine(12);
    engine.trigger_big(&mut (), None, None);

    let mut draw = DrawList::new();
    for _ in 0..50 {
        let stats = engine.tick(&mut (), &mut draw);
        let strokes = draw.count(|c| matches!(c, DrawCommand::StrokeLine { .. }));
        assert_eq!(strokes, stats.live);
    }
}

#[test]
fn test_sparkle_dots_are_white_and_double_size() {
    let mut engine = quiet_engine(13);
    engine.trigger_big(&mut (), None, None);

    let mut draw = DrawList::new();
    engine.tick(&mut (), &mut draw);

    let commands = draw.commands();
    let mut dots = 0;
    for (i, command) in commands.iter().enumerate() {
        if let DrawCommand::FillCircle { center, radius, color, alpha } = command {
            dots += 1;
            assert_eq!(*color, Vec3::ONE);
            // Each dot directly follows the stroke of its own spark.
            match &commands[i - 1] {
                DrawCommand::StrokeLine { to, width, alpha: a, .. } => {
                    assert_eq!(to, center);
                    assert_eq!(*radius, *width * 2.0);
                    assert_eq!(a, alpha);
                }
                other => panic!("dot preceded by {other:?}"),
            }
        }
    }

    // ~70% sparkle, ~20% of those flash: around 84 of 600.
    assert!((30..150).contains(&dots), "{dots} dots");
}

#[test]
fn test_spontaneous_bursts_respect_probability() {
    let config = ParticleConfig {
        spawn_probability: 0.04,
        ..Default::default()
    };
    let mut engine = FireworksEngine::seeded(14, 1000.0, 800.0).with_config(config);
    let mut cues = CueLog::default();
    let mut draw = DrawList::new();

    let ticks = 5000;
    let mut bursts = 0;
    for _ in 0..ticks {
        if engine.tick(&mut cues, &mut draw).spawned > 0 {
            bursts += 1;
        }
    }

    // Expect 200; allow generous slack.
    assert!((140..260).contains(&bursts), "{bursts} bursts");
    assert_eq!(cues.launches, bursts);
    assert!(cues.bursts.iter().all(|(big, _)| !big));
}

#[test]
fn test_pause_keeps_existing_sparks_moving() {
    let mut engine = quiet_engine(15);
    engine.trigger_big(&mut (), None, None);
    let before: Vec<DVec2> = engine.particles().iter().map(|p| p.position).collect();

    let mut draw = DrawList::new();
    engine.tick(&mut (), &mut draw);
    let after: Vec<DVec2> = engine.particles().iter().map(|p| p.position).collect();

    assert_eq!(after.len(), before.len());
    assert_ne!(before, after);
}

// ============================================================================
// Soft cap
// ============================================================================

#[test]
fn test_soft_cap_bounds_live_count() {
    let config = ParticleConfig {
        max_particles: Some(900),
        ..Default::default()
    };
    let mut engine = FireworksEngine::seeded(16, 1000.0, 800.0).with_config(config);
    engine.set_paused(true);

    let mut draw = DrawList::new();
    for _ in 0..10 {
        engine.trigger_big(&mut (), None, None);
        assert!(engine.live_count() <= 900);
        engine.tick(&mut (), &mut draw);
    }
    assert!(engine.live_count() > 0);
}

#[test]
fn test_uncapped_by_default() {
    let mut engine = quiet_engine(17);
    for _ in 0..10 {
        engine.trigger_big(&mut (), None, None);
    }
    assert_eq!(engine.live_count(), 6000);
}
