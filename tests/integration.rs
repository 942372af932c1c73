// Integration tests (native) for the `matrix-folio` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use matrix_folio::config::RainConfig;
use matrix_folio::sections::observer_thresholds;
use matrix_folio::{Animator, GlyphTone, Observation, RainField, Section, SectionTracker, Surface};

#[derive(Default)]
struct Counting {
    fades: u64,
    glyphs: u64,
}

impl Surface for Counting {
    fn fade(&mut self, _alpha: f64) {
        self.fades += 1;
    }
    fn glyph(&mut self, _ch: char, _x: f64, _y: f64, _tone: GlyphTone) {
        self.glyphs += 1;
    }
}

// Column count follows floor(width / glyph size) through a resize.
#[test]
fn column_count_tracks_viewport_width() {
    let cfg = RainConfig::default();
    let mut field = RainField::new(1280.0, 720.0, &cfg, 42);
    assert_eq!(field.column_count(), 1280 / 14);
    field.resize(375.0, 812.0);
    assert_eq!(field.column_count(), 375 / 14);
    assert_eq!(field.rows(), 812 / 14);
}

// With resets disabled every column moves exactly once per tick.
#[test]
fn offsets_grow_by_tick_count() {
    let cfg = RainConfig {
        bottom_reset_chance: 0.0,
        random_reset_chance: 0.0,
        ..RainConfig::default()
    };
    let mut field = RainField::new(420.0, 300.0, &cfg, 8);
    let start: Vec<i32> = field.columns().iter().map(|c| c.offset).collect();
    let mut s = Counting::default();
    for _ in 0..123 {
        field.tick(&mut s);
    }
    for (c, s0) in field.columns().iter().zip(start) {
        assert_eq!(c.offset - s0, 123);
    }
}

// Every reset restarts the head at the top; the only way an offset can fall
// short of `start + N` is through a reset.
#[test]
fn shortfall_only_comes_from_resets() {
    let mut field = RainField::new(420.0, 140.0, &RainConfig::default(), 77);
    let start: Vec<i32> = field.columns().iter().map(|c| c.offset).collect();
    let mut s = Counting::default();
    let n = 400;
    for _ in 0..n {
        field.tick(&mut s);
    }
    for (c, s0) in field.columns().iter().zip(start) {
        if c.resets == 0 {
            assert_eq!(c.offset, s0 + n);
        } else {
            assert!(c.offset >= 1 && c.offset <= s0 + n);
        }
    }
}

// After teardown the painted count stabilises no matter how often the timer
// would still have fired.
#[test]
fn teardown_freezes_paint_count() {
    let field = RainField::new(640.0, 480.0, &RainConfig::default(), 1);
    let mut anim = Animator::new(field, Counting::default());
    for _ in 0..30 {
        anim.tick();
    }
    anim.stop();
    let frozen = (anim.painted(), anim.surface().fades, anim.surface().glyphs);
    for _ in 0..300 {
        anim.tick();
        anim.resize(800.0, 600.0);
    }
    assert_eq!(frozen, (anim.painted(), anim.surface().fades, anim.surface().glyphs));
    assert_eq!(anim.field().column_count(), 640 / 14);
}

// "skills" crosses at tick 10 and stays active while nothing else crosses.
#[test]
fn skills_stays_active_until_another_crossing() {
    let mut t = SectionTracker::new(0.3);
    assert_eq!(t.active(), Section::Home);
    for tick in 0..40 {
        let skills = if tick < 10 { 0.05 * tick as f64 / 10.0 } else { 0.3 + tick as f64 / 100.0 };
        let about = 0.25 - tick as f64 / 200.0;
        t.observe(&[
            Observation::new(Section::About, about.max(0.0), about > 0.0),
            Observation::new(Section::Skills, skills.min(1.0), skills > 0.0),
        ]);
        if tick >= 10 {
            assert_eq!(t.active(), Section::Skills, "tick {tick}");
        } else {
            assert_eq!(t.active(), Section::Home, "tick {tick}");
        }
    }
    t.observe(&[Observation::new(Section::Contact, 0.5, true)]);
    assert_eq!(t.active(), Section::Contact);
}

// A section five viewports tall never shows more than 20% of itself. Fed only
// the ratios the registered thresholds would report, it still activates once
// its measured ratio passes the threshold.
#[test]
fn tall_section_activates_through_threshold_steps() {
    let (viewport, height) = (700.0, 3500.0);
    let mut t = SectionTracker::new(0.3);
    t.observe(&[Observation::new(Section::Skills, 0.8, true)]);
    assert_eq!(t.active(), Section::Skills);

    let reachable = viewport / height;
    let steps: Vec<f64> =
        observer_thresholds(0.3).into_iter().filter(|r| *r <= reachable).collect();
    assert!(steps.len() > 2, "no reportable steps for a tall section: {steps:?}");

    let mut activated_at = None;
    for raw in steps {
        let obs = Observation::measured(Section::Projects, raw, raw > 0.0, viewport, height);
        if t.observe(&[obs, Observation::new(Section::Skills, 0.0, false)]).is_some() {
            activated_at = Some(raw);
        }
    }
    assert_eq!(t.active(), Section::Projects);
    let raw = activated_at.unwrap();
    assert!(raw / reachable >= 0.3 && raw < 0.3, "activated at raw {raw}");
}
