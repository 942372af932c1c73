//! Digital rain simulation.
//!
//! The field is a row of columns, one per glyph cell across the surface. Each
//! tick fades the previous frame with a translucent overlay, draws one fresh
//! glyph per column at its head and moves every head down one cell. Heads that
//! fall off the bottom restart at the top on a random roll, so restarts are
//! staggered; a second, rarer roll restarts any column to break periodicity.
//!
//! Nothing here touches the browser. Painting goes through [`Surface`]; the
//! canvas implementation lives in [`canvas`].

pub mod canvas;

use crate::config::RainConfig;

/// How a glyph is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphTone {
    Base,
    /// Brighter colour with a glow.
    Highlight,
}

/// Paint target for one tick.
pub trait Surface {
    /// Cover the whole surface with black at `alpha` opacity.
    fn fade(&mut self, alpha: f64);
    /// Draw `ch` with its top-left baseline anchor at pixel `(x, y)`.
    fn glyph(&mut self, ch: char, x: f64, y: f64, tone: GlyphTone);
}

/// One falling stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    /// Horizontal cell index; fixed for the column's lifetime.
    pub index: usize,
    /// Head position in cells. Negative while still above the top edge.
    pub offset: i32,
    /// Restarts since the field was last seeded.
    pub resets: u32,
}

/// Simulation state for the whole backdrop.
pub struct RainField {
    width: f64,
    height: f64,
    cell: u32,
    columns: Vec<Column>,
    glyphs: Vec<char>,
    fade_alpha: f64,
    highlight_chance: f64,
    bottom_reset_chance: f64,
    random_reset_chance: f64,
    rng: fastrand::Rng,
    ticks: u64,
}

impl RainField {
    pub fn new(width: f64, height: f64, config: &RainConfig, seed: u64) -> Self {
        let mut glyphs = config.glyphs();
        if glyphs.is_empty() {
            glyphs.push('0');
        }
        let mut field = Self {
            width: 0.0,
            height: 0.0,
            cell: config.glyph_size.max(1),
            columns: Vec::new(),
            glyphs,
            fade_alpha: config.fade_alpha,
            highlight_chance: config.highlight_chance,
            bottom_reset_chance: config.bottom_reset_chance,
            random_reset_chance: config.random_reset_chance,
            rng: fastrand::Rng::with_seed(seed),
            ticks: 0,
        };
        field.resize(width, height);
        field
    }

    /// Re-measure and reseed. Column indices map to different pixels after a
    /// width change, so offsets are drawn afresh rather than carried over.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = sanitize(width);
        self.height = sanitize(height);
        let count = column_count(self.width, self.cell);
        let max_lead = (self.height / self.cell as f64).floor() as u32;
        let rng = &mut self.rng;
        self.columns = (0..count)
            .map(|index| Column {
                index,
                offset: -(rng.u32(0..=max_lead) as i32),
                resets: 0,
            })
            .collect();
    }

    /// Advance one frame, painting onto `surface`.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.fade(self.fade_alpha);
        let cell = self.cell as f64;
        for col in self.columns.iter_mut() {
            let ch = self.glyphs[self.rng.usize(..self.glyphs.len())];
            let y = col.offset as f64 * cell;
            if y > 0.0 {
                let tone = if roll(&mut self.rng, self.highlight_chance) {
                    GlyphTone::Highlight
                } else {
                    GlyphTone::Base
                };
                surface.glyph(ch, col.index as f64 * cell, y, tone);
            }
            if y > self.height && roll(&mut self.rng, self.bottom_reset_chance) {
                col.offset = 0;
                col.resets += 1;
            }
            if roll(&mut self.rng, self.random_reset_chance) {
                col.offset = 0;
                col.resets += 1;
            }
            col.offset += 1;
        }
        self.ticks += 1;
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn glyph_size(&self) -> u32 {
        self.cell
    }

    /// Ticks since construction (resizes do not reset it).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Surface height in whole cells.
    pub fn rows(&self) -> i32 {
        (self.height / self.cell as f64).floor() as i32
    }
}

/// `floor(width / cell)`.
pub fn column_count(width: f64, cell: u32) -> usize {
    if cell == 0 {
        return 0;
    }
    (sanitize(width) / cell as f64).floor() as usize
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

// fastrand's f64 is in [0, 1): a chance of 1.0 always passes, 0.0 never does.
fn roll(rng: &mut fastrand::Rng, chance: f64) -> bool {
    rng.f64() < chance
}

/// Owns a field and the surface it paints on; the unit the page timer drives.
///
/// Once stopped, `tick` is a no-op forever, so a timer callback that was
/// already queued when the page tore down cannot paint.
pub struct Animator<S: Surface> {
    field: RainField,
    surface: S,
    running: bool,
    painted: u64,
}

impl<S: Surface> Animator<S> {
    pub fn new(field: RainField, surface: S) -> Self {
        Self { field, surface, running: true, painted: 0 }
    }

    /// Paint one frame if still running. Returns whether anything was painted.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.field.tick(&mut self.surface);
        self.painted += 1;
        true
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if self.running {
            self.field.resize(width, height);
        }
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames painted so far.
    pub fn painted(&self) -> u64 {
        self.painted
    }

    pub fn field(&self) -> &RainField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
