//! Tunables for every page effect. Defaults reproduce the portfolio page as
//! shipped; the host may override any subset through `mount(Some(json))`.

use crate::error::MountError;
use crate::sections::Section;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Digital rain tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct RainConfig {
    /// DOM id of the backdrop canvas.
    pub canvas_id: String,
    /// Glyph cell size in CSS pixels (also the font size).
    pub glyph_size: u32,
    /// Fixed tick period; independent of requestAnimationFrame.
    pub tick_ms: u32,
    /// Opacity of the black overlay painted each tick (trail length).
    pub fade_alpha: f64,
    pub base_color: String,
    pub highlight_color: String,
    pub glow_blur: f64,
    pub highlight_chance: f64,
    /// Chance per tick that a column already below the surface restarts.
    pub bottom_reset_chance: f64,
    /// Chance per tick that any column restarts regardless of position.
    pub random_reset_chance: f64,
    /// Glyph alphabet; empty means [`crate::GLYPHS`].
    pub alphabet: String,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            canvas_id: "matrix-canvas".to_string(),
            glyph_size: 14,
            tick_ms: 33,
            fade_alpha: 0.05,
            base_color: "#0F0".to_string(),
            highlight_color: "#8FFF8F".to_string(),
            glow_blur: 10.0,
            highlight_chance: 0.02,
            bottom_reset_chance: 0.025,
            random_reset_chance: 0.005,
            alphabet: String::new(),
        }
    }
}

impl RainConfig {
    /// Alphabet as chars, falling back to the built-in set.
    pub fn glyphs(&self) -> Vec<char> {
        let src = if self.alphabet.is_empty() {
            crate::GLYPHS
        } else {
            self.alphabet.as_str()
        };
        src.chars().collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct SectionConfig {
    /// Visible ratio a section must reach to become active.
    pub threshold: f64,
    /// Class added to a section element whenever it is reported visible.
    pub visible_class: String,
    /// Class toggled on nav links pointing at the active section.
    pub nav_active_class: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            visible_class: "section-visible".to_string(),
            nav_active_class: "active".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".animate-on-scroll".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
            class: "animate-in".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct IntroConfig {
    pub loader_id: String,
    pub loading_ms: u32,
    pub title_id: String,
    pub title: String,
    pub char_ms: u32,
    /// Elements with this class are shown once typing completes.
    pub after_typing_class: String,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            loader_id: "loader".to_string(),
            loading_ms: 1500,
            title_id: "job-title".to_string(),
            title: "Full Stack Web Developer".to_string(),
            char_ms: 100,
            after_typing_class: "after-typing".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct MotionConfig {
    /// Section translated by the scroll parallax.
    pub parallax_section: Section,
    pub parallax_factor: f64,
    pub tilt_selector: String,
    /// Pointer distance (px) per degree of rotation.
    pub tilt_divisor: f64,
    pub perspective_px: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            parallax_section: Section::Home,
            parallax_factor: 0.1,
            tilt_selector: ".tilt-card".to_string(),
            tilt_divisor: 10.0,
            perspective_px: 1000.0,
        }
    }
}

/// Top-level configuration handed to [`crate::mount`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct Config {
    pub rain: RainConfig,
    pub sections: SectionConfig,
    pub reveal: RevealConfig,
    pub intro: IntroConfig,
    pub motion: MotionConfig,
    /// `error`, `warn`, `info`, `debug` or `trace`; unknown values mean `info`.
    pub log_level: Option<String>,
}

impl Config {
    /// Parse partial overrides; every omitted field keeps its default.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, MountError> {
        let cfg: Config =
            serde_json::from_str(json).map_err(|e| MountError::Config(e.to_string()))?;
        cfg.validate()
    }

    /// Clamp probabilities and ratios into `[0, 1]`; reject values that would
    /// stall the rain (zero cell size or zero period) or poison CSS transforms
    /// (non-finite motion numbers).
    pub fn validate(mut self) -> Result<Self, MountError> {
        if self.rain.glyph_size == 0 {
            return Err(MountError::Config("rain.glyph_size must be > 0".into()));
        }
        if self.rain.tick_ms == 0 {
            return Err(MountError::Config("rain.tick_ms must be > 0".into()));
        }
        if self.intro.char_ms == 0 {
            return Err(MountError::Config("intro.char_ms must be > 0".into()));
        }
        let m = &self.motion;
        for (name, v) in [
            ("tilt_divisor", m.tilt_divisor),
            ("parallax_factor", m.parallax_factor),
            ("perspective_px", m.perspective_px),
        ] {
            if !v.is_finite() {
                return Err(MountError::Config(format!("motion.{name} must be finite")));
            }
        }
        if m.tilt_divisor == 0.0 {
            return Err(MountError::Config("motion.tilt_divisor must be non-zero".into()));
        }
        let r = &mut self.rain;
        r.fade_alpha = unit(r.fade_alpha);
        r.highlight_chance = unit(r.highlight_chance);
        r.bottom_reset_chance = unit(r.bottom_reset_chance);
        r.random_reset_chance = unit(r.random_reset_chance);
        self.sections.threshold = unit(self.sections.threshold);
        self.reveal.threshold = unit(self.reveal.threshold);
        Ok(self)
    }

    pub fn log_level(&self) -> log::Level {
        match self.log_level.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("error") => log::Level::Error,
            Some("warn") => log::Level::Warn,
            Some("debug") => log::Level::Debug,
            Some("trace") => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.rain.glyph_size, 14);
        assert_eq!(cfg.rain.tick_ms, 33);
        assert!((cfg.sections.threshold - 0.3).abs() < 1e-9);
        assert_eq!(cfg.intro.title, "Full Stack Web Developer");
        assert_eq!(cfg.log_level(), log::Level::Info);
    }

    #[test]
    fn validate_clamps_probabilities() {
        let mut cfg = Config::default();
        cfg.rain.highlight_chance = 3.0;
        cfg.rain.random_reset_chance = -1.0;
        cfg.sections.threshold = f64::NAN;
        let cfg = cfg.validate().unwrap();
        assert_eq!(cfg.rain.highlight_chance, 1.0);
        assert_eq!(cfg.rain.random_reset_chance, 0.0);
        assert_eq!(cfg.sections.threshold, 0.0);
    }

    #[test]
    fn validate_rejects_zero_glyph_size() {
        let mut cfg = Config::default();
        cfg.rain.glyph_size = 0;
        assert!(matches!(cfg.validate(), Err(MountError::Config(_))));
    }

    #[test]
    fn validate_rejects_non_finite_motion() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut cfg = Config::default();
            cfg.motion.tilt_divisor = bad;
            assert!(matches!(cfg.validate(), Err(MountError::Config(m)) if m.contains("tilt_divisor")));
            let mut cfg = Config::default();
            cfg.motion.parallax_factor = bad;
            assert!(matches!(cfg.validate(), Err(MountError::Config(m)) if m.contains("parallax_factor")));
            let mut cfg = Config::default();
            cfg.motion.perspective_px = bad;
            assert!(matches!(cfg.validate(), Err(MountError::Config(m)) if m.contains("perspective_px")));
        }
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_alphabet_falls_back_to_builtin_glyphs() {
        let cfg = RainConfig::default();
        assert_eq!(cfg.glyphs().len(), crate::GLYPHS.chars().count());
        let custom = RainConfig { alphabet: "01".into(), ..RainConfig::default() };
        assert_eq!(custom.glyphs(), vec!['0', '1']);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(
            r#"{"rain":{"glyph_size":20},"motion":{"parallax_section":"about"},"log_level":"debug"}"#,
        )
        .unwrap();
        assert_eq!(cfg.rain.glyph_size, 20);
        assert_eq!(cfg.rain.tick_ms, 33);
        assert_eq!(cfg.motion.parallax_section, Section::About);
        assert_eq!(cfg.log_level(), log::Level::Debug);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(Config::from_json("{rain:"), Err(MountError::Config(_))));
    }
}
