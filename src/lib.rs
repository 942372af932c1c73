//! Matrix Folio core crate.
//!
//! Runtime for a single-page portfolio: the falling-glyph canvas backdrop,
//! the active-section tracker that drives nav highlighting, and the small
//! scroll/pointer effects around them. `mount()` starts everything and returns
//! one owned handle; `Portfolio::stop()` releases every timer, listener and
//! observer it holds.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod dom;
pub mod error;
pub mod intro;
pub mod motion;
pub mod rain;
pub mod reveal;
pub mod sections;

pub use config::Config;
pub use error::MountError;
pub use rain::canvas::Backdrop;
pub use rain::{Animator, Column, GlyphTone, RainField, Surface};
pub use sections::observer::SectionWatch;
pub use sections::{Observation, Section, SectionTracker};

use intro::Intro;
use motion::Motion;
use reveal::RevealWatch;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging(log::Level::Info);
}

#[cfg(feature = "console_log")]
fn init_logging(level: log::Level) {
    if console_log::init_with_level(level).is_err() {
        // Already installed; only the filter can change.
        log::set_max_level(level.to_level_filter());
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging(level: log::Level) {
    log::set_max_level(level.to_level_filter());
}

// -----------------------------------------------------------------------------
// Shared datasets
// -----------------------------------------------------------------------------

/// Rain alphabet: half-width-looking katakana, digits, Latin capitals, symbols.
pub const GLYPHS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ@#$%^&*()";

/// Section element ids in document order. [`Section::id`] and its `FromStr`
/// read from this table.
pub const SECTION_IDS: [&str; 5] = ["home", "about", "skills", "projects", "contact"];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Everything `mount` started. Stop order mirrors start order in reverse.
#[wasm_bindgen]
pub struct Portfolio {
    backdrop: Backdrop,
    sections: SectionWatch,
    reveal: RevealWatch,
    intro: Intro,
    motion: Motion,
    stopped: bool,
}

#[wasm_bindgen]
impl Portfolio {
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> String {
        self.sections.active_section()
    }

    /// Release every timer, listener and observer. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.motion.stop();
        self.intro.stop();
        self.reveal.stop();
        self.sections.stop();
        self.backdrop.stop();
        self.stopped = true;
        log::info!("portfolio unmounted");
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        !self.stopped
    }
}

impl Portfolio {
    pub fn start(config: &Config, on_section: Option<js_sys::Function>) -> Self {
        init_logging(config.log_level());
        let portfolio = Self {
            backdrop: Backdrop::start(&config.rain),
            sections: SectionWatch::start(&config.sections, on_section),
            reveal: RevealWatch::start(&config.reveal),
            intro: Intro::start(&config.intro),
            motion: Motion::start(&config.motion),
            stopped: false,
        };
        log::info!(
            "portfolio mounted: {} rain columns, {} motion listeners",
            portfolio.backdrop.column_count(),
            portfolio.motion.listener_count()
        );
        portfolio
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn active(&self) -> Section {
        self.sections.active()
    }
}

impl Drop for Portfolio {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mount every page effect. `config_json` may override any subset of
/// [`Config`]; `on_section` is called with the new id whenever the active
/// section changes.
#[wasm_bindgen]
pub fn mount(
    config_json: Option<String>,
    on_section: Option<js_sys::Function>,
) -> Result<Portfolio, JsValue> {
    let config = load_config(config_json.as_deref())?;
    Ok(Portfolio::start(&config, on_section))
}

/// Start only the rain backdrop on the canvas with `canvas_id`.
#[wasm_bindgen(js_name = startBackdrop)]
pub fn start_backdrop(canvas_id: &str) -> Backdrop {
    let rain = config::RainConfig { canvas_id: canvas_id.to_string(), ..Default::default() };
    Backdrop::start(&rain)
}

/// Start only the section tracker.
#[wasm_bindgen(js_name = watchSections)]
pub fn watch_sections(on_section: Option<js_sys::Function>) -> SectionWatch {
    SectionWatch::start(&config::SectionConfig::default(), on_section)
}

#[cfg(feature = "serde_json")]
fn load_config(json: Option<&str>) -> Result<Config, MountError> {
    match json {
        Some(j) if !j.trim().is_empty() => Config::from_json(j),
        _ => Ok(Config::default()),
    }
}

#[cfg(not(feature = "serde_json"))]
fn load_config(json: Option<&str>) -> Result<Config, MountError> {
    if json.is_some_and(|j| !j.trim().is_empty()) {
        log::warn!("config overrides ignored: built without serde_json");
    }
    Ok(Config::default())
}
