//! Canvas binding for the rain: a 2D-context [`Surface`] plus the owned
//! [`Backdrop`] handle that drives it from a fixed interval.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::{Animator, GlyphTone, RainField, Surface};
use crate::config::RainConfig;
use crate::dom::{self, Listener};
use crate::error::MountError;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    font: String,
    base: String,
    highlight: String,
    glow_blur: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, config: &RainConfig) -> Result<Self, MountError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(MountError::NoContext)?
            .dyn_into()
            .map_err(|_| MountError::NoContext)?;
        Ok(Self {
            canvas,
            ctx,
            font: format!("{}px monospace", config.glyph_size),
            base: config.base_color.clone(),
            highlight: config.highlight_color.clone(),
            glow_blur: config.glow_blur,
        })
    }

    /// Match the backing store to the viewport.
    fn fit(&self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }
}

impl Surface for CanvasSurface {
    fn fade(&mut self, alpha: f64) {
        self.ctx.set_fill_style_str(&format!("rgba(0, 0, 0, {alpha})"));
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        self.ctx.set_font(&self.font);
        self.ctx.set_fill_style_str(&self.base);
    }

    fn glyph(&mut self, ch: char, x: f64, y: f64, tone: GlyphTone) {
        let mut buf = [0u8; 4];
        let text = ch.encode_utf8(&mut buf);
        match tone {
            GlyphTone::Base => {
                self.ctx.fill_text(text, x, y).ok();
            }
            GlyphTone::Highlight => {
                self.ctx.set_fill_style_str(&self.highlight);
                self.ctx.set_shadow_color(&self.base);
                self.ctx.set_shadow_blur(self.glow_blur);
                self.ctx.fill_text(text, x, y).ok();
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_fill_style_str(&self.base);
            }
        }
    }
}

type SharedAnimator = Rc<RefCell<Animator<CanvasSurface>>>;

/// Running backdrop. Dropping it (or calling `stop`) cancels the interval and
/// detaches the resize listener.
#[wasm_bindgen]
pub struct Backdrop {
    animator: Option<SharedAnimator>,
    interval: Option<Interval>,
    resize: Option<Listener>,
}

impl Backdrop {
    /// Handle that owns nothing; returned when the page has no usable canvas.
    pub fn inert() -> Self {
        Self { animator: None, interval: None, resize: None }
    }

    /// Attach to the configured canvas. Any environment problem yields an
    /// inert handle instead of an error.
    pub fn start(config: &RainConfig) -> Self {
        match Self::try_start(config) {
            Ok(b) => b,
            Err(e) => {
                debug!("backdrop disabled: {e}");
                Self::inert()
            }
        }
    }

    fn try_start(config: &RainConfig) -> Result<Self, MountError> {
        let win = dom::window()?;
        let doc = dom::document(&win)?;
        let canvas: HtmlCanvasElement = doc
            .get_element_by_id(&config.canvas_id)
            .ok_or_else(|| MountError::MissingElement(config.canvas_id.clone()))?
            .dyn_into()
            .map_err(|_| MountError::MissingElement(config.canvas_id.clone()))?;

        let surface = CanvasSurface::new(canvas, config)?;
        let (w, h) = viewport(&win);
        surface.fit(w, h);
        let field = RainField::new(w, h, config, dom::random_seed(&win));
        info!(
            "backdrop started: {}x{} px, {} columns",
            w,
            h,
            field.column_count()
        );
        let animator: SharedAnimator = Rc::new(RefCell::new(Animator::new(field, surface)));

        let ticking = animator.clone();
        let interval = Interval::new(config.tick_ms, move || {
            if let Ok(mut a) = ticking.try_borrow_mut() {
                a.tick();
            }
        });

        let resizing = animator.clone();
        let resize = Listener::new(win.as_ref(), "resize", move |_evt: web_sys::Event| {
            let Some(win) = web_sys::window() else { return };
            let (w, h) = viewport(&win);
            if let Ok(mut a) = resizing.try_borrow_mut() {
                if !a.is_running() {
                    return;
                }
                a.surface_mut().fit(w, h);
                a.resize(w, h);
                debug!("backdrop resized: {}x{} px, {} columns", w, h, a.field().column_count());
            }
        })?;

        Ok(Self {
            animator: Some(animator),
            interval: Some(interval),
            resize: Some(resize),
        })
    }

    pub fn painted(&self) -> u64 {
        self.animator.as_ref().map(|a| a.borrow().painted()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.animator
            .as_ref()
            .map(|a| a.borrow().field().column_count())
            .unwrap_or(0)
    }
}

#[wasm_bindgen]
impl Backdrop {
    /// Release the timer and listener. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let had_timer = self.interval.take().is_some();
        self.resize.take();
        if let Some(animator) = &self.animator {
            let mut a = animator.borrow_mut();
            a.stop();
            if had_timer {
                debug!("backdrop stopped after {} frames", a.painted());
            }
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.animator
            .as_ref()
            .map(|a| a.borrow().is_running())
            .unwrap_or(false)
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn viewport(win: &Window) -> (f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}
