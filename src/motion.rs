//! Scroll parallax on the hero section and pointer tilt on project cards.

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use crate::config::MotionConfig;
use crate::dom::{self, Listener};
use crate::error::MountError;

/// Vertical shift (px) of the parallax section for a given scroll position.
pub fn parallax_offset(scroll_y: f64, factor: f64) -> f64 {
    scroll_y * factor
}

pub fn parallax_transform(offset: f64) -> String {
    format!("translateY({offset}px)")
}

/// Card rotation in degrees for a pointer at `(x, y)` relative to the card's
/// top-left corner. Pointer below centre tips the card back (positive X);
/// pointer left of centre turns it left (positive Y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    pub const FLAT: Tilt = Tilt { rotate_x: 0.0, rotate_y: 0.0 };

    pub fn at(x: f64, y: f64, width: f64, height: f64, divisor: f64) -> Self {
        Self {
            rotate_x: (y - height / 2.0) / divisor,
            rotate_y: (width / 2.0 - x) / divisor,
        }
    }

    pub fn css(&self, perspective_px: f64) -> String {
        format!(
            "perspective({perspective_px}px) rotateX({}deg) rotateY({}deg)",
            self.rotate_x, self.rotate_y
        )
    }
}

/// Scroll and pointer listeners; all detach on `stop` or drop.
pub struct Motion {
    listeners: Vec<Listener>,
}

impl Motion {
    pub fn start(config: &MotionConfig) -> Self {
        match Self::attach(config) {
            Ok(listeners) => Self { listeners },
            Err(e) => {
                debug!("motion disabled: {e}");
                Self { listeners: Vec::new() }
            }
        }
    }

    fn attach(config: &MotionConfig) -> Result<Vec<Listener>, MountError> {
        let win = dom::window()?;
        let doc = dom::document(&win)?;
        let mut listeners = Vec::new();

        match doc.get_element_by_id(config.parallax_section.id()) {
            Some(hero) => {
                let factor = config.parallax_factor;
                let scroll_win = win.clone();
                listeners.push(Listener::new(win.as_ref(), "scroll", move |_| {
                    let y = scroll_win.scroll_y().unwrap_or(0.0);
                    dom::set_transform(&hero, &parallax_transform(parallax_offset(y, factor)));
                })?);
            }
            None => debug!("#{} not on page; parallax skipped", config.parallax_section.id()),
        }

        let cards = dom::query_all(&doc, &config.tilt_selector);
        for card in cards {
            let divisor = config.tilt_divisor;
            let perspective = config.perspective_px;
            let target: Element = card.clone();
            listeners.push(Listener::new(card.as_ref(), "mousemove", move |evt| {
                let Some(evt) = evt.dyn_ref::<MouseEvent>() else { return };
                let rect = target.get_bounding_client_rect();
                let tilt = Tilt::at(
                    evt.client_x() as f64 - rect.left(),
                    evt.client_y() as f64 - rect.top(),
                    rect.width(),
                    rect.height(),
                    divisor,
                );
                dom::set_transform(&target, &tilt.css(perspective));
            })?);
            let target = card.clone();
            listeners.push(Listener::new(card.as_ref(), "mouseleave", move |_| {
                dom::set_transform(&target, &Tilt::FLAT.css(perspective));
            })?);
        }
        Ok(listeners)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.listeners.clear();
    }
}
