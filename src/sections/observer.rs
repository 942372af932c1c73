//! IntersectionObserver wiring for [`SectionTracker`] and nav highlighting.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::{Observation, Section, SectionTracker, observer_thresholds};
use crate::config::SectionConfig;
use crate::dom;
use crate::error::MountError;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Live section observation. Dropping it disconnects the observer.
#[wasm_bindgen]
pub struct SectionWatch {
    tracker: Rc<RefCell<SectionTracker>>,
    observer: Option<IntersectionObserver>,
    callback: Option<ObserverCallback>,
}

impl SectionWatch {
    /// Observe every section element present on the page. Sections without
    /// an element are skipped; with no document at all the watch is inert
    /// and reports `home` forever.
    pub fn start(config: &SectionConfig, on_change: Option<Function>) -> Self {
        let tracker = Rc::new(RefCell::new(SectionTracker::new(config.threshold)));
        match Self::attach(tracker.clone(), config, on_change) {
            Ok((observer, callback)) => Self {
                tracker,
                observer: Some(observer),
                callback: Some(callback),
            },
            Err(e) => {
                debug!("section watch disabled: {e}");
                Self { tracker, observer: None, callback: None }
            }
        }
    }

    fn attach(
        tracker: Rc<RefCell<SectionTracker>>,
        config: &SectionConfig,
        on_change: Option<Function>,
    ) -> Result<(IntersectionObserver, ObserverCallback), MountError> {
        let win = dom::window()?;
        let doc = dom::document(&win)?;
        let visible_class = config.visible_class.clone();
        let nav_class = config.nav_active_class.clone();
        let cb_doc = doc.clone();
        let cb_win = win.clone();

        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, _obs: IntersectionObserver| {
                let batch: Vec<Observation> = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let target = entry.target();
                        let section = target.id().parse::<Section>().ok()?;
                        if entry.is_intersecting() {
                            dom::add_class(&target, &visible_class);
                        }
                        let viewport = match entry.root_bounds() {
                            Some(rect) => rect.height(),
                            None => cb_win
                                .inner_height()
                                .ok()
                                .and_then(|h| h.as_f64())
                                .unwrap_or(0.0),
                        };
                        Some(Observation::measured(
                            section,
                            entry.intersection_ratio(),
                            entry.is_intersecting(),
                            viewport,
                            entry.bounding_client_rect().height(),
                        ))
                    })
                    .collect();
                let changed = match tracker.try_borrow_mut() {
                    Ok(mut t) => t.observe(&batch),
                    Err(_) => None,
                };
                if let Some(active) = changed {
                    debug!("active section: {active}");
                    highlight_nav(&cb_doc, active, &nav_class);
                    if let Some(f) = &on_change {
                        f.call1(&JsValue::NULL, &JsValue::from_str(active.id())).ok();
                    }
                }
            },
        )
            as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        let thresholds: Array = observer_thresholds(config.threshold)
            .into_iter()
            .map(JsValue::from_f64)
            .collect();
        init.set_threshold(&thresholds);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        let mut watched = 0;
        for section in Section::ALL {
            match doc.get_element_by_id(section.id()) {
                Some(el) => {
                    observer.observe(&el);
                    watched += 1;
                }
                None => debug!("section #{} not on page; skipped", section.id()),
            }
        }
        highlight_nav(&doc, Section::default(), &config.nav_active_class);
        info!("watching {watched} sections at threshold {}", config.threshold);
        Ok((observer, callback))
    }

    pub fn active(&self) -> Section {
        self.tracker.borrow().active()
    }
}

#[wasm_bindgen]
impl SectionWatch {
    /// Id of the current active section.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> String {
        self.active().id().to_string()
    }

    /// Disconnect the observer. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
            debug!("section watch stopped");
        }
        self.callback.take();
    }
}

impl Drop for SectionWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mark nav links that point at `active` and clear the rest.
fn highlight_nav(doc: &Document, active: Section, class: &str) {
    for section in Section::ALL {
        for link in dom::query_all(doc, &format!("a[href=\"#{}\"]", section.id())) {
            if section == active {
                dom::add_class(&link, class);
            } else {
                dom::remove_class(&link, class);
            }
        }
    }
}
