//! Loading gate followed by a typewriter reveal of the job title.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use web_sys::{Document, Element};

use crate::config::IntroConfig;
use crate::dom;

/// Grows a string one `char` at a time.
#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    // byte offset just past each char
    ends: Vec<usize>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let ends = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
        Self { text, ends, shown: 0 }
    }

    /// Reveal one more char and return the visible prefix; `None` once the
    /// whole text is showing.
    pub fn step(&mut self) -> Option<&str> {
        if self.is_complete() {
            return None;
        }
        self.shown += 1;
        Some(&self.text[..self.ends[self.shown - 1]])
    }

    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.ends.len()
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }
}

struct IntroState {
    doc: Document,
    config: IntroConfig,
    writer: Typewriter,
    title: Option<Element>,
    pending: Option<Timeout>,
    stopped: bool,
}

/// Running intro sequence; dropping it cancels any pending timer.
pub struct Intro {
    state: Option<Rc<RefCell<IntroState>>>,
}

impl Intro {
    pub fn start(config: &IntroConfig) -> Self {
        let doc = match dom::window().and_then(|w| dom::document(&w)) {
            Ok(doc) => doc,
            Err(e) => {
                debug!("intro disabled: {e}");
                return Self { state: None };
            }
        };
        let state = Rc::new(RefCell::new(IntroState {
            doc,
            config: config.clone(),
            writer: Typewriter::new(config.title.clone()),
            title: None,
            pending: None,
            stopped: false,
        }));
        let gate = state.clone();
        let timeout = Timeout::new(config.loading_ms, move || finish_loading(gate));
        state.borrow_mut().pending = Some(timeout);
        Self { state: Some(state) }
    }

    pub fn is_complete(&self) -> bool {
        self.state
            .as_ref()
            .map(|s| s.borrow().writer.is_complete())
            .unwrap_or(false)
    }

    /// Cancel pending timers. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(state) = self.state.take() {
            let mut st = state.borrow_mut();
            st.stopped = true;
            st.pending.take();
        }
    }
}

impl Drop for Intro {
    fn drop(&mut self) {
        self.stop();
    }
}

fn finish_loading(state: Rc<RefCell<IntroState>>) {
    {
        let mut st = state.borrow_mut();
        if st.stopped {
            return;
        }
        st.pending = None;
        if let Some(loader) = st.doc.get_element_by_id(&st.config.loader_id) {
            dom::add_class(&loader, "hidden");
        }
        let title = st.doc.get_element_by_id(&st.config.title_id);
        st.title = title;
        match &st.title {
            Some(title) => title.set_text_content(Some("")),
            None => debug!("#{} not on page; typing skipped", st.config.title_id),
        }
        info!("loading gate opened");
    }
    type_next(state);
}

fn type_next(state: Rc<RefCell<IntroState>>) {
    let delay = {
        let mut st = state.borrow_mut();
        if st.stopped {
            return;
        }
        let IntroState { writer, title, doc, config, pending, .. } = &mut *st;
        if title.is_none() {
            // Nothing to type into: finish straight away.
            while writer.step().is_some() {}
        }
        match writer.step() {
            Some(prefix) => {
                if let Some(el) = title {
                    el.set_text_content(Some(prefix));
                }
                config.char_ms
            }
            None => {
                for el in dom::query_all(doc, &format!(".{}", config.after_typing_class)) {
                    dom::remove_class(&el, "hidden");
                    dom::add_class(&el, "visible");
                }
                pending.take();
                debug!("typewriter complete");
                return;
            }
        }
    };
    let next = state.clone();
    let timeout = Timeout::new(delay, move || type_next(next));
    state.borrow_mut().pending = Some(timeout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_one_char_per_step() {
        let mut tw = Typewriter::new("Dev");
        assert_eq!(tw.visible(), "");
        assert_eq!(tw.step(), Some("D"));
        assert_eq!(tw.step(), Some("De"));
        assert_eq!(tw.step(), Some("Dev"));
        assert!(tw.is_complete());
        assert_eq!(tw.step(), None);
        assert_eq!(tw.visible(), "Dev");
    }

    #[test]
    fn test_steps_on_char_boundaries() {
        let mut tw = Typewriter::new("アイ0");
        assert_eq!(tw.len(), 3);
        assert_eq!(tw.step(), Some("ア"));
        assert_eq!(tw.step(), Some("アイ"));
        assert_eq!(tw.step(), Some("アイ0"));
        assert_eq!(tw.step(), None);
    }

    #[test]
    fn test_empty_text_is_complete_immediately() {
        let mut tw = Typewriter::new("");
        assert!(tw.is_empty());
        assert!(tw.is_complete());
        assert_eq!(tw.step(), None);
    }

    #[test]
    fn test_default_title_length() {
        let cfg = IntroConfig::default();
        let mut tw = Typewriter::new(cfg.title.clone());
        let mut steps = 0;
        while tw.step().is_some() {
            steps += 1;
        }
        assert_eq!(steps, cfg.title.chars().count());
    }
}
