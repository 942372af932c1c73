//! One-shot reveal of content blocks as they scroll into view.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use js_sys::Array;
use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::RevealConfig;
use crate::dom;
use crate::error::MountError;

/// Bookkeeping for which registered elements have been revealed.
/// Keys are the element's position in the registration list.
#[derive(Clone, Debug, Default)]
pub struct RevealSet {
    total: usize,
    revealed: BTreeSet<usize>,
}

impl RevealSet {
    pub fn new(total: usize) -> Self {
        Self { total, revealed: BTreeSet::new() }
    }

    /// Keys that must be revealed now for a batch of `(key, intersecting)`
    /// reports. Each key is returned at most once over the set's lifetime.
    pub fn admit(&mut self, batch: &[(usize, bool)]) -> Vec<usize> {
        let mut out = Vec::new();
        for &(key, intersecting) in batch {
            if intersecting && key < self.total && self.revealed.insert(key) {
                out.push(key);
            }
        }
        out
    }

    pub fn is_revealed(&self, key: usize) -> bool {
        self.revealed.contains(&key)
    }

    pub fn pending(&self) -> usize {
        self.total - self.revealed.len()
    }

    pub fn is_done(&self) -> bool {
        self.pending() == 0
    }
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Live reveal observer. Dropping it disconnects.
pub struct RevealWatch {
    observer: Option<IntersectionObserver>,
    callback: Option<ObserverCallback>,
}

impl RevealWatch {
    pub fn start(config: &RevealConfig) -> Self {
        match Self::attach(config) {
            Ok((observer, callback)) => Self { observer: Some(observer), callback: Some(callback) },
            Err(e) => {
                debug!("reveal disabled: {e}");
                Self { observer: None, callback: None }
            }
        }
    }

    fn attach(config: &RevealConfig) -> Result<(IntersectionObserver, ObserverCallback), MountError> {
        let win = dom::window()?;
        let doc = dom::document(&win)?;
        let elements: Rc<Vec<Element>> = Rc::new(dom::query_all(&doc, &config.selector));
        let reveal_set = Rc::new(RefCell::new(RevealSet::new(elements.len())));
        let class = config.class.clone();

        let targets = elements.clone();
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, obs: IntersectionObserver| {
                let batch: Vec<(usize, bool)> = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let target = entry.target();
                        let key = targets.iter().position(|el| *el == target)?;
                        Some((key, entry.is_intersecting()))
                    })
                    .collect();
                let Ok(mut set) = reveal_set.try_borrow_mut() else { return };
                for key in set.admit(&batch) {
                    dom::add_class(&targets[key], &class);
                    obs.unobserve(&targets[key]);
                }
                if set.is_done() {
                    obs.disconnect();
                }
            },
        )
            as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.threshold));
        init.set_root_margin(&config.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for el in elements.iter() {
            observer.observe(el);
        }
        info!("reveal watching {} elements", elements.len());
        Ok((observer, callback))
    }

    /// Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.callback.take();
    }
}

impl Drop for RevealWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_each_key_once() {
        let mut set = RevealSet::new(3);
        assert_eq!(set.admit(&[(0, true), (1, false)]), vec![0]);
        assert_eq!(set.admit(&[(0, true), (1, true)]), vec![1]);
        assert!(set.is_revealed(0) && set.is_revealed(1));
        assert_eq!(set.pending(), 1);
        assert_eq!(set.admit(&[(2, true), (2, true)]), vec![2]);
        assert!(set.is_done());
    }

    #[test]
    fn test_ignores_unknown_keys() {
        let mut set = RevealSet::new(1);
        assert!(set.admit(&[(5, true)]).is_empty());
        assert_eq!(set.pending(), 1);
    }

    #[test]
    fn test_empty_set_is_done() {
        assert!(RevealSet::new(0).is_done());
    }
}
