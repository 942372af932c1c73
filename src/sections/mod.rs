//! Which page section the reader is looking at.
//!
//! Visibility reports arrive in batches (one per observer callback). A section
//! becomes active when its visible ratio rises from below the threshold to at
//! or above it. When several sections cross in the same batch the topmost one,
//! in document order, wins; callback order inside a batch is not relied on.

pub mod observer;

use std::fmt;
use std::str::FromStr;

use crate::SECTION_IDS;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// The fixed, ordered set of page sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(rename_all = "lowercase"))]
pub enum Section {
    Home,
    About,
    Skills,
    Projects,
    Contact,
}

impl Section {
    /// Document order.
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Skills,
        Section::Projects,
        Section::Contact,
    ];

    /// DOM id of the section element (also the nav anchor fragment).
    pub fn id(self) -> &'static str {
        SECTION_IDS[self.position()]
    }

    pub fn position(self) -> usize {
        self as usize
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::ALL[0]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section '{}'", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SECTION_IDS
            .iter()
            .position(|id| *id == s)
            .map(|i| Section::ALL[i])
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

// Extra observer thresholds below the activation threshold. A section taller
// than the viewport only reaches `viewport / height` of visibility, so the
// browser has to report at these smaller steps for it to be seen at all.
const THRESHOLD_LADDER: [f64; 8] = [0.0, 0.01, 0.025, 0.05, 0.1, 0.15, 0.2, 0.25];

/// Thresholds to register with the observer for an activation `threshold`.
pub fn observer_thresholds(threshold: f64) -> Vec<f64> {
    let mut out: Vec<f64> = THRESHOLD_LADDER.into_iter().filter(|t| *t < threshold).collect();
    out.push(threshold);
    out
}

/// Largest visible ratio a section of `section_height` can have inside a
/// viewport of `viewport_height`.
pub fn reachable_ratio(viewport_height: f64, section_height: f64) -> f64 {
    if section_height > 0.0 && viewport_height > 0.0 {
        (viewport_height / section_height).min(1.0)
    } else {
        1.0
    }
}

/// One visibility report for one section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub section: Section,
    /// Visible fraction of the section relative to the most it can show,
    /// 0..=1.
    pub ratio: f64,
    pub intersecting: bool,
}

impl Observation {
    pub fn new(section: Section, ratio: f64, intersecting: bool) -> Self {
        Self { section, ratio, intersecting }
    }

    /// Build from a raw intersection ratio and the section/viewport heights.
    /// A section filling the whole viewport reports 1 however tall it is.
    pub fn measured(
        section: Section,
        raw_ratio: f64,
        intersecting: bool,
        viewport_height: f64,
        section_height: f64,
    ) -> Self {
        let reach = reachable_ratio(viewport_height, section_height);
        Self::new(section, (raw_ratio / reach).clamp(0.0, 1.0), intersecting)
    }
}

#[derive(Clone, Debug)]
pub struct SectionTracker {
    threshold: f64,
    ratios: [f64; 5],
    active: Section,
}

impl SectionTracker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, ratios: [0.0; 5], active: Section::default() }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Last ratio reported for `section` (0 before any report).
    pub fn ratio(&self, section: Section) -> f64 {
        self.ratios[section.position()]
    }

    /// Feed one batch. Returns the new active section if it changed.
    pub fn observe(&mut self, batch: &[Observation]) -> Option<Section> {
        let mut winner: Option<Section> = None;
        for obs in batch {
            let slot = &mut self.ratios[obs.section.position()];
            let prev = *slot;
            let ratio = if obs.intersecting { obs.ratio } else { 0.0 };
            *slot = ratio;
            if self.crossed_up(prev, ratio) {
                winner = Some(match winner {
                    Some(w) if w <= obs.section => w,
                    _ => obs.section,
                });
            }
        }
        let next = winner?;
        if next == self.active {
            return None;
        }
        self.active = next;
        Some(next)
    }

    fn crossed_up(&self, prev: f64, now: f64) -> bool {
        prev < self.threshold && now >= self.threshold && now > 0.0
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new(0.3)
    }
}
