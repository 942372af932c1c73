// Dataset invariants for the built-in glyph alphabet and section ids.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use matrix_folio::{GLYPHS, SECTION_IDS, Section};

#[test]
fn glyphs_are_unique_and_printable() {
    let mut seen = HashSet::new();
    for c in GLYPHS.chars() {
        assert!(seen.insert(c), "duplicate glyph '{}'", c);
        assert!(!c.is_whitespace() && !c.is_control(), "unprintable glyph {:?}", c);
    }
    assert!(seen.len() > 60);
}

#[test]
fn glyphs_cover_katakana_digits_and_capitals() {
    assert!(GLYPHS.chars().any(|c| ('\u{30A0}'..='\u{30FF}').contains(&c)));
    assert!(('0'..='9').all(|d| GLYPHS.contains(d)));
    assert!(('A'..='Z').all(|l| GLYPHS.contains(l)));
}

#[test]
fn section_ids_match_enum_order() {
    let ids: Vec<&str> = Section::ALL.iter().map(|s| s.id()).collect();
    assert_eq!(ids, SECTION_IDS);
    assert_eq!(Section::default().id(), SECTION_IDS[0]);
    for id in SECTION_IDS {
        assert_eq!(id.parse::<Section>().map(|s| s.id()), Ok(id));
    }
}
