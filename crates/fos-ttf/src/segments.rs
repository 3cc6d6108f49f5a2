//! Contiguous Unicode to glyph ranges

use std::collections::BTreeMap;

use crate::parser::cmap::UnicodeMapping;

/// A run where code point and glyph id advance together.
///
/// Every code point `u` in `unicode_start..=unicode_end` maps to
/// `glyph_start + (u - unicode_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CMapSegment {
    pub unicode_start: u32,
    pub unicode_end: u32,
    pub glyph_start: u32,
}

impl CMapSegment {
    pub fn new(unicode_start: u32, unicode_end: u32, glyph_start: u32) -> Self {
        Self {
            unicode_start,
            unicode_end,
            glyph_start,
        }
    }

    pub fn contains(&self, unicode: u32) -> bool {
        (self.unicode_start..=self.unicode_end).contains(&unicode)
    }

    /// Glyph for `unicode`, if it falls inside this run
    pub fn glyph_for(&self, unicode: u32) -> Option<u32> {
        self.contains(unicode)
            .then(|| self.glyph_start + (unicode - self.unicode_start))
    }

    /// Expand back into one mapping per code point
    pub fn expand(&self) -> impl Iterator<Item = UnicodeMapping> + '_ {
        (self.unicode_start..=self.unicode_end)
            .map(|u| UnicodeMapping::new((self.glyph_start + (u - self.unicode_start)) as u16, u))
    }
}

/// Coalesce mappings into runs in a single pass.
///
/// A run is extended while both the code point and the glyph id are exactly
/// one more than the previous pair's; anything else closes it. The output
/// follows the input order, so segments are sorted and disjoint whenever
/// the input is sorted by code point without repeats.
pub fn compress(mappings: &[UnicodeMapping]) -> Vec<CMapSegment> {
    let Some((first, rest)) = mappings.split_first() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut current = CMapSegment::new(first.unicode, first.unicode, u32::from(first.glyph));
    let mut last = *first;

    for m in rest {
        let consecutive = last.unicode.checked_add(1) == Some(m.unicode)
            && u32::from(last.glyph) + 1 == u32::from(m.glyph);
        if consecutive {
            current.unicode_end = m.unicode;
        } else {
            segments.push(current);
            current = CMapSegment::new(m.unicode, m.unicode, u32::from(m.glyph));
        }
        last = *m;
    }
    segments.push(current);

    segments
}

/// Sort mappings by code point; a repeated code point keeps its last glyph
pub fn canonicalize(mappings: &[UnicodeMapping]) -> Vec<UnicodeMapping> {
    let by_unicode: BTreeMap<u32, u16> = mappings.iter().map(|m| (m.unicode, m.glyph)).collect();
    by_unicode
        .into_iter()
        .map(|(unicode, glyph)| UnicodeMapping::new(glyph, unicode))
        .collect()
}
