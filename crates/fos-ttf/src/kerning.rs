//! Kerning tables keyed by code point and by WinAnsi code
//!
//! Pairs are read by glyph id and re-keyed through the cmap reverse
//! indices. The WinAnsi table is derived from the code point table, never
//! read independently: each key is resolved back to its glyph and fanned
//! out to every code point of that glyph and every legacy code aliasing
//! those code points.

use std::collections::BTreeMap;

use crate::encoding::AnsiWidths;
use crate::metrics::GlyphMetrics;
use crate::parser::cmap::CharMap;
use crate::parser::kern::KernPair;
use crate::{FontError, Result};

/// Both kerning tables of a font
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KerningTables {
    /// first code point -> second code point -> adjustment, in design units
    by_unicode: BTreeMap<u32, BTreeMap<u32, i32>>,
    /// first WinAnsi code -> second WinAnsi code -> adjustment, in output units
    by_legacy: BTreeMap<u8, BTreeMap<u8, i32>>,
}

impl KerningTables {
    /// Re-key glyph pairs and derive the WinAnsi table.
    ///
    /// Pairs whose glyphs have no code point are dropped. `to_output`
    /// converts design units for the WinAnsi table.
    pub fn build(
        pairs: &[KernPair],
        cmap: &CharMap,
        glyphs: &[GlyphMetrics],
        widths: &AnsiWidths,
        to_output: impl Fn(i32) -> i32,
    ) -> Result<Self> {
        let mut by_unicode: BTreeMap<u32, BTreeMap<u32, i32>> = BTreeMap::new();
        let mut dropped = 0usize;
        for pair in pairs {
            match (cmap.unicode_for_glyph(pair.left), cmap.unicode_for_glyph(pair.right)) {
                (Some(left), Some(right)) => {
                    by_unicode
                        .entry(left)
                        .or_default()
                        .insert(right, i32::from(pair.value));
                }
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!("Dropped {} kerning pairs without code points", dropped);
        }

        let by_legacy = derive_legacy(&by_unicode, cmap, glyphs, widths, to_output)?;

        Ok(Self {
            by_unicode,
            by_legacy,
        })
    }

    pub fn by_unicode(&self) -> &BTreeMap<u32, BTreeMap<u32, i32>> {
        &self.by_unicode
    }

    pub fn by_legacy(&self) -> &BTreeMap<u8, BTreeMap<u8, i32>> {
        &self.by_legacy
    }

    /// Adjustment between two code points, in design units
    pub fn unicode_kerning(&self, left: u32, right: u32) -> Option<i32> {
        self.by_unicode.get(&left)?.get(&right).copied()
    }

    /// Adjustment between two WinAnsi codes, in output units
    pub fn legacy_kerning(&self, left: u8, right: u8) -> Option<i32> {
        self.by_legacy.get(&left)?.get(&right).copied()
    }

    /// Number of code point pairs
    pub fn len(&self) -> usize {
        self.by_unicode.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_unicode.is_empty()
    }
}

fn unicodes_of(glyphs: &[GlyphMetrics], glyph: u16) -> &[u32] {
    glyphs
        .get(glyph as usize)
        .map_or(&[], |g| g.unicodes.as_slice())
}

fn derive_legacy(
    by_unicode: &BTreeMap<u32, BTreeMap<u32, i32>>,
    cmap: &CharMap,
    glyphs: &[GlyphMetrics],
    widths: &AnsiWidths,
    to_output: impl Fn(i32) -> i32,
) -> Result<BTreeMap<u8, BTreeMap<u8, i32>>> {
    let mut by_legacy: BTreeMap<u8, BTreeMap<u8, i32>> = BTreeMap::new();

    for (&left, adjustments) in by_unicode {
        let left_glyph = cmap
            .glyph_for_unicode(left)
            .ok_or(FontError::UnresolvableKerningKey(left))?;

        let mut row: BTreeMap<u8, i32> = BTreeMap::new();
        for (&right, &value) in adjustments {
            let right_glyph = cmap
                .glyph_for_unicode(right)
                .ok_or(FontError::UnresolvableKerningKey(right))?;
            let value = to_output(value);
            for &unicode in unicodes_of(glyphs, right_glyph) {
                for &code in widths.legacy_codes(unicode) {
                    row.insert(code, value);
                }
            }
        }

        if row.is_empty() {
            continue;
        }
        for &unicode in unicodes_of(glyphs, left_glyph) {
            for &code in widths.legacy_codes(unicode) {
                by_legacy
                    .entry(code)
                    .or_default()
                    .extend(row.iter().map(|(&k, &v)| (k, v)));
            }
        }
    }

    Ok(by_legacy)
}
