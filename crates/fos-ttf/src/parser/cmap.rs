//! Character to glyph mapping (cmap table)
//!
//! Only format 4 is decoded. The Windows Unicode BMP subtable (3,1) is
//! preferred; the Windows Symbol subtable (3,0) is the fallback, and its
//! private-use codes 0xF020..=0xF0FF are additionally exposed at
//! 0x20..=0xFF when those slots are free.

use std::collections::HashMap;

use super::reader::FontReader;
use crate::directory::{TableDirectory, Tag};
use crate::encoding::AnsiWidths;
use crate::metrics::GlyphMetrics;
use crate::{FontError, Result};

/// One decoded (glyph, code point) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnicodeMapping {
    pub glyph: u16,
    pub unicode: u32,
}

impl UnicodeMapping {
    pub fn new(glyph: u16, unicode: u32) -> Self {
        Self { glyph, unicode }
    }
}

/// Which subtable the mappings were decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CmapEncoding {
    /// (3,1)
    Unicode,
    /// (3,0)
    Symbol,
    /// No usable subtable
    #[default]
    None,
}

/// Decoded character map with reverse indices.
///
/// The mapping list keeps decode order. Both indices are built from it in
/// a separate step; when a glyph or code point repeats, the later pair
/// overwrites the earlier one.
#[derive(Debug, Clone, Default)]
pub struct CharMap {
    mappings: Vec<UnicodeMapping>,
    glyph_to_unicode: HashMap<u16, u32>,
    unicode_to_glyph: HashMap<u32, u16>,
    encoding: CmapEncoding,
    last_char: u8,
}

impl CharMap {
    /// Build the map and its reverse indices from decoded pairs
    pub fn from_mappings(mappings: Vec<UnicodeMapping>) -> Self {
        let mut map = Self {
            mappings,
            ..Default::default()
        };
        map.index();
        map
    }

    fn index(&mut self) {
        self.glyph_to_unicode.clear();
        self.unicode_to_glyph.clear();
        for m in &self.mappings {
            self.glyph_to_unicode.insert(m.glyph, m.unicode);
            self.unicode_to_glyph.insert(m.unicode, m.glyph);
        }
    }

    /// All pairs, in decode order
    pub fn mappings(&self) -> &[UnicodeMapping] {
        &self.mappings
    }

    pub fn glyph_for_unicode(&self, unicode: u32) -> Option<u16> {
        self.unicode_to_glyph.get(&unicode).copied()
    }

    pub fn unicode_for_glyph(&self, glyph: u16) -> Option<u32> {
        self.glyph_to_unicode.get(&glyph).copied()
    }

    pub fn encoding(&self) -> CmapEncoding {
        self.encoding
    }

    /// Largest code point below 256 covered by a segment
    pub fn last_char(&self) -> u8 {
        self.last_char
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Output of a format 4 decode, before any glyph bookkeeping
#[derive(Debug, Default)]
pub(crate) struct Format4 {
    pub mappings: Vec<UnicodeMapping>,
    pub last_char: u8,
}

/// Read `cmap`, attach code points to `glyphs` and backfill `widths`.
///
/// A missing table or one without a (3,1)/(3,0) subtable yields an empty
/// map. A selected subtable in any format but 4 is an error.
pub fn read_cmap(
    r: &mut FontReader<'_>,
    directory: &TableDirectory,
    glyphs: &mut [GlyphMetrics],
    widths: &mut AnsiWidths,
) -> Result<CharMap> {
    let Some(record) = directory.get(Tag::CMAP) else {
        tracing::warn!("Font has no cmap table");
        return Ok(CharMap::default());
    };

    let table = record.offset as usize;
    r.seek(table + 2)?; // version
    let num_subtables = r.read_u16()? as usize;
    r.ensure(num_subtables * 8).map_err(|_| {
        FontError::malformed(Tag::CMAP, format!("{num_subtables} encoding records do not fit"))
    })?;

    let (mut unicode_offset, mut symbol_offset) = (None, None);
    for _ in 0..num_subtables {
        let platform_id = r.read_u16()?;
        let encoding_id = r.read_u16()?;
        let offset = r.read_u32()?;
        match (platform_id, encoding_id) {
            (3, 1) => unicode_offset = Some(offset),
            (3, 0) => symbol_offset = Some(offset),
            _ => tracing::trace!("Skipping cmap subtable ({}, {})", platform_id, encoding_id),
        }
    }

    let (offset, encoding) = match (unicode_offset, symbol_offset) {
        (Some(offset), _) => (offset, CmapEncoding::Unicode),
        (None, Some(offset)) => (offset, CmapEncoding::Symbol),
        (None, None) => {
            tracing::warn!("No Windows Unicode or Symbol cmap subtable");
            return Ok(CharMap::default());
        }
    };

    let subtable = table + offset as usize;
    let decoded = decode_format4(r, subtable, encoding == CmapEncoding::Symbol)?;

    for m in &decoded.mappings {
        let Some(glyph) = glyphs.get_mut(m.glyph as usize) else {
            tracing::trace!("cmap U+{:04X} maps past the glyph table ({})", m.unicode, m.glyph);
            continue;
        };
        glyph.add_unicode(m.unicode);
        widths.backfill(m.unicode, glyph.advance_width);
    }

    let mut map = CharMap::from_mappings(decoded.mappings);
    map.encoding = encoding;
    map.last_char = decoded.last_char;

    tracing::debug!(
        "Read cmap {:?}: {} mappings, last char {}",
        encoding,
        map.len(),
        map.last_char
    );
    Ok(map)
}

/// Decode a format 4 subtable starting at absolute offset `subtable`
pub(crate) fn decode_format4(
    r: &mut FontReader<'_>,
    subtable: usize,
    symbol: bool,
) -> Result<Format4> {
    r.seek(subtable)?;
    let format = r.read_u16()?;
    if format != 4 {
        return Err(FontError::UnsupportedCmapFormat(format));
    }
    r.skip(2 + 2)?; // length, language
    let seg_count = (r.read_u16()? / 2) as usize;
    r.skip(6)?; // search range, entry selector, range shift

    // Four parallel arrays plus the reserved pad
    r.ensure(seg_count * 8 + 2).map_err(|_| {
        FontError::malformed(Tag::CMAP, format!("{seg_count} segments do not fit"))
    })?;

    let end_codes = read_u16_array(r, seg_count)?;
    r.skip(2)?; // reserved pad
    let start_codes = read_u16_array(r, seg_count)?;
    let deltas = (0..seg_count)
        .map(|_| r.read_i16())
        .collect::<Result<Vec<_>>>()?;
    let range_offsets = read_u16_array(r, seg_count)?;
    let glyph_id_array = r.position();
    check_segment_order(&start_codes, &end_codes)?;

    let mut out = Format4::default();
    let mut eight_bit = [false; 256];

    for i in 0..seg_count {
        let (start, end) = (u32::from(start_codes[i]), u32::from(end_codes[i]));
        let delta = i32::from(deltas[i]);

        for code in start..=end {
            if code < 256 {
                out.last_char = out.last_char.max(code as u8);
                eight_bit[code as usize] = true;
            }
            // Terminating segment
            if code == 0xFFFF {
                continue;
            }

            let glyph = if range_offsets[i] == 0 {
                (code as i32 + delta) as u16
            } else {
                // Index into glyphIdArray, relative to this segment's idRangeOffset slot
                let slot = i64::from(range_offsets[i] / 2) + i64::from(code - start) + i as i64
                    - seg_count as i64;
                let address = glyph_id_array as i64 + slot * 2;
                match read_glyph_at(r, address)? {
                    Some(raw) => (i32::from(raw) + delta) as u16,
                    None => {
                        tracing::trace!("cmap glyph index for U+{:04X} lies outside the font", code);
                        continue;
                    }
                }
            };

            out.mappings.push(UnicodeMapping::new(glyph, code));

            if symbol && (0xF020..=0xF0FF).contains(&code) {
                let mapped = code - 0xF000;
                if !eight_bit[mapped as usize] {
                    out.mappings.push(UnicodeMapping::new(glyph, mapped));
                }
            }
        }
    }

    Ok(out)
}

/// Segments must satisfy `start <= end` and follow each other without
/// overlap, which bounds the decoded mappings by the 16-bit code space
fn check_segment_order(start_codes: &[u16], end_codes: &[u16]) -> Result<()> {
    let mut previous_end: Option<u16> = None;
    for (i, (&start, &end)) in start_codes.iter().zip(end_codes).enumerate() {
        if start > end {
            return Err(FontError::malformed(
                Tag::CMAP,
                format!("segment {i} starts at {start:#06x} after its end {end:#06x}"),
            ));
        }
        if previous_end.is_some_and(|prev| start <= prev) {
            return Err(FontError::malformed(
                Tag::CMAP,
                format!("segment {i} at {start:#06x} overlaps the previous segment"),
            ));
        }
        previous_end = Some(end);
    }
    Ok(())
}

fn read_u16_array(r: &mut FontReader<'_>, count: usize) -> Result<Vec<u16>> {
    (0..count).map(|_| r.read_u16()).collect()
}

fn read_glyph_at(r: &mut FontReader<'_>, address: i64) -> Result<Option<u16>> {
    let Ok(address) = usize::try_from(address) else {
        return Ok(None);
    };
    if address.saturating_add(2) > r.len() {
        return Ok(None);
    }
    r.seek(address)?;
    r.read_u16().map(Some)
}
