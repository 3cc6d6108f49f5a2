//! Glyph locations (loca) and glyph header bounds (glyf)

use super::reader::FontReader;
use crate::directory::{TableDirectory, TableRecord, Tag};
use crate::metrics::{BoundingBox, GlyphMetrics};
use crate::{FontError, Result};

/// Size of a glyph header: numberOfContours and the four bounds
const GLYPH_HEADER_LEN: u32 = 10;

/// Read glyph data offsets from `loca`.
///
/// Returns up to `num_glyphs + 1` offsets, fewer if the table is short.
/// Short offsets are stored halved and are doubled here.
pub fn read_loca(
    r: &mut FontReader<'_>,
    record: TableRecord,
    num_glyphs: usize,
    long_offsets: bool,
) -> Result<Vec<u32>> {
    let entry_len = if long_offsets { 4 } else { 2 };
    let available = record.length as usize / entry_len;
    let count = (num_glyphs + 1).min(available);
    if count < num_glyphs + 1 {
        tracing::warn!("loca holds {} of {} offsets", count, num_glyphs + 1);
    }

    r.seek(record.offset as usize)?;
    (0..count)
        .map(|_| {
            if long_offsets {
                r.read_u32()
            } else {
                r.read_u16().map(|v| u32::from(v) * 2)
            }
        })
        .collect()
}

/// Backfill each glyph's bounding box and data offset from `glyf`.
///
/// Empty glyphs keep a zero box but still get their offset. A font
/// without `loca` or `glyf` is left unchanged.
pub fn update_bboxes(
    r: &mut FontReader<'_>,
    directory: &TableDirectory,
    index_to_loc_format: i16,
    glyphs: &mut [GlyphMetrics],
) -> Result<()> {
    let (Some(loca), Some(glyf)) = (directory.get(Tag::LOCA), directory.get(Tag::GLYF)) else {
        tracing::warn!("TrueType font without loca/glyf, glyph bounds not read");
        return Ok(());
    };

    let offsets = read_loca(r, loca, glyphs.len(), index_to_loc_format != 0)?;
    let mut read = 0usize;

    for (i, window) in offsets.windows(2).enumerate() {
        let (start, end) = (window[0], window[1]);
        let glyph = &mut glyphs[i];
        glyph.glyph_offset = Some(start);

        if end <= start {
            continue;
        }
        if start.saturating_add(GLYPH_HEADER_LEN) > glyf.length {
            return Err(FontError::malformed(
                Tag::GLYF,
                format!("glyph {i} at {start} lies outside the table"),
            ));
        }

        r.seek(glyf.offset as usize + start as usize)?;
        let _contours = r.read_i16()?;
        glyph.bbox = BoundingBox::new(
            r.read_i16()?.into(),
            r.read_i16()?.into(),
            r.read_i16()?.into(),
            r.read_i16()?.into(),
        );
        read += 1;
    }

    tracing::debug!("Read {} glyph bounding boxes", read);
    Ok(())
}
