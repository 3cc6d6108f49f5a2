//! Horizontal metrics (hmtx table)

use super::reader::FontReader;
use crate::directory::{TableRecord, Tag};
use crate::metrics::GlyphMetrics;
use crate::{FontError, Result};

/// Read advance widths and left side bearings for every glyph.
///
/// `glyph_count` is `max(maxp.numGlyphs, hhea.numberOfHMetrics)`. Glyphs past
/// the last long metric repeat its advance width and carry only a bearing.
pub fn read_hmtx(
    r: &mut FontReader<'_>,
    record: TableRecord,
    number_of_h_metrics: u16,
    glyph_count: usize,
) -> Result<Vec<GlyphMetrics>> {
    let long_metrics = number_of_h_metrics as usize;
    if long_metrics * 4 > record.length as usize {
        return Err(FontError::malformed(
            Tag::HMTX,
            format!("{long_metrics} long metrics exceed table length {}", record.length),
        ));
    }

    r.seek(record.offset as usize)?;
    let mut glyphs = vec![GlyphMetrics::default(); glyph_count];

    for glyph in glyphs.iter_mut().take(long_metrics) {
        glyph.advance_width = r.read_u16()?;
        glyph.lsb = r.read_i16()?;
    }

    if long_metrics < glyph_count {
        let last_width = glyphs
            .get(long_metrics.wrapping_sub(1))
            .map(|g| g.advance_width)
            .unwrap_or(0);
        let bearings = (record.length as usize - long_metrics * 4) / 2;
        let short = glyph_count - long_metrics;
        if bearings < short {
            tracing::warn!("hmtx holds {} of {} trailing bearings", bearings, short);
        }

        for (i, glyph) in glyphs.iter_mut().enumerate().skip(long_metrics) {
            glyph.advance_width = last_width;
            if i - long_metrics < bearings {
                glyph.lsb = r.read_i16()?;
            }
        }
    }

    tracing::debug!("Read {} horizontal metrics ({} long)", glyph_count, long_metrics);
    Ok(glyphs)
}
