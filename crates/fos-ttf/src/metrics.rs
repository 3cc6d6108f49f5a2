//! Glyph metrics and vertical metric heuristics
//!
//! Ascender and descender values are inconsistent across fonts: some follow
//! the Apple reading of `hhea`, some put typographic values in `OS/2`, and
//! accented glyphs may legitimately extend past the em box. The heuristics
//! here pick the pair that best adds up to the em box and fall back to the
//! bounds of known glyphs when neither source does.

/// Glyph bounding box in font design units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn to_array(self) -> [i32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}

/// Per-glyph record, indexed by glyph id
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlyphMetrics {
    pub advance_width: u16,
    pub lsb: i16,
    pub bbox: BoundingBox,
    /// PostScript glyph name from `post`
    pub name: Option<String>,
    /// Code points mapping to this glyph, in cmap order without repeats
    pub unicodes: Vec<u32>,
    /// Name index from a format 2 `post` table
    pub post_index: Option<u16>,
    /// Offset of the glyph data within `glyf`
    pub glyph_offset: Option<u32>,
}

impl GlyphMetrics {
    /// Record a code point for this glyph; repeats are ignored
    pub fn add_unicode(&mut self, unicode: u32) {
        if !self.unicodes.contains(&unicode) {
            self.unicodes.push(unicode);
        }
    }

    /// The first associated code point, if any
    pub fn first_unicode(&self) -> Option<u32> {
        self.unicodes.first().copied()
    }
}

/// Raw vertical values collected from `hhea`, `OS/2` and `PCLT`
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricSources {
    pub units_per_em: u16,
    pub hhea_ascender: i32,
    pub hhea_descender: i32,
    pub os2_ascender: i32,
    pub os2_descender: i32,
    pub os2_cap_height: i32,
    pub os2_x_height: i32,
    /// Zero when the font has no PCLT table
    pub pclt_cap_height: i32,
    pub pclt_x_height: i32,
}

/// Effective vertical metrics, in font design units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VerticalMetrics {
    pub ascender: i32,
    pub descender: i32,
    pub cap_height: i32,
    pub x_height: i32,
}

/// Choose ascender/descender from OS/2 or hhea.
///
/// A source qualifies when its ascender is positive and its box height
/// fits in the em. OS/2 is preferred, then hhea; if neither fits, a positive
/// OS/2 ascender still wins over hhea.
pub fn determine_asc_desc(src: &MetricSources) -> (i32, i32) {
    let upem = i32::from(src.units_per_em);
    let hhea_box = src.hhea_ascender - src.hhea_descender;
    let os2_box = src.os2_ascender - src.os2_descender;

    if src.os2_ascender > 0 && os2_box <= upem {
        (src.os2_ascender, src.os2_descender)
    } else if src.hhea_ascender > 0 && hhea_box <= upem {
        (src.hhea_ascender, src.hhea_descender)
    } else if src.os2_ascender > 0 {
        (src.os2_ascender, src.os2_descender)
    } else {
        (src.hhea_ascender, src.hhea_descender)
    }
}

#[derive(Debug, Default)]
struct GlyphProbes {
    cap_height: i32,
    x_height: i32,
    ascender: i32,
    descender: i32,
}

impl GlyphProbes {
    fn probe(&mut self, key: char, bbox: BoundingBox) -> bool {
        match key {
            'H' => self.cap_height = bbox.y_max,
            'x' => self.x_height = bbox.y_max,
            'd' => self.ascender = bbox.y_max,
            'p' => self.descender = bbox.y_min,
            _ => return false,
        }
        true
    }
}

/// Finish vertical metrics using the bounds of the `H`, `x`, `d` and `p`
/// glyphs, found by PostScript name or else by their first code point.
///
/// If the chosen ascender/descender still overflow the em, the `d`/`p`
/// bounds replace them. Cap height and x-height come from PCLT, then the
/// glyph bounds, then OS/2.
pub fn guess_from_glyphs(
    glyphs: &[GlyphMetrics],
    ascender: i32,
    descender: i32,
    src: &MetricSources,
) -> VerticalMetrics {
    let mut probes = GlyphProbes::default();
    for glyph in glyphs {
        let by_name = match glyph.name.as_deref() {
            Some(name) if name.len() == 1 => name
                .chars()
                .next()
                .is_some_and(|c| probes.probe(c, glyph.bbox)),
            _ => false,
        };
        if by_name {
            continue;
        }
        // Fonts with a format 3 post table carry no names
        if let Some(c) = glyph.first_unicode().and_then(char::from_u32) {
            probes.probe(c, glyph.bbox);
        }
    }

    let mut out = VerticalMetrics {
        ascender,
        descender,
        cap_height: src.pclt_cap_height,
        x_height: src.pclt_x_height,
    };

    if ascender - descender > i32::from(src.units_per_em) {
        tracing::debug!(
            "Ascender/descender {}/{} overflow the em, using glyph bounds {}/{}",
            ascender,
            descender,
            probes.ascender,
            probes.descender
        );
        out.ascender = probes.ascender;
        out.descender = probes.descender;
    }

    if out.cap_height == 0 {
        out.cap_height = if probes.cap_height != 0 {
            probes.cap_height
        } else {
            src.os2_cap_height
        };
    }
    if out.x_height == 0 {
        out.x_height = if probes.x_height != 0 {
            probes.x_height
        } else {
            src.os2_x_height
        };
    }

    out
}
