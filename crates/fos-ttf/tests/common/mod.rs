//! In-memory SFNT builder for the integration tests

#![allow(dead_code)]

/// Glyph description for [`sample_font`]: advance, bounds, code points
pub struct SampleGlyph {
    pub advance: u16,
    pub bbox: [i16; 4],
    pub unicodes: &'static [u32],
}

pub fn be16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub fn be32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Assembles a table directory and tables
#[derive(Clone)]
pub struct FontBuilder {
    version: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl FontBuilder {
    pub fn new() -> Self {
        Self {
            version: 0x0001_0000,
            tables: Vec::new(),
        }
    }

    /// Mark the font as CFF-flavoured OpenType
    pub fn cff(mut self) -> Self {
        self.version = u32::from_be_bytes(*b"OTTO");
        self
    }

    /// Add or replace a table
    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.tables.retain(|(t, _)| t != tag);
        self.tables.push((*tag, data));
        self
    }

    pub fn without(mut self, tag: &[u8; 4]) -> Self {
        self.tables.retain(|(t, _)| t != tag);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Build with table offsets relative to a font starting at `base`
    pub fn build_at(&self, base: usize) -> Vec<u8> {
        let mut out = Vec::new();
        be32(&mut out, self.version);
        be16(&mut out, self.tables.len() as u16);
        out.extend_from_slice(&[0; 6]);

        let mut offset = 12 + 16 * self.tables.len();
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            be32(&mut out, 0);
            be32(&mut out, (base + offset) as u32);
            be32(&mut out, data.len() as u32);
            offset += data.len().next_multiple_of(4);
        }
        for (_, data) in &self.tables {
            out.extend_from_slice(data);
            out.resize(out.len().next_multiple_of(4), 0);
        }
        out
    }
}

/// A TTC wrapping `fonts`
pub fn collection(fonts: &[FontBuilder]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    be32(&mut out, 0x0001_0000);
    be32(&mut out, fonts.len() as u32);

    let mut base = 12 + 4 * fonts.len();
    let mut members = Vec::new();
    for font in fonts {
        be32(&mut out, base as u32);
        let bytes = font.build_at(base);
        base += bytes.len();
        members.extend_from_slice(&bytes);
    }
    out.extend_from_slice(&members);
    out
}

// ============================================================================
// TABLES
// ============================================================================

pub fn head(units_per_em: u16, bbox: [i16; 4], long_loca: bool) -> Vec<u8> {
    let mut out = vec![0u8; 54];
    out[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    out[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    out[18..20].copy_from_slice(&units_per_em.to_be_bytes());
    for (i, v) in bbox.iter().enumerate() {
        out[36 + i * 2..38 + i * 2].copy_from_slice(&v.to_be_bytes());
    }
    out[50..52].copy_from_slice(&(long_loca as i16).to_be_bytes());
    out
}

pub fn maxp(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    be32(&mut out, 0x0000_5000);
    be16(&mut out, num_glyphs);
    out
}

pub fn hhea(ascender: i16, descender: i16, line_gap: i16, number_of_h_metrics: u16) -> Vec<u8> {
    let mut out = vec![0u8; 36];
    out[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    out[4..6].copy_from_slice(&ascender.to_be_bytes());
    out[6..8].copy_from_slice(&descender.to_be_bytes());
    out[8..10].copy_from_slice(&line_gap.to_be_bytes());
    out[34..36].copy_from_slice(&number_of_h_metrics.to_be_bytes());
    out
}

pub fn hmtx(metrics: &[(u16, i16)]) -> Vec<u8> {
    let mut out = Vec::new();
    for &(advance, lsb) in metrics {
        be16(&mut out, advance);
        out.extend_from_slice(&lsb.to_be_bytes());
    }
    out
}

pub struct Os2 {
    pub weight_class: u16,
    pub fs_type: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub x_height: i16,
    pub cap_height: i16,
}

pub fn os2(v: &Os2) -> Vec<u8> {
    let mut out = vec![0u8; 96];
    out[0..2].copy_from_slice(&4u16.to_be_bytes());
    out[4..6].copy_from_slice(&v.weight_class.to_be_bytes());
    out[8..10].copy_from_slice(&v.fs_type.to_be_bytes());
    out[26..28].copy_from_slice(&v.strikeout_size.to_be_bytes());
    out[28..30].copy_from_slice(&v.strikeout_position.to_be_bytes());
    out[68..70].copy_from_slice(&v.typo_ascender.to_be_bytes());
    out[70..72].copy_from_slice(&v.typo_descender.to_be_bytes());
    out[86..88].copy_from_slice(&v.x_height.to_be_bytes());
    out[88..90].copy_from_slice(&v.cap_height.to_be_bytes());
    out
}

/// `post` header; format 3 carries no names
pub fn post(format: u32, italic_angle: i32, underline: (i16, i16), fixed_pitch: bool) -> Vec<u8> {
    let mut out = Vec::new();
    be32(&mut out, format);
    out.extend_from_slice(&italic_angle.to_be_bytes());
    out.extend_from_slice(&underline.0.to_be_bytes());
    out.extend_from_slice(&underline.1.to_be_bytes());
    be32(&mut out, fixed_pitch as u32);
    out.extend_from_slice(&[0; 16]);
    out
}

/// Format 2 `post` with the given standard or custom names
pub fn post_v2(indices: &[u16], custom: &[&str]) -> Vec<u8> {
    let mut out = post(0x0002_0000, 0, (-100, 50), false);
    be16(&mut out, indices.len() as u16);
    for &i in indices {
        be16(&mut out, i);
    }
    for name in custom {
        out.push(name.len() as u8);
        out.extend_from_slice(name.as_bytes());
    }
    out
}

pub fn pclt(x_height: u16, cap_height: u16, serif_style: u8) -> Vec<u8> {
    let mut out = vec![0u8; 54];
    out[10..12].copy_from_slice(&x_height.to_be_bytes());
    out[16..18].copy_from_slice(&cap_height.to_be_bytes());
    out[52] = serif_style;
    out
}

/// `name` table with Windows English records for `(name id, text)`
pub fn name(records: &[(u16, &str)]) -> Vec<u8> {
    let mut strings = Vec::new();
    let mut out = Vec::new();
    be16(&mut out, 0);
    be16(&mut out, records.len() as u16);
    be16(&mut out, (6 + records.len() * 12) as u16);
    for &(name_id, text) in records {
        let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        for v in [3, 1, 0x409, name_id, bytes.len() as u16, strings.len() as u16] {
            be16(&mut out, v);
        }
        strings.extend_from_slice(&bytes);
    }
    out.extend_from_slice(&strings);
    out
}

/// `cmap` with one format 4 subtable for `(platform, encoding)`, one
/// delta segment per mapping plus the terminator
pub fn cmap(platform: u16, encoding: u16, mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut sorted = mappings.to_vec();
    sorted.sort();

    let mut segments: Vec<(u16, u16, i16)> = sorted
        .iter()
        .map(|&(code, glyph)| {
            let delta = (u32::from(glyph)).wrapping_sub(code) as u16 as i16;
            (code as u16, code as u16, delta)
        })
        .collect();
    segments.push((0xFFFF, 0xFFFF, 1));

    let seg_count = segments.len() as u16;
    let mut sub = Vec::new();
    for v in [4, 0, 0, seg_count * 2, 0, 0, 0] {
        be16(&mut sub, v);
    }
    for s in &segments {
        be16(&mut sub, s.1);
    }
    be16(&mut sub, 0);
    for s in &segments {
        be16(&mut sub, s.0);
    }
    for s in &segments {
        sub.extend_from_slice(&s.2.to_be_bytes());
    }
    for _ in &segments {
        be16(&mut sub, 0);
    }
    let len = sub.len() as u16;
    sub[2..4].copy_from_slice(&len.to_be_bytes());

    let mut out = Vec::new();
    be16(&mut out, 0);
    be16(&mut out, 1);
    be16(&mut out, platform);
    be16(&mut out, encoding);
    be32(&mut out, 12);
    out.extend_from_slice(&sub);
    out
}

/// Version 0 `kern` with one horizontal format 0 subtable
pub fn kern(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
    let mut out = Vec::new();
    be16(&mut out, 0);
    be16(&mut out, 1);
    be16(&mut out, 0);
    be16(&mut out, (14 + pairs.len() * 6) as u16);
    be16(&mut out, 0x0001);
    be16(&mut out, pairs.len() as u16);
    out.extend_from_slice(&[0; 6]);
    for &(left, right, value) in pairs {
        be16(&mut out, left);
        be16(&mut out, right);
        out.extend_from_slice(&value.to_be_bytes());
    }
    out
}

/// Long-format `loca` and a `glyf` holding only glyph headers; glyphs
/// with an all-zero box are empty
pub fn loca_glyf(bboxes: &[[i16; 4]]) -> (Vec<u8>, Vec<u8>) {
    let mut loca = Vec::new();
    let mut glyf = Vec::new();
    for bbox in bboxes {
        be32(&mut loca, glyf.len() as u32);
        if *bbox != [0; 4] {
            be16(&mut glyf, 1);
            for v in bbox {
                glyf.extend_from_slice(&v.to_be_bytes());
            }
            be16(&mut glyf, 0);
        }
    }
    be32(&mut loca, glyf.len() as u32);
    (loca, glyf)
}

// ============================================================================
// SAMPLE FONT
// ============================================================================

pub const UNITS_PER_EM: u16 = 2048;
pub const BULLET: u32 = 0x2022;

pub fn sample_glyphs() -> Vec<SampleGlyph> {
    vec![
        SampleGlyph { advance: 500, bbox: [0, 0, 0, 0], unicodes: &[] },
        SampleGlyph { advance: 250, bbox: [0, 0, 0, 0], unicodes: &[0x20] },
        SampleGlyph { advance: 600, bbox: [10, 0, 590, 1400], unicodes: &['A' as u32] },
        SampleGlyph { advance: 580, bbox: [5, 0, 575, 1400], unicodes: &['V' as u32] },
        SampleGlyph { advance: 700, bbox: [60, 0, 640, 1400], unicodes: &['H' as u32] },
        SampleGlyph { advance: 500, bbox: [20, 0, 480, 1000], unicodes: &['x' as u32] },
        SampleGlyph { advance: 550, bbox: [40, -20, 510, 1500], unicodes: &['d' as u32] },
        SampleGlyph { advance: 550, bbox: [40, -450, 510, 1000], unicodes: &['p' as u32] },
        SampleGlyph { advance: 400, bbox: [50, 400, 350, 700], unicodes: &[BULLET] },
    ]
}

pub fn sample_os2() -> Os2 {
    Os2 {
        weight_class: 400,
        fs_type: 0,
        strikeout_size: 102,
        strikeout_position: 530,
        typo_ascender: 1800,
        typo_descender: -400,
        x_height: 0,
        cap_height: 0,
    }
}

/// A TrueType font whose ascender/descender overflow the em, so the
/// vertical metrics come from the `d`, `p`, `H` and `x` glyph bounds
pub fn sample_font(full_name: &str) -> FontBuilder {
    let glyphs = sample_glyphs();
    let metrics: Vec<(u16, i16)> = glyphs.iter().map(|g| (g.advance, g.bbox[0])).collect();
    let mappings: Vec<(u32, u16)> = glyphs
        .iter()
        .enumerate()
        .flat_map(|(gid, g)| g.unicodes.iter().map(move |&u| (u, gid as u16)))
        .collect();
    let bboxes: Vec<[i16; 4]> = glyphs.iter().map(|g| g.bbox).collect();
    let (loca, glyf) = loca_glyf(&bboxes);

    FontBuilder::new()
        .table(b"head", head(UNITS_PER_EM, [-100, -450, 700, 1500], true))
        .table(b"maxp", maxp(glyphs.len() as u16))
        .table(b"hhea", hhea(1900, -500, 67, glyphs.len() as u16))
        .table(b"hmtx", hmtx(&metrics))
        .table(b"post", post(0x0003_0000, 0, (-150, 100), false))
        .table(b"OS/2", os2(&sample_os2()))
        .table(
            b"name",
            name(&[(1, "Sample"), (2, "Regular"), (4, full_name), (0, "(c) Sample Foundry")]),
        )
        .table(b"cmap", cmap(3, 1, &mappings))
        .table(b"kern", kern(&[(2, 3, -164), (3, 2, -120), (2, 8, 0)]))
        .table(b"loca", loca)
        .table(b"glyf", glyf)
}
