//! Fixed-layout OpenType tables: head, maxp, hhea, OS/2, PCLT

use super::reader::FontReader;
use crate::directory::{TableRecord, Tag};
use crate::{FontError, Result};

/// Head table (font header)
#[derive(Debug, Clone, Default)]
pub struct HeadTable {
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    /// 0 = short `loca` offsets, 1 = long
    pub index_to_loc_format: i16,
}

impl HeadTable {
    pub fn read(r: &mut FontReader<'_>, record: TableRecord) -> Result<Self> {
        r.seek(record.offset as usize)?;
        r.skip(16 + 2)?; // version, revision, checksum adjustment, magic, flags
        let units_per_em = r.read_u16()?;
        r.skip(16)?; // created, modified
        let x_min = r.read_i16()?;
        let y_min = r.read_i16()?;
        let x_max = r.read_i16()?;
        let y_max = r.read_i16()?;
        r.skip(2 + 4)?; // mac style, lowest rec ppem, direction hint
        let index_to_loc_format = r.read_i16()?;

        if units_per_em == 0 {
            return Err(FontError::malformed(Tag::HEAD, "unitsPerEm is zero"));
        }

        Ok(Self {
            units_per_em,
            x_min,
            y_min,
            x_max,
            y_max,
            index_to_loc_format,
        })
    }

    pub fn bbox(&self) -> [i32; 4] {
        [
            self.x_min.into(),
            self.y_min.into(),
            self.x_max.into(),
            self.y_max.into(),
        ]
    }
}

/// Maxp table (maximum profile)
#[derive(Debug, Clone)]
pub struct MaxpTable {
    pub num_glyphs: u16,
}

impl MaxpTable {
    pub fn read(r: &mut FontReader<'_>, record: TableRecord) -> Result<Self> {
        r.seek(record.offset as usize)?;
        r.skip(4)?; // version
        let num_glyphs = r.read_u16()?;
        Ok(Self { num_glyphs })
    }
}

/// Hhea table (horizontal header)
#[derive(Debug, Clone)]
pub struct HheaTable {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub number_of_h_metrics: u16,
}

impl HheaTable {
    pub fn read(r: &mut FontReader<'_>, record: TableRecord) -> Result<Self> {
        r.seek(record.offset as usize)?;
        r.skip(4)?; // version
        let ascender = r.read_i16()?;
        let descender = r.read_i16()?;
        let line_gap = r.read_i16()?;
        r.skip(2 + 22)?; // advance width max, side bearings, extent, caret, reserved, data format
        let number_of_h_metrics = r.read_u16()?;

        Ok(Self {
            ascender,
            descender,
            line_gap,
            number_of_h_metrics,
        })
    }
}

/// OS/2 table (font metadata)
#[derive(Debug, Clone, Default)]
pub struct Os2Table {
    pub weight_class: u16,
    pub fs_type: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    /// Only present from version 2 on
    pub x_height: i16,
    pub cap_height: i16,
}

impl Os2Table {
    /// Byte length up to and including `sCapHeight`
    const V2_LENGTH: u32 = 78 + 2 * 4 + 2 * 2;

    pub fn read(r: &mut FontReader<'_>, record: TableRecord) -> Result<Self> {
        r.seek(record.offset as usize)?;
        r.skip(2 + 2)?; // version, avg char width
        let weight_class = r.read_u16()?;
        r.skip(2)?; // width class
        let fs_type = r.read_u16()?;
        r.skip(8 * 2)?; // subscript/superscript sizes and offsets
        let strikeout_size = r.read_i16()?;
        let strikeout_position = r.read_i16()?;
        r.skip(2)?; // family class
        r.skip(10)?; // panose
        r.skip(4 * 4)?; // unicode ranges
        r.skip(4)?; // vendor id
        r.skip(3 * 2)?; // selection, first/last char index
        let typo_ascender = r.read_i16()?;
        let typo_descender = r.read_i16()?;
        r.skip(2 + 2 + 2)?; // typo line gap, win ascent, win descent

        let (mut x_height, mut cap_height) = (0, 0);
        if record.length >= Self::V2_LENGTH {
            r.skip(2 * 4)?; // code page ranges
            x_height = r.read_i16()?;
            cap_height = r.read_i16()?;
        }

        Ok(Self {
            weight_class,
            fs_type,
            strikeout_size,
            strikeout_position,
            typo_ascender,
            typo_descender,
            x_height,
            cap_height,
        })
    }

    /// `fsType` of exactly 2 means restricted license embedding
    pub fn is_embeddable(&self) -> bool {
        self.fs_type != 2
    }
}

/// PCLT table (PCL 5 metrics)
#[derive(Debug, Clone)]
pub struct PcltTable {
    pub x_height: u16,
    pub cap_height: u16,
    pub serif_style: u8,
}

impl PcltTable {
    pub fn read(r: &mut FontReader<'_>, record: TableRecord) -> Result<Self> {
        r.seek(record.offset as usize)?;
        r.skip(4 + 4 + 2)?; // version, font number, pitch
        let x_height = r.read_u16()?;
        r.skip(2 * 2)?; // style, type family
        let cap_height = r.read_u16()?;
        r.skip(2 + 16 + 8 + 6 + 1 + 1)?; // symbol set .. width type
        let serif_style = r.read_u8()?;

        Ok(Self {
            x_height,
            cap_height,
            serif_style,
        })
    }

    /// Top two bits of the serif style byte; 1 is sans serif
    pub fn has_serifs(&self) -> bool {
        (self.serif_style >> 6) & 3 != 1
    }
}
