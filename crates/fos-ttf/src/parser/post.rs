//! PostScript table (glyph names)

use super::reader::FontReader;
use crate::directory::{TableRecord, Tag};
use crate::metrics::GlyphMetrics;
use crate::{FontError, Result};

/// Version of the `post` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PostScriptVersion {
    /// Standard Macintosh glyph order
    V1,
    /// Per-glyph name indices plus custom names
    V2,
    /// No glyph names
    V3,
    #[default]
    Unknown,
}

/// Header fields of the `post` table
#[derive(Debug, Clone, Default)]
pub struct PostTable {
    pub version: PostScriptVersion,
    /// 16.16 fixed italic angle
    pub italic_angle: i32,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
}

impl PostTable {
    /// Integer part of the italic angle, in degrees
    pub fn italic_angle_degrees(&self) -> i16 {
        (self.italic_angle / 0x10000) as i16
    }
}

/// Read `post` and assign glyph names into `glyphs`.
pub fn read_post(
    r: &mut FontReader<'_>,
    record: TableRecord,
    glyphs: &mut [GlyphMetrics],
) -> Result<PostTable> {
    r.seek(record.offset as usize)?;
    let format = r.read_u32()?;
    let italic_angle = r.read_i32()?;
    let underline_position = r.read_i16()?;
    let underline_thickness = r.read_i16()?;
    let is_fixed_pitch = r.read_u32()?;
    r.skip(4 * 4)?; // memory usage hints

    let version = match format {
        0x0001_0000 => {
            for (glyph, name) in glyphs.iter_mut().zip(MAC_GLYPH_NAMES) {
                glyph.name = Some((*name).to_string());
            }
            PostScriptVersion::V1
        }
        0x0002_0000 => {
            read_format2_names(r, record, glyphs)?;
            PostScriptVersion::V2
        }
        0x0003_0000 => PostScriptVersion::V3,
        other => {
            tracing::debug!("Unknown post format {:#010x}", other);
            PostScriptVersion::Unknown
        }
    };

    tracing::debug!("Read post table: {:?}", version);

    Ok(PostTable {
        version,
        italic_angle,
        underline_position,
        underline_thickness,
        is_fixed_pitch,
    })
}

/// Indices in 32768..=65535 are reserved and never named
fn is_reserved_index(index: u16) -> bool {
    index >= 32768
}

fn read_format2_names(
    r: &mut FontReader<'_>,
    record: TableRecord,
    glyphs: &mut [GlyphMetrics],
) -> Result<()> {
    let count = r.read_u16()? as usize;
    r.ensure(count * 2)
        .map_err(|_| FontError::malformed(Tag::POST, format!("{count} name indices do not fit")))?;

    let mut indices = Vec::with_capacity(count);
    for _ in 0..count {
        indices.push(r.read_u16()?);
    }

    let custom_count = indices
        .iter()
        .copied()
        .filter(|&i| !is_reserved_index(i))
        .map(|i| i as usize)
        .max()
        .map_or(0, |max| (max + 1).saturating_sub(MAC_GLYPH_NAMES.len()));

    let table_end = record.offset as usize + record.length as usize;
    let mut custom = Vec::with_capacity(custom_count.min(r.remaining()));
    while custom.len() < custom_count && r.position() < table_end {
        custom.push(r.read_pascal_string()?);
    }
    if custom.len() < custom_count {
        tracing::warn!("post table holds {} of {} custom names", custom.len(), custom_count);
    }

    for (glyph, &index) in glyphs.iter_mut().zip(&indices) {
        glyph.post_index = Some(index);
        let i = index as usize;
        glyph.name = if i < MAC_GLYPH_NAMES.len() {
            Some(MAC_GLYPH_NAMES[i].to_string())
        } else if !is_reserved_index(index) {
            custom.get(i - MAC_GLYPH_NAMES.len()).cloned()
        } else {
            None
        };
    }

    Ok(())
}

/// The 258 standard Macintosh glyph names
pub const MAC_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis",
    "ntilde", "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave",
    "ucircumflex", "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet",
    "paragraph", "germandbls", "registered", "copyright", "trademark", "acute", "dieresis",
    "notequal", "AE", "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu",
    "partialdiff", "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine",
    "Omega", "ae", "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin",
    "approxequal", "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace",
    "Agrave", "Atilde", "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft",
    "quotedblright", "quoteleft", "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis",
    "fraction", "currency", "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl",
    "periodcentered", "quotesinglbase", "quotedblbase", "perthousand", "Acircumflex",
    "Ecircumflex", "Aacute", "Edieresis", "Egrave", "Iacute", "Icircumflex", "Idieresis",
    "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve", "Uacute", "Ucircumflex", "Ugrave",
    "dotlessi", "circumflex", "tilde", "macron", "breve", "dotaccent", "ring", "cedilla",
    "hungarumlaut", "ogonek", "caron", "Lslash", "lslash", "Scaron", "scaron", "Zcaron",
    "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn", "thorn", "minus",
    "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf", "onequarter",
    "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla", "scedilla", "Cacute",
    "cacute", "Ccaron", "ccaron", "dcroat",
];
