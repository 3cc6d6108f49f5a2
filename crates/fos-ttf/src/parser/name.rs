//! Naming table

use std::collections::BTreeSet;

use super::reader::FontReader;
use crate::directory::{TableDirectory, Tag};
use crate::{FontError, Result};

/// Common name IDs
pub mod name_ids {
    pub const COPYRIGHT: u16 = 0;
    pub const FAMILY: u16 = 1;
    pub const SUBFAMILY: u16 = 2;
    pub const FULL_NAME: u16 = 4;
    pub const POSTSCRIPT_NAME: u16 = 6;
    pub const TYPOGRAPHIC_FAMILY: u16 = 16;
}

const PLATFORM_MACINTOSH: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;
const LANGUAGE_EN_US: u16 = 0x0409;

/// Names collected from one `name` table.
///
/// Collection scans reuse a single scratch value and call
/// [`FontNameScratch::reset`] between members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontNameScratch {
    pub postscript_name: String,
    pub family_names: BTreeSet<String>,
    pub subfamily_name: String,
    pub full_name: String,
    pub notice: String,
}

impl FontNameScratch {
    pub fn reset(&mut self) {
        self.postscript_name.clear();
        self.family_names.clear();
        self.subfamily_name.clear();
        self.full_name.clear();
        self.notice.clear();
    }

    /// The PostScript name, or the full name without whitespace when the
    /// font declares none
    pub fn resolved_postscript_name(&self) -> String {
        if self.postscript_name.is_empty() {
            self.full_name.split_whitespace().collect()
        } else {
            self.postscript_name.clone()
        }
    }

    fn apply(&mut self, name_id: u16, platform_id: u16, language_id: u16, text: String) {
        match name_id {
            name_ids::COPYRIGHT if self.notice.is_empty() => self.notice = text,
            name_ids::FAMILY | name_ids::TYPOGRAPHIC_FAMILY => {
                self.family_names.insert(text);
            }
            name_ids::SUBFAMILY if self.subfamily_name.is_empty() => self.subfamily_name = text,
            name_ids::FULL_NAME
                if self.full_name.is_empty()
                    || (platform_id == PLATFORM_WINDOWS && language_id == LANGUAGE_EN_US) =>
            {
                self.full_name = text
            }
            name_ids::POSTSCRIPT_NAME if self.postscript_name.is_empty() => {
                self.postscript_name = text
            }
            _ => {}
        }
    }
}

/// Read the `name` table of `directory` into `names`.
///
/// Only Macintosh and Windows records with encoding 0 or 1 are decoded:
/// Macintosh strings as single-byte text, Windows strings as UTF-16BE.
/// A font without a `name` table leaves `names` untouched.
pub fn read_name(
    r: &mut FontReader<'_>,
    directory: &TableDirectory,
    names: &mut FontNameScratch,
) -> Result<()> {
    let Some(record) = directory.get(Tag::NAME) else {
        tracing::warn!("Font has no name table");
        return Ok(());
    };

    let table = record.offset as usize;
    r.seek(table)?;
    let _format = r.read_u16()?;
    let count = r.read_u16()? as usize;
    let string_offset = r.read_u16()? as usize;
    r.ensure(count * 12)
        .map_err(|_| FontError::malformed(Tag::NAME, format!("{count} name records do not fit")))?;

    for i in 0..count {
        r.seek(table + 6 + i * 12)?;
        let platform_id = r.read_u16()?;
        let encoding_id = r.read_u16()?;
        let language_id = r.read_u16()?;
        let name_id = r.read_u16()?;
        let length = r.read_u16()? as usize;
        let offset = r.read_u16()? as usize;

        let supported = matches!(platform_id, PLATFORM_MACINTOSH | PLATFORM_WINDOWS)
            && matches!(encoding_id, 0 | 1);
        if !supported {
            continue;
        }

        r.seek(table + string_offset + offset)?;
        let text = if platform_id == PLATFORM_WINDOWS {
            r.read_utf16_string(length)?
        } else {
            r.read_string(length)?
        };

        tracing::trace!("name {} ({}/{}): {:?}", name_id, platform_id, encoding_id, text);
        names.apply(name_id, platform_id, language_id, text);
    }

    tracing::debug!("Read name table: full name {:?}", names.full_name);
    Ok(())
}

/// Build a `name` table from `(platform, encoding, language, name id, text)`
#[cfg(test)]
pub(crate) fn build_name_table(records: &[(u16, u16, u16, u16, &str)]) -> Vec<u8> {
    let mut strings = Vec::new();
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(records.len() as u16).to_be_bytes());
    out.extend_from_slice(&((6 + records.len() * 12) as u16).to_be_bytes());
    for &(platform, encoding, language, name_id, text) in records {
        let bytes: Vec<u8> = if platform == PLATFORM_WINDOWS {
            text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
        } else {
            text.bytes().collect()
        };
        for v in [platform, encoding, language, name_id, bytes.len() as u16, strings.len() as u16] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        strings.extend_from_slice(&bytes);
    }
    out.extend_from_slice(&strings);
    out
}
