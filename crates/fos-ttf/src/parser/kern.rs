//! Kerning table (kern), format 0 subtables

use super::reader::FontReader;
use crate::directory::{TableRecord, Tag};
use crate::{FontError, Result};

/// A glyph pair adjustment, in font design units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernPair {
    pub left: u16,
    pub right: u16,
    pub value: i16,
}

/// Coverage bits of a subtable header
mod coverage {
    pub const HORIZONTAL: u16 = 1;
    pub const MINIMUM: u16 = 2;
    pub const CROSS_STREAM: u16 = 4;
}

/// Subtable header: version, length, coverage
const SUBTABLE_HEADER_LEN: usize = 6;
/// Format 0 header after the subtable header: nPairs and search fields
const FORMAT0_HEADER_LEN: usize = 8;

/// Read every qualifying pair from `kern`, in table order.
///
/// Only horizontal format 0 subtables that are neither minimum values nor
/// cross-stream are used; other subtables are skipped and the scan goes on.
/// Zero adjustments are dropped.
pub fn read_kern(r: &mut FontReader<'_>, record: TableRecord) -> Result<Vec<KernPair>> {
    let table = record.offset as usize;
    let table_end = table + record.length as usize;
    r.seek(table)?;

    let version = r.read_u16()?;
    if version != 0 {
        tracing::warn!("Unsupported kern table version {}, kerning ignored", version);
        return Ok(Vec::new());
    }
    let num_subtables = r.read_u16()?;

    let mut pairs = Vec::new();
    let mut subtable = r.position();

    for index in 0..num_subtables {
        if subtable + SUBTABLE_HEADER_LEN > table_end {
            tracing::warn!("kern subtable {} starts past the table end", index);
            break;
        }
        r.seek(subtable)?;
        let _version = r.read_u16()?;
        let length = r.read_u16()? as usize;
        let flags = r.read_u16()?;
        let format = flags >> 8;

        let qualifies = flags & coverage::HORIZONTAL != 0
            && flags & coverage::MINIMUM == 0
            && flags & coverage::CROSS_STREAM == 0;

        if !qualifies || format != 0 {
            tracing::warn!(
                "Skipping kern subtable {} (coverage {:#06x}, format {})",
                index,
                flags,
                format
            );
            if length < SUBTABLE_HEADER_LEN {
                break;
            }
            subtable += length;
            continue;
        }

        let n_pairs = r.read_u16()? as usize;
        r.skip(FORMAT0_HEADER_LEN - 2)?; // search range, entry selector, range shift
        r.ensure(n_pairs * 6).map_err(|_| {
            FontError::malformed(Tag::KERN, format!("{n_pairs} kerning pairs do not fit"))
        })?;

        pairs.reserve(n_pairs);
        for _ in 0..n_pairs {
            let left = r.read_u16()?;
            let right = r.read_u16()?;
            let value = r.read_i16()?;
            if value != 0 {
                pairs.push(KernPair { left, right, value });
            }
        }

        // The 16-bit length field overflows on large subtables
        subtable += SUBTABLE_HEADER_LEN + FORMAT0_HEADER_LEN + n_pairs * 6;
    }

    tracing::debug!("Read {} kerning pairs", pairs.len());
    Ok(pairs)
}

/// Build a version 0 `kern` table from `(coverage, pairs)` subtables
#[cfg(test)]
pub(crate) fn build_kern_table(subtables: &[(u16, &[(u16, u16, i16)])]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(subtables.len() as u16).to_be_bytes());
    for &(coverage, pairs) in subtables {
        let length = (SUBTABLE_HEADER_LEN + FORMAT0_HEADER_LEN + pairs.len() * 6) as u16;
        for v in [0, length, coverage, pairs.len() as u16, 0, 0, 0] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        for &(left, right, value) in pairs {
            out.extend_from_slice(&left.to_be_bytes());
            out.extend_from_slice(&right.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
    out
}
