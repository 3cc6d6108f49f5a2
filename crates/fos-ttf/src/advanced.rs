//! Advanced typographic tables (GDEF, GSUB, GPOS)
//!
//! Layout processing is left to a pluggable [`AdvancedTableReader`]. The
//! built-in [`RawLayoutTables`] reader checks each table's header and keeps
//! its bytes for a shaping engine to interpret later.

use crate::directory::{TableDirectory, Tag};

/// Failure while reading the advanced tables.
///
/// Never fatal to font decoding: the facade logs it and continues
/// without advanced tables.
#[derive(Debug, thiserror::Error)]
pub enum AdvancedTableError {
    #[error("'{0}' table is too short for its header")]
    Truncated(Tag),

    #[error("Unsupported '{tag}' version {major}.{minor}")]
    UnsupportedVersion { tag: Tag, major: u16, minor: u16 },

    #[error("'{tag}' subtable offset {offset} lies outside the table")]
    BadOffset { tag: Tag, offset: u16 },
}

/// One layout table and its header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LayoutTable {
    pub tag: Tag,
    pub major_version: u16,
    pub minor_version: u16,
    /// Header offsets to the top-level subtables, zero when absent
    pub subtable_offsets: Vec<u16>,
    #[cfg_attr(feature = "serde", serde(skip))]
    data: Vec<u8>,
}

impl LayoutTable {
    /// Raw table bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Tables produced by an advanced reader; each is `None` when absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdvancedTables {
    pub gdef: Option<LayoutTable>,
    pub gsub: Option<LayoutTable>,
    pub gpos: Option<LayoutTable>,
}

impl AdvancedTables {
    pub fn is_empty(&self) -> bool {
        self.gdef.is_none() && self.gsub.is_none() && self.gpos.is_none()
    }
}

/// Reader for the advanced typographic tables, run once after the base
/// tables have been decoded
pub trait AdvancedTableReader {
    fn read_all(
        &self,
        directory: &TableDirectory,
        data: &[u8],
    ) -> std::result::Result<AdvancedTables, AdvancedTableError>;
}

/// Header-validating reader that captures table bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLayoutTables;

impl RawLayoutTables {
    /// Number of Offset16 fields after the version, per table
    fn header_offsets(tag: Tag) -> usize {
        if tag == Tag::GDEF { 4 } else { 3 }
    }

    fn read_table(
        directory: &TableDirectory,
        data: &[u8],
        tag: Tag,
    ) -> std::result::Result<Option<LayoutTable>, AdvancedTableError> {
        let Some(bytes) = directory.table_data(data, tag) else {
            return Ok(None);
        };

        let word = |i: usize| -> std::result::Result<u16, AdvancedTableError> {
            bytes
                .get(i * 2..i * 2 + 2)
                .map(|b| u16::from_be_bytes([b[0], b[1]]))
                .ok_or(AdvancedTableError::Truncated(tag))
        };

        let (major_version, minor_version) = (word(0)?, word(1)?);
        if major_version != 1 {
            return Err(AdvancedTableError::UnsupportedVersion {
                tag,
                major: major_version,
                minor: minor_version,
            });
        }

        let subtable_offsets = (0..Self::header_offsets(tag))
            .map(|i| word(2 + i))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if let Some(&offset) = subtable_offsets.iter().find(|&&o| o as usize >= bytes.len()) {
            return Err(AdvancedTableError::BadOffset { tag, offset });
        }

        tracing::debug!("Read {} {}.{} ({} bytes)", tag, major_version, minor_version, bytes.len());
        Ok(Some(LayoutTable {
            tag,
            major_version,
            minor_version,
            subtable_offsets,
            data: bytes.to_vec(),
        }))
    }
}

impl AdvancedTableReader for RawLayoutTables {
    fn read_all(
        &self,
        directory: &TableDirectory,
        data: &[u8],
    ) -> std::result::Result<AdvancedTables, AdvancedTableError> {
        Ok(AdvancedTables {
            gdef: Self::read_table(directory, data, Tag::GDEF)?,
            gsub: Self::read_table(directory, data, Tag::GSUB)?,
            gpos: Self::read_table(directory, data, Tag::GPOS)?,
        })
    }
}
