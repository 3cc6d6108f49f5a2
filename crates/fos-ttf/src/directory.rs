//! SFNT header and table directory

use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::parser::FontReader;
use crate::{FontError, Result};

/// Four-byte table identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const HEAD: Tag = Tag(*b"head");
    pub const MAXP: Tag = Tag(*b"maxp");
    pub const HHEA: Tag = Tag(*b"hhea");
    pub const HMTX: Tag = Tag(*b"hmtx");
    pub const POST: Tag = Tag(*b"post");
    pub const OS2: Tag = Tag(*b"OS/2");
    pub const NAME: Tag = Tag(*b"name");
    pub const PCLT: Tag = Tag(*b"PCLT");
    pub const CMAP: Tag = Tag(*b"cmap");
    pub const KERN: Tag = Tag(*b"kern");
    pub const LOCA: Tag = Tag(*b"loca");
    pub const GLYF: Tag = Tag(*b"glyf");
    pub const CFF: Tag = Tag(*b"CFF ");
    pub const GDEF: Tag = Tag(*b"GDEF");
    pub const GSUB: Tag = Tag(*b"GSUB");
    pub const GPOS: Tag = Tag(*b"GPOS");
    /// Outer tag of a TrueType Collection
    pub const TTCF: Tag = Tag(*b"ttcf");

    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            f.write_char(c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outer format tag (`sfntVersion`) of a font directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SfntVersion {
    /// 0x00010000
    TrueType,
    /// 'OTTO', CFF outlines
    OpenTypeCff,
    /// 'true', legacy Apple TrueType
    AppleTrueType,
    /// 'typ1', legacy PostScript wrapped in SFNT
    Type1,
    /// Anything else; read as TrueType
    Unknown(u32),
}

impl SfntVersion {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0x0001_0000 => SfntVersion::TrueType,
            0x4F54_544F => SfntVersion::OpenTypeCff,
            0x7472_7565 => SfntVersion::AppleTrueType,
            0x7479_7031 => SfntVersion::Type1,
            other => SfntVersion::Unknown(other),
        }
    }

    /// Whether outlines live in a `CFF ` table rather than `glyf`
    pub fn is_cff(self) -> bool {
        matches!(self, SfntVersion::OpenTypeCff)
    }
}

/// Table directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableRecord {
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset as usize..self.offset as usize + self.length as usize
    }
}

/// Tag-keyed table directory of one font
#[derive(Debug, Clone)]
pub struct TableDirectory {
    version: SfntVersion,
    tables: HashMap<Tag, TableRecord>,
    /// Span covering the offset table and the directory records
    header: TableRecord,
}

impl TableDirectory {
    /// Read the offset table and directory records at the reader's position.
    ///
    /// Unknown format tags are accepted and read as TrueType. Every record
    /// must lie within the data; a later record with the same tag replaces
    /// an earlier one.
    pub fn read(reader: &mut FontReader<'_>) -> Result<Self> {
        let start = reader.position();
        let raw_version = reader
            .read_u32()
            .map_err(|_| FontError::MalformedHeader("truncated offset table".into()))?;
        let version = SfntVersion::from_u32(raw_version);
        if let SfntVersion::Unknown(v) = version {
            tracing::warn!("Unrecognized sfnt version {:#010x}, reading as TrueType", v);
        }

        let num_tables = reader.read_u16()? as usize;
        reader.skip(6)?; // search range, entry selector, range shift

        reader
            .ensure(num_tables * 16)
            .map_err(|_| FontError::MalformedHeader(format!("{num_tables} directory records do not fit")))?;

        let mut tables = HashMap::with_capacity(num_tables);
        for _ in 0..num_tables {
            let tag = reader.read_tag()?;
            let record = TableRecord {
                checksum: reader.read_u32()?,
                offset: reader.read_u32()?,
                length: reader.read_u32()?,
            };

            let end = record.offset as u64 + record.length as u64;
            if end > reader.len() as u64 {
                return Err(FontError::MalformedHeader(format!(
                    "table '{tag}' at {}+{} exceeds font length {}",
                    record.offset,
                    record.length,
                    reader.len()
                )));
            }

            tracing::trace!("Table {} offset={} length={}", tag, record.offset, record.length);
            if tables.insert(tag, record).is_some() {
                tracing::warn!("Duplicate table '{}' in directory, keeping the last", tag);
            }
        }

        let header = TableRecord {
            checksum: 0,
            offset: start as u32,
            length: (reader.position() - start) as u32,
        };

        tracing::debug!("Read table directory: {:?}, {} tables", version, tables.len());

        Ok(Self {
            version,
            tables,
            header,
        })
    }

    pub fn version(&self) -> SfntVersion {
        self.version
    }

    pub fn get(&self, tag: Tag) -> Option<TableRecord> {
        self.tables.get(&tag).copied()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Record for a table the pipeline cannot do without
    pub fn require(&self, tag: Tag) -> Result<TableRecord> {
        self.get(tag).ok_or(FontError::MissingTable(tag))
    }

    /// Raw bytes of a table
    pub fn table_data<'a>(&self, data: &'a [u8], tag: Tag) -> Option<&'a [u8]> {
        self.get(tag).and_then(|t| data.get(t.range()))
    }

    /// The span of the directory itself, for re-emitting the font
    pub fn header(&self) -> TableRecord {
        self.header
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in file order
    pub fn by_offset(&self) -> Vec<(Tag, TableRecord)> {
        let mut entries: Vec<_> = self.tables.iter().map(|(t, r)| (*t, *r)).collect();
        entries.sort_by_key(|(tag, r)| (r.offset, *tag));
        entries
    }
}
