//! fOS TTF - TrueType/OpenType Table Decoder
//!
//! This crate decodes the tables of an SFNT font (TrueType, CFF-flavoured
//! OpenType, or a member of a TrueType Collection) into an immutable model:
//! - Table directory and collection member resolution
//! - Glyph metrics (`head`, `maxp`, `hhea`, `hmtx`, `loca`/`glyf` boxes)
//! - Glyph names (`post`) and font names (`name`)
//! - Unicode mapping (`cmap` format 4) and contiguous glyph segments
//! - WinAnsi width table and kerning (`kern` format 0)
//! - Ascender/descender/cap-height/x-height heuristics (`OS/2`, `PCLT`)
//!
//! # Example
//! ```rust,ignore
//! use fos_ttf::{Config, Font};
//!
//! let data = std::fs::read("DejaVuSans.ttf")?;
//! let font = Font::from_bytes(&data, None, &Config::default())?;
//! println!("{} ascender={}", font.postscript_name(), font.ascender());
//! ```

pub mod advanced;
pub mod collection;
mod config;
pub mod directory;
pub mod encoding;
mod font;
pub mod kerning;
pub mod metrics;
pub mod parser;
mod pipeline;
pub mod segments;
pub mod units;

pub use advanced::{
    AdvancedTableError, AdvancedTableReader, AdvancedTables, LayoutTable, RawLayoutTables,
};
pub use collection::{Collection, FontInfo, FontNameScratch};
pub use config::Config;
pub use directory::{SfntVersion, TableDirectory, TableRecord, Tag};
pub use encoding::AnsiWidths;
pub use font::{Font, FontKind};
pub use kerning::KerningTables;
pub use metrics::{BoundingBox, GlyphMetrics, VerticalMetrics};
pub use parser::cmap::{CharMap, CmapEncoding, UnicodeMapping};
pub use parser::post::PostScriptVersion;
pub use parser::FontReader;
pub use segments::CMapSegment;

/// Font decoding error types
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Malformed font header: {0}")]
    MalformedHeader(String),

    #[error("Malformed '{tag}' table: {reason}")]
    MalformedTable { tag: Tag, reason: String },

    #[error("Required table not found: {0}")]
    MissingTable(Tag),

    #[error("Unsupported cmap subtable format: {0}")]
    UnsupportedCmapFormat(u16),

    #[error("Font not found in collection: {0}")]
    FontNotFoundInCollection(String),

    #[error("Font is a collection; a font name must be given to select a member")]
    AmbiguousCollectionSelection,

    #[error("No glyph found for kerning key U+{0:04X}")]
    UnresolvableKerningKey(u32),

    #[error("Unexpected end of data: {needed} bytes needed at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("Input of {len} bytes exceeds the configured maximum of {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FontError {
    pub(crate) fn malformed(tag: Tag, reason: impl Into<String>) -> Self {
        FontError::MalformedTable {
            tag,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FontError>;
