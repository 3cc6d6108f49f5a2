//! Decoded font and its query surface

use std::collections::BTreeSet;
use std::path::Path;

use crate::advanced::{AdvancedTableReader, AdvancedTables, LayoutTable};
use crate::collection::FontInfo;
use crate::config::Config;
use crate::directory::{SfntVersion, TableDirectory};
use crate::encoding::AnsiWidths;
use crate::kerning::KerningTables;
use crate::metrics::{BoundingBox, GlyphMetrics, VerticalMetrics};
use crate::parser::cmap::CharMap;
use crate::parser::glyf;
use crate::parser::name::FontNameScratch;
use crate::parser::post::{PostScriptVersion, PostTable};
use crate::parser::tables::{HeadTable, HheaTable, Os2Table, PcltTable};
use crate::parser::FontReader;
use crate::segments::CMapSegment;
use crate::{pipeline, units, Result};

/// Outline flavour of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FontKind {
    /// `glyf` outlines; glyph bounds come from the glyph headers
    TrueType,
    /// `CFF ` outlines; glyph bounds are not read
    OpenTypeCff,
}

impl FontKind {
    pub fn from_version(version: SfntVersion) -> Self {
        if version.is_cff() {
            FontKind::OpenTypeCff
        } else {
            FontKind::TrueType
        }
    }

    /// Backfill glyph bounding boxes and data offsets for this flavour.
    ///
    /// Returns whether this flavour reads glyph bounds at all.
    pub(crate) fn update_bboxes(
        self,
        r: &mut FontReader<'_>,
        directory: &TableDirectory,
        head: &HeadTable,
        glyphs: &mut [GlyphMetrics],
    ) -> Result<bool> {
        match self {
            FontKind::TrueType => {
                glyf::update_bboxes(r, directory, head.index_to_loc_format, glyphs)?;
                Ok(true)
            }
            FontKind::OpenTypeCff => {
                tracing::debug!("CFF outlines, glyph bounds not read");
                Ok(false)
            }
        }
    }
}

/// A fully decoded font.
///
/// Built in one pass by [`Font::from_bytes`] and immutable afterwards.
/// Accessors without a `_raw` suffix return values converted to the
/// configured output scale.
#[derive(Debug, Clone)]
pub struct Font {
    pub(crate) kind: FontKind,
    pub(crate) directory: TableDirectory,
    pub(crate) head: HeadTable,
    pub(crate) hhea: HheaTable,
    pub(crate) os2: Option<Os2Table>,
    pub(crate) post: PostTable,
    pub(crate) pclt: Option<PcltTable>,
    pub(crate) names: FontNameScratch,
    pub(crate) glyphs: Vec<GlyphMetrics>,
    pub(crate) ansi_widths: AnsiWidths,
    pub(crate) cmap: CharMap,
    pub(crate) segments: Vec<CMapSegment>,
    pub(crate) kerning: KerningTables,
    pub(crate) advanced: Option<AdvancedTables>,
    pub(crate) vertical: VerticalMetrics,
    pub(crate) output_units_per_em: i32,
}

impl Font {
    /// Decode a font or a named member of a collection
    pub fn from_bytes(data: &[u8], name: Option<&str>, config: &Config) -> Result<Self> {
        pipeline::decode(data, name, config, None)
    }

    /// Like [`Font::from_bytes`], with a custom advanced table reader
    pub fn from_bytes_with_reader(
        data: &[u8],
        name: Option<&str>,
        config: &Config,
        reader: &dyn AdvancedTableReader,
    ) -> Result<Self> {
        pipeline::decode(data, name, config, Some(reader))
    }

    /// Read and decode a font file
    pub fn open(path: impl AsRef<Path>, name: Option<&str>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening font {}", path.display());
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, name, config)
    }

    // ==== Structure ====

    pub fn kind(&self) -> FontKind {
        self.kind
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    /// Convert a design unit value to the output scale
    pub fn convert(&self, n: i32) -> i32 {
        units::convert(n, self.head.units_per_em, self.output_units_per_em)
    }

    // ==== Names ====

    /// PostScript name, falling back to the full name without whitespace
    pub fn postscript_name(&self) -> String {
        self.names.resolved_postscript_name()
    }

    pub fn family_names(&self) -> &BTreeSet<String> {
        &self.names.family_names
    }

    pub fn subfamily_name(&self) -> &str {
        &self.names.subfamily_name
    }

    pub fn full_name(&self) -> &str {
        &self.names.full_name
    }

    pub fn notice(&self) -> &str {
        &self.names.notice
    }

    pub fn info(&self) -> FontInfo {
        FontInfo::from(&self.names)
    }

    // ==== Font-wide metrics ====

    pub fn ascender(&self) -> i32 {
        self.convert(self.vertical.ascender)
    }

    pub fn descender(&self) -> i32 {
        self.convert(self.vertical.descender)
    }

    pub fn cap_height(&self) -> i32 {
        self.convert(self.vertical.cap_height)
    }

    pub fn x_height(&self) -> i32 {
        self.convert(self.vertical.x_height)
    }

    /// Effective vertical metrics in design units
    pub fn vertical_metrics(&self) -> VerticalMetrics {
        self.vertical
    }

    pub fn line_gap(&self) -> i32 {
        self.convert(self.hhea.line_gap.into())
    }

    pub fn underline_position(&self) -> i32 {
        self.convert(self.post.underline_position.into())
    }

    pub fn underline_thickness(&self) -> i32 {
        self.convert(self.post.underline_thickness.into())
    }

    pub fn strikeout_position(&self) -> i32 {
        self.convert(self.os2.as_ref().map_or(0, |o| o.strikeout_position.into()))
    }

    pub fn strikeout_thickness(&self) -> i32 {
        self.convert(self.os2.as_ref().map_or(0, |o| o.strikeout_size.into()))
    }

    /// Font bounding box from `head`, converted
    pub fn font_bbox(&self) -> [i32; 4] {
        self.head.bbox().map(|v| self.convert(v))
    }

    pub fn font_bbox_raw(&self) -> [i32; 4] {
        self.head.bbox()
    }

    // ==== Style ====

    /// Integer part of the italic angle, in degrees
    pub fn italic_angle(&self) -> i16 {
        self.post.italic_angle_degrees()
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.post.is_fixed_pitch != 0
    }

    /// `usWeightClass`, or 0 without an OS/2 table
    pub fn weight_class(&self) -> u16 {
        self.os2.as_ref().map_or(0, |o| o.weight_class)
    }

    pub fn is_embeddable(&self) -> bool {
        self.os2.as_ref().is_none_or(Os2Table::is_embeddable)
    }

    /// From the PCLT serif style; fonts without PCLT count as serif
    pub fn has_serifs(&self) -> bool {
        self.pclt.as_ref().is_none_or(PcltTable::has_serifs)
    }

    /// PDF font descriptor flags: standard charset (32) always, italic
    /// (64), fixed pitch (2) and serif (1) as applicable
    pub fn flags(&self) -> u32 {
        let mut flags = 32;
        if self.post.italic_angle != 0 {
            flags |= 64;
        }
        if self.is_fixed_pitch() {
            flags |= 2;
        }
        if self.has_serifs() {
            flags |= 1;
        }
        flags
    }

    pub fn postscript_version(&self) -> PostScriptVersion {
        self.post.version
    }

    // ==== Glyphs ====

    pub fn glyphs(&self) -> &[GlyphMetrics] {
        &self.glyphs
    }

    pub fn glyph(&self, glyph: u16) -> Option<&GlyphMetrics> {
        self.glyphs.get(glyph as usize)
    }

    /// Advance widths of every glyph, converted
    pub fn widths(&self) -> Vec<i32> {
        self.glyphs
            .iter()
            .map(|g| self.convert(g.advance_width.into()))
            .collect()
    }

    /// Bounding box of a glyph, converted
    pub fn glyph_bbox(&self, glyph: u16) -> Option<BoundingBox> {
        let b = self.glyph(glyph)?.bbox;
        Some(BoundingBox::new(
            self.convert(b.x_min),
            self.convert(b.y_min),
            self.convert(b.x_max),
            self.convert(b.y_max),
        ))
    }

    pub fn glyph_name(&self, glyph: u16) -> Option<&str> {
        self.glyph(glyph)?.name.as_deref()
    }

    pub fn glyph_for_unicode(&self, unicode: u32) -> Option<u16> {
        self.cmap.glyph_for_unicode(unicode)
    }

    pub fn unicode_for_glyph(&self, glyph: u16) -> Option<u32> {
        self.cmap.unicode_for_glyph(glyph)
    }

    pub fn char_map(&self) -> &CharMap {
        &self.cmap
    }

    /// Contiguous code point to glyph runs, sorted by code point
    pub fn segments(&self) -> &[CMapSegment] {
        &self.segments
    }

    // ==== WinAnsi ====

    pub fn first_char(&self) -> u8 {
        0
    }

    pub fn last_char(&self) -> u8 {
        self.cmap.last_char()
    }

    /// WinAnsi width of `code`, converted
    pub fn char_width(&self, code: u8) -> i32 {
        self.convert(self.ansi_widths.width(code).into())
    }

    pub fn char_width_raw(&self, code: u8) -> u16 {
        self.ansi_widths.width(code)
    }

    pub fn ansi_widths(&self) -> &AnsiWidths {
        &self.ansi_widths
    }

    // ==== Kerning ====

    pub fn kerning(&self) -> &KerningTables {
        &self.kerning
    }

    // ==== Advanced tables ====

    /// Tables read by the advanced reader, when it ran and succeeded
    pub fn advanced_tables(&self) -> Option<&AdvancedTables> {
        self.advanced.as_ref()
    }

    pub fn gdef(&self) -> Option<&LayoutTable> {
        self.advanced.as_ref()?.gdef.as_ref()
    }

    pub fn gsub(&self) -> Option<&LayoutTable> {
        self.advanced.as_ref()?.gsub.as_ref()
    }

    pub fn gpos(&self) -> Option<&LayoutTable> {
        self.advanced.as_ref()?.gpos.as_ref()
    }
}
