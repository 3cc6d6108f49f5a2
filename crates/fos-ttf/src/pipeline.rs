//! Font decoding pipeline
//!
//! Stages run in a fixed order, each relying on the data produced by the
//! ones before it. Required stages propagate their errors and no font is
//! returned; optional tables that are missing or malformed are logged and
//! replaced with defaults.

use crate::advanced::{AdvancedTableReader, AdvancedTables, RawLayoutTables};
use crate::collection::Collection;
use crate::config::Config;
use crate::directory::{TableDirectory, Tag};
use crate::encoding::AnsiWidths;
use crate::font::{Font, FontKind};
use crate::kerning::KerningTables;
use crate::metrics::{self, MetricSources};
use crate::parser::cmap::read_cmap;
use crate::parser::hmtx::read_hmtx;
use crate::parser::kern::read_kern;
use crate::parser::name::{read_name, FontNameScratch};
use crate::parser::post::read_post;
use crate::parser::tables::{HeadTable, HheaTable, MaxpTable, Os2Table, PcltTable};
use crate::parser::FontReader;
use crate::segments;
use crate::{units, FontError, Result};

/// Pipeline states, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    DirectoryRead,
    CollectionResolved,
    HeaderRead,
    GlyphCountRead,
    HorizontalHeaderRead,
    HorizontalMetricsRead,
    LegacyWidthsInitialized,
    PostScriptRead,
    Os2Read,
    AscDescDetermined,
    NameRead,
    PcltRead,
    CmapRead,
    SegmentsComputed,
    BBoxUpdated,
    KerningRead,
    AdvancedTablesRead,
    VerticalMetricsGuessed,
    Ready,
}

/// Stages entered by one decode, in order
#[derive(Debug, Default)]
struct Progress {
    stages: Vec<Stage>,
}

impl Progress {
    fn enter(&mut self, stage: Stage) {
        tracing::debug!("Font pipeline: {:?}", stage);
        self.stages.push(stage);
    }
}

/// Unwrap an optional table read, logging why it is absent
fn optional<T>(tag: Tag, read: Option<Result<T>>) -> Option<T> {
    match read {
        Some(Ok(table)) => Some(table),
        Some(Err(e)) => {
            tracing::warn!("Ignoring malformed '{}' table: {}", tag, e);
            None
        }
        None => {
            tracing::warn!("Font has no '{}' table", tag);
            None
        }
    }
}

/// Decode a font, selecting a collection member by full name
pub(crate) fn decode(
    data: &[u8],
    name: Option<&str>,
    config: &Config,
    advanced: Option<&dyn AdvancedTableReader>,
) -> Result<Font> {
    run(data, name, config, advanced, &mut Progress::default())
}

fn run(
    data: &[u8],
    name: Option<&str>,
    config: &Config,
    advanced: Option<&dyn AdvancedTableReader>,
    progress: &mut Progress,
) -> Result<Font> {
    if data.len() > config.max_input_len {
        return Err(FontError::InputTooLarge {
            len: data.len(),
            max: config.max_input_len,
        });
    }

    let mut r = FontReader::new(data);

    let collection = Collection::read(&mut r)?;
    let directory = match &collection {
        Some(collection) => {
            let directory = collection.resolve(&mut r, name)?;
            progress.enter(Stage::CollectionResolved);
            directory
        }
        None => {
            r.seek(0)?;
            let directory = TableDirectory::read(&mut r)?;
            progress.enter(Stage::DirectoryRead);
            directory
        }
    };
    let kind = FontKind::from_version(directory.version());

    let head = HeadTable::read(&mut r, directory.require(Tag::HEAD)?)?;
    progress.enter(Stage::HeaderRead);

    let maxp = MaxpTable::read(&mut r, directory.require(Tag::MAXP)?)?;
    progress.enter(Stage::GlyphCountRead);

    let hhea = HheaTable::read(&mut r, directory.require(Tag::HHEA)?)?;
    progress.enter(Stage::HorizontalHeaderRead);

    let glyph_count = usize::from(maxp.num_glyphs.max(hhea.number_of_h_metrics));
    let mut glyphs = read_hmtx(
        &mut r,
        directory.require(Tag::HMTX)?,
        hhea.number_of_h_metrics,
        glyph_count,
    )?;
    progress.enter(Stage::HorizontalMetricsRead);

    let mut ansi_widths = AnsiWidths::new(glyphs.first().map_or(0, |g| g.advance_width));
    progress.enter(Stage::LegacyWidthsInitialized);

    let post = optional(
        Tag::POST,
        directory
            .get(Tag::POST)
            .map(|record| read_post(&mut r, record, &mut glyphs)),
    )
    .unwrap_or_default();
    progress.enter(Stage::PostScriptRead);

    let os2 = optional(
        Tag::OS2,
        directory.get(Tag::OS2).map(|record| Os2Table::read(&mut r, record)),
    );
    progress.enter(Stage::Os2Read);

    let os2_values = os2.clone().unwrap_or_default();
    let mut sources = MetricSources {
        units_per_em: head.units_per_em,
        hhea_ascender: hhea.ascender.into(),
        hhea_descender: hhea.descender.into(),
        os2_ascender: os2_values.typo_ascender.into(),
        os2_descender: os2_values.typo_descender.into(),
        os2_cap_height: os2_values.cap_height.into(),
        os2_x_height: os2_values.x_height.into(),
        ..Default::default()
    };
    let (ascender, descender) = metrics::determine_asc_desc(&sources);
    progress.enter(Stage::AscDescDetermined);

    let mut names = FontNameScratch::default();
    read_name(&mut r, &directory, &mut names)?;
    progress.enter(Stage::NameRead);

    let pclt = optional(
        Tag::PCLT,
        directory.get(Tag::PCLT).map(|record| PcltTable::read(&mut r, record)),
    );
    if let Some(pclt) = &pclt {
        sources.pclt_cap_height = pclt.cap_height.into();
        sources.pclt_x_height = pclt.x_height.into();
    }
    progress.enter(Stage::PcltRead);

    let cmap = read_cmap(&mut r, &directory, &mut glyphs, &mut ansi_widths)?;
    progress.enter(Stage::CmapRead);

    let segments = segments::compress(&segments::canonicalize(cmap.mappings()));
    progress.enter(Stage::SegmentsComputed);

    if kind.update_bboxes(&mut r, &directory, &head, &mut glyphs)? {
        progress.enter(Stage::BBoxUpdated);
    }

    let (units_per_em, scale) = (head.units_per_em, config.output_units_per_em);
    let kerning = if config.use_kerning {
        let pairs = optional(
            Tag::KERN,
            directory.get(Tag::KERN).map(|record| read_kern(&mut r, record)),
        )
        .unwrap_or_default();
        let kerning = KerningTables::build(&pairs, &cmap, &glyphs, &ansi_widths, |v| {
            units::convert(v, units_per_em, scale)
        })?;
        progress.enter(Stage::KerningRead);
        kerning
    } else {
        tracing::debug!("Kerning disabled");
        KerningTables::default()
    };

    let advanced_tables = if config.use_advanced {
        let tables = read_advanced(advanced.unwrap_or(&RawLayoutTables), &directory, data);
        progress.enter(Stage::AdvancedTablesRead);
        tables
    } else {
        None
    };

    let vertical = metrics::guess_from_glyphs(&glyphs, ascender, descender, &sources);
    progress.enter(Stage::VerticalMetricsGuessed);

    tracing::info!(
        "Decoded font {:?}: {} glyphs, {} segments, {} kerning pairs",
        names.full_name,
        glyphs.len(),
        segments.len(),
        kerning.len()
    );
    progress.enter(Stage::Ready);

    Ok(Font {
        kind,
        directory,
        head,
        hhea,
        os2,
        post,
        pclt,
        names,
        glyphs,
        ansi_widths,
        cmap,
        segments,
        kerning,
        advanced: advanced_tables,
        vertical,
        output_units_per_em: scale,
    })
}

/// Run the advanced reader; its errors mean "no advanced tables"
fn read_advanced(
    reader: &dyn AdvancedTableReader,
    directory: &TableDirectory,
    data: &[u8],
) -> Option<AdvancedTables> {
    match reader.read_all(directory, data) {
        Ok(tables) => Some(tables),
        Err(e) => {
            tracing::warn!("Advanced typographic tables ignored: {}", e);
            None
        }
    }
}
