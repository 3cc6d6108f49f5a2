//! fos-fontinfo - print what fos-ttf decodes from font files
//!
//! Single fonts are decoded and summarized. Collections are listed member
//! by member unless `--name` selects one to decode.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use fos_ttf::{
    collection, AdvancedTables, CMapSegment, Collection, Config, Font, FontInfo, FontKind,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Font files (.ttf, .otf or .ttc)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Full name of the collection member to decode
    #[arg(long)]
    name: Option<String>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Skip the kern table
    #[arg(long)]
    no_kerning: bool,

    /// Read the GDEF/GSUB/GPOS headers
    #[arg(long)]
    advanced: bool,

    /// Units per em of the converted metrics
    #[arg(long, default_value_t = 1000)]
    units: i32,

    /// Print every code point segment
    #[arg(long)]
    segments: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            use_kerning: !self.no_kerning,
            use_advanced: self.advanced,
            output_units_per_em: self.units,
            ..Default::default()
        }
    }
}

/// Converted metrics of one decoded font
#[derive(Serialize)]
struct FontReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    info: FontInfo,
    kind: FontKind,
    units_per_em: u16,
    num_glyphs: usize,
    ascender: i32,
    descender: i32,
    cap_height: i32,
    x_height: i32,
    line_gap: i32,
    italic_angle: i16,
    weight_class: u16,
    flags: u32,
    embeddable: bool,
    font_bbox: [i32; 4],
    last_char: u8,
    kerning_pairs: usize,
    segments: &'a [CMapSegment],
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced: Option<&'a AdvancedTables>,
}

impl<'a> FontReport<'a> {
    fn new(path: &'a Path, font: &'a Font) -> Self {
        Self {
            path,
            info: font.info(),
            kind: font.kind(),
            units_per_em: font.units_per_em(),
            num_glyphs: font.num_glyphs(),
            ascender: font.ascender(),
            descender: font.descender(),
            cap_height: font.cap_height(),
            x_height: font.x_height(),
            line_gap: font.line_gap(),
            italic_angle: font.italic_angle(),
            weight_class: font.weight_class(),
            flags: font.flags(),
            embeddable: font.is_embeddable(),
            font_bbox: font.font_bbox(),
            last_char: font.last_char(),
            kerning_pairs: font.kerning().len(),
            segments: font.segments(),
            advanced: font.advanced_tables(),
        }
    }

    fn print(&self, show_segments: bool) {
        println!("{}", self.path.display());
        println!("  PostScript name: {}", self.info.postscript_name);
        println!("  Full name:       {}", self.info.full_name);
        println!(
            "  Family:          {}",
            self.info.family_names.iter().cloned().collect::<Vec<_>>().join(", ")
        );
        println!("  Subfamily:       {}", self.info.subfamily_name);
        println!("  Kind:            {:?}", self.kind);
        println!(
            "  Glyphs:          {} ({} units/em)",
            self.num_glyphs, self.units_per_em
        );
        println!(
            "  Ascent/descent:  {} / {} (gap {})",
            self.ascender, self.descender, self.line_gap
        );
        println!("  Cap/x height:    {} / {}", self.cap_height, self.x_height);
        println!("  Bounding box:    {:?}", self.font_bbox);
        println!(
            "  Style:           weight {}, italic angle {}, flags {:#x}",
            self.weight_class, self.italic_angle, self.flags
        );
        println!("  Embeddable:      {}", self.embeddable);
        println!("  Last char:       {}", self.last_char);
        println!("  Segments:        {}", self.segments.len());
        println!("  Kerning pairs:   {}", self.kerning_pairs);
        if let Some(advanced) = self.advanced {
            for table in [&advanced.gdef, &advanced.gsub, &advanced.gpos]
                .into_iter()
                .flatten()
            {
                println!(
                    "  {}:            {}.{} offsets {:?}",
                    table.tag, table.major_version, table.minor_version, table.subtable_offsets
                );
            }
        }
        if show_segments {
            for s in self.segments {
                println!(
                    "    U+{:04X}..U+{:04X} -> {}",
                    s.unicode_start, s.unicode_end, s.glyph_start
                );
            }
        }
    }
}

/// Members of a collection opened without `--name`
#[derive(Serialize)]
struct CollectionReport<'a> {
    path: &'a Path,
    fonts: &'a [FontInfo],
}

impl CollectionReport<'_> {
    fn print(&self) {
        println!("{} (collection, {} fonts)", self.path.display(), self.fonts.len());
        for (i, info) in self.fonts.iter().enumerate() {
            println!("  [{}] {} ({})", i, info.full_name, info.postscript_name);
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Report<'a> {
    Font(FontReport<'a>),
    Collection(CollectionReport<'a>),
}

/// What one input file turned into
enum Entry<'a> {
    Decoded(&'a Path, Font),
    Listed(&'a Path, Vec<FontInfo>),
}

impl<'a> Entry<'a> {
    fn load(path: &'a Path, data: &[u8], args: &Args, config: &Config) -> Result<Self> {
        if Collection::is_collection(data) && args.name.is_none() {
            let infos = collection::font_infos(data)
                .with_context(|| format!("listing collection {}", path.display()))?;
            return Ok(Entry::Listed(path, infos));
        }

        let font = Font::from_bytes(data, args.name.as_deref(), config)
            .with_context(|| format!("decoding {}", path.display()))?;
        tracing::debug!("Decoded {} as {:?}", path.display(), font.full_name());
        Ok(Entry::Decoded(path, font))
    }

    fn path(&self) -> &Path {
        match self {
            Entry::Decoded(path, _) | Entry::Listed(path, _) => *path,
        }
    }

    fn report(&self) -> Report<'_> {
        match self {
            Entry::Decoded(path, font) => Report::Font(FontReport::new(path, font)),
            Entry::Listed(path, fonts) => Report::Collection(CollectionReport { path, fonts }),
        }
    }
}

/// Load every file in argument order
fn load_entries<'a>(
    args: &'a Args,
    config: &Config,
    mut read: impl FnMut(&Path) -> std::io::Result<Vec<u8>>,
) -> Result<Vec<Entry<'a>>> {
    let mut entries = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let data = read(path).with_context(|| format!("reading {}", path.display()))?;
        entries.push(Entry::load(path, &data, args, config)?);
    }
    Ok(entries)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config();
    let entries = load_entries(&args, &config, |path| std::fs::read(path))?;
    let reports: Vec<Report<'_>> = entries.iter().map(Entry::report).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        match report {
            Report::Font(font) => font.print(args.segments),
            Report::Collection(collection) => collection.print(),
        }
    }
    Ok(())
}
