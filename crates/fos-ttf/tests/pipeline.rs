//! Whole-font decoding tests for fos-ttf
//!
//! Fonts are assembled in memory by the builder in `common` and decoded
//! through `Font::from_bytes`.

mod common;

use common::*;
use fos_ttf::*;

fn decode(builder: &FontBuilder) -> Font {
    Font::from_bytes(&builder.build(), None, &Config::default()).unwrap()
}

// ============================================================================
// STRUCTURE AND NAMES
// ============================================================================

#[test]
fn test_sample_font_structure() {
    let font = decode(&sample_font("Sample Regular"));
    assert_eq!(font.kind(), FontKind::TrueType);
    assert_eq!(font.units_per_em(), 2048);
    assert_eq!(font.num_glyphs(), 9);
    assert!(font.directory().contains(Tag::KERN));
    assert_eq!(font.postscript_version(), PostScriptVersion::V3);
}

#[test]
fn test_names() {
    let font = decode(&sample_font("Sample Regular"));
    assert_eq!(font.full_name(), "Sample Regular");
    assert_eq!(font.subfamily_name(), "Regular");
    assert_eq!(font.notice(), "(c) Sample Foundry");
    assert!(font.family_names().contains("Sample"));
    // No PostScript name record: full name with whitespace removed
    assert_eq!(font.postscript_name(), "SampleRegular");
    assert_eq!(font.info().postscript_name, "SampleRegular");
}

#[test]
fn test_explicit_postscript_name() {
    let builder = sample_font("Sample Regular").table(
        b"name",
        name(&[(4, "Sample Regular"), (6, "Sample-Regular"), (16, "Sample Family")]),
    );
    let font = decode(&builder);
    assert_eq!(font.postscript_name(), "Sample-Regular");
    assert!(font.family_names().contains("Sample Family"));
}

#[test]
fn test_glyph_names_from_post_v2() {
    let builder = sample_font("Sample").table(
        b"post",
        post_v2(&[0, 3, 36, 57, 43, 91, 71, 83, 258], &["bullet"]),
    );
    let font = decode(&builder);
    assert_eq!(font.postscript_version(), PostScriptVersion::V2);
    assert_eq!(font.glyph_name(0), Some(".notdef"));
    assert_eq!(font.glyph_name(2), Some("A"));
    assert_eq!(font.glyph_name(5), Some("x"));
    assert_eq!(font.glyph_name(8), Some("bullet"));
    assert_eq!(font.glyph(8).unwrap().post_index, Some(258));
}

// ============================================================================
// METRICS
// ============================================================================

#[test]
fn test_converted_metrics() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.convert(1536), 750);
    assert_eq!(font.line_gap(), 32);
    assert_eq!(font.underline_position(), -73);
    assert_eq!(font.underline_thickness(), 48);
    assert_eq!(font.strikeout_position(), 258);
    assert_eq!(font.strikeout_thickness(), 49);
    assert_eq!(font.font_bbox_raw(), [-100, -450, 700, 1500]);
    assert_eq!(font.font_bbox(), [-48, -219, 341, 732]);
}

#[test]
fn test_custom_output_scale() {
    let config = Config {
        output_units_per_em: 2048,
        ..Default::default()
    };
    let font = Font::from_bytes(&sample_font("Sample").build(), None, &config).unwrap();
    assert_eq!(font.char_width(b'A'), 600);
    assert_eq!(font.ascender(), 1500);
}

#[test]
fn test_overflowing_ascender_falls_back_to_glyph_bounds() {
    // OS/2 1800/-400 and hhea 1900/-500 both exceed the 2048 em
    let font = decode(&sample_font("Sample"));
    let vm = font.vertical_metrics();
    assert_eq!((vm.ascender, vm.descender), (1500, -450));
    assert_eq!(font.ascender(), 732);
    assert_eq!(font.descender(), -219);
}

#[test]
fn test_fitting_os2_metrics_kept() {
    let os2_table = os2(&Os2 {
        typo_ascender: 1600,
        typo_descender: -400,
        ..sample_os2()
    });
    let font = decode(&sample_font("Sample").table(b"OS/2", os2_table));
    let vm = font.vertical_metrics();
    assert_eq!((vm.ascender, vm.descender), (1600, -400));
}

#[test]
fn test_heights_from_glyph_bounds() {
    let font = decode(&sample_font("Sample"));
    let vm = font.vertical_metrics();
    assert_eq!((vm.cap_height, vm.x_height), (1400, 1000));
    assert_eq!(font.cap_height(), 683);
    assert_eq!(font.x_height(), 488);
}

#[test]
fn test_heights_from_pclt() {
    let font = decode(&sample_font("Sample").table(b"PCLT", pclt(1062, 1456, 0x40)));
    let vm = font.vertical_metrics();
    assert_eq!((vm.cap_height, vm.x_height), (1456, 1062));
    assert_eq!(font.cap_height(), 710);
    assert_eq!(font.x_height(), 518);
}

#[test]
fn test_glyph_bounds_read_from_glyf() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.glyph(7).unwrap().bbox, BoundingBox::new(40, -450, 510, 1000));
    assert_eq!(font.glyph(0).unwrap().bbox, BoundingBox::default());
    assert!(font.glyph(0).unwrap().glyph_offset.is_some());
    assert_eq!(font.glyph_bbox(4), Some(BoundingBox::new(29, 0, 312, 683)));
    assert_eq!(font.glyph_bbox(99), None);
}

#[test]
fn test_cff_skips_glyph_bounds() {
    let font = decode(&sample_font("Sample").cff());
    assert_eq!(font.kind(), FontKind::OpenTypeCff);
    assert!(font.glyphs().iter().all(|g| g.bbox == BoundingBox::default()));
    assert!(font.glyphs().iter().all(|g| g.glyph_offset.is_none()));
}

#[test]
fn test_widths() {
    let font = decode(&sample_font("Sample"));
    let widths = font.widths();
    assert_eq!(widths.len(), 9);
    assert_eq!(widths[2], 292);
    assert_eq!(widths[1], 122);
}

// ============================================================================
// STYLE
// ============================================================================

#[test]
fn test_default_style() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.italic_angle(), 0);
    assert!(!font.is_fixed_pitch());
    assert_eq!(font.weight_class(), 400);
    assert!(font.is_embeddable());
    assert!(font.has_serifs());
    assert_eq!(font.flags(), 32 | 1);
}

#[test]
fn test_italic_fixed_sans_flags() {
    let builder = sample_font("Sample Mono Italic")
        .table(b"post", post(0x0003_0000, -12 << 16, (-150, 100), true))
        .table(b"PCLT", pclt(1000, 1400, 0x40));
    let font = decode(&builder);
    assert_eq!(font.italic_angle(), -12);
    assert!(font.is_fixed_pitch());
    assert!(!font.has_serifs());
    assert_eq!(font.flags(), 32 | 64 | 2);
}

#[test]
fn test_restricted_license_not_embeddable() {
    let os2_table = os2(&Os2 {
        fs_type: 2,
        ..sample_os2()
    });
    let font = decode(&sample_font("Sample").table(b"OS/2", os2_table));
    assert!(!font.is_embeddable());
}

#[test]
fn test_optional_tables_absent() {
    let builder = sample_font("Sample").without(b"OS/2").without(b"post");
    let font = decode(&builder);
    assert_eq!(font.weight_class(), 0);
    assert!(font.is_embeddable());
    assert_eq!(font.strikeout_position(), 0);
    assert_eq!(font.underline_thickness(), 0);
    // hhea 1900/-500 overflows the em without OS/2 as well
    assert_eq!(font.vertical_metrics().ascender, 1500);
}

#[test]
fn test_malformed_optional_table_ignored() {
    let font = decode(&sample_font("Sample").table(b"OS/2", vec![0, 4, 0]));
    assert_eq!(font.weight_class(), 0);
}

// ============================================================================
// CHARACTER MAP
// ============================================================================

#[test]
fn test_unicode_lookups() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.glyph_for_unicode('A' as u32), Some(2));
    assert_eq!(font.glyph_for_unicode(BULLET), Some(8));
    assert_eq!(font.glyph_for_unicode('Z' as u32), None);
    assert_eq!(font.unicode_for_glyph(3), Some('V' as u32));
    assert_eq!(font.char_map().encoding(), CmapEncoding::Unicode);
    assert_eq!(font.glyph(8).unwrap().unicodes, vec![BULLET]);
}

#[test]
fn test_last_char() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.first_char(), 0);
    assert_eq!(font.last_char(), b'x');
}

#[test]
fn test_segments_merge_contiguous_runs() {
    let builder = sample_font("Sample").table(
        b"cmap",
        cmap(3, 1, &[(0x41, 2), (0x42, 3), (0x43, 4), (0x45, 5)]),
    );
    let font = decode(&builder);
    assert_eq!(
        font.segments(),
        &[CMapSegment::new(0x41, 0x43, 2), CMapSegment::new(0x45, 0x45, 5)]
    );
}

#[test]
fn test_segments_cover_every_mapping() {
    let font = decode(&sample_font("Sample"));
    for m in font.char_map().mappings() {
        let segment = font
            .segments()
            .iter()
            .find(|s| s.contains(m.unicode))
            .unwrap();
        assert_eq!(segment.glyph_for(m.unicode), Some(u32::from(m.glyph)));
    }
    assert!(font.segments().windows(2).all(|w| w[0].unicode_end < w[1].unicode_start));
}

#[test]
fn test_symbol_cmap_aliases_ascii() {
    let builder = sample_font("Sample Symbol").table(b"cmap", cmap(3, 0, &[(0xF041, 2)]));
    let font = decode(&builder);
    assert_eq!(font.char_map().encoding(), CmapEncoding::Symbol);
    assert_eq!(font.glyph_for_unicode(0xF041), Some(2));
    assert_eq!(font.glyph_for_unicode(0x41), Some(2));
    assert_eq!(font.char_width_raw(b'A'), 600);
}

#[test]
fn test_missing_cmap_gives_empty_map() {
    let font = decode(&sample_font("Sample").without(b"cmap"));
    assert!(font.char_map().is_empty());
    assert!(font.segments().is_empty());
    assert!(font.kerning().is_empty());
    assert_eq!(font.char_width_raw(b'A'), 500);
}

#[test]
fn test_unsupported_cmap_format_is_fatal() {
    let mut table = Vec::new();
    for v in [0u16, 1, 3, 1, 0, 12] {
        be16(&mut table, v);
    }
    table.extend_from_slice(&[0, 6, 0, 10, 0, 0, 0, 0, 0, 0]);
    let result = Font::from_bytes(
        &sample_font("Sample").table(b"cmap", table).build(),
        None,
        &Config::default(),
    );
    assert!(matches!(result, Err(FontError::UnsupportedCmapFormat(6))));
}

// ============================================================================
// WINANSI WIDTHS
// ============================================================================

#[test]
fn test_ansi_widths_backfilled() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.char_width_raw(b'A'), 600);
    assert_eq!(font.char_width_raw(b' '), 250);
    // 0xA0 also encodes U+0020
    assert_eq!(font.char_width_raw(0xA0), 250);
    assert_eq!(font.char_width(b'A'), 292);
}

#[test]
fn test_bullet_aliases_share_width() {
    let font = decode(&sample_font("Sample"));
    for code in [0x7F, 0x81, 0x8D, 0x8F, 0x90, 0x95, 0x9D] {
        assert_eq!(font.char_width_raw(code), 400, "code {code:#x}");
    }
}

#[test]
fn test_unmapped_codes_use_notdef_width() {
    let font = decode(&sample_font("Sample"));
    assert_eq!(font.char_width_raw(0x80), 500);
    assert_eq!(font.char_width_raw(b'Z'), 500);
    assert_eq!(font.char_width_raw(0), 500);
}

// ============================================================================
// KERNING
// ============================================================================

#[test]
fn test_unicode_kerning_in_design_units() {
    let font = decode(&sample_font("Sample"));
    let kerning = font.kerning();
    assert_eq!(kerning.unicode_kerning('A' as u32, 'V' as u32), Some(-164));
    assert_eq!(kerning.unicode_kerning('V' as u32, 'A' as u32), Some(-120));
    // Zero-valued pairs are dropped
    assert_eq!(kerning.unicode_kerning('A' as u32, BULLET), None);
    assert_eq!(kerning.len(), 2);
}

#[test]
fn test_legacy_kerning_in_output_units() {
    let font = decode(&sample_font("Sample"));
    let kerning = font.kerning();
    assert_eq!(kerning.legacy_kerning(b'A', b'V'), Some(-80));
    assert_eq!(kerning.legacy_kerning(b'V', b'A'), Some(-58));
}

#[test]
fn test_legacy_kerning_fans_out_to_aliases() {
    let builder = sample_font("Sample").table(b"kern", kern(&[(2, 8, -100)]));
    let font = decode(&builder);
    let kerning = font.kerning();
    for code in [0x7F, 0x95] {
        assert_eq!(kerning.legacy_kerning(b'A', code), Some(-48));
    }
}

#[test]
fn test_kerning_keys_resolve_both_ways() {
    let font = decode(&sample_font("Sample"));
    for (&left, row) in font.kerning().by_unicode() {
        assert!(font.glyph_for_unicode(left).is_some());
        for &right in row.keys() {
            assert!(font.glyph_for_unicode(right).is_some());
        }
    }
}

#[test]
fn test_kerning_disabled() {
    let config = Config {
        use_kerning: false,
        ..Default::default()
    };
    let font = Font::from_bytes(&sample_font("Sample").build(), None, &config).unwrap();
    assert!(font.kerning().is_empty());
    assert!(font.kerning().by_legacy().is_empty());
}

#[test]
fn test_missing_kern_table() {
    let font = decode(&sample_font("Sample").without(b"kern"));
    assert!(font.kerning().is_empty());
}

// ============================================================================
// COLLECTIONS
// ============================================================================

fn sample_collection() -> Vec<u8> {
    collection(&[
        sample_font("A-Regular"),
        sample_font("B-Bold").table(b"head", head(1000, [0, -450, 700, 1500], true)),
    ])
}

#[test]
fn test_collection_member_selected_by_full_name() {
    let data = sample_collection();
    let font = Font::from_bytes(&data, Some("B-Bold"), &Config::default()).unwrap();
    assert_eq!(font.full_name(), "B-Bold");
    assert_eq!(font.units_per_em(), 1000);
    assert_eq!(font.char_width(b'A'), 600);

    let font = Font::from_bytes(&data, Some("A-Regular"), &Config::default()).unwrap();
    assert_eq!(font.units_per_em(), 2048);
}

#[test]
fn test_collection_selection_errors() {
    let data = sample_collection();
    assert!(matches!(
        Font::from_bytes(&data, Some("C-Missing"), &Config::default()),
        Err(FontError::FontNotFoundInCollection(name)) if name == "C-Missing"
    ));
    assert!(matches!(
        Font::from_bytes(&data, None, &Config::default()),
        Err(FontError::AmbiguousCollectionSelection)
    ));
}

#[test]
fn test_collection_listing() {
    let data = sample_collection();
    assert!(Collection::is_collection(&data));
    assert_eq!(
        collection::font_names(&data).unwrap(),
        vec!["A-Regular", "B-Bold"]
    );
    let infos = collection::font_infos(&data).unwrap();
    assert_eq!(infos[1].subfamily_name, "Regular");
    assert_eq!(infos[1].notice, "(c) Sample Foundry");
}

#[test]
fn test_single_font_listing() {
    let data = sample_font("Sample Regular").build();
    assert_eq!(collection::font_names(&data).unwrap(), vec!["Sample Regular"]);
}

// ============================================================================
// ADVANCED TABLES
// ============================================================================

const GSUB: [u8; 16] = [0, 1, 0, 0, 0, 10, 0, 12, 0, 14, 0, 0, 0, 0, 0, 0];

fn advanced_config() -> Config {
    Config {
        use_advanced: true,
        ..Default::default()
    }
}

#[test]
fn test_advanced_tables_off_by_default() {
    let font = decode(&sample_font("Sample").table(b"GSUB", GSUB.to_vec()));
    assert!(font.advanced_tables().is_none());
}

#[test]
fn test_advanced_tables_read() {
    let data = sample_font("Sample").table(b"GSUB", GSUB.to_vec()).build();
    let font = Font::from_bytes(&data, None, &advanced_config()).unwrap();
    let gsub = font.gsub().unwrap();
    assert_eq!(gsub.subtable_offsets, vec![10, 12, 14]);
    assert!(font.gpos().is_none());
    assert!(font.gdef().is_none());
}

#[test]
fn test_advanced_reader_errors_ignored() {
    let data = sample_font("Sample")
        .table(b"GPOS", vec![0, 2, 0, 0, 0, 0, 0, 0, 0, 0])
        .build();
    let font = Font::from_bytes(&data, None, &advanced_config()).unwrap();
    assert!(font.advanced_tables().is_none());
    assert_eq!(font.glyph_for_unicode('A' as u32), Some(2));
}

struct FixedReader(bool);

impl AdvancedTableReader for FixedReader {
    fn read_all(
        &self,
        _directory: &TableDirectory,
        _data: &[u8],
    ) -> std::result::Result<AdvancedTables, AdvancedTableError> {
        if self.0 {
            Ok(AdvancedTables::default())
        } else {
            Err(AdvancedTableError::Truncated(Tag::GPOS))
        }
    }
}

#[test]
fn test_custom_advanced_reader() {
    let data = sample_font("Sample").table(b"GSUB", GSUB.to_vec()).build();
    let font =
        Font::from_bytes_with_reader(&data, None, &advanced_config(), &FixedReader(true)).unwrap();
    assert!(font.advanced_tables().unwrap().is_empty());

    let font =
        Font::from_bytes_with_reader(&data, None, &advanced_config(), &FixedReader(false)).unwrap();
    assert!(font.advanced_tables().is_none());
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_input_too_large() {
    let config = Config {
        max_input_len: 64,
        ..Default::default()
    };
    let result = Font::from_bytes(&sample_font("Sample").build(), None, &config);
    assert!(matches!(result, Err(FontError::InputTooLarge { max: 64, .. })));
}

#[test]
fn test_missing_required_tables() {
    for tag in [b"head", b"maxp", b"hhea", b"hmtx"] {
        let result = Font::from_bytes(
            &sample_font("Sample").without(tag).build(),
            None,
            &Config::default(),
        );
        assert!(
            matches!(result, Err(FontError::MissingTable(t)) if t == Tag::new(*tag)),
            "{}",
            String::from_utf8_lossy(tag)
        );
    }
}

#[test]
fn test_truncated_input() {
    assert!(Font::from_bytes(&[0, 1], None, &Config::default()).is_err());
    let data = sample_font("Sample").build();
    assert!(Font::from_bytes(&data[..40], None, &Config::default()).is_err());
}

#[test]
fn test_glyph_outside_glyf_is_fatal() {
    let mut loca = Vec::new();
    for v in [0u32, 0, 0, 0, 400, 410, 410, 410, 410, 410] {
        be32(&mut loca, v);
    }
    let builder = sample_font("Sample")
        .table(b"loca", loca)
        .table(b"glyf", vec![0; 12]);
    // Glyph 4 starts past the end of glyf
    let result = Font::from_bytes(&builder.build(), None, &Config::default());
    assert!(matches!(result, Err(FontError::MalformedTable { .. })));
}

#[test]
fn test_open_missing_file() {
    let result = Font::open("/nonexistent/font.ttf", None, &Config::default());
    assert!(matches!(result, Err(FontError::Io(_))));
}
