//! Decoder Configuration

/// Font decoding options
#[derive(Debug, Clone)]
pub struct Config {
    /// Decode the `kern` table
    pub use_kerning: bool,

    /// Run the advanced typographic table reader (GDEF/GSUB/GPOS)
    pub use_advanced: bool,

    /// Output scale for converted metrics (units per em)
    pub output_units_per_em: i32,

    /// Maximum accepted input size (bytes)
    pub max_input_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_kerning: true,
            use_advanced: false,
            output_units_per_em: 1000,
            max_input_len: 64 * 1024 * 1024, // 64MB
        }
    }
}
