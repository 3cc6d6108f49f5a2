//! Table Parsers
//!
//! One decoder per SFNT table. Each takes the shared [`FontReader`] over the
//! whole file plus the table's directory record, and returns a plain value
//! that the read pipeline folds into the font.

pub mod cmap;
pub mod glyf;
pub mod hmtx;
pub mod kern;
pub mod name;
pub mod post;
pub mod reader;
pub mod tables;

pub use reader::FontReader;
