//! Binary reader for font data

use crate::directory::Tag;
use crate::{FontError, Result};

/// Big-endian reader with bounds checking.
///
/// Positions are absolute offsets into the whole font file, so table
/// offsets from the directory can be passed straight to [`FontReader::seek`].
#[derive(Clone)]
pub struct FontReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl std::fmt::Debug for FontReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontReader")
            .field("pos", &self.pos)
            .field("data", &format!("[ {} bytes ]", self.data.len()))
            .finish()
    }
}

impl<'a> FontReader<'a> {
    /// Create a new reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying data
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move to an absolute position
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(FontError::UnexpectedEof {
                offset: pos,
                needed: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Skip bytes forward
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Check that `n` more bytes are available without consuming them.
    ///
    /// Call this before allocating anything sized from a length field.
    pub fn ensure(&self, n: usize) -> Result<()> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(FontError::UnexpectedEof {
                offset: self.pos,
                needed: n,
            }),
        }
    }

    /// Remaining bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read u8
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read big-endian u16
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read big-endian i16
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Read big-endian u32
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read big-endian i32
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Read a 16.16 fixed-point number
    pub fn read_fixed(&mut self) -> Result<f32> {
        Ok(self.read_i32()? as f32 / 65536.0)
    }

    /// Read 4-byte tag
    pub fn read_tag(&mut self) -> Result<Tag> {
        Ok(Tag::new(self.read_array()?))
    }

    /// Read a fixed-length single-byte string (Latin-1)
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        Ok(self.read_bytes(len)?.iter().map(|&b| b as char).collect())
    }

    /// Read a length-prefixed (Pascal) string
    pub fn read_pascal_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        self.read_string(len)
    }

    /// Read a UTF-16BE string of `len` bytes
    pub fn read_utf16_string(&mut self, len: usize) -> Result<String> {
        let units: Vec<u16> = self
            .read_bytes(len)?
            .chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .collect();
        Ok(String::from_utf16_lossy(&units))
    }
}
