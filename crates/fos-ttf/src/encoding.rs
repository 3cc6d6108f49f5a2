//! WinAnsi legacy encoding and its width table
//!
//! The encoding is not injective: the bullet fills several unassigned
//! slots, and space, quoteleft and tilde each appear twice. Widths are
//! therefore backfilled through an index from code point to every legacy
//! code that encodes it.

use std::collections::HashMap;

/// Code point for every WinAnsi code; control codes map to 0
pub const WINANSI_ENCODING: [u16; 256] = [
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 0x00
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 0x08
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 0x10
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // 0x18
    0x0020, 0x0021, 0x0022, 0x0023, 0x0024, 0x0025, 0x0026, 0x0027, // 0x20
    0x0028, 0x0029, 0x002A, 0x002B, 0x002C, 0x002D, 0x002E, 0x002F, // 0x28
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037, // 0x30
    0x0038, 0x0039, 0x003A, 0x003B, 0x003C, 0x003D, 0x003E, 0x003F, // 0x38
    0x0040, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047, // 0x40
    0x0048, 0x0049, 0x004A, 0x004B, 0x004C, 0x004D, 0x004E, 0x004F, // 0x48
    0x0050, 0x0051, 0x0052, 0x0053, 0x0054, 0x0055, 0x0056, 0x0057, // 0x50
    0x0058, 0x0059, 0x005A, 0x005B, 0x005C, 0x005D, 0x005E, 0x005F, // 0x58
    0x2018, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067, // 0x60
    0x0068, 0x0069, 0x006A, 0x006B, 0x006C, 0x006D, 0x006E, 0x006F, // 0x68
    0x0070, 0x0071, 0x0072, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077, // 0x70
    0x0078, 0x0079, 0x007A, 0x007B, 0x007C, 0x007D, 0x007E, 0x2022, // 0x78
    0x20AC, 0x2022, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, // 0x80
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x2022, 0x017D, 0x2022, // 0x88
    0x2022, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 0x90
    0x007E, 0x2122, 0x0161, 0x203A, 0x0153, 0x2022, 0x017E, 0x0178, // 0x98
    0x0020, 0x00A1, 0x00A2, 0x00A3, 0x00A4, 0x00A5, 0x00A6, 0x00A7, // 0xA0
    0x00A8, 0x00A9, 0x00AA, 0x00AB, 0x00AC, 0x00AD, 0x00AE, 0x00AF, // 0xA8
    0x00B0, 0x00B1, 0x00B2, 0x00B3, 0x00B4, 0x00B5, 0x00B6, 0x00B7, // 0xB0
    0x00B8, 0x00B9, 0x00BA, 0x00BB, 0x00BC, 0x00BD, 0x00BE, 0x00BF, // 0xB8
    0x00C0, 0x00C1, 0x00C2, 0x00C3, 0x00C4, 0x00C5, 0x00C6, 0x00C7, // 0xC0
    0x00C8, 0x00C9, 0x00CA, 0x00CB, 0x00CC, 0x00CD, 0x00CE, 0x00CF, // 0xC8
    0x00D0, 0x00D1, 0x00D2, 0x00D3, 0x00D4, 0x00D5, 0x00D6, 0x00D7, // 0xD0
    0x00D8, 0x00D9, 0x00DA, 0x00DB, 0x00DC, 0x00DD, 0x00DE, 0x00DF, // 0xD8
    0x00E0, 0x00E1, 0x00E2, 0x00E3, 0x00E4, 0x00E5, 0x00E6, 0x00E7, // 0xE0
    0x00E8, 0x00E9, 0x00EA, 0x00EB, 0x00EC, 0x00ED, 0x00EE, 0x00EF, // 0xE8
    0x00F0, 0x00F1, 0x00F2, 0x00F3, 0x00F4, 0x00F5, 0x00F6, 0x00F7, // 0xF0
    0x00F8, 0x00F9, 0x00FA, 0x00FB, 0x00FC, 0x00FD, 0x00FE, 0x00FF, // 0xF8
];

/// First code of the printable range
const FIRST_PRINTABLE: usize = 32;

/// Every printable WinAnsi code that encodes `unicode`, ascending
pub fn unicode_to_ansi(unicode: u32) -> Vec<u8> {
    (FIRST_PRINTABLE..WINANSI_ENCODING.len())
        .filter(|&code| u32::from(WINANSI_ENCODING[code]) == unicode)
        .map(|code| code as u8)
        .collect()
}

/// 256-entry WinAnsi width table, in font design units
#[derive(Debug, Clone)]
pub struct AnsiWidths {
    widths: [u16; 256],
    index: HashMap<u32, Vec<u8>>,
}

impl AnsiWidths {
    /// Fill every slot with `missing_width` (the `.notdef` advance) and
    /// index the printable codes by code point
    pub fn new(missing_width: u16) -> Self {
        let mut index: HashMap<u32, Vec<u8>> = HashMap::new();
        for code in FIRST_PRINTABLE..WINANSI_ENCODING.len() {
            index
                .entry(u32::from(WINANSI_ENCODING[code]))
                .or_default()
                .push(code as u8);
        }
        Self {
            widths: [missing_width; 256],
            index,
        }
    }

    /// Set `width` on every legacy code that encodes `unicode`
    pub fn backfill(&mut self, unicode: u32, width: u16) {
        if let Some(codes) = self.index.get(&unicode) {
            for &code in codes {
                self.widths[code as usize] = width;
            }
        }
    }

    /// Legacy codes aliasing `unicode`; empty when it is not encodable
    pub fn legacy_codes(&self, unicode: u32) -> &[u8] {
        self.index.get(&unicode).map_or(&[], Vec::as_slice)
    }

    pub fn width(&self, code: u8) -> u16 {
        self.widths[code as usize]
    }

    pub fn widths(&self) -> &[u16; 256] {
        &self.widths
    }
}

impl Default for AnsiWidths {
    fn default() -> Self {
        Self::new(0)
    }
}
