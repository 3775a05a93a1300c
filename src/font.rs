//! Bitmap font table
//!
//! 16x21 glyphs (Microsoft YaHei, 12 pt) as shipped by the panel vendor.
//! Each row is 2 bytes, MSB is the leftmost pixel, a set bit is ink.
//! ASCII glyphs only use the left 11 columns and advance by
//! [`Font::ascii_width`].
//!
//! ## Example
//!
//! ```
//! use er_epd042a1::font::FONT12_CN;
//!
//! let glyph = match FONT12_CN.glyph("A") {
//!     Some(glyph) => glyph,
//!     None => return,
//! };
//! assert!(glyph.pixel(5, 5));
//! assert_eq!(FONT12_CN.advance("A"), 11);
//! assert_eq!(FONT12_CN.advance("你"), 16);
//! ```

/// Glyph width in pixels
pub const GLYPH_WIDTH: u16 = 16;
/// Glyph height in pixels
pub const GLYPH_HEIGHT: u16 = 21;
/// Bytes per glyph row
pub const GLYPH_ROW_BYTES: usize = 2;
/// Bytes per glyph bitmap
pub const GLYPH_BYTES: usize = GLYPH_ROW_BYTES * GLYPH_HEIGHT as usize;

/// One character and its packed bitmap
#[derive(Debug, PartialEq, Eq)]
pub struct Glyph {
    /// The character this glyph draws, UTF-8 encoded
    pub key: &'static str,
    /// Row-major packed bitmap
    pub bitmap: [u8; GLYPH_BYTES],
}

impl Glyph {
    /// Whether the pixel at (x, y) is ink
    ///
    /// Out-of-range coordinates read as blank.
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= GLYPH_WIDTH || y >= GLYPH_HEIGHT {
            return false;
        }
        let byte = self.bitmap[y as usize * GLYPH_ROW_BYTES + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }
}

/// A fixed-size font: a glyph table plus its metrics
#[derive(Debug)]
pub struct Font {
    /// Glyphs, looked up by key
    pub table: &'static [Glyph],
    /// Advance for ASCII glyphs
    pub ascii_width: u16,
    /// Advance for wide glyphs, also the bitmap width
    pub width: u16,
    /// Bitmap height
    pub height: u16,
}

impl Font {
    /// Find the glyph for `key`
    pub fn glyph(&self, key: &str) -> Option<&'static Glyph> {
        self.table.iter().find(|glyph| glyph.key == key)
    }

    /// Find the glyph for a single character
    pub fn glyph_for_char(&self, c: char) -> Option<&'static Glyph> {
        let mut buf = [0u8; 4];
        self.glyph(c.encode_utf8(&mut buf))
    }

    /// Horizontal advance after drawing `key`
    pub fn advance(&self, key: &str) -> u16 {
        if key.is_ascii() {
            self.ascii_width
        } else {
            self.width
        }
    }
}

/// Vendor 12 pt font: 你好树莓派 and a, b, c, A
pub static FONT12_CN: Font = Font {
    table: &FONT12_CN_TABLE,
    ascii_width: 11,
    width: GLYPH_WIDTH,
    height: GLYPH_HEIGHT,
};

static FONT12_CN_TABLE: [Glyph; 9] = [
    Glyph {
        key: "你",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1D, 0xC0, 0x1D, 0x80,
            0x3B, 0xFF, 0x3B, 0x07, 0x3F, 0x77, 0x7E, 0x76, 0xF8, 0x70, 0xFB, 0xFE,
            0xFB, 0xFE, 0x3F, 0x77, 0x3F, 0x77, 0x3E, 0x73, 0x38, 0x70, 0x38, 0x70,
            0x3B, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "好",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x00, 0x73, 0xFF,
            0x70, 0x0F, 0xFE, 0x1E, 0x7E, 0x3C, 0x6E, 0x38, 0xEE, 0x30, 0xEF, 0xFF,
            0xFC, 0x30, 0x7C, 0x30, 0x38, 0x30, 0x3E, 0x30, 0x7E, 0x30, 0xE0, 0x30,
            0xC1, 0xF0, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "树",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x0E, 0x30, 0x0E,
            0x3F, 0xEE, 0x30, 0xEE, 0xFC, 0xFF, 0x76, 0xCE, 0x77, 0xFE, 0x7B, 0xFE,
            0xFF, 0xFE, 0xF3, 0xDE, 0xF3, 0xCE, 0x37, 0xEE, 0x3E, 0x6E, 0x3C, 0x0E,
            0x30, 0x3E, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "莓",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x70, 0xFF, 0xFF,
            0x3E, 0x70, 0x38, 0x00, 0x7F, 0xFF, 0xE0, 0x00, 0xFF, 0xFC, 0x3B, 0x8C,
            0x39, 0xCC, 0xFF, 0xFF, 0x73, 0x9C, 0x71, 0xDC, 0x7F, 0xFF, 0x00, 0x1C,
            0x01, 0xF8, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "派",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xE0, 0x1F, 0xFF, 0xF0,
            0x3E, 0x00, 0x0E, 0x1F, 0xCF, 0xFB, 0xFF, 0xF8, 0x3F, 0xFF, 0x0F, 0xFF,
            0x7F, 0xD8, 0x7F, 0xDC, 0x6F, 0xCE, 0xED, 0xFF, 0xFD, 0xF7, 0xF9, 0xC0,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "a",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x3E, 0x00, 0x67, 0x00, 0x07, 0x80, 0x0F, 0x80,
            0x7F, 0x80, 0xE3, 0x80, 0xE7, 0x80, 0xE7, 0x80, 0x7F, 0x80, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "b",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x70, 0x00, 0x70, 0x00,
            0x70, 0x00, 0x70, 0x00, 0x7F, 0x00, 0x7B, 0x80, 0x71, 0xC0, 0x71, 0xC0,
            0x71, 0xC0, 0x71, 0xC0, 0x71, 0xC0, 0x7B, 0x80, 0x7F, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "c",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x3F, 0x00, 0x73, 0x00, 0xF0, 0x00, 0xE0, 0x00,
            0xE0, 0x00, 0xE0, 0x00, 0xF0, 0x00, 0x73, 0x00, 0x3F, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
    },
    Glyph {
        key: "A",
        bitmap: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0E, 0x00,
            0x1F, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x3B, 0x80, 0x3B, 0x80, 0x71, 0x80,
            0x7F, 0xC0, 0x71, 0xC0, 0xE0, 0xE0, 0xE0, 0xE0, 0xE0, 0xE0, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ],
    },
];
