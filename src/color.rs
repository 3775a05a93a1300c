//! Color types for the black/red panel
//!
//! Each pixel has one bit in the black plane and one bit in the red plane.
//! The panel is initialized with red RAM inverted, so a cleared red bit
//! means red.
//!
//! | Color | Black plane | Red plane |
//! |-------|-------------|-----------|
//! | Black | 0           | 1         |
//! | White | 1           | 1         |
//! | Red   | 1           | 0         |
//!
//! ## Example
//!
//! ```
//! use er_epd042a1::Color;
//!
//! assert_eq!(Color::White.black_byte(), 0xFF);
//! assert_eq!(Color::White.red_byte(), 0xFF);
//! assert_eq!(Color::Red.red_byte(), 0x00);
//! ```

/// Colors the panel can show
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels
    #[default]
    White,
    /// Red pixels
    Red,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}

impl Color {
    /// Byte that paints 8 pixels of this color in the black plane
    pub fn black_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White | Self::Red => 0xFF,
        }
    }

    /// Byte that paints 8 pixels of this color in the red plane
    pub fn red_byte(self) -> u8 {
        match self {
            Self::Black | Self::White => 0xFF,
            Self::Red => 0x00,
        }
    }
}
