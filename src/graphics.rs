//! Frame buffer support
//!
//! [`GraphicDisplay`] wraps [`Display`] together with caller-owned black and
//! red planes. It can set single pixels and blit glyphs from the
//! [`font`](crate::font) table; with the `graphics` feature it also
//! implements [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget)
//! so embedded-graphics primitives can draw into it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use er_epd042a1::{font::FONT12_CN, Color, GraphicDisplay};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # use er_epd042a1::{Config, Display, Interface};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let display = Display::new(interface, Config::default());
//! let mut black = [0u8; 15_000];
//! let mut red = [0u8; 15_000];
//! let mut display = match GraphicDisplay::try_new(display, &mut black[..], &mut red[..]) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//!
//! display.clear(Color::White);
//! display.draw_text(10, 10, &FONT12_CN, "你好 abc", Color::Black);
//! display.draw_text(10, 40, &FONT12_CN, "A", Color::Red);
//!
//! let _ = display.update(&mut delay);
//! ```

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::display::Display;
use crate::error::Error;
use crate::font::{Font, Glyph};
use crate::interface::DisplayInterface;

/// Display with caller-owned pixel planes
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B1` - Buffer type implementing `AsMut<[u8]>` for the black plane
/// * `B2` - Buffer type implementing `AsMut<[u8]>` for the red plane
pub struct GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    display: Display<I>,
    black_buffer: B1,
    red_buffer: B2,
}

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

impl<I, B1, B2> GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// # Panics
    ///
    /// Panics if either buffer is smaller than `dimensions.buffer_size()`.
    /// Use [`try_new`](Self::try_new) for the fallible version.
    pub fn new(display: Display<I>, mut black_buffer: B1, mut red_buffer: B2) -> Self {
        let required = display.dimensions().buffer_size();
        assert!(
            black_buffer.as_mut().len() >= required,
            "black_buffer too small: required {} bytes, got {}",
            required,
            black_buffer.as_mut().len()
        );
        assert!(
            red_buffer.as_mut().len() >= required,
            "red_buffer too small: required {} bytes, got {}",
            required,
            red_buffer.as_mut().len()
        );
        Self {
            display,
            black_buffer,
            red_buffer,
        }
    }

    /// Try to create a new GraphicDisplay, returning an error if buffers are too small
    pub fn try_new(
        display: Display<I>,
        mut black_buffer: B1,
        mut red_buffer: B2,
    ) -> GraphicsNewResult<I, Self> {
        let required = display.dimensions().buffer_size();
        if black_buffer.as_mut().len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: black_buffer.as_mut().len(),
            });
        }
        if red_buffer.as_mut().len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: red_buffer.as_mut().len(),
            });
        }
        Ok(Self {
            display,
            black_buffer,
            red_buffer,
        })
    }

    /// Fill both planes with a color
    pub fn clear(&mut self, color: Color) {
        self.black_buffer.as_mut().fill(color.black_byte());
        self.red_buffer.as_mut().fill(color.red_byte());
    }

    /// Send both planes to the panel and refresh
    pub fn update<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.display
            .display_frame(self.black_buffer.as_mut(), self.red_buffer.as_mut(), delay)
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// For init, sleep and other operations that do not touch the planes.
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Black and red planes, in that order
    pub fn planes(&mut self) -> (&[u8], &[u8]) {
        (self.black_buffer.as_mut(), self.red_buffer.as_mut())
    }

    /// Give back the display and both planes
    pub fn release(self) -> (Display<I>, B1, B2) {
        (self.display, self.black_buffer, self.red_buffer)
    }

    /// Set a single pixel to a color
    ///
    /// Pixels outside the panel are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let dims = self.display.dimensions();
        if x >= u32::from(dims.width) || y >= u32::from(dims.height) {
            return;
        }

        let index = y as usize * dims.row_bytes() + x as usize / 8;
        let bit = 0x80 >> (x % 8);

        let (Some(black), Some(red)) = (
            self.black_buffer.as_mut().get_mut(index),
            self.red_buffer.as_mut().get_mut(index),
        ) else {
            return;
        };

        match color {
            Color::Black => {
                *black &= !bit;
                *red |= bit;
            }
            Color::White => {
                *black |= bit;
                *red |= bit;
            }
            Color::Red => {
                *black |= bit;
                *red &= !bit;
            }
        }
    }

    /// Draw the ink pixels of a glyph with its top-left corner at (x, y)
    ///
    /// Blank glyph pixels leave the planes untouched.
    pub fn draw_glyph(&mut self, x: u32, y: u32, glyph: &Glyph, color: Color) {
        for gy in 0..crate::font::GLYPH_HEIGHT {
            for gx in 0..crate::font::GLYPH_WIDTH {
                if !glyph.pixel(gx, gy) {
                    continue;
                }
                if let (Some(px), Some(py)) =
                    (x.checked_add(u32::from(gx)), y.checked_add(u32::from(gy)))
                {
                    self.set_pixel(px, py, color);
                }
            }
        }
    }

    /// Draw a string on one line, returning the x coordinate after the last character
    ///
    /// Characters missing from the font are skipped but still advance the
    /// cursor. The returned x saturates at `u32::MAX`.
    pub fn draw_text(&mut self, x: u32, y: u32, font: &Font, text: &str, color: Color) -> u32 {
        let mut cursor = x;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let key: &str = c.encode_utf8(&mut buf);
            if let Some(glyph) = font.glyph(key) {
                self.draw_glyph(cursor, y, glyph, color);
            }
            cursor = cursor.saturating_add(u32::from(font.advance(key)));
        }
        cursor
    }
}

#[cfg(feature = "graphics")]
impl<I, B1, B2> embedded_graphics_core::draw_target::DrawTarget for GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = embedded_graphics_core::Pixel<Self::Color>>,
    {
        for embedded_graphics_core::Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            self.set_pixel(x, y, color);
        }
        Ok(())
    }
}

#[cfg(feature = "graphics")]
impl<I, B1, B2> embedded_graphics_core::geometry::OriginDimensions for GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    fn size(&self) -> embedded_graphics_core::geometry::Size {
        let dims = self.display.dimensions();
        embedded_graphics_core::geometry::Size::new(u32::from(dims.width), u32::from(dims.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{WRITE_RAM, WRITE_RAM_RED};
    use crate::config::{Builder, Config, Dimensions};
    use crate::font::FONT12_CN;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct MockInterface {
        last_command: Option<u8>,
        black_rows: Vec<Vec<u8>>,
        red_rows: Vec<Vec<u8>>,
    }

    impl DisplayInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            self.last_command = Some(command);
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            match self.last_command {
                Some(WRITE_RAM) => self.black_rows.push(data.to_vec()),
                Some(WRITE_RAM_RED) => self.red_rows.push(data.to_vec()),
                _ => {}
            }
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn test_display(width: u16, height: u16) -> Display<MockInterface> {
        let config = Builder::new()
            .dimensions(Dimensions::new(width, height).unwrap())
            .build()
            .unwrap();
        Display::new(MockInterface::default(), config)
    }

    fn white_display(
        width: u16,
        height: u16,
    ) -> GraphicDisplay<MockInterface, Vec<u8>, Vec<u8>> {
        let display = test_display(width, height);
        let size = display.dimensions().buffer_size();
        let mut gd = GraphicDisplay::new(display, vec![0u8; size], vec![0u8; size]);
        gd.clear(Color::White);
        gd
    }

    #[test]
    fn test_try_new_small_black_buffer_returns_error() {
        let display = Display::new(MockInterface::default(), Config::default());
        let result = GraphicDisplay::try_new(display, vec![0u8; 14_999], vec![0u8; 15_000]);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 15_000,
                provided: 14_999
            })
        ));
    }

    #[test]
    fn test_try_new_small_red_buffer_returns_error() {
        let display = Display::new(MockInterface::default(), Config::default());
        let result = GraphicDisplay::try_new(display, vec![0u8; 15_000], vec![0u8; 10]);
        assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
    }

    #[test]
    fn test_try_new_valid_buffers_succeeds() {
        let display = Display::new(MockInterface::default(), Config::default());
        let result = GraphicDisplay::try_new(display, vec![0u8; 15_000], vec![0u8; 15_000]);
        assert!(result.is_ok());
    }

    #[test]
    #[should_panic(expected = "black_buffer too small")]
    fn test_new_panics_on_small_black_buffer() {
        let display = test_display(16, 2);
        let _ = GraphicDisplay::new(display, vec![0u8; 3], vec![0u8; 4]);
    }

    #[test]
    fn test_clear_fills_planes() {
        let mut gd = white_display(16, 2);
        gd.clear(Color::Red);
        let (black, red) = gd.planes();
        assert_eq!(black, &[0xFF; 4]);
        assert_eq!(red, &[0x00; 4]);
    }

    #[test]
    fn test_set_pixel_colors() {
        let mut gd = white_display(16, 2);
        gd.set_pixel(0, 0, Color::Black);
        gd.set_pixel(9, 0, Color::Red);
        gd.set_pixel(15, 1, Color::Black);

        let (black, red) = gd.planes();
        assert_eq!(black, &[0x7F, 0xFF, 0xFF, 0xFE]);
        assert_eq!(red, &[0xFF, 0xBF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_set_pixel_back_to_white() {
        let mut gd = white_display(8, 1);
        gd.set_pixel(3, 0, Color::Red);
        gd.set_pixel(3, 0, Color::White);
        let (black, red) = gd.planes();
        assert_eq!((black, red), (&[0xFF][..], &[0xFF][..]));
    }

    #[test]
    fn test_set_pixel_uses_padded_rows() {
        // 12 pixels wide -> 2 bytes per row
        let mut gd = white_display(12, 2);
        gd.set_pixel(0, 1, Color::Black);
        gd.set_pixel(12, 0, Color::Black); // outside the panel
        let (black, _) = gd.planes();
        assert_eq!(black, &[0xFF, 0xFF, 0x7F, 0xFF]);
    }

    #[test]
    fn test_draw_glyph() {
        let mut gd = white_display(24, 24);
        let glyph = FONT12_CN.glyph("A").unwrap();
        gd.draw_glyph(8, 0, glyph, Color::Black);

        // Glyph row 5 is 0x0E 0x00, shifted one byte right
        let (black, red) = gd.planes();
        assert_eq!(&black[15..18], &[0xFF, 0xF1, 0xFF]);
        assert!(red.iter().all(|byte| *byte == 0xFF));
        assert_eq!(&black[0..3], &[0xFF; 3]);
    }

    #[test]
    fn test_draw_text_advances() {
        let mut gd = white_display(64, 24);
        let end = gd.draw_text(0, 0, &FONT12_CN, "a你?", Color::Black);
        assert_eq!(end, 11 + 16 + 11);
    }

    #[test]
    fn test_draw_text_places_second_glyph_at_ascii_advance() {
        let mut gd = white_display(32, 24);
        gd.draw_text(0, 0, &FONT12_CN, " A", Color::Black);

        // "A" row 5 has ink at glyph x 4..=6, so panel x 15..=17
        let (black, _) = gd.planes();
        let row = &black[5 * 4..6 * 4];
        assert_eq!(row, &[0xFF, 0xFE, 0x3F, 0xFF]);
    }

    #[test]
    fn test_draw_text_near_coordinate_limit() {
        let mut gd = white_display(16, 24);
        let end = gd.draw_text(u32::MAX - 5, 0, &FONT12_CN, "AA", Color::Black);
        assert_eq!(end, u32::MAX);

        gd.draw_glyph(0, u32::MAX - 5, FONT12_CN.glyph("A").unwrap(), Color::Red);

        let (black, red) = gd.planes();
        assert!(black.iter().all(|byte| *byte == 0xFF));
        assert!(red.iter().all(|byte| *byte == 0xFF));
    }

    #[test]
    fn test_update_sends_planes() {
        let mut gd = white_display(16, 2);
        gd.set_pixel(0, 0, Color::Black);
        gd.set_pixel(8, 1, Color::Red);
        gd.update(&mut MockDelay).unwrap();

        let (display, _, _) = gd.release();
        let interface = display.release();
        assert_eq!(
            interface.black_rows,
            vec![vec![0x7F, 0xFF], vec![0xFF, 0xFF]]
        );
        assert_eq!(interface.red_rows, vec![vec![0xFF, 0xFF], vec![0xFF, 0x7F]]);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_draw_target_rectangle() {
        use embedded_graphics::prelude::*;
        use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

        let mut gd = white_display(16, 2);
        assert_eq!(gd.size(), Size::new(16, 2));

        Rectangle::new(Point::new(-4, 0), Size::new(12, 1))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut gd)
            .unwrap();

        let (black, _) = gd.planes();
        assert_eq!(black, &[0x00, 0xFF, 0xFF, 0xFF]);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn test_draw_target_skips_negative_y() {
        use embedded_graphics::prelude::*;
        use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

        let mut gd = white_display(16, 2);

        Rectangle::new(Point::new(8, -1), Size::new(8, 2))
            .into_styled(PrimitiveStyle::with_fill(Color::Red))
            .draw(&mut gd)
            .unwrap();

        let (black, red) = gd.planes();
        assert!(black.iter().all(|byte| *byte == 0xFF));
        assert_eq!(red, &[0xFF, 0x00, 0xFF, 0xFF]);
    }
}
