//! ER-EPD042A1-1R E-Paper Display Driver
//!
//! A driver for the EastRising 4.2" black/white/red e-paper panel
//! (400x300) over SPI.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Full frame and windowed RAM writes
//! - Vendor bitmap font for simple text
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use er_epd042a1::{Config, Display, Interface};
//!
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
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let mut display = Display::new(interface, Config::default());
//!
//! let black = [0xFFu8; 15_000];
//! let mut red = [0xFFu8; 15_000];
//! red[..50].fill(0x00); // top row red
//!
//! let _ = display.init(&mut delay);
//! let _ = display.clear(&mut delay);
//! let _ = display.display_frame(&black, &red, &mut delay);
//! let _ = display.sleep();
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Color types for the black/red panel
pub mod color;
/// Controller command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Vendor bitmap font
pub mod font;
/// Frame buffer with drawing helpers
pub mod graphics;
/// Hardware interface abstraction
pub mod interface;

pub use color::Color;
pub use config::{
    Builder, Config, Dimensions, HEIGHT, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS, WIDTH,
};
pub use display::{DeepSleepMode, Display, PanelState, Region};
pub use error::{BuilderError, Error};
pub use font::{FONT12_CN, Font, Glyph};
pub use graphics::GraphicDisplay;
pub use interface::InterfaceError;
pub use interface::{BUSY_POLL_INTERVAL_MS, DisplayInterface, Interface, RESET_DELAY_MS};
