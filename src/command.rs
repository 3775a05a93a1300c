//! Panel command definitions
//!
//! Command bytes for the ER-EPD042A1-1R controller. Commands are sent over
//! SPI with the DC pin low; their parameters follow with DC high.
//!
//! ## Command Structure
//!
//! 1. Assert CS (handled by the [`SpiDevice`](embedded_hal::spi::SpiDevice))
//! 2. Set DC low (command mode)
//! 3. Send command byte
//! 4. Set DC high (data mode)
//! 5. Send data bytes (if any)
//! 6. Deassert CS
//!
//! ## Example
//!
//! ```rust,no_run
//! use er_epd042a1::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let row = [0xFFu8; 50];
//! // Point the RAM cursor at row 0 and write one row of the black plane
//! let _ = interface.send_command(command::SET_RAM_X_COUNTER);
//! let _ = interface.send_data(&[0x00]);
//! let _ = interface.send_command(command::SET_RAM_Y_COUNTER);
//! let _ = interface.send_data(&[0x00, 0x00]);
//! let _ = interface.send_command(command::WRITE_RAM);
//! let _ = interface.send_data(&row);
//! ```

/// A single register write: one command byte and its parameter bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitStep {
    /// Command byte
    pub command: u8,
    /// Parameter bytes sent in data mode after the command
    pub data: &'static [u8],
}

impl InitStep {
    /// Create a new step
    pub const fn new(command: u8, data: &'static [u8]) -> Self {
        Self { command, data }
    }
}

// Analog block setup

/// Analog block control (0x74)
pub const ANALOG_BLOCK_CONTROL: u8 = 0x74;

/// Digital block control (0x7E)
pub const DIGITAL_BLOCK_CONTROL: u8 = 0x7E;

/// ACVCOM setting (0x2B)
///
/// Reduces glitches under ACVCOM. Requires 2 bytes.
pub const ACVCOM_SETTING: u8 = 0x2B;

/// Booster soft-start control (0x0C)
///
/// Requires 4 bytes.
pub const BOOSTER_SOFT_START: u8 = 0x0C;

/// Fixed analog setup issued right after the hardware reset
///
/// Values come from the panel vendor and are not derived from the panel
/// geometry.
pub const ANALOG_BLOCK_INIT: [InitStep; 4] = [
    InitStep::new(ANALOG_BLOCK_CONTROL, &[0x54]),
    InitStep::new(DIGITAL_BLOCK_CONTROL, &[0x3B]),
    InitStep::new(ACVCOM_SETTING, &[0x04, 0x63]),
    InitStep::new(BOOSTER_SOFT_START, &[0x8E, 0x8C, 0x85, 0x3F]),
];

// Panel setup

/// Driver output control (0x01)
///
/// Sets the number of gate outputs (MUX) and scanning direction.
/// Requires 3 bytes: [height-1 (LSB), height-1 (MSB), scanning mode]
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Data entry mode setting (0x11)
///
/// Requires 1 byte:
/// - Bit 0: X direction (0=decrement, 1=increment)
/// - Bit 1: Y direction (0=decrement, 1=increment)
/// - Bit 2: Address counter direction (0=X, 1=Y)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Border waveform control (0x3C)
pub const BORDER_WAVEFORM: u8 = 0x3C;

/// Temperature sensor control (0x18)
///
/// Requires 1 byte: 0x80 = internal sensor
pub const TEMP_SENSOR_CONTROL: u8 = 0x18;

// RAM addressing

/// Set RAM X address start/end (0x44)
///
/// Requires 2 bytes in byte units: [start, end]
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address start/end (0x45)
///
/// Requires 4 bytes: [start_LSB, start_MSB, end_LSB, end_MSB]
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter (0x4E)
///
/// Requires 1 byte in byte units.
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter (0x4F)
///
/// Requires 2 bytes: [row_LSB, row_MSB]
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

/// Write black/white RAM (0x24)
///
/// Bit=0: black, Bit=1: white
pub const WRITE_RAM: u8 = 0x24;

/// Write red RAM (0x26)
///
/// With [`CTRL1_INVERSE_RED`] set, Bit=0: red, Bit=1: no red
pub const WRITE_RAM_RED: u8 = 0x26;

// Display update

/// Display update control 1 (0x21)
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;

/// Invert red RAM content when refreshing
pub const CTRL1_INVERSE_RED: u8 = 0x80;

/// Display update control 2 (0x22)
///
/// Selects the sequence run by [`MASTER_ACTIVATION`].
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Update sequence: clock on, analog on, display with mode 1, analog off, clock off
pub const CTRL2_DISPLAY: u8 = 0xC7;

/// Update sequence: load temperature and waveform setting
pub const CTRL2_LOAD_TEMP_AND_WAVEFORM: u8 = 0xB1;

/// Master activation (0x20)
///
/// Runs the sequence selected by [`DISPLAY_UPDATE_CTRL2`]. BUSY stays high
/// until it completes.
pub const MASTER_ACTIVATION: u8 = 0x20;

// Power management

/// Deep sleep mode (0x10)
///
/// Requires 1 byte. Only a hardware reset wakes the controller.
pub const DEEP_SLEEP_MODE: u8 = 0x10;
