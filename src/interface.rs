//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the panel controller over SPI.
//!
//! ## Hardware Requirements
//!
//! - SPI bus (MOSI + SCK), 8-bit words. Chip-select is driven by the
//!   [`SpiDevice`] implementation (for example `embedded-hal-bus`'s
//!   `ExclusiveDevice` wrapping the CS pin).
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, high while the panel is working)
//!
//! None of these may be shared with another driver while a call is in
//! progress. The driver holds no lock; callers that share it between
//! threads must serialize access themselves.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use er_epd042a1::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//!
//! // Give up after 30 seconds instead of waiting forever
//! interface.set_busy_timeout(Some(30_000));
//!
//! let _ = interface.send_command(0x10); // Deep sleep
//! let _ = interface.send_data(&[0x01]);
//!
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::{debug, warn};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Delay after each edge of the reset sequence, in milliseconds
pub const RESET_DELAY_MS: u32 = 200;

/// Interval between two reads of the BUSY pin, in milliseconds
pub const BUSY_POLL_INTERVAL_MS: u32 = 100;

/// Trait for hardware interface to the panel controller
///
/// Lets [`Display`](crate::display::Display) work with any SPI + GPIO
/// implementation. Use [`Interface`] unless you need custom pin handling.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte (DC low)
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes (DC high)
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Perform the hardware reset sequence
    ///
    /// RST high, wait, RST low, wait, RST high, wait.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Block until the BUSY pin reads low
    ///
    /// # Errors
    ///
    /// Only fails on a pin error, or with [`InterfaceError::Timeout`] when the
    /// implementation was given a timeout.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation over embedded-hal v1.0
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active high)
    busy: BUSY,
    /// `None` waits forever
    busy_timeout_ms: Option<u32>,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// The busy wait has no timeout until [`set_busy_timeout`](Self::set_busy_timeout)
    /// is called.
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            busy_timeout_ms: None,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// `None` (the default) blocks until the panel releases BUSY, however
    /// long that takes.
    pub fn set_busy_timeout(&mut self, timeout_ms: Option<u32>) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> Option<u32> {
        self.busy_timeout_ms
    }

    /// Give back the SPI device and pins
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        debug!("hardware reset");
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        debug!("e-paper busy");
        let mut waited_ms = 0u32;

        while self.busy.is_high().map_err(InterfaceError::Pin)? {
            if let Some(timeout_ms) = self.busy_timeout_ms {
                if waited_ms >= timeout_ms {
                    warn!("busy pin still high after {waited_ms} ms");
                    return Err(InterfaceError::Timeout);
                }
            }
            delay.delay_ms(BUSY_POLL_INTERVAL_MS);
            waited_ms = waited_ms.saturating_add(BUSY_POLL_INTERVAL_MS);
        }

        debug!("e-paper busy release after {waited_ms} ms");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    /// Records every millisecond delay requested
    #[derive(Default)]
    struct RecordingDelay {
        delays_ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.delays_ms.push(ms);
        }
    }

    fn done(interface: Interface<SpiMock<u8>, PinMock, PinMock, PinMock>) {
        let (mut spi, mut dc, mut rst, mut busy) = interface.release();
        spi.done();
        dc.done();
        rst.done();
        busy.done();
    }

    #[test]
    fn test_default_busy_timeout_is_none() {
        let interface = Interface::new(
            SpiMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
        );
        assert_eq!(interface.busy_timeout(), None);
        done(interface);
    }

    #[test]
    fn test_set_busy_timeout() {
        let mut interface = Interface::new(
            SpiMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
        );
        interface.set_busy_timeout(Some(5_000));
        assert_eq!(interface.busy_timeout(), Some(5_000));
        interface.set_busy_timeout(None);
        assert_eq!(interface.busy_timeout(), None);
        done(interface);
    }

    #[test]
    fn test_reset_sequence_high_low_high() {
        let rst = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut interface =
            Interface::new(SpiMock::new(&[]), PinMock::new(&[]), rst, PinMock::new(&[]));
        let mut delay = RecordingDelay::default();

        interface.reset(&mut delay).unwrap();

        assert_eq!(delay.delays_ms, vec![200, 200, 200]);
        done(interface);
    }

    #[test]
    fn test_command_and_data_framing() {
        let spi = SpiMock::new(&[
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x10]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x01]),
            SpiTransaction::transaction_end(),
        ]);
        let dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut interface = Interface::new(spi, dc, PinMock::new(&[]), PinMock::new(&[]));

        interface.send_command(0x10).unwrap();
        interface.send_data(&[0x01]).unwrap();

        done(interface);
    }

    #[test]
    fn test_busy_wait_polls_every_100ms_until_low() {
        let busy = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ]);
        let mut interface =
            Interface::new(SpiMock::new(&[]), PinMock::new(&[]), PinMock::new(&[]), busy);
        let mut delay = RecordingDelay::default();

        interface.busy_wait(&mut delay).unwrap();

        assert_eq!(delay.delays_ms, vec![100, 100, 100]);
        done(interface);
    }

    #[test]
    fn test_busy_wait_returns_immediately_when_idle() {
        let busy = PinMock::new(&[PinTransaction::get(PinState::Low)]);
        let mut interface =
            Interface::new(SpiMock::new(&[]), PinMock::new(&[]), PinMock::new(&[]), busy);
        let mut delay = RecordingDelay::default();

        interface.busy_wait(&mut delay).unwrap();

        assert!(delay.delays_ms.is_empty());
        done(interface);
    }

    #[test]
    fn test_busy_wait_timeout() {
        let busy = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::High),
        ]);
        let mut interface =
            Interface::new(SpiMock::new(&[]), PinMock::new(&[]), PinMock::new(&[]), busy);
        interface.set_busy_timeout(Some(250));
        let mut delay = RecordingDelay::default();

        let result = interface.busy_wait(&mut delay);

        assert!(matches!(result, Err(InterfaceError::Timeout)));
        assert_eq!(delay.delays_ms, vec![100, 100, 100]);
        done(interface);
    }
}
