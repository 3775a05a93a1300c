//! Core display operations
//!
//! [`Display`] walks the panel through its power/refresh lifecycle:
//!
//! ```text
//! Uninitialized --init--> Configured --load waveform--> Idle
//! Idle --write_frame--> Idle (RAM updated, not shown yet)
//! Idle --activate--> Idle (panel refreshed)
//! Idle --sleep--> Asleep --init--> ...
//! ```
//!
//! Every call blocks the caller. [`Display::activate`] and [`Display::init`]
//! wait on the BUSY pin, which by default has no timeout.

use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

use crate::command::{
    ANALOG_BLOCK_INIT, BORDER_WAVEFORM, DATA_ENTRY_MODE, DEEP_SLEEP_MODE, DISPLAY_UPDATE_CTRL1,
    DISPLAY_UPDATE_CTRL2, DRIVER_OUTPUT_CONTROL, MASTER_ACTIVATION, SET_RAM_X_COUNTER,
    SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, TEMP_SENSOR_CONTROL, WRITE_RAM,
    WRITE_RAM_RED,
};
use crate::config::{Config, Dimensions, MAX_SOURCE_OUTPUTS};
use crate::error::Error;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Longest row the controller can hold, in bytes
const MAX_ROW_BYTES: usize = (MAX_SOURCE_OUTPUTS as usize).div_ceil(8);

/// Byte-aligned window inside panel RAM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// X coordinate in pixels (multiple of 8)
    pub x: u16,
    /// Y coordinate in pixels
    pub y: u16,
    /// Width in pixels (multiple of 8)
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Region {
    /// Create a new region
    #[allow(clippy::many_single_char_names)]
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Bytes per row of this region
    pub fn row_bytes(&self) -> usize {
        self.w as usize / 8
    }

    /// Calculate the buffer size in bytes for this region
    pub fn buffer_size(&self) -> usize {
        self.row_bytes() * self.h as usize
    }
}

/// Where the driver believes the panel is in its lifecycle
///
/// The panel reports nothing back except BUSY, so this only reflects the
/// commands sent so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    /// No reset issued since power-up or [`Display::new`]
    #[default]
    Uninitialized,
    /// Reset done and registers written, waveform not loaded yet
    Configured,
    /// Ready for RAM writes and refreshes
    Idle,
    /// Deep sleep; only [`Display::init`] wakes the panel
    Asleep,
}

/// Deep sleep mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DeepSleepMode {
    /// Deep sleep mode 1, RAM content is retained
    #[default]
    Mode1 = 0x01,
    /// Deep sleep mode 2, RAM content is lost
    Mode2 = 0x03,
}

/// Which RAM bank a plane goes to
#[derive(Clone, Copy)]
enum Plane {
    Black,
    Red,
}

impl Plane {
    fn write_command(self) -> u8 {
        match self {
            Self::Black => WRITE_RAM,
            Self::Red => WRITE_RAM_RED,
        }
    }
}

/// Core display driver
///
/// Not safe to drive from several threads without external serialization:
/// each call owns the SPI bus and the DC/RST/BUSY lines until it returns.
pub struct Display<I>
where
    I: DisplayInterface,
{
    interface: I,
    config: Config,
    state: PanelState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// Nothing is sent to the panel until [`init`](Self::init).
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: PanelState::Uninitialized,
        }
    }

    /// Reset the panel, write the init registers and load the waveform
    ///
    /// Leaves the panel [`PanelState::Idle`]. Also the only way out of
    /// [`PanelState::Asleep`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRamArea` before touching the bus if the
    /// configured dimensions are zero or larger than the panel.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        debug!(
            "init {}x{} panel",
            self.config.dimensions.width, self.config.dimensions.height
        );
        self.check_dimensions()?;
        self.interface.reset(delay).map_err(Error::Interface)?;
        self.configure()?;
        self.state = PanelState::Configured;

        self.run_update_sequence(self.config.display_update_ctrl2_load, delay)?;
        self.state = PanelState::Idle;
        Ok(())
    }

    fn configure(&mut self) -> DisplayResult<I> {
        for step in ANALOG_BLOCK_INIT {
            self.send_command(step.command)?;
            self.send_data(step.data)?;
        }

        let last_gate = self.config.dimensions.height.saturating_sub(1);
        let last_column_byte = self.config.dimensions.row_bytes().saturating_sub(1) as u8;

        self.send_command(DRIVER_OUTPUT_CONTROL)?;
        self.send_data(&[
            (last_gate & 0xFF) as u8,
            (last_gate >> 8) as u8,
            self.config.gate_scanning,
        ])?;

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[self.config.data_entry_mode])?;

        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&[0x00, last_column_byte])?;

        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&[(last_gate & 0xFF) as u8, (last_gate >> 8) as u8, 0x00, 0x00])?;

        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[self.config.border_waveform])?;

        self.send_command(DISPLAY_UPDATE_CTRL1)?;
        self.send_data(&[self.config.display_update_ctrl1])?;

        self.send_command(TEMP_SENSOR_CONTROL)?;
        self.send_data(&[self.config.temp_sensor_control])?;

        Ok(())
    }

    /// Fill both RAM banks with the clear values and refresh
    ///
    /// With the default config the panel shows a blank white page.
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        debug!("clear");
        self.check_dimensions()?;
        self.warn_if_not_ready();

        let dims = self.config.dimensions;
        self.set_full_window()?;
        self.fill_plane(Plane::Black, self.config.clear_black_value, dims)?;
        self.fill_plane(Plane::Red, self.config.clear_red_value, dims)?;

        self.activate(delay)
    }

    /// Write both planes to panel RAM and refresh
    ///
    /// # Arguments
    ///
    /// * `black_buffer` - Black plane (0=black, 1=white)
    /// * `red_buffer` - Red plane (0=red, 1=no red)
    /// * `delay` - Delay implementation
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` before touching the bus if either plane
    /// is shorter than [`Dimensions::buffer_size`].
    pub fn display_frame<D: DelayNs>(
        &mut self,
        black_buffer: &[u8],
        red_buffer: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.write_frame(black_buffer, red_buffer)?;
        self.activate(delay)
    }

    /// Write both planes to panel RAM without refreshing
    ///
    /// The new frame appears on the next [`activate`](Self::activate).
    pub fn write_frame(&mut self, black_buffer: &[u8], red_buffer: &[u8]) -> DisplayResult<I> {
        self.check_dimensions()?;
        let dims = self.config.dimensions;
        let required = dims.buffer_size();
        Self::check_buffer(black_buffer, required)?;
        Self::check_buffer(red_buffer, required)?;

        debug!("write frame, {required} bytes per plane");
        self.warn_if_not_ready();

        let full = Region::new(0, 0, dims.width, dims.height);
        let row_bytes = dims.row_bytes();
        self.set_full_window()?;
        self.write_plane(Plane::Black, full, row_bytes, black_buffer)?;
        self.write_plane(Plane::Red, full, row_bytes, red_buffer)?;
        Ok(())
    }

    /// Write both planes of a sub-window to panel RAM without refreshing
    ///
    /// Buffers are packed for the region alone: `region.w / 8` bytes per row.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRamArea` if:
    /// - w == 0 or h == 0
    /// - x + w > width or y + h > height
    /// - x or w is not a multiple of 8
    ///
    /// Returns `Error::BufferTooSmall` if a plane is shorter than
    /// [`Region::buffer_size`].
    pub fn write_region(
        &mut self,
        region: Region,
        black_buffer: &[u8],
        red_buffer: &[u8],
    ) -> DisplayResult<I> {
        self.check_region(region)?;
        let required = region.buffer_size();
        Self::check_buffer(black_buffer, required)?;
        Self::check_buffer(red_buffer, required)?;

        debug!("write region {region:?}");
        self.warn_if_not_ready();

        self.set_window(
            region.x,
            region.y,
            region.x + region.w - 1,
            region.y + region.h - 1,
        )?;
        self.write_plane(Plane::Black, region, region.row_bytes(), black_buffer)?;
        self.write_plane(Plane::Red, region, region.row_bytes(), red_buffer)?;
        Ok(())
    }

    /// Show the RAM content on the panel
    ///
    /// Sends the display update sequence and master activation, then blocks
    /// until BUSY goes low.
    pub fn activate<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.run_update_sequence(self.config.display_update_ctrl2_display, delay)
    }

    /// Block until the panel releases BUSY
    ///
    /// Polls every 100 ms. Waits forever unless the interface was given a
    /// timeout.
    pub fn wait_until_idle<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    /// Enter deep sleep, retaining RAM
    pub fn sleep(&mut self) -> DisplayResult<I> {
        self.sleep_with_mode(DeepSleepMode::default())
    }

    /// Enter deep sleep with the given mode
    ///
    /// The panel ignores everything after this until [`init`](Self::init).
    pub fn sleep_with_mode(&mut self, mode: DeepSleepMode) -> DisplayResult<I> {
        debug!("deep sleep {mode:?}");
        self.send_command(DEEP_SLEEP_MODE)?;
        self.send_data(&[mode as u8])?;
        self.state = PanelState::Asleep;
        Ok(())
    }

    /// Current lifecycle state as tracked by the driver
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn run_update_sequence<D: DelayNs>(&mut self, ctrl2: u8, delay: &mut D) -> DisplayResult<I> {
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[ctrl2])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.wait_until_idle(delay)
    }

    /// Full-panel window as the vendor sets it: end coordinates are the
    /// panel size, one past the last pixel.
    fn set_full_window(&mut self) -> DisplayResult<I> {
        let dims = self.config.dimensions;
        self.set_window(0, 0, dims.width, dims.height)
    }

    fn set_window(&mut self, x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> DisplayResult<I> {
        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&[(x_start >> 3) as u8, (x_end >> 3) as u8])?;

        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&[
            (y_start & 0xFF) as u8,
            (y_start >> 8) as u8,
            (y_end & 0xFF) as u8,
            (y_end >> 8) as u8,
        ])?;
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> DisplayResult<I> {
        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&[(x >> 3) as u8])?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&[(y & 0xFF) as u8, (y >> 8) as u8])?;
        Ok(())
    }

    /// Row by row: cursor, write command, one row of bytes
    fn write_plane(
        &mut self,
        plane: Plane,
        region: Region,
        row_bytes: usize,
        buffer: &[u8],
    ) -> DisplayResult<I> {
        trace!("plane {:#04x}: {} rows", plane.write_command(), region.h);
        for (row, y) in buffer
            .chunks_exact(row_bytes)
            .take(region.h as usize)
            .zip(region.y..)
        {
            self.set_cursor(region.x, y)?;
            self.send_command(plane.write_command())?;
            self.send_data(row)?;
        }
        Ok(())
    }

    fn fill_plane(&mut self, plane: Plane, value: u8, dims: Dimensions) -> DisplayResult<I> {
        let row = [value; MAX_ROW_BYTES];
        let row = &row[..dims.row_bytes().min(MAX_ROW_BYTES)];
        trace!("fill plane {:#04x} with {value:#04x}", plane.write_command());
        for y in 0..dims.height {
            self.set_cursor(0, y)?;
            self.send_command(plane.write_command())?;
            self.send_data(row)?;
        }
        Ok(())
    }

    fn check_region(&self, region: Region) -> DisplayResult<I> {
        let Region { x, y, w, h } = region;
        let dims = self.config.dimensions;
        if w == 0 || h == 0 {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        if x.saturating_add(w) > dims.width || y.saturating_add(h) > dims.height {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        if x % 8 != 0 || w % 8 != 0 {
            return Err(Error::InvalidRamArea { x, y, w, h });
        }
        Ok(())
    }

    /// `Config` fields are public, so the panel size may not have gone
    /// through `Dimensions::new`
    fn check_dimensions(&self) -> DisplayResult<I> {
        let Dimensions { width, height } = self.config.dimensions;
        if Dimensions::new(width, height).is_err() {
            return Err(Error::InvalidRamArea {
                x: 0,
                y: 0,
                w: width,
                h: height,
            });
        }
        Ok(())
    }

    fn check_buffer(buffer: &[u8], required: usize) -> DisplayResult<I> {
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }
        Ok(())
    }

    fn warn_if_not_ready(&self) {
        if self.state != PanelState::Idle {
            warn!("writing to panel in state {:?}", self.state);
        }
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }
}
