//! Display configuration types and builder

use crate::command::{CTRL1_INVERSE_RED, CTRL2_DISPLAY, CTRL2_LOAD_TEMP_AND_WAVEFORM};
pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Native width of the ER-EPD042A1-1R in pixels
pub const WIDTH: u16 = 400;
/// Native height of the ER-EPD042A1-1R in pixels
pub const HEIGHT: u16 = 300;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (source outputs)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
}

impl Dimensions {
    /// Full ER-EPD042A1-1R panel, 400x300
    pub const PANEL: Self = Self {
        width: WIDTH,
        height: HEIGHT,
    };

    /// Create new dimensions with validation
    ///
    /// Width does not have to be a multiple of 8; rows are padded up to the
    /// next byte.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero or
    /// exceeds [`MAX_SOURCE_OUTPUTS`] / [`MAX_GATE_OUTPUTS`].
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_SOURCE_OUTPUTS || height == 0 || height > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Bytes per row, `ceil(width / 8)`
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Required size of one plane in bytes
    pub fn buffer_size(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::PANEL
    }
}

/// Display configuration
///
/// Register values used by the init sequence and refresh.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Third byte of driver output control (gate scanning direction)
    pub gate_scanning: u8,
    /// Data entry mode byte
    pub data_entry_mode: u8,
    /// Border waveform setting
    pub border_waveform: u8,
    /// Display Update Control 1 value
    pub display_update_ctrl1: u8,
    /// Temperature sensor control
    pub temp_sensor_control: u8,
    /// Display Update Control 2 value used when loading temperature and waveform at init
    pub display_update_ctrl2_load: u8,
    /// Display Update Control 2 value used to show RAM content
    pub display_update_ctrl2_display: u8,
    /// Fill value used to clear the black RAM
    pub clear_black_value: u8,
    /// Fill value used to clear the red RAM
    pub clear_red_value: u8,
}

impl Default for Config {
    fn default() -> Self {
        Builder::new().finish(Dimensions::PANEL)
    }
}

/// Builder for constructing display configuration
///
/// Starts from the panel vendor's register values.
///
/// # Example
///
/// ```rust,no_run
/// use er_epd042a1::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(400, 300) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).border_waveform(0x05).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    dimensions: Option<Dimensions>,
    gate_scanning: u8,
    data_entry_mode: u8,
    border_waveform: u8,
    display_update_ctrl1: u8,
    temp_sensor_control: u8,
    display_update_ctrl2_load: u8,
    display_update_ctrl2_display: u8,
    clear_black_value: u8,
    clear_red_value: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            gate_scanning: 0x00,
            // X increment, Y increment, counter moves along X
            data_entry_mode: 0x03,
            // HIZ border
            border_waveform: 0x01,
            display_update_ctrl1: CTRL1_INVERSE_RED,
            // Internal temperature sensor
            temp_sensor_control: 0x80,
            display_update_ctrl2_load: CTRL2_LOAD_TEMP_AND_WAVEFORM,
            display_update_ctrl2_display: CTRL2_DISPLAY,
            // White, no red (red RAM is inverted)
            clear_black_value: 0xFF,
            clear_red_value: 0xFF,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set gate scanning direction
    pub fn gate_scanning(mut self, value: u8) -> Self {
        self.gate_scanning = value;
        self
    }

    /// Set data entry mode
    pub fn data_entry_mode(mut self, value: u8) -> Self {
        self.data_entry_mode = value;
        self
    }

    /// Set border waveform
    pub fn border_waveform(mut self, value: u8) -> Self {
        self.border_waveform = value;
        self
    }

    /// Set Display Update Control 1 value
    pub fn display_update_ctrl1(mut self, value: u8) -> Self {
        self.display_update_ctrl1 = value;
        self
    }

    /// Set temperature sensor control
    pub fn temp_sensor_control(mut self, value: u8) -> Self {
        self.temp_sensor_control = value;
        self
    }

    /// Set Display Update Control 2 value used at init to load temperature and waveform
    pub fn display_update_ctrl2_load(mut self, value: u8) -> Self {
        self.display_update_ctrl2_load = value;
        self
    }

    /// Set Display Update Control 2 value used to show RAM content
    pub fn display_update_ctrl2_display(mut self, value: u8) -> Self {
        self.display_update_ctrl2_display = value;
        self
    }

    /// Set the fill value used to clear the black RAM
    pub fn clear_black_value(mut self, value: u8) -> Self {
        self.clear_black_value = value;
        self
    }

    /// Set the fill value used to clear the red RAM
    pub fn clear_red_value(mut self, value: u8) -> Self {
        self.clear_red_value = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        Ok(self.finish(dimensions))
    }

    fn finish(self, dimensions: Dimensions) -> Config {
        Config {
            dimensions,
            gate_scanning: self.gate_scanning,
            data_entry_mode: self.data_entry_mode,
            border_waveform: self.border_waveform,
            display_update_ctrl1: self.display_update_ctrl1,
            temp_sensor_control: self.temp_sensor_control,
            display_update_ctrl2_load: self.display_update_ctrl2_load,
            display_update_ctrl2_display: self.display_update_ctrl2_display,
            clear_black_value: self.clear_black_value,
            clear_red_value: self.clear_red_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_row_bytes_and_buffer_size() {
        let dims = Dimensions::PANEL;
        assert_eq!(dims.row_bytes(), 50);
        assert_eq!(dims.buffer_size(), 15_000);
    }

    #[test]
    fn test_row_bytes_rounds_up() {
        let dims = Dimensions::new(20, 3).unwrap();
        assert_eq!(dims.row_bytes(), 3);
        assert_eq!(dims.buffer_size(), 9);
    }

    #[test]
    fn test_dimensions_rejects_zero_and_oversize() {
        assert!(Dimensions::new(0, 10).is_err());
        assert!(Dimensions::new(10, 0).is_err());
        assert_eq!(
            Dimensions::new(401, 300),
            Err(BuilderError::InvalidDimensions {
                width: 401,
                height: 300
            })
        );
        assert!(Dimensions::new(400, 301).is_err());
    }

    #[test]
    fn test_builder_requires_dimensions() {
        assert_eq!(
            Builder::new().build(),
            Err(BuilderError::MissingDimensions)
        );
    }

    #[test]
    fn test_builder_defaults_match_vendor_values() {
        let config = Builder::new()
            .dimensions(Dimensions::PANEL)
            .build()
            .unwrap();
        assert_eq!(config.data_entry_mode, 0x03);
        assert_eq!(config.border_waveform, 0x01);
        assert_eq!(config.display_update_ctrl1, 0x80);
        assert_eq!(config.temp_sensor_control, 0x80);
        assert_eq!(config.display_update_ctrl2_load, 0xB1);
        assert_eq!(config.display_update_ctrl2_display, 0xC7);
        assert_eq!(config.clear_black_value, 0xFF);
        assert_eq!(config.clear_red_value, 0xFF);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = Builder::new()
            .dimensions(Dimensions::new(200, 100).unwrap())
            .border_waveform(0x05)
            .clear_red_value(0x00)
            .build()
            .unwrap();
        assert_eq!(config.dimensions.width, 200);
        assert_eq!(config.border_waveform, 0x05);
        assert_eq!(config.clear_red_value, 0x00);
    }
}
