//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};
use crate::command::{MADCTL_PRIMARY, MADCTL_ROTATED};
use crate::rotation::{Window, map_window};

/// Physical panel dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Width in pixels (runs along controller columns)
    pub width: u16,
    /// Height in pixels (runs along controller rows)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width == 0 or width > MAX_COLUMNS
    /// - height == 0 or height > MAX_ROWS
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_COLUMNS || height == 0 || height > MAX_ROWS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Default for Dimensions {
    /// The 1.47" 320x172 IPS module
    fn default() -> Self {
        Self {
            width: 320,
            height: 172,
        }
    }
}

/// Logical orientation of the drawing surface
///
/// Governs the MADCTL payload, which offset pair is active, and whether
/// logical X/Y are exchanged when addressing the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Portrait surface (MADCTL 0x20), logical axes exchanged
    Primary,
    /// Landscape surface matching the physical panel (MADCTL 0xA0)
    #[default]
    Rotated,
}

impl Orientation {
    /// Memory access control payload for this orientation
    pub fn madctl(self) -> u8 {
        match self {
            Self::Primary => MADCTL_PRIMARY,
            Self::Rotated => MADCTL_ROTATED,
        }
    }

    /// Whether logical X feeds the row register
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Primary)
    }

    /// The other orientation
    pub fn toggled(self) -> Self {
        match self {
            Self::Primary => Self::Rotated,
            Self::Rotated => Self::Primary,
        }
    }
}

/// Pixel offsets added to logical coordinates before they reach the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offsets {
    /// Added to logical X
    pub x: u16,
    /// Added to logical Y
    pub y: u16,
}

impl Offsets {
    /// Create a new offset pair
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Display configuration
///
/// This struct holds all configurable parameters for the ST7789 panel.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Physical panel dimensions
    pub dimensions: Dimensions,
    /// Orientation applied at bring-up
    pub orientation: Orientation,
    /// Offsets active in [`Orientation::Primary`]
    pub primary_offsets: Offsets,
    /// Offsets active in [`Orientation::Rotated`]
    pub rotated_offsets: Offsets,
    /// Settle time around each reset edge
    pub reset_delay_ms: u32,
    /// Wait after each sleep-out command
    pub sleep_out_delay_ms: u32,
    /// Whether display inversion is enabled at bring-up
    pub inversion: bool,
    /// Brightness applied at bring-up when none is given
    pub default_brightness: u8,
}

impl Config {
    /// Offset pair for an orientation
    pub fn offsets(&self, orientation: Orientation) -> Offsets {
        match orientation {
            Orientation::Primary => self.primary_offsets,
            Orientation::Rotated => self.rotated_offsets,
        }
    }

    /// Logical (width, height) of the drawing surface in an orientation
    pub fn logical_size(&self, orientation: Orientation) -> (u16, u16) {
        let Dimensions { width, height } = self.dimensions;
        if orientation.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Builder::default().config()
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use st7789_panel::{Builder, Dimensions, Orientation};
///
/// let dims = match Dimensions::new(320, 172) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .orientation(Orientation::Rotated)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    dimensions: Dimensions,
    orientation: Orientation,
    primary_offsets: Offsets,
    rotated_offsets: Offsets,
    reset_delay_ms: u32,
    sleep_out_delay_ms: u32,
    inversion: bool,
    default_brightness: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            orientation: Orientation::Rotated,
            // 172 rows centred in 240 rows of controller memory
            primary_offsets: Offsets::new(34, 0),
            rotated_offsets: Offsets::new(0, 34),
            reset_delay_ms: 50,
            // Datasheet minimum after SLPOUT
            sleep_out_delay_ms: 120,
            inversion: true,
            default_brightness: 90,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set physical panel dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = dims;
        self
    }

    /// Set orientation applied at bring-up
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set offsets for [`Orientation::Primary`]
    pub fn primary_offsets(mut self, x: u16, y: u16) -> Self {
        self.primary_offsets = Offsets::new(x, y);
        self
    }

    /// Set offsets for [`Orientation::Rotated`]
    pub fn rotated_offsets(mut self, x: u16, y: u16) -> Self {
        self.rotated_offsets = Offsets::new(x, y);
        self
    }

    /// Set settle time around each reset edge
    pub fn reset_delay_ms(mut self, ms: u32) -> Self {
        self.reset_delay_ms = ms;
        self
    }

    /// Set wait after sleep-out
    pub fn sleep_out_delay_ms(mut self, ms: u32) -> Self {
        self.sleep_out_delay_ms = ms;
        self
    }

    /// Enable or disable display inversion
    pub fn inversion(mut self, value: bool) -> Self {
        self.inversion = value;
        self
    }

    /// Set the brightness used by [`GraphicDisplay::begin_default`](crate::GraphicDisplay::begin_default)
    ///
    /// Values above 100 are clamped.
    pub fn default_brightness(mut self, percent: u8) -> Self {
        self.default_brightness = percent.min(100);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidOffsets` if either offset pair pushes the
    /// full surface outside controller memory.
    pub fn build(self) -> Result<Config, BuilderError> {
        let config = self.config();

        for orientation in [Orientation::Primary, Orientation::Rotated] {
            let (width, height) = config.logical_size(orientation);
            let offsets = config.offsets(orientation);
            let mapped = map_window(
                Window::new(0, 0, width.saturating_sub(1), height.saturating_sub(1)),
                orientation,
                offsets,
            );
            if mapped.columns.1 >= MAX_COLUMNS || mapped.rows.1 >= MAX_ROWS {
                return Err(BuilderError::InvalidOffsets {
                    x: offsets.x,
                    y: offsets.y,
                });
            }
        }

        Ok(config)
    }

    fn config(&self) -> Config {
        Config {
            dimensions: self.dimensions,
            orientation: self.orientation,
            primary_offsets: self.primary_offsets,
            rotated_offsets: self.rotated_offsets,
            reset_delay_ms: self.reset_delay_ms,
            sleep_out_delay_ms: self.sleep_out_delay_ms,
            inversion: self.inversion,
            default_brightness: self.default_brightness,
        }
    }
}
