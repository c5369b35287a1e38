//! Drawing surface
//!
//! [`GraphicDisplay`] owns the [`Panel`] and the [`Backlight`] and renders
//! every primitive directly to controller memory through addressable windows.
//! There is no framebuffer: each call selects one or more windows and streams
//! the pixels that fill them.
//!
//! All coordinates are logical and signed. Shapes are clipped to the current
//! surface before any window is selected, so partially visible shapes draw
//! their visible part and fully hidden shapes send nothing.
//!
//! Every drawing call is a no-op returning `Ok(())` until [`begin`](GraphicDisplay::begin)
//! has succeeded.
//!
//! With the `graphics` feature, [`GraphicDisplay`] also implements
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) for
//! [`Rgb565`](embedded_graphics_core::pixelcolor::Rgb565).
//!
//! ## Example
//!
//! ```rust,no_run
//! use st7789_panel::{Color, GraphicDisplay};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::pwm::SetDutyCycle;
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # use st7789_panel::{Backlight, Config, Interface, Panel};
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
//! # struct MockPwm;
//! # impl embedded_hal::pwm::ErrorType for MockPwm { type Error = Infallible; }
//! # impl SetDutyCycle for MockPwm {
//! #     fn max_duty_cycle(&self) -> u16 { 1023 }
//! #     fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let panel = Panel::new(Interface::new(MockSpi, MockPin, MockPin), Config::default());
//! let mut display = GraphicDisplay::new(panel, Backlight::new(MockPwm));
//! if display.begin(80, &mut delay).is_err() {
//!     return;
//! }
//!
//! let _ = display.fill_round_rect(10, 10, 120, 40, 8, Color::BLUE);
//! let _ = display.draw_circle(200, 86, 30, Color::YELLOW);
//! let _ = display.draw_line(0, 171, 319, 0, Color::WHITE);
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, trace, warn};

use crate::backlight::{Backlight, BacklightError, MAX_BRIGHTNESS};
use crate::color::Color;
use crate::config::Orientation;
use crate::error::Error;
use crate::font::{FONT_5X8, Font};
use crate::interface::DisplayInterface;
use crate::panel::Panel;
use crate::rotation::Window;

/// Upper-left quadrant for [`GraphicDisplay::draw_circle_quadrants`]
pub const CORNER_TOP_LEFT: u8 = 0x1;
/// Upper-right quadrant
pub const CORNER_TOP_RIGHT: u8 = 0x2;
/// Lower-right quadrant
pub const CORNER_BOTTOM_RIGHT: u8 = 0x4;
/// Lower-left quadrant
pub const CORNER_BOTTOM_LEFT: u8 = 0x8;

/// Right half for [`GraphicDisplay::fill_circle_halves`]
pub const HALF_RIGHT: u8 = 0x1;
/// Left half
pub const HALF_LEFT: u8 = 0x2;

/// Rows between the short pauses of a full-surface clear
const CLEAR_YIELD_ROWS: u16 = 50;

pub(crate) type GraphicsResult<I> = core::result::Result<(), Error<I>>;

/// Drawing surface over an ST7789 panel and its backlight
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `P` - Backlight PWM channel implementing [`SetDutyCycle`]
pub struct GraphicDisplay<I, P>
where
    I: DisplayInterface,
    P: SetDutyCycle,
{
    panel: Panel<I>,
    backlight: Backlight<P>,
    ready: bool,
    antialias: bool,
    pub(crate) font: Font,
    /// Color of the last full-surface clear, the starting point of a fade
    background: Color,
}

impl<I, P> GraphicDisplay<I, P>
where
    I: DisplayInterface,
    P: SetDutyCycle,
{
    /// Wrap a panel and its backlight
    ///
    /// Nothing is sent until [`begin`](Self::begin).
    pub fn new(panel: Panel<I>, backlight: Backlight<P>) -> Self {
        Self {
            panel,
            backlight,
            ready: false,
            antialias: false,
            font: FONT_5X8,
            background: Color::BLACK,
        }
    }

    /// Bring the panel up, set the backlight and clear to black
    ///
    /// The surface only becomes ready when every step succeeded. Brightness
    /// above 100 is clamped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails during bring-up or
    /// [`Error::Backlight`] if the PWM channel fails. The surface stays not
    /// ready in both cases.
    pub fn begin<D: DelayNs>(&mut self, brightness: u8, delay: &mut D) -> GraphicsResult<I> {
        self.ready = false;
        self.panel.init(delay)?;
        self.apply_brightness(brightness)?;
        self.fill_surface(Color::BLACK, delay)?;
        self.ready = true;
        debug!("st7789: surface ready, brightness {}", self.backlight.brightness());
        Ok(())
    }

    /// [`begin`](Self::begin) with the configured default brightness
    pub fn begin_default<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        let brightness = self.panel.config().default_brightness;
        self.begin(brightness, delay)
    }

    /// Whether [`begin`](Self::begin) has succeeded
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Set backlight brightness in percent
    ///
    /// Values above 100 are clamped with a warning. Ignored before
    /// [`begin`](Self::begin), which applies its own brightness.
    pub fn set_brightness(&mut self, percent: u8) -> GraphicsResult<I> {
        if !self.is_drawable("set_brightness") {
            return Ok(());
        }
        self.apply_brightness(percent)
    }

    /// Last brightness applied
    pub fn brightness(&self) -> u8 {
        self.backlight.brightness()
    }

    /// Switch orientation; width and height follow
    pub fn set_orientation(&mut self, orientation: Orientation) -> GraphicsResult<I> {
        if !self.is_drawable("set_orientation") {
            return Ok(());
        }
        self.panel.set_orientation(orientation)
    }

    /// Current orientation
    pub fn orientation(&self) -> Orientation {
        self.panel.orientation()
    }

    /// Logical width for the current orientation
    pub fn width(&self) -> u16 {
        self.panel.logical_size().0
    }

    /// Logical height for the current orientation
    pub fn height(&self) -> u16 {
        self.panel.logical_size().1
    }

    /// Enable the blended border around scaled glyphs
    pub fn set_text_antialias(&mut self, enable: bool) {
        self.antialias = enable;
    }

    /// Whether scaled glyphs get a blended border
    pub fn text_antialias(&self) -> bool {
        self.antialias
    }

    /// Replace the font used by the text functions
    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    /// Font used by the text functions
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Access the protocol layer
    pub fn panel(&self) -> &Panel<I> {
        &self.panel
    }

    /// Release the panel and backlight
    pub fn release(self) -> (Panel<I>, Backlight<P>) {
        (self.panel, self.backlight)
    }

    /// Fill the whole surface with one color, row by row
    ///
    /// Pauses briefly every 50 rows and once at the end.
    pub fn clear_screen<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> GraphicsResult<I> {
        if !self.is_drawable("clear_screen") {
            return Ok(());
        }
        self.fill_surface(color, delay)
    }

    /// Reset the controller, repeat bring-up and clear to black
    ///
    /// On failure the surface is left not ready.
    pub fn force_refresh<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        if !self.is_drawable("force_refresh") {
            return Ok(());
        }
        self.ready = false;
        self.panel.init(delay)?;
        self.fill_surface(Color::BLACK, delay)?;
        self.ready = true;
        Ok(())
    }

    /// Fade the surface from the last clear color to `to`
    ///
    /// Each of the `steps` frames clears the surface to the next interpolated
    /// color and waits `delay_ms`. The final frame is exactly `to`; zero steps
    /// clears straight to it.
    pub fn fade_screen<D: DelayNs>(
        &mut self,
        to: Color,
        steps: u16,
        delay_ms: u32,
        delay: &mut D,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("fade_screen") {
            return Ok(());
        }
        let from = self.background;
        if steps == 0 {
            return self.fill_surface(to, delay);
        }
        for step in 1..=steps {
            let color = from.interpolate(to, f32::from(step) / f32::from(steps));
            self.fill_surface(color, delay)?;
            delay.delay_ms(delay_ms);
        }
        Ok(())
    }

    /// Draw a single pixel
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> GraphicsResult<I> {
        if !self.is_drawable("draw_pixel") {
            return Ok(());
        }
        self.put_pixel(i64::from(x), i64::from(y), color)
    }

    /// Draw a horizontal run of `width` pixels as one window
    pub fn draw_hline(&mut self, x: i32, y: i32, width: i32, color: Color) -> GraphicsResult<I> {
        if !self.is_drawable("draw_hline") {
            return Ok(());
        }
        self.fill_run(i64::from(x), i64::from(y), i64::from(width), 1, color)
    }

    /// Draw a vertical run of `height` pixels as one window
    pub fn draw_vline(&mut self, x: i32, y: i32, height: i32, color: Color) -> GraphicsResult<I> {
        if !self.is_drawable("draw_vline") {
            return Ok(());
        }
        self.fill_run(i64::from(x), i64::from(y), 1, i64::from(height), color)
    }

    /// Fill a rectangle, one window per row
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("fill_rect") {
            return Ok(());
        }
        self.fill_rows(
            i64::from(x),
            i64::from(y),
            i64::from(width),
            i64::from(height),
            color,
        )
    }

    /// Draw a one-pixel rectangle outline
    pub fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_rect") {
            return Ok(());
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let (width, height) = (i64::from(width), i64::from(height));
        self.fill_run(x, y, width, 1, color)?;
        self.fill_run(x, y + height - 1, width, 1, color)?;
        self.fill_run(x, y, 1, height, color)?;
        self.fill_run(x + width - 1, y, 1, height, color)
    }

    /// Draw a line, one pixel per step along the longer axis
    ///
    /// The pixels are those of Bresenham's walk from (`x0`, `y0`) to
    /// (`x1`, `y1`): the shorter axis advances by the rounded slope, with
    /// exact halves resolved towards the start. Steps whose long-axis
    /// coordinate falls outside the surface are skipped without walking them.
    pub fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_line") {
            return Ok(());
        }
        let (x0, y0) = (i64::from(x0), i64::from(y0));
        let (x1, y1) = (i64::from(x1), i64::from(y1));
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let steep = dy > dx;
        let (major, minor) = if steep { (dy, dx) } else { (dx, dy) };

        let (width, height) = self.panel.logical_size();
        let (first, last) = if steep {
            visible_steps(y0, sy, height, major)
        } else {
            visible_steps(x0, sx, width, major)
        };

        for k in first..=last {
            let offset = bresenham_offset(k, major, minor);
            let (x, y) = if steep {
                (x0 + sx * offset, y0 + sy * k)
            } else {
                (x0 + sx * k, y0 + sy * offset)
            };
            self.put_pixel(x, y, color)?;
        }
        Ok(())
    }

    /// Draw a circle outline with the midpoint algorithm
    pub fn draw_circle(&mut self, x0: i32, y0: i32, radius: i32, color: Color) -> GraphicsResult<I> {
        if !self.is_drawable("draw_circle") || radius < 0 {
            return Ok(());
        }
        let (x0, y0, radius) = (i64::from(x0), i64::from(y0), i64::from(radius));
        if radius == 0 {
            return self.put_pixel(x0, y0, color);
        }

        self.put_pixel(x0, y0 + radius, color)?;
        self.put_pixel(x0, y0 - radius, color)?;
        self.put_pixel(x0 + radius, y0, color)?;
        self.put_pixel(x0 - radius, y0, color)?;

        let (near, far) = self.outline_reach(x0, y0);
        for (x, y) in MidpointArc::new(radius).within(near, far) {
            self.put_pixel(x0 + x, y0 + y, color)?;
            self.put_pixel(x0 - x, y0 + y, color)?;
            self.put_pixel(x0 + x, y0 - y, color)?;
            self.put_pixel(x0 - x, y0 - y, color)?;
            self.put_pixel(x0 + y, y0 + x, color)?;
            self.put_pixel(x0 - y, y0 + x, color)?;
            self.put_pixel(x0 + y, y0 - x, color)?;
            self.put_pixel(x0 - y, y0 - x, color)?;
        }
        Ok(())
    }

    /// Fill a circle: the vertical diameter, then both halves as vertical runs
    pub fn fill_circle(&mut self, x0: i32, y0: i32, radius: i32, color: Color) -> GraphicsResult<I> {
        if !self.is_drawable("fill_circle") || radius < 0 {
            return Ok(());
        }
        let (x0, y0, radius) = (i64::from(x0), i64::from(y0), i64::from(radius));
        self.fill_run(x0, y0 - radius, 1, 2 * radius + 1, color)?;
        self.fill_halves(x0, y0, radius, HALF_RIGHT | HALF_LEFT, 0, color)
    }

    /// Draw the outline of selected circle quadrants
    ///
    /// `corners` is a mask of [`CORNER_TOP_LEFT`], [`CORNER_TOP_RIGHT`],
    /// [`CORNER_BOTTOM_RIGHT`] and [`CORNER_BOTTOM_LEFT`]. The axis points are
    /// not drawn; the straight edges of a rounded rectangle supply them.
    pub fn draw_circle_quadrants(
        &mut self,
        x0: i32,
        y0: i32,
        radius: i32,
        corners: u8,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_circle_quadrants") {
            return Ok(());
        }
        self.outline_quadrants(
            i64::from(x0),
            i64::from(y0),
            i64::from(radius),
            corners,
            color,
        )
    }

    /// Fill selected halves of a circle with vertical runs
    ///
    /// `halves` is a mask of [`HALF_RIGHT`] and [`HALF_LEFT`]. `delta` lengthens
    /// every run downwards, stretching the halves into the ends of a rounded
    /// rectangle.
    pub fn fill_circle_halves(
        &mut self,
        x0: i32,
        y0: i32,
        radius: i32,
        halves: u8,
        delta: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("fill_circle_halves") {
            return Ok(());
        }
        self.fill_halves(
            i64::from(x0),
            i64::from(y0),
            i64::from(radius),
            halves,
            i64::from(delta),
            color,
        )
    }

    /// Draw a rounded rectangle outline
    ///
    /// The radius is clamped to half the shorter side.
    pub fn draw_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        radius: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_round_rect") || width <= 0 || height <= 0 {
            return Ok(());
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let (width, height) = (i64::from(width), i64::from(height));
        let r = clamp_radius(i64::from(radius), width, height);

        self.fill_run(x + r, y, width - 2 * r, 1, color)?;
        self.fill_run(x + r, y + height - 1, width - 2 * r, 1, color)?;
        self.fill_run(x, y + r, 1, height - 2 * r, color)?;
        self.fill_run(x + width - 1, y + r, 1, height - 2 * r, color)?;

        let right = x + width - r - 1;
        let bottom = y + height - r - 1;
        self.outline_quadrants(x + r, y + r, r, CORNER_TOP_LEFT, color)?;
        self.outline_quadrants(right, y + r, r, CORNER_TOP_RIGHT, color)?;
        self.outline_quadrants(right, bottom, r, CORNER_BOTTOM_RIGHT, color)?;
        self.outline_quadrants(x + r, bottom, r, CORNER_BOTTOM_LEFT, color)
    }

    /// Fill a rounded rectangle
    ///
    /// The radius is clamped to half the shorter side.
    pub fn fill_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        radius: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("fill_round_rect") || width <= 0 || height <= 0 {
            return Ok(());
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let (width, height) = (i64::from(width), i64::from(height));
        let r = clamp_radius(i64::from(radius), width, height);
        let delta = height - 2 * r - 1;

        self.fill_rows(x + r, y, width - 2 * r, height, color)?;
        self.fill_halves(x + width - r - 1, y + r, r, HALF_RIGHT, delta, color)?;
        self.fill_halves(x + r, y + r, r, HALF_LEFT, delta, color)
    }

    /// Draw a triangle outline
    pub fn draw_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        self.draw_line(x0, y0, x1, y1, color)?;
        self.draw_line(x1, y1, x2, y2, color)?;
        self.draw_line(x2, y2, x0, y0, color)
    }

    /// Fill a triangle with one horizontal run per scanline
    pub fn fill_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("fill_triangle") {
            return Ok(());
        }
        let mut v = [(x0, y0), (x1, y1), (x2, y2)].map(|(x, y)| (i64::from(x), i64::from(y)));
        v.sort_unstable_by_key(|&(_, y)| y);
        let [(x0, y0), (x1, y1), (x2, y2)] = v;

        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            return self.fill_run(a, y0, b - a + 1, 1, color);
        }

        // Include the middle scanline in the upper part only for a flat bottom
        let split = if y1 == y2 { y1 } else { y1 - 1 };
        let rows = i64::from(self.height());

        for y in y0.max(0)..=y2.min(rows - 1) {
            let a = if y <= split {
                edge_x(x0, x1 - x0, y1 - y0, y - y0)
            } else {
                edge_x(x1, x2 - x1, y2 - y1, y - y1)
            };
            let b = edge_x(x0, x2 - x0, y2 - y0, y - y0);
            self.span(a, b, y, color)?;
        }
        Ok(())
    }

    /// Draw a 1-bit bitmap, row-major and MSB first
    ///
    /// Set bits draw `color`. Clear bits draw `background`, or nothing when
    /// `background == color`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BitmapTooSmall`] if `bitmap` holds fewer than
    /// `width * height` bits.
    pub fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        width: u16,
        height: u16,
        color: Color,
        background: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_bitmap") {
            return Ok(());
        }
        let bits = usize::from(width) * usize::from(height);
        let required = bits.div_ceil(8);
        if bitmap.len() < required {
            warn!(
                "st7789: bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                required,
                bitmap.len()
            );
            return Err(Error::BitmapTooSmall {
                required,
                provided: bitmap.len(),
            });
        }

        let transparent = background == color;
        for j in 0..height {
            for i in 0..width {
                let index = usize::from(j) * usize::from(width) + usize::from(i);
                let set = bitmap[index / 8] & (0x80 >> (index % 8)) != 0;
                let (px, py) = (i64::from(x) + i64::from(i), i64::from(y) + i64::from(j));
                if set {
                    self.put_pixel(px, py, color)?;
                } else if !transparent {
                    self.put_pixel(px, py, background)?;
                }
            }
        }
        Ok(())
    }

    /// Draw a bordered progress bar
    ///
    /// The interior is cleared to `background`, then `progress / max` of its
    /// width is filled from the left. A non-positive `max` leaves the interior
    /// empty.
    pub fn draw_progress_bar(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        progress: i32,
        max: i32,
        fill: Color,
        background: Color,
        border: Color,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_progress_bar") {
            return Ok(());
        }
        self.draw_rect(x, y, width, height, border)?;
        let (x, y) = (i64::from(x), i64::from(y));
        let inner = i64::from(width) - 2;
        let inner_height = i64::from(height) - 2;
        self.fill_rows(x + 1, y + 1, inner, inner_height, background)?;

        if max <= 0 {
            return Ok(());
        }
        let filled = (inner * i64::from(progress) / i64::from(max))
            .min(inner)
            .max(0);
        if filled > 0 {
            self.fill_rows(x + 1, y + 1, filled, inner_height, fill)?;
        }
        Ok(())
    }

    /// Check readiness, tracing the skipped call
    pub(crate) fn is_drawable(&self, op: &str) -> bool {
        if !self.ready {
            trace!("st7789: {} ignored, display not ready", op);
        }
        self.ready
    }

    /// Clip a rectangle to the surface
    ///
    /// Shape arithmetic runs in `i64` so no combination of `i32` arguments
    /// can overflow before it gets here.
    fn clip(&self, x: i64, y: i64, width: i64, height: i64) -> Option<Window> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let (surface_w, surface_h) = self.panel.logical_size();
        let x2 = x.saturating_add(width).min(i64::from(surface_w)) - 1;
        let y2 = y.saturating_add(height).min(i64::from(surface_h)) - 1;
        let x1 = x.max(0);
        let y1 = y.max(0);
        if x1 > x2 || y1 > y2 {
            return None;
        }
        Some(Window::new(
            u16::try_from(x1).ok()?,
            u16::try_from(y1).ok()?,
            u16::try_from(x2).ok()?,
            u16::try_from(y2).ok()?,
        ))
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Color) -> GraphicsResult<I> {
        let Some(window) = self.clip(x, y, 1, 1) else {
            return Ok(());
        };
        self.panel.fill_window(window, color)
    }

    /// Clipped rectangle as a single window
    fn fill_run(&mut self, x: i64, y: i64, width: i64, height: i64, color: Color) -> GraphicsResult<I> {
        let Some(window) = self.clip(x, y, width, height) else {
            return Ok(());
        };
        self.panel.fill_window(window, color)
    }

    /// Clipped rectangle as one window per row
    fn fill_rows(&mut self, x: i64, y: i64, width: i64, height: i64, color: Color) -> GraphicsResult<I> {
        let Some(window) = self.clip(x, y, width, height) else {
            return Ok(());
        };
        for row in window.y1..=window.y2 {
            self.panel
                .fill_window(Window::new(window.x1, row, window.x2, row), color)?;
        }
        Ok(())
    }

    /// Horizontal run between two x positions in either order
    fn span(&mut self, a: i64, b: i64, y: i64, color: Color) -> GraphicsResult<I> {
        let (a, b) = if a > b { (b, a) } else { (a, b) };
        self.fill_run(a, y, b - a + 1, 1, color)
    }

    fn fill_surface<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> GraphicsResult<I> {
        let (width, height) = self.panel.logical_size();
        for row in 0..height {
            self.panel
                .fill_window(Window::new(0, row, width - 1, row), color)?;
            if row % CLEAR_YIELD_ROWS == 0 {
                delay.delay_us(100);
            }
        }
        delay.delay_ms(10);
        self.background = color;
        Ok(())
    }

    /// Nearest and farthest reach of the surface from (`x0`, `y0`) on
    /// either axis
    fn outline_reach(&self, x0: i64, y0: i64) -> (i64, i64) {
        let (width, height) = self.panel.logical_size();
        let (near_x, far_x) = axis_reach(x0, width);
        let (near_y, far_y) = axis_reach(y0, height);
        (near_x.max(near_y), far_x.max(far_y))
    }

    fn outline_quadrants(
        &mut self,
        x0: i64,
        y0: i64,
        radius: i64,
        corners: u8,
        color: Color,
    ) -> GraphicsResult<I> {
        let (near, far) = self.outline_reach(x0, y0);
        for (x, y) in MidpointArc::new(radius).within(near, far) {
            if corners & CORNER_BOTTOM_RIGHT != 0 {
                self.put_pixel(x0 + x, y0 + y, color)?;
                self.put_pixel(x0 + y, y0 + x, color)?;
            }
            if corners & CORNER_TOP_RIGHT != 0 {
                self.put_pixel(x0 + x, y0 - y, color)?;
                self.put_pixel(x0 + y, y0 - x, color)?;
            }
            if corners & CORNER_BOTTOM_LEFT != 0 {
                self.put_pixel(x0 - y, y0 + x, color)?;
                self.put_pixel(x0 - x, y0 + y, color)?;
            }
            if corners & CORNER_TOP_LEFT != 0 {
                self.put_pixel(x0 - y, y0 - x, color)?;
                self.put_pixel(x0 - x, y0 - y, color)?;
            }
        }
        Ok(())
    }

    fn fill_halves(
        &mut self,
        x0: i64,
        y0: i64,
        radius: i64,
        halves: u8,
        delta: i64,
        color: Color,
    ) -> GraphicsResult<I> {
        // Runs are vertical, so only the column reach bounds the walk
        let (near, far) = axis_reach(x0, self.width());
        for (x, y) in MidpointArc::new(radius).within(near, far) {
            if halves & HALF_RIGHT != 0 {
                self.fill_run(x0 + x, y0 - y, 1, 2 * y + 1 + delta, color)?;
                self.fill_run(x0 + y, y0 - x, 1, 2 * x + 1 + delta, color)?;
            }
            if halves & HALF_LEFT != 0 {
                self.fill_run(x0 - x, y0 - y, 1, 2 * y + 1 + delta, color)?;
                self.fill_run(x0 - y, y0 - x, 1, 2 * x + 1 + delta, color)?;
            }
        }
        Ok(())
    }

    fn apply_brightness(&mut self, percent: u8) -> GraphicsResult<I> {
        let percent = if percent > MAX_BRIGHTNESS {
            warn!(
                "st7789: brightness {} clamped to {}",
                percent, MAX_BRIGHTNESS
            );
            MAX_BRIGHTNESS
        } else {
            percent
        };
        self.backlight
            .set_brightness(percent)
            .map_err(|e| match e {
                BacklightError::OutOfRange { value } => Error::BrightnessOutOfRange { value },
                BacklightError::Pwm(e) => {
                    warn!("st7789: backlight PWM error: {:?}", e);
                    Error::Backlight
                }
            })
    }

    #[cfg(test)]
    pub(crate) fn interface(&self) -> &I {
        self.panel.interface()
    }

    #[cfg(test)]
    pub(crate) fn interface_mut(&mut self) -> &mut I {
        self.panel.interface_mut()
    }
}

fn clamp_radius(radius: i64, width: i64, height: i64) -> i64 {
    radius.min(width / 2).min(height / 2).max(0)
}

/// Nearest and farthest distance from `center` to a coordinate in `0..len`
fn axis_reach(center: i64, len: u16) -> (i64, i64) {
    let last = i64::from(len) - 1;
    let near = if center < 0 {
        -center
    } else {
        (center - last).max(0)
    };
    (near, center.abs().max((center - last).abs()))
}

/// First and last step of a `major`-step walk from `start` in direction
/// `step` that lands inside `0..len`
///
/// Returns an empty range when the walk never enters.
fn visible_steps(start: i64, step: i64, len: u16, major: i64) -> (i64, i64) {
    let last = i64::from(len) - 1;
    let (first, final_step) = if step > 0 {
        (-start, last - start)
    } else {
        (start - last, start)
    };
    (first.max(0), final_step.min(major))
}

/// Short-axis offset after `k` long-axis steps of a Bresenham walk
fn bresenham_offset(k: i64, major: i64, minor: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let offset = (2 * i128::from(k) * i128::from(minor) + i128::from(major) - 1)
        / (2 * i128::from(major));
    // Never more than `minor`
    offset as i64
}

/// x of a triangle edge `rows` scanlines below its top vertex, truncated
/// towards the top vertex
fn edge_x(x: i64, dx: i64, dy: i64, rows: i64) -> i64 {
    if dy == 0 {
        return x;
    }
    x + (i128::from(dx) * i128::from(rows) / i128::from(dy)) as i64
}

/// Octant walk of the midpoint circle algorithm
///
/// Yields `(x, y)` for every step after the axis point, with `x < y` before
/// the step.
struct MidpointArc {
    f: i64,
    ddf_x: i64,
    ddf_y: i64,
    x: i64,
    y: i64,
}

impl MidpointArc {
    fn new(radius: i64) -> Self {
        Self {
            f: 1 - radius,
            ddf_x: 1,
            ddf_y: -2 * radius,
            x: 0,
            y: radius,
        }
    }

    /// End the walk once no later step can land within `near..=far` of the
    /// centre
    ///
    /// `x` only grows and `y` only shrinks, and each point pairs one offset
    /// with the other, so a step is only useful while `x` has not passed
    /// `far` and `y` has not dropped below `near`.
    fn within(self, near: i64, far: i64) -> impl Iterator<Item = (i64, i64)> {
        self.take_while(move |&(x, y)| x <= far + 1 && y + 1 >= near)
    }
}

impl Iterator for MidpointArc {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.ddf_y += 2;
            self.f += self.ddf_y;
        }
        self.x += 1;
        self.ddf_x += 2;
        self.f += self.ddf_x;
        Some((self.x, self.y))
    }
}

#[cfg(feature = "graphics")]
mod draw_target {
    use embedded_graphics_core::{
        draw_target::DrawTarget,
        geometry::{OriginDimensions, Size},
        pixelcolor::Rgb565,
        prelude::Pixel,
        primitives::Rectangle,
    };
    use embedded_hal::pwm::SetDutyCycle;

    use super::GraphicDisplay;
    use crate::error::Error;
    use crate::interface::DisplayInterface;

    impl<I, P> DrawTarget for GraphicDisplay<I, P>
    where
        I: DisplayInterface,
        P: SetDutyCycle,
    {
        type Color = Rgb565;
        type Error = Error<I>;

        fn draw_iter<It>(&mut self, pixels: It) -> Result<(), Self::Error>
        where
            It: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                self.draw_pixel(point.x, point.y, color.into())?;
            }
            Ok(())
        }

        fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
            let width = i32::try_from(area.size.width).unwrap_or(i32::MAX);
            let height = i32::try_from(area.size.height).unwrap_or(i32::MAX);
            self.fill_rect(area.top_left.x, area.top_left.y, width, height, color.into())
        }
    }

    impl<I, P> OriginDimensions for GraphicDisplay<I, P>
    where
        I: DisplayInterface,
        P: SetDutyCycle,
    {
        fn size(&self) -> Size {
            Size::new(u32::from(self.width()), u32::from(self.height()))
        }
    }
}
