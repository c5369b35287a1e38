//! Bitmap text rendering
//!
//! Text is drawn glyph by glyph from the active [`Font`](crate::font::Font).
//! Each character occupies a cell of `(width + spacing) * scale` pixels and
//! layout stops at the first glyph that would cross the right edge.
//!
//! At scale 1 set bits are single pixels. At larger scales each bit becomes a
//! `scale x scale` block, and with antialiasing enabled every set block gets a
//! one-pixel border blended halfway between foreground and background.
//!
//! ## Example
//!
//! ```rust,no_run
//! use st7789_panel::{Alignment, Color, GraphicDisplay};
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
//! # let mut display = GraphicDisplay::new(panel, Backlight::new(MockPwm));
//! # let _ = display.begin(90, &mut delay);
//! display.set_text_antialias(true);
//! let _ = display.draw_centered_text(20, "HELLO", Color::WHITE, Color::BLACK, 2);
//! let _ = display.draw_aligned_text(150, "v1.0", Alignment::Right, Color::GRAY, Color::BLACK, 1);
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;

use crate::color::Color;
use crate::graphics::{GraphicDisplay, GraphicsResult};
use crate::interface::DisplayInterface;

/// Blank rows above and below a line cleared by
/// [`clear_centered_line`](GraphicDisplay::clear_centered_line)
const LINE_PADDING: i32 = 6;

/// Horizontal step of [`scroll_text`](GraphicDisplay::scroll_text)
const SCROLL_STEP: i32 = 2;

/// Horizontal text placement against the surface width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Start at x = 0
    #[default]
    Left,
    /// Centre on the surface; may start left of 0 when wider than the surface
    Center,
    /// End at the right edge
    Right,
}

impl<I, P> GraphicDisplay<I, P>
where
    I: DisplayInterface,
    P: SetDutyCycle,
{
    /// Horizontal advance per character at `size`
    pub fn char_width(&self, size: u8) -> i32 {
        self.font.advance(size)
    }

    /// Cell height at `size`
    pub fn char_height(&self, size: u8) -> i32 {
        self.font.line_height(size)
    }

    /// Width of `text` at `size`, without the trailing spacing
    ///
    /// Empty text is 0 wide.
    pub fn text_width(&self, text: &str, size: u8) -> i32 {
        let count = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        if count == 0 {
            return 0;
        }
        count.saturating_mul(self.char_width(size)) - i32::from(self.font.spacing) * i32::from(size)
    }

    /// Draw one character with its top-left corner at (`x`, `y`)
    ///
    /// Clear bits are painted with `background` unless it equals `color`.
    /// Characters without a glyph draw as a blank cell.
    pub fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        c: char,
        color: Color,
        background: Color,
        size: u8,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_char") {
            return Ok(());
        }
        let font = self.font;
        let glyph = font.glyph(c);
        let s = i32::from(size);
        let opaque = background != color;

        for row in 0..font.height {
            for col in 0..font.width {
                // Cells saturate; anything pinned to the i32 limits is off the surface
                let bx = x.saturating_add(i32::from(col) * s);
                let by = y.saturating_add(i32::from(row) * s);
                if font.is_set(glyph, col, row) {
                    self.fill_rect(bx, by, s, s, color)?;
                } else if opaque {
                    self.fill_rect(bx, by, s, s, background)?;
                }
            }
        }

        if size > 1 && self.text_antialias() {
            // Borders go on only after every block is down so no block covers them
            let blend = color.blend(background);
            let set = |col: i32, row: i32| {
                u8::try_from(col)
                    .ok()
                    .zip(u8::try_from(row).ok())
                    .is_some_and(|(col, row)| font.is_set(glyph, col, row))
            };

            for row in 0..i32::from(font.height) {
                for col in 0..i32::from(font.width) {
                    if !set(col, row) {
                        continue;
                    }
                    let bx = x.saturating_add(col * s);
                    let by = y.saturating_add(row * s);
                    let (left, right) = (bx.saturating_sub(1), bx.saturating_add(s));
                    let (above, below) = (by.saturating_sub(1), by.saturating_add(s));
                    if !set(col - 1, row) {
                        self.fill_rect(left, by, 1, s, blend)?;
                    }
                    if !set(col + 1, row) {
                        self.fill_rect(right, by, 1, s, blend)?;
                    }
                    if !set(col, row - 1) {
                        self.fill_rect(bx, above, s, 1, blend)?;
                    }
                    if !set(col, row + 1) {
                        self.fill_rect(bx, below, s, 1, blend)?;
                    }
                    for (dc, dr) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
                        if !set(col + dc, row + dr) && !set(col + dc, row) && !set(col, row + dr) {
                            let px = if dc < 0 { left } else { right };
                            let py = if dr < 0 { above } else { below };
                            self.fill_rect(px, py, 1, 1, blend)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Draw a string starting at (`x`, `y`)
    ///
    /// Stops at the first character whose cell would cross the right edge.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        background: Color,
        size: u8,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("draw_text") {
            return Ok(());
        }
        let advance = self.char_width(size);
        let limit = i32::from(self.width());
        let mut cursor = x;

        for c in text.chars() {
            if cursor.saturating_add(advance) > limit {
                break;
            }
            self.draw_char(cursor, y, c, color, background, size)?;
            cursor += advance;
        }
        Ok(())
    }

    /// Draw a string placed by `alignment` on row `y`
    pub fn draw_aligned_text(
        &mut self,
        y: i32,
        text: &str,
        alignment: Alignment,
        color: Color,
        background: Color,
        size: u8,
    ) -> GraphicsResult<I> {
        let x = self.aligned_x(text, alignment, size);
        self.draw_text(x, y, text, color, background, size)
    }

    /// Draw a string centred horizontally on row `y`
    pub fn draw_centered_text(
        &mut self,
        y: i32,
        text: &str,
        color: Color,
        background: Color,
        size: u8,
    ) -> GraphicsResult<I> {
        self.draw_aligned_text(y, text, Alignment::Center, color, background, size)
    }

    /// Clear the full-width band around a line of text centred on row `y`
    ///
    /// The band is the cell height plus 6 rows above and below. Its top is
    /// clamped to the first row.
    pub fn clear_centered_line(&mut self, y: i32, size: u8, background: Color) -> GraphicsResult<I> {
        if !self.is_drawable("clear_centered_line") {
            return Ok(());
        }
        let height = self.char_height(size);
        let top = y.saturating_sub(height / 2 + LINE_PADDING).max(0);
        let width = i32::from(self.width());
        self.fill_rect(0, top, width, height + 2 * LINE_PADDING, background)
    }

    /// Scroll a string across row `y` from the right edge until it has left
    ///
    /// Each frame clears the line, redraws the text 2 pixels further left and
    /// waits `speed_ms`. Blocks until the text is gone.
    pub fn scroll_text<D: DelayNs>(
        &mut self,
        y: i32,
        text: &str,
        color: Color,
        background: Color,
        size: u8,
        speed_ms: u32,
        delay: &mut D,
    ) -> GraphicsResult<I> {
        if !self.is_drawable("scroll_text") {
            return Ok(());
        }
        let text_width = self.text_width(text, size);
        let line_height = self.char_height(size);
        let width = i32::from(self.width());

        let mut x = width;
        while x > -text_width {
            self.fill_rect(0, y, width, line_height, background)?;
            self.draw_text(x, y, text, color, background, size)?;
            delay.delay_ms(speed_ms);
            x -= SCROLL_STEP;
        }
        Ok(())
    }

    fn aligned_x(&self, text: &str, alignment: Alignment, size: u8) -> i32 {
        let width = i32::from(self.width());
        let text_width = self.text_width(text, size);
        match alignment {
            Alignment::Left => 0,
            Alignment::Center => (width - text_width) / 2,
            Alignment::Right => width - text_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::tests::{logical_pixels, ready_display};
    use crate::mock::CountingDelay;
    use alloc::vec::Vec;

    #[test]
    fn test_metrics() {
        let display = ready_display();
        assert_eq!(display.char_width(1), 6);
        assert_eq!(display.char_width(2), 12);
        assert_eq!(display.char_height(3), 24);
        assert_eq!(display.text_width("HELLO", 2), 58);
        assert_eq!(display.text_width("A", 1), 5);
        assert_eq!(display.text_width("", 4), 0);
    }

    #[test]
    fn test_centered_hello_start() {
        let mut display = ready_display();
        assert_eq!(display.aligned_x("HELLO", Alignment::Center, 2), 131);

        display
            .draw_centered_text(20, "HELLO", Color::WHITE, Color::BLACK, 2)
            .unwrap();
        let min_x = logical_pixels(&display)
            .iter()
            .map(|&(x, _, _)| x)
            .min()
            .unwrap();
        assert_eq!(min_x, 131);
    }

    #[test]
    fn test_alignment_extremes() {
        let display = ready_display();
        assert_eq!(display.aligned_x("AB", Alignment::Left, 1), 0);
        assert_eq!(display.aligned_x("AB", Alignment::Right, 1), 320 - 11);
        // Wider than the surface: not clamped
        let long = "0123456789012345678901234567890123456789012345678901234567890";
        assert!(display.aligned_x(long, Alignment::Center, 1) < 0);
    }

    #[test]
    fn test_char_scale_one_pixels() {
        let mut display = ready_display();
        display
            .draw_char(0, 0, 'T', Color::WHITE, Color::WHITE, 1)
            .unwrap();
        let pixels: Vec<(u16, u16)> = logical_pixels(&display)
            .into_iter()
            .map(|(x, y, _)| (x, y))
            .collect();

        // Top bar plus the stem in rows 1..=6
        assert_eq!(pixels.len(), 5 + 6);
        assert!(pixels.contains(&(0, 0)));
        assert!(pixels.contains(&(2, 6)));
        assert!(!pixels.contains(&(2, 7)));
    }

    #[test]
    fn test_char_paints_background_cells() {
        let mut display = ready_display();
        display
            .draw_char(0, 0, ' ', Color::WHITE, Color::BLUE, 1)
            .unwrap();
        let pixels = logical_pixels(&display);
        assert_eq!(pixels.len(), 40);
        assert!(pixels.iter().all(|&(_, _, c)| c == Color::BLUE.raw()));
    }

    #[test]
    fn test_scaled_char_blocks() {
        let mut display = ready_display();
        display
            .draw_char(10, 10, '-', Color::WHITE, Color::WHITE, 3)
            .unwrap();
        let pixels = logical_pixels(&display);
        // '-' is a 5-wide bar on row 3
        assert_eq!(pixels.len(), 5 * 9);
        assert!(
            pixels
                .iter()
                .all(|&(x, y, _)| (10..25).contains(&x) && (19..22).contains(&y))
        );
    }

    #[test]
    fn test_antialias_border_around_blocks() {
        let mut display = ready_display();
        display.set_text_antialias(true);
        display
            .draw_char(10, 10, '-', Color::WHITE, Color::BLACK, 2)
            .unwrap();

        let blend = Color::WHITE.blend(Color::BLACK).raw();
        let pixels = logical_pixels(&display);
        let at = |x: u16, y: u16| {
            pixels
                .iter()
                .rev()
                .find(|&&(px, py, _)| (px, py) == (x, y))
                .map(|&(_, _, c)| c)
        };
        // Bar covers x 10..=19 on rows 16..=17
        assert_eq!(at(12, 16), Some(0xFFFF));
        assert_eq!(at(9, 16), Some(blend));
        assert_eq!(at(20, 17), Some(blend));
        assert_eq!(at(12, 15), Some(blend));
        assert_eq!(at(12, 18), Some(blend));
        assert_eq!(at(9, 15), Some(blend));
        // Inner edges between set blocks stay solid
        assert_eq!(at(11, 16), Some(0xFFFF));
        assert_eq!(at(13, 17), Some(0xFFFF));
    }

    #[test]
    fn test_antialias_skipped_at_scale_one() {
        let mut display = ready_display();
        display.set_text_antialias(true);
        display
            .draw_char(0, 0, '-', Color::WHITE, Color::WHITE, 1)
            .unwrap();
        assert_eq!(logical_pixels(&display).len(), 5);
    }

    #[test]
    fn test_text_stops_at_right_edge() {
        let mut display = ready_display();
        display
            .draw_text(300, 0, "ABCD", Color::WHITE, Color::BLACK, 1)
            .unwrap();
        let pixels = logical_pixels(&display);
        // 300 and 306 fit, 312 + 6 = 318 fits, 318 + 6 > 320 does not
        assert!(pixels.iter().all(|&(x, _, _)| x < 318));
        assert!(pixels.iter().any(|&(x, _, _)| x >= 312));
    }

    #[test]
    fn test_non_ascii_consumes_cell() {
        let mut display = ready_display();
        display
            .draw_text(0, 0, "é-", Color::WHITE, Color::WHITE, 1)
            .unwrap();
        let pixels = logical_pixels(&display);
        assert_eq!(pixels.len(), 5);
        assert!(pixels.iter().all(|&(x, y, _)| (6..11).contains(&x) && y == 3));
    }

    #[test]
    fn test_clear_centered_line_band() {
        let mut display = ready_display();
        display.clear_centered_line(40, 2, Color::BLACK).unwrap();
        let writes = display.interface().window_writes();
        // 16 rows of glyph plus 12 rows of padding, from 40 - 8 - 6
        assert_eq!(writes.len(), 28);
        assert_eq!(writes[0].rows, (26 + 34, 26 + 34));
        assert_eq!(writes[0].columns, (0, 319));
    }

    #[test]
    fn test_clear_centered_line_clamps_top() {
        let mut display = ready_display();
        display.clear_centered_line(2, 1, Color::BLACK).unwrap();
        let writes = display.interface().window_writes();
        assert_eq!(writes[0].rows, (34, 34));
        assert_eq!(writes.len(), 20);
    }

    #[test]
    fn test_scroll_runs_until_text_leaves() {
        let mut display = ready_display();
        let mut delay = CountingDelay::default();
        display
            .scroll_text(0, "AB", Color::WHITE, Color::BLACK, 1, 5, &mut delay)
            .unwrap();
        // x from 320 down to -10 inclusive, step 2
        assert_eq!(delay.calls, 166);
        assert_eq!(delay.total_us, 166 * 5_000);
    }

    #[test]
    fn test_text_at_extreme_coordinates() {
        let mut display = ready_display();
        display.set_text_antialias(true);
        display
            .draw_char(i32::MAX - 2, i32::MAX - 2, 'W', Color::WHITE, Color::BLACK, 4)
            .unwrap();
        display
            .draw_char(i32::MIN, i32::MIN, 'W', Color::WHITE, Color::BLACK, 4)
            .unwrap();
        display
            .draw_text(i32::MAX - 5, 0, "AB", Color::WHITE, Color::BLACK, 2)
            .unwrap();
        display
            .draw_text(0, i32::MAX, "AB", Color::WHITE, Color::BLACK, 2)
            .unwrap();
        assert!(display.interface().ops.is_empty());

        // A band far above the surface is clamped to the top like any other
        display.clear_centered_line(i32::MIN, 2, Color::BLACK).unwrap();
        assert_eq!(display.interface().window_writes().len(), 28);
    }

    #[test]
    fn test_text_before_begin_is_silent() {
        let panel = crate::panel::Panel::new(
            crate::mock::MockInterface::new(),
            crate::config::Config::default(),
        );
        let mut display = GraphicDisplay::new(
            panel,
            crate::backlight::Backlight::new(crate::backlight::tests::MockPwm::default()),
        );
        display
            .draw_text(0, 0, "HI", Color::WHITE, Color::BLACK, 1)
            .unwrap();
        display.clear_centered_line(10, 1, Color::BLACK).unwrap();
        assert!(display.interface().ops.is_empty());
    }
}
