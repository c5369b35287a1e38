//! Backlight brightness control
//!
//! The backlight is an independent PWM output: it shares nothing with the
//! controller protocol. Brightness is expressed as a percentage and mapped
//! linearly onto the channel's duty-cycle resolution.
//!
//! ## Duty Mapping
//!
//! The duty step per percent is `max_duty / 100` (10 on a 10-bit channel), so
//! `duty = percent * step`. `100` is snapped to the channel's maximum duty
//! rather than the linear result, which would otherwise leave the output a
//! few counts short of fully on.
//!
//! ## Example
//!
//! ```
//! use st7789_panel::backlight::duty_for_percent;
//!
//! assert_eq!(duty_for_percent(50, 1023), 511);
//! assert_eq!(duty_for_percent(50, 255), 127);
//! assert_eq!(duty_for_percent(100, 1023), 1023);
//! ```

use core::fmt::Debug;
use embedded_hal::pwm::SetDutyCycle;

/// Highest accepted brightness percentage
pub const MAX_BRIGHTNESS: u8 = 100;

/// Errors that can occur when setting the backlight
#[derive(Debug)]
pub enum BacklightError<E> {
    /// Requested brightness is above [`MAX_BRIGHTNESS`]
    OutOfRange {
        /// The rejected value
        value: u8,
    },
    /// PWM channel error
    Pwm(E),
}

impl<E: Debug> core::fmt::Display for BacklightError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange { value } => {
                write!(f, "Brightness {value} out of range 0..={MAX_BRIGHTNESS}")
            }
            Self::Pwm(e) => write!(f, "PWM error: {e:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for BacklightError<E> {}

/// Map a brightness percentage onto a duty value
///
/// `percent` must already be validated (`<= 100`).
pub fn duty_for_percent(percent: u8, max_duty: u16) -> u16 {
    if percent >= MAX_BRIGHTNESS {
        return max_duty;
    }
    let duty = u32::from(percent) * u32::from(max_duty) / u32::from(MAX_BRIGHTNESS);
    // Below max_duty for every percent under 100
    duty as u16
}

/// PWM-driven backlight
pub struct Backlight<P> {
    pwm: P,
    level: u8,
}

impl<P> Backlight<P>
where
    P: SetDutyCycle,
{
    /// Wrap a PWM channel; the output is left untouched until the first
    /// [`set_brightness`](Self::set_brightness)
    pub fn new(pwm: P) -> Self {
        Self { pwm, level: 0 }
    }

    /// Set brightness in percent (0..=100)
    ///
    /// # Errors
    ///
    /// Returns [`BacklightError::OutOfRange`] for values above 100 without
    /// touching the output, or [`BacklightError::Pwm`] if the channel fails.
    pub fn set_brightness(&mut self, percent: u8) -> Result<(), BacklightError<P::Error>> {
        if percent > MAX_BRIGHTNESS {
            return Err(BacklightError::OutOfRange { value: percent });
        }
        let duty = duty_for_percent(percent, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty).map_err(BacklightError::Pwm)?;
        self.level = percent;
        Ok(())
    }

    /// Last brightness successfully applied
    pub fn brightness(&self) -> u8 {
        self.level
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// 10-bit PWM channel recording every duty written
    #[derive(Debug, Default)]
    pub(crate) struct MockPwm {
        pub(crate) duties: Vec<u16>,
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = core::convert::Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            1023
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duties.push(duty);
            Ok(())
        }
    }

    #[test]
    fn test_linear_duty_on_ten_bit_channel() {
        assert_eq!(duty_for_percent(0, 1023), 0);
        assert_eq!(duty_for_percent(1, 1023), 10);
        assert_eq!(duty_for_percent(50, 1023), 511);
        assert_eq!(duty_for_percent(90, 1023), 920);
        assert_eq!(duty_for_percent(99, 1023), 1012);
    }

    #[test]
    fn test_linear_duty_on_eight_bit_channel() {
        assert_eq!(duty_for_percent(1, 255), 2);
        assert_eq!(duty_for_percent(50, 255), 127);
        assert_eq!(duty_for_percent(99, 255), 252);
        assert_eq!(duty_for_percent(100, 255), 255);
    }

    #[test]
    fn test_coarse_channel_keeps_low_levels_lit() {
        assert_eq!(duty_for_percent(0, 63), 0);
        assert_eq!(duty_for_percent(2, 63), 1);
        assert_eq!(duty_for_percent(50, 63), 31);
        assert_eq!(duty_for_percent(99, 63), 62);
    }

    #[test]
    fn test_duty_never_decreases() {
        for max_duty in [1, 63, 99, 255, 1000, 1023, u16::MAX] {
            let duties: Vec<u16> = (0..=MAX_BRIGHTNESS)
                .map(|p| duty_for_percent(p, max_duty))
                .collect();
            assert!(duties.windows(2).all(|pair| pair[0] <= pair[1]));
            assert_eq!(duties[100], max_duty);
        }
    }

    #[test]
    fn test_full_brightness_snaps_to_max_duty() {
        assert_eq!(duty_for_percent(100, 1023), 1023);
        assert_eq!(duty_for_percent(100, 1024), 1024);
        assert_eq!(duty_for_percent(100, 255), 255);
    }

    #[test]
    fn test_set_brightness_writes_duty() {
        let mut backlight = Backlight::new(MockPwm::default());
        backlight.set_brightness(80).unwrap();
        backlight.set_brightness(100).unwrap();
        assert_eq!(backlight.brightness(), 100);
        assert_eq!(backlight.release().duties, [818, 1023]);
    }

    #[test]
    fn test_out_of_range_rejected_without_output() {
        let mut backlight = Backlight::new(MockPwm::default());
        backlight.set_brightness(40).unwrap();
        let result = backlight.set_brightness(101);
        assert!(matches!(
            result,
            Err(BacklightError::OutOfRange { value: 101 })
        ));
        assert_eq!(backlight.brightness(), 40);
        assert_eq!(backlight.release().duties, [409]);
    }
}
