use snafu::prelude::*;

/// Errors of the [Ws2812Pwm::init](crate::Ws2812Pwm::init) function
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The LED count has to be an exact multiple of the LEDs refilled per interrupt.
    #[snafu(display("{led_count} LEDs are not a multiple of the batch size {batch_size}"))]
    LedCountNotMultipleOfBatch {
        /// The number of LEDs on the strip.
        led_count: usize,
        /// The number of LEDs refilled per interrupt.
        batch_size: usize,
    },
    /// The strip has to hold at least two batches, because
    /// [update](crate::Ws2812Pwm::update) primes both buffer halves.
    #[snafu(display("{led_count} LEDs do not fill both buffer halves of {batch_size} LEDs each"))]
    TooFewLeds {
        /// The number of LEDs on the strip.
        led_count: usize,
        /// The number of LEDs refilled per interrupt.
        batch_size: usize,
    },
    /// The high bit has to be longer than the low bit, and the low bit
    /// must not be zero, as zero is the idle level.
    #[snafu(display("invalid duty cycles: high {duty_high}, low {duty_low}"))]
    InvalidTiming {
        /// Compare value of a `1` bit.
        duty_high: u16,
        /// Compare value of a `0` bit.
        duty_low: u16,
    },
    /// The idle gap has to last at least one bit period.
    ZeroResetCycles,
    /// The LED count does not fit into the 16 bit progress counter.
    #[snafu(display("{led_count} LEDs exceed the supported maximum"))]
    TooManyLeds {
        /// The number of LEDs on the strip.
        led_count: usize,
    },
}

/// Errors of the color setters of [LedStrip](crate::LedStrip)
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum SetColorError {
    /// The LED index is not on the strip.
    #[snafu(display("LED index {index} is out of range (strip has {led_count} LEDs)"))]
    OutOfRange {
        /// The requested LED index.
        index: usize,
        /// The number of LEDs on the strip.
        led_count: usize,
    },
}

/// A violated precondition of the buffer refill.
///
/// Cannot happen after a successful [init](crate::Ws2812Pwm::init);
/// it indicates a misconfigured strip, not bad input.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum RefillError {
    /// The requested LED range is not on the strip.
    #[snafu(display("refill of {count} LEDs from {start_led} exceeds the {led_count} LEDs of the strip"))]
    OutOfBounds {
        /// First LED to encode.
        start_led: usize,
        /// Number of LEDs to encode.
        count: usize,
        /// The number of LEDs on the strip.
        led_count: usize,
    },
}
