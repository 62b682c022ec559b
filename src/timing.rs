/// Bits per color channel.
pub const BITS_PER_COLOR: usize = 8;
/// Color channels per LED (green, red, blue).
pub const COLORS_PER_LED: usize = 3;
/// Pulses needed to transmit one LED.
pub const BITS_PER_LED: usize = BITS_PER_COLOR * COLORS_PER_LED;

/// The WS2812 bit rate, 1.25us per bit.
pub const BIT_RATE_HZ: u32 = 800_000;

// WS2812 wants at least 50us of low signal to latch
const DEFAULT_RESET_US: u32 = 50;

// 0.7us and 0.35us of a 1.25us bit period, in percent
const HIGH_BIT_PERCENT: u32 = 56;
const LOW_BIT_PERCENT: u32 = 28;

/// Pulse timing of the PWM signal.
///
/// All values are timer compare counts or bit periods, so a [Timing]
/// is tied to the clock the PWM timer runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Compare value that encodes a `1` bit.
    pub duty_high: u16,
    /// Compare value that encodes a `0` bit.
    pub duty_low: u16,
    /// Number of bit periods the idle gap between frames must last.
    pub reset_cycles: u16,
}

impl Timing {
    /// Timer clocked at 108 MHz, which gives a period of 135 ticks at 800 kHz.
    pub const WS2812_108MHZ: Self = Self {
        duty_high: 76,
        duty_low: 38,
        reset_cycles: 40,
    };

    /// Derives the duty cycles from the timer period in ticks.
    ///
    /// `period_ticks` is the auto-reload value that makes the timer
    /// overflow at [BIT_RATE_HZ].
    pub const fn from_timer_period(period_ticks: u16) -> Self {
        let period = period_ticks as u32;
        Self {
            duty_high: ((period * HIGH_BIT_PERCENT + 50) / 100) as u16,
            duty_low: ((period * LOW_BIT_PERCENT + 50) / 100) as u16,
            reset_cycles: reset_cycles_for_us(DEFAULT_RESET_US),
        }
    }

    /// Replaces the idle gap duration.
    ///
    /// Newer WS2812 revisions need up to 300us. Durations beyond
    /// `u16::MAX` bit periods (about 81.9ms) are clamped to that maximum.
    pub const fn with_reset_us(self, reset_us: u32) -> Self {
        Self {
            reset_cycles: reset_cycles_for_us(reset_us),
            ..self
        }
    }

    /// The compare value a single bit is encoded with.
    pub const fn duty_for(&self, bit: bool) -> u16 {
        if bit {
            self.duty_high
        } else {
            self.duty_low
        }
    }

    /// The threshold between a `0` and a `1` pulse.
    pub const fn midpoint(&self) -> u16 {
        self.duty_low + (self.duty_high - self.duty_low) / 2
    }

    /// Number of interrupts needed to emit the idle gap, if every
    /// interrupt zeroes `half_len` pulses.
    ///
    /// Rounded up, plus one interrupt of margin.
    pub const fn reset_interrupts(&self, half_len: usize) -> u16 {
        let reset_cycles = self.reset_cycles as usize;
        let full = reset_cycles / half_len;
        let partial = (reset_cycles % half_len > 0) as usize;
        (1 + full + partial) as u16
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::WS2812_108MHZ
    }
}

// Saturates at the longest gap a `u16` can count
const fn reset_cycles_for_us(reset_us: u32) -> u16 {
    let bits = reset_us as u64 * BIT_RATE_HZ as u64;
    let cycles = (bits + 999_999) / 1_000_000;
    if cycles > u16::MAX as u64 {
        u16::MAX
    } else {
        cycles as u16
    }
}
