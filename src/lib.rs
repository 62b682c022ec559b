#![no_std]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// PWM/DMA driver
pub mod pwm;

mod errors;
mod led_strip;
mod pixel;
mod timing;

pub use errors::{InitError, RefillError, SetColorError};
pub use led_strip::LedStrip;
pub use pixel::{Pixel, Rgb};
pub use pwm::{PwmDmaStream, TransmissionBuffer, Ws2812Pwm};
pub use timing::{Timing, BITS_PER_COLOR, BITS_PER_LED, BIT_RATE_HZ, COLORS_PER_LED};
