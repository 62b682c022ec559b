mod driver;
mod encoder;
pub(crate) mod finished_watcher;
mod interrupt_handler;
pub(crate) mod status;
mod stream;
mod transmission_buffer;

pub use encoder::{decode_led, encode_led, encode_pixel};
pub use finished_watcher::TransmissionFinished;
pub use status::{Flags, Status};
pub use stream::PwmDmaStream;
pub use transmission_buffer::{BufferHalf, TransmissionBuffer};

use crate::{LedStrip, Timing};

/// A WS2812 Neopixel LED Strip driver based on a timer PWM channel fed by a circular DMA stream.
///
/// # Generics:
///
/// * `S` - the PWM/DMA peripheral
/// * `N` - the number of LEDs on the strip
/// * `B` - the number of LEDs refilled per interrupt
pub struct Ws2812Pwm<'a, S, const N: usize, const B: usize>
where
    S: PwmDmaStream,
{
    stream: S,
    buffer: &'static mut TransmissionBuffer<B>,
    strip: &'a LedStrip<N>,
    timing: Timing,
    reset_threshold: u16,
}
