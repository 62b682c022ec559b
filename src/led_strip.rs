use core::{
    ops::Range,
    sync::atomic::{AtomicU32, Ordering},
};

use cassette::Cassette;

use crate::{
    errors::SetColorError,
    pixel::{rgb_from_ws2812_bytes, Rgb},
    pwm::{
        finished_watcher::{FinishedWatcher, TransmissionFinished},
        status::{SharedStatus, Status},
    },
    Pixel,
};

/// The colors of a strip of `N` LEDs, plus the transmission state
/// the interrupt handler shares with the application.
///
/// Meant to live in a `static`; every method takes `&self` and never blocks.
///
/// Colors are latched: setting one does not touch the transmission
/// buffer. Changes made while a transmission is in flight may only
/// show up with the next [update](crate::Ws2812Pwm::update).
#[derive(Debug)]
pub struct LedStrip<const N: usize> {
    // 0x00RRGGBB
    colors: [AtomicU32; N],
    pub(crate) status: SharedStatus,
    pub(crate) finished: FinishedWatcher,
}

impl<const N: usize> LedStrip<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const OFF: AtomicU32 = AtomicU32::new(0);

    /// Creates a strip with all LEDs off.
    pub const fn new() -> Self {
        Self {
            colors: [Self::OFF; N],
            status: SharedStatus::new(),
            finished: FinishedWatcher::new(),
        }
    }

    /// The number of LEDs.
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the strip has no LEDs.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Sets the color of a single LED.
    pub fn set_color(&self, index: usize, r: u8, g: u8, b: u8) -> Result<(), SetColorError> {
        let Some(slot) = self.colors.get(index) else {
            return Err(SetColorError::OutOfRange {
                index,
                led_count: N,
            });
        };
        slot.store(Rgb::new(r, g, b).pack(), Ordering::Relaxed);
        Ok(())
    }

    /// Sets the color of a single LED from any [Pixel].
    pub fn set_pixel(&self, index: usize, pixel: impl Pixel) -> Result<(), SetColorError> {
        let Rgb { r, g, b } = rgb_from_ws2812_bytes(pixel.into_ws2812_bytes());
        self.set_color(index, r, g, b)
    }

    /// Sets LEDs in order, starting at the first one.
    ///
    /// Pixels beyond the end of the strip are ignored; LEDs without
    /// a pixel keep their color.
    pub fn set_pixels<P: Pixel>(&self, pixels: impl IntoIterator<Item = P>) {
        for (slot, pixel) in self.colors.iter().zip(pixels) {
            let color = rgb_from_ws2812_bytes(pixel.into_ws2812_bytes());
            slot.store(color.pack(), Ordering::Relaxed);
        }
    }

    /// Sets every LED to the same color.
    pub fn set_all_colors(&self, r: u8, g: u8, b: u8) {
        let packed = Rgb::new(r, g, b).pack();
        for slot in &self.colors {
            slot.store(packed, Ordering::Relaxed);
        }
    }

    /// Turns every LED off.
    pub fn all_off(&self) {
        self.set_all_colors(0, 0, 0);
    }

    /// The stored color of an LED.
    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors
            .get(index)
            .map(|slot| Rgb::unpack(slot.load(Ordering::Relaxed)))
    }

    pub(crate) fn colors(&self, leds: Range<usize>) -> Option<impl Iterator<Item = Rgb> + '_> {
        self.colors
            .get(leds)
            .map(|slots| slots.iter().map(|slot| Rgb::unpack(slot.load(Ordering::Relaxed))))
    }

    /// Whether a transmission is in flight.
    pub fn is_updating(&self) -> bool {
        self.status.snapshot().is_updating()
    }

    /// A snapshot of the transmission state.
    pub fn status(&self) -> Status {
        self.status.snapshot()
    }

    /// Resolves once the current transmission, if any, has finished.
    pub fn transmission_finished(&self) -> TransmissionFinished<'_> {
        TransmissionFinished::new(&self.status, &self.finished)
    }

    /// Spins until the current transmission, if any, has finished.
    ///
    /// Must not be called from a context that preempts the transfer interrupts.
    pub fn block_until_idle(&self) {
        Cassette::new(self.transmission_finished()).block_on()
    }
}

impl<const N: usize> Default for LedStrip<N> {
    fn default() -> Self {
        Self::new()
    }
}
