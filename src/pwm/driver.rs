use core::mem::ManuallyDrop;

use super::{
    encoder::encode_led, status::Flags, BufferHalf, PwmDmaStream, TransmissionBuffer, Ws2812Pwm,
};
use crate::{
    errors::{InitError, RefillError},
    LedStrip, Pixel, Timing,
};

impl<'a, S, const N: usize, const B: usize> Ws2812Pwm<'a, S, N, B>
where
    S: PwmDmaStream,
{
    /// Initializes the driver.
    ///
    /// IMPORTANT! The PWM timer has to be configured for 800 kHz,
    /// with the compare values of `timing` matching its period.
    ///
    /// `N` has to be a multiple of `B`, and hold at least two batches.
    ///
    /// The buffer is borrowed for `'static`: the DMA may keep reading it
    /// even if the driver gets leaked mid-transmission.
    pub fn init(
        stream: S,
        buffer: &'static mut TransmissionBuffer<B>,
        strip: &'a LedStrip<N>,
        timing: Timing,
    ) -> Result<Self, InitError> {
        #[allow(clippy::let_unit_value)]
        let () = TransmissionBuffer::<B>::NON_EMPTY;

        if N % B != 0 {
            return Err(InitError::LedCountNotMultipleOfBatch {
                led_count: N,
                batch_size: B,
            });
        }
        if N < 2 * B {
            return Err(InitError::TooFewLeds {
                led_count: N,
                batch_size: B,
            });
        }
        if N > usize::from(u16::MAX) {
            return Err(InitError::TooManyLeds { led_count: N });
        }
        if timing.duty_low == 0 || timing.duty_high <= timing.duty_low {
            return Err(InitError::InvalidTiming {
                duty_high: timing.duty_high,
                duty_low: timing.duty_low,
            });
        }
        if timing.reset_cycles == 0 {
            return Err(InitError::ZeroResetCycles);
        }

        let reset_threshold = timing.reset_interrupts(TransmissionBuffer::<B>::HALF_LEN);

        log::debug!("Initializing WS2812 PWM driver.");
        log::debug!("    {} LEDs, {} per interrupt", N, B);
        log::debug!("    Buffer: {} pulses", buffer.len());
        log::debug!(
            "    Duty cycles: high {}, low {}",
            timing.duty_high,
            timing.duty_low
        );
        log::debug!(
            "    Idle gap: {} bit periods, {} interrupts",
            timing.reset_cycles,
            reset_threshold
        );

        buffer.clear();
        strip.status.reset();

        Ok(Self {
            stream,
            buffer,
            strip,
            timing,
            reset_threshold,
        })
    }

    /// Starts transmitting the colors of the strip.
    ///
    /// Does nothing if a transmission is already in flight.
    pub fn update(&mut self) {
        let strip = self.strip;
        let status = &strip.status;
        if status.flags().contains(Flags::UPDATING) {
            log::debug!("Transmission in flight, dropping update request.");
            return;
        }

        // The first interrupt only fires after the first half got streamed,
        // so both halves have to be valid before the stream starts.
        let primed = 2 * B;
        if let Err(e) = self.refill(0, primed) {
            log::error!("Unable to prime transmission buffer: {}", e);
            return;
        }

        let flags = if primed >= N {
            Flags::UPDATING | Flags::RESET_SIGNAL
        } else {
            Flags::UPDATING
        };

        status.set_reset_interrupts(0);
        status.set_leds_encoded(primed as u16);
        status.set_flags(flags);

        log::trace!("Starting transmission of {} LEDs.", N);
        self.stream.start_stream(self.buffer.as_slice());
    }

    /// Encodes `count` LEDs, starting at `start_led`, into their slots of the ring.
    pub fn refill(&mut self, start_led: usize, count: usize) -> Result<(), RefillError> {
        let strip = self.strip;
        let colors = start_led
            .checked_add(count)
            .filter(|&end| start_led < N && end <= N)
            .and_then(|end| strip.colors(start_led..end));

        let Some(colors) = colors else {
            return Err(RefillError::OutOfBounds {
                start_led,
                count,
                led_count: N,
            });
        };

        for (led, color) in (start_led..).zip(colors) {
            encode_led(
                color.into_ws2812_bytes(),
                &self.timing,
                self.buffer.led_slot_mut(led),
            );
        }

        Ok(())
    }

    /// Advances the transmission by one step.
    ///
    /// `vacated` is the half of the buffer the DMA just finished reading;
    /// it is the only part of the buffer that gets written.
    ///
    /// Newly set `RESET_SIGNAL` and `DMA_STOP` flags only take effect on the
    /// following call, so the data already queued in the other half is
    /// streamed out completely.
    pub fn on_transfer(&mut self, vacated: BufferHalf) {
        let strip = self.strip;
        let status = &strip.status;
        let flags = status.flags();

        if flags.contains(Flags::DMA_STOP) {
            self.finish();
            return;
        }

        if flags.contains(Flags::RESET_SIGNAL) {
            self.buffer.clear_half(vacated);

            let reset_interrupts = status.reset_interrupts().saturating_add(1);
            status.set_reset_interrupts(reset_interrupts);

            if reset_interrupts >= self.reset_threshold {
                log::trace!("Idle gap complete.");
                status.set_flags(flags | Flags::DMA_STOP);
            }
            return;
        }

        if !flags.contains(Flags::UPDATING) {
            log::warn!("Transfer signal without transmission.");
            return;
        }

        let leds_encoded = usize::from(status.leds_encoded());
        debug_assert_eq!(BufferHalf::of_batch(leds_encoded / B), vacated);

        if let Err(e) = self.refill(leds_encoded, B) {
            log::error!("Aborting transmission: {}", e);
            self.finish();
            return;
        }

        let leds_encoded = leds_encoded + B;
        status.set_leds_encoded(leds_encoded as u16);

        if leds_encoded >= N {
            log::trace!("All LEDs encoded, emitting idle gap.");
            status.set_flags(flags | Flags::RESET_SIGNAL);
        }
    }

    fn finish(&mut self) {
        self.stream.stop_stream();
        self.strip.status.reset();
        self.strip.finished.notify();
        log::trace!("Transmission finished.");
    }

    /// The data the DMA reads.
    pub fn dma_buffer(&self) -> &[u16] {
        self.buffer.as_slice()
    }

    /// The timing the driver encodes with.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Number of idle gap interrupts before the stream gets halted.
    pub fn reset_threshold(&self) -> u16 {
        self.reset_threshold
    }

    /// The strip this driver transmits.
    pub fn strip(&self) -> &'a LedStrip<N> {
        self.strip
    }

    /// Halts an in-flight transmission and returns the peripheral.
    pub fn release(self) -> S {
        let mut this = ManuallyDrop::new(self);
        if this.strip.is_updating() {
            this.finish();
        }

        /* SAFETY
            `this` is never dropped or used again, so the stream is moved out exactly once.
            All other fields are references or plain data without drop glue.
        */
        unsafe { core::ptr::read(&this.stream) }
    }
}

impl<S, const N: usize, const B: usize> Drop for Ws2812Pwm<'_, S, N, B>
where
    S: PwmDmaStream,
{
    fn drop(&mut self) {
        // Leave the pin idle once the driver is gone
        if self.strip.is_updating() {
            self.finish();
        }
    }
}
