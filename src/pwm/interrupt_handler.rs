use super::{BufferHalf, PwmDmaStream, Ws2812Pwm};

impl<S, const N: usize, const B: usize> Ws2812Pwm<'_, S, N, B>
where
    S: PwmDmaStream,
{
    /// Signals to the driver that the DMA finished reading the first half of the buffer.
    ///
    /// Needs to be called inside of the "half transferred" callback of the DMA.
    /// Does not block.
    pub fn on_half_transfer(&mut self) {
        self.on_transfer(BufferHalf::First);
    }

    /// Signals to the driver that the DMA wrapped back to the start of the buffer.
    ///
    /// Needs to be called inside of the "fully transferred" callback of the DMA.
    /// Does not block.
    pub fn on_full_transfer(&mut self) {
        self.on_transfer(BufferHalf::Second);
    }
}
