/// The timer/DMA peripheral that streams the transmission buffer into
/// the compare register of a PWM channel.
///
/// The implementation carries the timer handle and channel; the driver
/// only ever starts and stops it.
///
/// # Safety
///
/// `start_stream` hands out a buffer that the DMA keeps reading after
/// the call returned. Implementations must:
///
/// * output `buffer` circularly, one element per bit period, until
///   [stop_stream](PwmDmaStream::stop_stream) is called;
/// * invoke [on_half_transfer](crate::Ws2812Pwm::on_half_transfer) when
///   the read cursor crosses the middle of the buffer, and
///   [on_full_transfer](crate::Ws2812Pwm::on_full_transfer) when it wraps
///   to the start, never both at once;
/// * have stopped all DMA reads from `buffer` when `stop_stream` returns.
///
/// `buffer` is always borrowed from a `'static` [TransmissionBuffer](crate::TransmissionBuffer),
/// so a stream that is never stopped, for example because the driver got
/// leaked with [core::mem::forget], keeps reading valid memory. The driver
/// leaves the buffer unchanged, except for the half the DMA just finished
/// reading, until it calls `stop_stream`.
pub unsafe trait PwmDmaStream {
    /// Begins continuous circular output of `buffer`.
    fn start_stream(&mut self, buffer: &[u16]);

    /// Halts the output; the PWM pin has to fall back to low.
    ///
    /// Only called from within a transfer callback, or while no
    /// transfer callback can run.
    fn stop_stream(&mut self);
}
