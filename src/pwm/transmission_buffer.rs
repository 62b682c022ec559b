use crate::timing::BITS_PER_LED;

/// One half of the [TransmissionBuffer].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferHalf {
    /// The first half; the DMA finished reading it when the
    /// "half transferred" signal fires.
    First,
    /// The second half; the DMA finished reading it when the
    /// "fully transferred" signal fires.
    Second,
}

impl BufferHalf {
    /// The half an LED batch lands in, counting batches from the start of a frame.
    pub const fn of_batch(batch: usize) -> Self {
        if batch % 2 == 0 {
            Self::First
        } else {
            Self::Second
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// The circular buffer the DMA streams into the PWM compare register.
///
/// # Generics:
///
/// * `B` - the number of LEDs refilled per interrupt; each half holds one batch
///
/// Lives for `'static`, as the DMA keeps reading from it for the whole
/// duration of a transmission.
///
/// A batch holds at least one LED; an empty buffer is rejected at compile time:
///
/// ```compile_fail
/// use ws2812_pwm_dma::TransmissionBuffer;
///
/// let buffer = TransmissionBuffer::<0>::new();
/// ```
#[derive(Debug)]
#[repr(C, align(4))]
pub struct TransmissionBuffer<const B: usize> {
    /// The data. Would ideally be `[u16; 2*B*BITS_PER_LED]`, but const expressions aren't there yet.
    /// So we need to trick it with a pointer reinterpret cast later.
    halves: [[[u16; BITS_PER_LED]; B]; 2],
}

impl<const B: usize> TransmissionBuffer<B> {
    pub(crate) const NON_EMPTY: () = assert!(B > 0, "a batch needs at least one LED");

    /// Creates a new, idle buffer.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;

        Self {
            halves: [[[0; BITS_PER_LED]; B]; 2],
        }
    }

    /// Number of pulses in the whole buffer.
    pub const fn len(&self) -> usize {
        2 * Self::HALF_LEN
    }

    /// Number of pulses in one half.
    pub const HALF_LEN: usize = B * BITS_PER_LED;

    /// Number of LED slots in the whole ring.
    pub const LED_SLOTS: usize = 2 * B;

    /// The pulse slot of the given LED in a frame.
    ///
    /// The ring holds exactly two batches, so the LED at
    /// `led` lands at `led * BITS_PER_LED mod len`.
    pub fn led_slot_mut(&mut self, led: usize) -> &mut [u16; BITS_PER_LED] {
        let slot = led % Self::LED_SLOTS;
        &mut self.halves[slot / B][slot % B]
    }

    /// Sets a whole half to the idle level.
    pub fn clear_half(&mut self, half: BufferHalf) {
        for pulses in self.halves[half.index()].iter_mut() {
            pulses.fill(0);
        }
    }

    /// Sets the whole buffer to the idle level.
    pub fn clear(&mut self) {
        self.clear_half(BufferHalf::First);
        self.clear_half(BufferHalf::Second);
    }

    /// The data the DMA reads.
    pub fn as_slice(&self) -> &[u16] {
        let ptr = self.halves.as_ptr().cast();
        let len = self.len();

        /* SAFETY
            Our data is contiguous, so we can cast freely between [[[u16;X];Y];2] and [u16;X*Y*2].
        */
        unsafe { core::slice::from_raw_parts(ptr, len) }
    }

    /// The pulses of one half.
    pub fn half(&self, half: BufferHalf) -> &[u16] {
        let start = half.index() * Self::HALF_LEN;
        &self.as_slice()[start..start + Self::HALF_LEN]
    }
}

impl<const B: usize> Default for TransmissionBuffer<B> {
    fn default() -> Self {
        Self::new()
    }
}
