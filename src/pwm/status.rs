use core::sync::atomic::{AtomicU16, AtomicU8, Ordering};

/// The operation flags of a transmission.
///
/// Set in strict order: none, `UPDATING`, `RESET_SIGNAL`, `DMA_STOP`;
/// cleared all at once when the stream stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    /// No transmission.
    pub const NONE: Self = Self(0);
    /// A transmission is active; update requests are dropped.
    pub const UPDATING: Self = Self(1 << 0);
    /// All LEDs are encoded; the idle gap is being emitted.
    pub const RESET_SIGNAL: Self = Self(1 << 1);
    /// The idle gap is complete; the next interrupt halts the stream.
    pub const DMA_STOP: Self = Self(1 << 2);

    /// Whether all flags of `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
}

impl core::ops::BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A snapshot of the transmission progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// The operation flags.
    pub flags: Flags,
    /// LEDs encoded into the buffer since the transmission started.
    pub leds_encoded: u16,
    /// Interrupts spent emitting the idle gap.
    pub reset_interrupts: u16,
}

impl Status {
    /// Whether a transmission is in flight.
    pub const fn is_updating(&self) -> bool {
        self.flags.contains(Flags::UPDATING)
    }
}

/// Transmission state shared between task and interrupt context.
///
/// Only plain loads and stores are used: while a transmission is
/// active, the interrupt handler is the only writer. This also keeps
/// the crate usable on cores without atomic read-modify-write.
#[derive(Debug, Default)]
pub(crate) struct SharedStatus {
    flags: AtomicU8,
    leds_encoded: AtomicU16,
    reset_interrupts: AtomicU16,
}

impl SharedStatus {
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
            leds_encoded: AtomicU16::new(0),
            reset_interrupts: AtomicU16::new(0),
        }
    }

    pub fn flags(&self) -> Flags {
        Flags::from_bits(self.flags.load(Ordering::Acquire))
    }

    pub fn set_flags(&self, flags: Flags) {
        self.flags.store(flags.bits(), Ordering::Release);
    }

    pub fn leds_encoded(&self) -> u16 {
        self.leds_encoded.load(Ordering::Acquire)
    }

    pub fn set_leds_encoded(&self, leds: u16) {
        self.leds_encoded.store(leds, Ordering::Release);
    }

    pub fn reset_interrupts(&self) -> u16 {
        self.reset_interrupts.load(Ordering::Acquire)
    }

    pub fn set_reset_interrupts(&self, count: u16) {
        self.reset_interrupts.store(count, Ordering::Release);
    }

    /// Clears flags and counters, ready for the next transmission.
    pub fn reset(&self) {
        self.set_leds_encoded(0);
        self.set_reset_interrupts(0);
        self.set_flags(Flags::NONE);
    }

    pub fn snapshot(&self) -> Status {
        Status {
            flags: self.flags(),
            leds_encoded: self.leds_encoded(),
            reset_interrupts: self.reset_interrupts(),
        }
    }
}
