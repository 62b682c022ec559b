use crate::{
    timing::{Timing, BITS_PER_COLOR, BITS_PER_LED},
    Pixel,
};

/// Encodes the three wire bytes of one LED into PWM compare values.
///
/// Bytes are sent in the order given, most significant bit first.
pub fn encode_led(bytes: [u8; 3], timing: &Timing, pulses: &mut [u16; BITS_PER_LED]) {
    for (channel, byte) in pulses.chunks_exact_mut(BITS_PER_COLOR).zip(bytes) {
        for (bit, pulse) in channel.iter_mut().enumerate() {
            *pulse = timing.duty_for(byte & (0x80 >> bit) != 0);
        }
    }
}

/// Encodes a pixel, converting it to GRB wire order first.
pub fn encode_pixel(pixel: impl Pixel, timing: &Timing) -> [u16; BITS_PER_LED] {
    let mut pulses = [0; BITS_PER_LED];
    encode_led(pixel.into_ws2812_bytes(), timing, &mut pulses);
    pulses
}

/// Recovers the wire bytes from encoded pulses.
///
/// Everything above the midpoint of the two duty cycles counts as `1`.
pub fn decode_led(pulses: &[u16; BITS_PER_LED], timing: &Timing) -> [u8; 3] {
    let midpoint = timing.midpoint();

    let mut bytes = [0; 3];
    for (byte, channel) in bytes.iter_mut().zip(pulses.chunks_exact(BITS_PER_COLOR)) {
        *byte = channel
            .iter()
            .fold(0, |acc, &pulse| (acc << 1) | u8::from(pulse > midpoint));
    }
    bytes
}
