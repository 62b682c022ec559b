/// An 8-bit RGB color, as stored per LED.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red intensity.
    pub r: u8,
    /// Green intensity.
    pub g: u8,
    /// Blue intensity.
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const OFF: Self = Self::new(0, 0, 0);

    /// Creates a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) const fn pack(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub(crate) const fn unpack(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }
}

/// A pixel that can be rendered with this library.
pub trait Pixel {
    /// Return the raw bytes that should be sent to the LED strip.
    ///
    /// IMPORTANT: Be aware that WS2812 strips are GRB encoded.
    fn into_ws2812_bytes(self) -> [u8; 3];
}

/// Raw RGB data.
impl Pixel for [u8; 3] {
    fn into_ws2812_bytes(self) -> [u8; 3] {
        // Neopixel strips want GRB data
        [self[1], self[0], self[2]]
    }
}

impl Pixel for Rgb {
    fn into_ws2812_bytes(self) -> [u8; 3] {
        [self.g, self.r, self.b]
    }
}

/// 8-bit Linear sRGB, which is the color space
/// most NeoPixel strips are in.
///
/// Be aware that this differs from normal,
/// gamma-corrected sRGB. A conversion has to take place.
///
/// More info can be found in the documentation of the
/// [palette] crate.
impl Pixel for palette::LinSrgb<u8> {
    fn into_ws2812_bytes(self) -> [u8; 3] {
        [self.green, self.red, self.blue]
    }
}

impl<'a, P> Pixel for &'a P
where
    P: Pixel + Clone,
{
    fn into_ws2812_bytes(self) -> [u8; 3] {
        self.clone().into_ws2812_bytes()
    }
}

/// Reorders wire bytes back into a stored color.
pub(crate) fn rgb_from_ws2812_bytes([g, r, b]: [u8; 3]) -> Rgb {
    Rgb::new(r, g, b)
}
