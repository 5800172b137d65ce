//! sRGB colors as authored in the palettes, with conversion to the linear
//! values the renderer works in.

use glam::Vec3;
use std::fmt;

/// An 8-bit-per-channel sRGB color, written the way designers hand it over
/// (`0x1F3FBF` is `#1F3FBF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Build from a packed `0xRRGGBB` value.
    pub const fn hex(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    /// Red, green and blue channels as bytes.
    pub const fn channels(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }

    /// Gamma-encoded channels in `[0, 1]`.
    pub fn to_srgb(self) -> Vec3 {
        let [r, g, b] = self.channels();
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }

    /// Linear channels in `[0, 1]`, suitable for lighting math and sRGB
    /// surface formats.
    pub fn to_linear(self) -> Vec3 {
        let c = self.to_srgb();
        Vec3::new(srgb_to_linear(c.x), srgb_to_linear(c.y), srgb_to_linear(c.z))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_css_hex() {
        assert_eq!(Rgb::hex(0x1F3FBF).to_string(), "#1F3FBF");
        assert_eq!(Rgb::hex(0x0B0B0B).to_string(), "#0B0B0B");
    }

    #[test]
    fn test_channels() {
        assert_eq!(Rgb::hex(0xC4161C).channels(), [0xC4, 0x16, 0x1C]);
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Rgb::hex(0x000000).to_linear(), Vec3::ZERO);
        assert!((Rgb::hex(0xFFFFFF).to_linear() - Vec3::ONE).length() < 1e-5);

        // Mid gray is darker in linear space
        let gray = Rgb::hex(0x808080).to_linear();
        assert!(gray.x > 0.2 && gray.x < 0.23);
    }
}
