//! Color types and palettes.
//!
//! Provides an 8-bit RGBA color plus the polar CIE-Luv (HCL) space used to
//! generate perceptually balanced discrete hue palettes.
//!
//! # References
//!
//! - Ihaka, R. (2003). "Colour for Presentation Graphics." DSC 2003.
//! - Zeileis, A., Hornik, K., & Murrell, P. (2009). "Escaping RGBland: Selecting
//!   Colors for Statistical Graphics." *Computational Statistics & Data Analysis*.

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    /// Mid grey (`grey50`).
    pub const GREY: Self = Self::rgb(127, 127, 127);
    /// `steelblue`, the chapter's default histogram fill.
    pub const STEELBLUE: Self = Self::rgb(70, 130, 180);
    /// `cornflowerblue`.
    pub const CORNFLOWER: Self = Self::rgb(100, 149, 237);
    /// Dark end of the default continuous gradient (`#132B43`).
    pub const GRADIENT_LOW: Self = Self::rgb(0x13, 0x2B, 0x43);
    /// Light end of the default continuous gradient (`#56B1F7`).
    pub const GRADIENT_HIGH: Self = Self::rgb(0x56, 0xB1, 0xF7);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Multiply the alpha channel by an opacity in `[0, 1]`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha((f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || Error::Palette(format!("invalid hex color '{hex}'"));
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Format as `#RRGGBB` (alpha omitted).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }
}

/// Polar CIE-Luv color: hue in degrees, chroma, luminance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hcl {
    /// Hue (degrees).
    pub h: f32,
    /// Chroma.
    pub c: f32,
    /// Luminance (0-100).
    pub l: f32,
}

/// D65 reference white.
const WHITE_X: f32 = 95.047;
const WHITE_Y: f32 = 100.0;
const WHITE_Z: f32 = 108.883;

impl Hcl {
    /// Create a new HCL color.
    #[must_use]
    pub const fn new(h: f32, c: f32, l: f32) -> Self {
        Self { h, c, l }
    }

    /// Convert to opaque sRGB, clamping out-of-gamut channels.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        if self.l <= 0.0 {
            return Rgba::BLACK;
        }
        let denom = WHITE_X + 15.0 * WHITE_Y + 3.0 * WHITE_Z;
        let un = 4.0 * WHITE_X / denom;
        let vn = 9.0 * WHITE_Y / denom;

        let (sin, cos) = self.h.to_radians().sin_cos();
        let u = self.c * cos;
        let v = self.c * sin;

        let y = if self.l > 8.0 {
            WHITE_Y * ((self.l + 16.0) / 116.0).powi(3)
        } else {
            WHITE_Y * self.l / 903.3
        };
        let up = u / (13.0 * self.l) + un;
        let vp = v / (13.0 * self.l) + vn;
        let x = 9.0 * y * up / (4.0 * vp);
        let z = -x / 3.0 - 5.0 * y + 3.0 * y / vp;
        let (x, y, z) = (x / 100.0, y / 100.0, z / 100.0);

        let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
        let g = -0.969_256 * x + 1.875_992 * y + 0.041_556 * z;
        let b = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

        Rgba::rgb(gamma(r), gamma(g), gamma(b))
    }
}

fn gamma(linear: f32) -> u8 {
    let c = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl From<Hcl> for Rgba {
    fn from(hcl: Hcl) -> Self {
        hcl.to_rgba()
    }
}

/// `n` evenly spaced hues starting at 15°, chroma 100, luminance 65.
#[must_use]
pub fn hue_palette(n: usize) -> Vec<Rgba> {
    (0..n).map(|i| Hcl::new(15.0 + 360.0 * i as f32 / n as f32, 100.0, 65.0).to_rgba()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::STEELBLUE.to_hex(), "#4682B4");
    }

    #[test]
    fn test_rgba_lerp() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid.r, 127);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 1.5), Rgba::WHITE);
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(Rgba::RED.with_opacity(0.5).a, 128);
        assert_eq!(Rgba::RED.with_opacity(2.0).a, 255);
        assert_eq!(Rgba::RED.with_alpha(100).with_opacity(0.5).a, 50);
    }

    #[test]
    fn test_hex_round_trip() {
        let c = Rgba::from_hex("#F8766D").unwrap();
        assert_eq!(c, Rgba::rgb(248, 118, 109));
        assert_eq!(c.to_hex(), "#F8766D");
        assert_eq!(Rgba::from_hex("00000080").unwrap().a, 128);
    }

    #[test]
    fn test_hex_invalid() {
        assert!(Rgba::from_hex("#12345").is_err());
        assert!(Rgba::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_hue_palette_matches_defaults() {
        let two = hue_palette(2);
        assert_eq!(two[0].to_hex(), "#F8766D");
        assert_eq!(two[1].to_hex(), "#00BFC4");

        let three = hue_palette(3);
        assert_eq!(three[1].to_hex(), "#00BA38");
        assert_eq!(three[2].to_hex(), "#619CFF");
    }

    #[test]
    fn test_hcl_black() {
        assert_eq!(Hcl::new(0.0, 0.0, 0.0).to_rgba(), Rgba::BLACK);
    }

    #[test]
    fn test_hcl_grey() {
        let grey: Rgba = Hcl::new(0.0, 0.0, 50.0).into();
        assert_eq!(grey.r, grey.g);
        assert_eq!(grey.g, grey.b);
    }
}
