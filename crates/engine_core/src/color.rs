//! Structured colours. Kept as numbers through the simulation and only turned
//! into strings when something needs to print them.

use std::fmt;

/// Opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::hex(0xffffff);
    pub const BLACK: Rgb = Rgb::hex(0x000000);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Convert from HSL. `hue` in degrees, `saturation` and `lightness` in `[0, 1]`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Attach an opacity.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba::new(self, alpha)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// RGB colour with a floating opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { rgb: Rgb::BLACK, a: 0.0 };

    /// Non-finite alpha collapses to fully transparent.
    pub fn new(rgb: Rgb, a: f32) -> Self {
        let a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 };
        Self { rgb, a }
    }

    /// Multiply the opacity.
    pub fn fade(self, factor: f32) -> Self {
        Self::new(self.rgb, self.a * factor)
    }

    /// Linear interpolation of both channels and opacity.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::new(
            Rgb::new(
                mix(self.rgb.r, other.rgb.r),
                mix(self.rgb.g, other.rgb.g),
                mix(self.rgb.b, other.rgb.b),
            ),
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn is_invisible(&self) -> bool {
        self.a <= 0.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.3})", self.rgb.r, self.rgb.g, self.rgb.b, self.a)
    }
}
