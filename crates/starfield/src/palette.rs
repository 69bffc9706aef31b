//! Fixed colour tables.

use engine_core::Rgb;
use rand::Rng;

/// Star tints: white, light blue, warm white, light purple, light green, light pink.
pub const STAR_COLORS: [Rgb; 6] = [
    Rgb::hex(0xffffff),
    Rgb::hex(0xe6f3ff),
    Rgb::hex(0xfff0e6),
    Rgb::hex(0xf0e6ff),
    Rgb::hex(0xe6fff0),
    Rgb::hex(0xffe6f0),
];

pub const WAVE_COLORS: [Rgb; 4] = [
    Rgb::hex(0x7042f8),
    Rgb::hex(0xba9cff),
    Rgb::hex(0x00d4ff),
    Rgb::hex(0xff6b6b),
];

pub const TUNNEL_RING: Rgb = Rgb::hex(0x00d4ff);
pub const TUNNEL_SPOKE: Rgb = Rgb::hex(0x7042f8);
pub const NEBULA_CORE: Rgb = Rgb::hex(0x7042f8);
pub const NEBULA_EDGE: Rgb = Rgb::hex(0xba9cff);
pub const AURORA: [Rgb; 4] = [
    Rgb::hex(0x7042f8),
    Rgb::hex(0xba9cff),
    Rgb::hex(0x00d4ff),
    Rgb::hex(0xff6b6b),
];

pub fn random_star_color(rng: &mut impl Rng) -> Rgb {
    STAR_COLORS[rng.gen_range(0..STAR_COLORS.len())]
}

pub fn random_wave_color(rng: &mut impl Rng) -> Rgb {
    WAVE_COLORS[rng.gen_range(0..WAVE_COLORS.len())]
}

/// Orange to yellow, fully saturated and light.
pub fn random_meteor_color(rng: &mut impl Rng) -> Rgb {
    Rgb::from_hsl(rng.gen_range(15.0..75.0), 1.0, 0.7)
}
