//! Species colours for display.
//!
//! Colours are derived from the species id alone, so the core never stores
//! them and the same species keeps its colour across generations.

use kittener_core::{Population, Result};

/// Colour of genomes that match no species.
pub const UNSPECIATED: [u8; 3] = [255, 255, 255];

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// Stable colour for a species id. Consecutive ids land far apart on the hue wheel.
#[must_use]
pub fn species_color(id: usize) -> [u8; 3] {
    let hue = (id as f64 * GOLDEN_RATIO_CONJUGATE).fract();
    hsv_to_rgb(hue, 0.65, 0.95)
}

/// Colour of the species the genome at `index` is closest to.
pub fn genome_color(population: &Population, index: usize) -> Result<[u8; 3]> {
    Ok(population
        .species_of(index)?
        .map_or(UNSPECIATED, species_color))
}

/// `#rrggbb` form of a colour.
#[must_use]
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{}", hex::encode(color))
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let channel = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}
