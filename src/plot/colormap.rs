//! Colormaps and level banding for filled contours.

use crate::errors::{ClimError, Result};
use image::Rgba;

/// Anchor colours of the "haline" ocean colormap, low to high
const HALINE: [(f32, [u8; 3]); 8] = [
    (0.00, [42, 24, 108]),
    (0.15, [16, 55, 161]),
    (0.30, [13, 92, 140]),
    (0.45, [40, 120, 136]),
    (0.60, [63, 149, 132]),
    (0.75, [101, 180, 117]),
    (0.90, [181, 211, 100]),
    (1.00, [253, 239, 154]),
];

/// Piecewise-linear colormap over [0, 1]
#[derive(Debug, Clone)]
pub struct Colormap {
    stops: Vec<(f32, [u8; 3])>,
}

impl Colormap {
    /// Reversed haline: pale yellow for light rain through to deep blue
    pub fn haline_r() -> Self {
        let stops = HALINE
            .iter()
            .rev()
            .map(|&(t, rgb)| (1.0 - t, rgb))
            .collect();
        Self { stops }
    }

    /// Colour at position `t`, clamped to [0, 1]
    pub fn sample(&self, t: f32) -> Rgba<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                return Rgba([
                    lerp(c0[0], c1[0], f),
                    lerp(c0[1], c1[1], f),
                    lerp(c0[2], c1[2], f),
                    255,
                ]);
            }
        }

        let [r, g, b] = self.stops[self.stops.len() - 1].1;
        Rgba([r, g, b, 255])
    }
}

fn lerp(a: u8, b: u8, f: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * f).round() as u8
}

/// How values outside the level range are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extend {
    Neither,
    /// Values above the top level fall into an overflow band
    Max,
}

/// Contour levels with one colour per band
#[derive(Debug, Clone)]
pub struct LevelBands {
    levels: Vec<f64>,
    colors: Vec<Rgba<u8>>,
    over: Option<Rgba<u8>>,
}

impl LevelBands {
    /// Build bands for strictly increasing `levels`.
    ///
    /// Band `i` spans `levels[i]..=levels[i + 1]` and is coloured at the
    /// normalised band midpoint. With [`Extend::Max`] the overflow band takes
    /// the top colour of the map.
    pub fn new(levels: &[f64], colormap: &Colormap, extend: Extend) -> Result<Self> {
        validate_levels(levels)?;

        let lo = levels[0];
        let span = levels[levels.len() - 1] - lo;
        let colors = levels
            .windows(2)
            .map(|w| colormap.sample((((w[0] + w[1]) / 2.0 - lo) / span) as f32))
            .collect();
        let over = (extend == Extend::Max).then(|| colormap.sample(1.0));

        Ok(Self {
            levels: levels.to_vec(),
            colors,
            over,
        })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Number of regular bands (excluding overflow)
    pub fn band_count(&self) -> usize {
        self.colors.len()
    }

    pub fn band_color(&self, band: usize) -> Rgba<u8> {
        self.colors[band]
    }

    pub fn over_color(&self) -> Option<Rgba<u8>> {
        self.over
    }

    /// Colour for a value, or `None` if it is left unfilled.
    ///
    /// The lowest band includes its lower bound; every band includes its
    /// upper bound. Values below the first level, NaN, and values above the
    /// last level without an overflow band are unfilled.
    pub fn color_for(&self, value: f64) -> Option<Rgba<u8>> {
        if value.is_nan() || value < self.levels[0] {
            return None;
        }
        let top = self.levels[self.levels.len() - 1];
        if value > top {
            return self.over;
        }
        let band = self.levels[1..].partition_point(|&upper| upper < value);
        Some(self.colors[band.min(self.colors.len() - 1)])
    }
}

/// Default colorbar levels: 0 to 12 mm/day in steps of 1.5
pub fn default_levels() -> Vec<f64> {
    (0..9).map(|i| f64::from(i) * 1.5).collect()
}

/// Filled contours need at least two finite, strictly increasing levels
pub fn validate_levels(levels: &[f64]) -> Result<()> {
    if levels.len() < 2 {
        return Err(ClimError::InvalidLevels(format!(
            "filled contours require at least 2 levels, got {}",
            levels.len()
        )));
    }
    if let Some(bad) = levels.iter().find(|v| !v.is_finite()) {
        return Err(ClimError::InvalidLevels(format!("non-finite level {bad}")));
    }
    if let Some(pair) = levels.windows(2).find(|w| w[1] <= w[0]) {
        return Err(ClimError::InvalidLevels(format!(
            "levels must be increasing, found {} followed by {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}
