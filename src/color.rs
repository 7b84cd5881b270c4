use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Rgb8 – toolkit-neutral colour
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour. Serialises as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb8 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Continuous rating scale
// ---------------------------------------------------------------------------

/// Hue at the low end of the scale (violet).
const LOW_HUE: f32 = 270.0;
/// Hue at the high end of the scale (yellow).
const HIGH_HUE: f32 = 60.0;

/// Maps a rating onto a violet → blue → green → yellow sweep.
///
/// The scale spans the ratings actually present, so a narrow filtered range
/// still uses the full colour range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    lo: f64,
    hi: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { lo: 0.0, hi: 5.0 }
    }
}

impl RatingScale {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Scale spanning the given ratings, or the full `0..=5` scale when empty.
    pub fn spanning(ratings: impl IntoIterator<Item = f64>) -> Self {
        let mut ratings = ratings.into_iter();
        let Some(first) = ratings.next() else {
            return Self::default();
        };
        let (lo, hi) = ratings.fold((first, first), |(lo, hi), r| (lo.min(r), hi.max(r)));
        Self { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Position of `rating` within the scale, clamped to `0..=1`.
    /// A degenerate scale puts everything at the top.
    pub fn fraction(&self, rating: f64) -> f64 {
        let span = self.hi - self.lo;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        ((rating - self.lo) / span).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, rating: f64) -> Rgb8 {
        let t = self.fraction(rating) as f32;
        let hue = LOW_HUE + (HIGH_HUE - LOW_HUE) * t;
        let hsl = Hsl::new(hue, 0.75, 0.30 + 0.25 * t);
        let rgb: Srgb = hsl.into_color();
        Rgb8 {
            r: (rgb.red * 255.0).round() as u8,
            g: (rgb.green * 255.0).round() as u8,
            b: (rgb.blue * 255.0).round() as u8,
        }
    }

    /// `n` evenly spaced (rating, colour) stops for a colour-bar legend.
    pub fn legend_stops(&self, n: usize) -> Vec<(f64, Rgb8)> {
        match n {
            0 => Vec::new(),
            1 => vec![(self.hi, self.color_for(self.hi))],
            _ => (0..n)
                .map(|i| {
                    let rating = self.lo + (self.hi - self.lo) * i as f64 / (n - 1) as f64;
                    (rating, self.color_for(rating))
                })
                .collect(),
        }
    }
}
