//! Chart colours for group labels.
//!
//! Hues advance by the golden-ratio conjugate from a per-request seed, which
//! keeps neighbouring labels well apart on the colour wheel even for short
//! lists. Saturation and lightness are fixed. Colours are stable within one
//! response only; a new request may pick a new seed.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::config::{GOLDEN_RATIO_CONJUGATE, NEUTRAL_COLOR, PALETTE_LIGHTNESS, PALETTE_SATURATION};

// ---------------------------------------------------------------------------
// HueSeed
// ---------------------------------------------------------------------------

/// Starting hue as a fraction of a full turn, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HueSeed(f64);

impl HueSeed {
    /// Wrap any finite fraction into `[0, 1)`; non-finite input becomes 0.
    pub fn new(fraction: f64) -> Self {
        if fraction.is_finite() {
            Self(unit_fraction(fraction))
        } else {
            Self(0.0)
        }
    }

    /// Pick a seed for one request.
    pub fn random() -> Self {
        Self::new(rand::thread_rng().gen::<f64>())
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Degrees in `[0, 360)`.
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
}

/// Renders CSS `hsl()` notation.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.1}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

// ---------------------------------------------------------------------------
// ColorAssignment
// ---------------------------------------------------------------------------

/// Label-to-colour mapping for a single response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorAssignment {
    labels: Vec<String>,
    colors: HashMap<String, Color>,
}

impl ColorAssignment {
    pub fn get(&self, label: &str) -> Option<Color> {
        self.colors.get(label).copied()
    }

    /// CSS colour for `label`, or the neutral default for unknown labels.
    pub fn color_for(&self, label: &str) -> String {
        self.get(label)
            .map(|c| c.to_string())
            .unwrap_or_else(|| NEUTRAL_COLOR.to_string())
    }

    /// Labels in assignment order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

pub struct Palette;

impl Palette {
    /// Assign a colour to each distinct label, in first-seen order.
    pub fn assign<S: AsRef<str>>(labels: &[S], seed: HueSeed) -> ColorAssignment {
        let mut assignment = ColorAssignment::default();
        for label in labels {
            let label = label.as_ref();
            if assignment.colors.contains_key(label) {
                continue;
            }
            let index = assignment.labels.len();
            let color = Color {
                hue: hue_degrees(seed, index),
                saturation: PALETTE_SATURATION,
                lightness: PALETTE_LIGHTNESS,
            };
            assignment.labels.push(label.to_string());
            assignment.colors.insert(label.to_string(), color);
        }
        assignment
    }
}

/// Hue of the `index`-th label.
pub fn hue_degrees(seed: HueSeed, index: usize) -> f64 {
    let step = unit_fraction(index as f64 * GOLDEN_RATIO_CONJUGATE);
    unit_fraction(seed.fraction() + step) * 360.0
}

/// Shortest angular distance between two hues, in degrees.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Smallest pairwise hue separation guaranteed for `n` labels, in degrees.
///
/// Depends only on the index gap between two labels, never on the seed.
pub fn min_hue_separation(n: usize) -> f64 {
    (1..n)
        .map(|gap| {
            let turn = unit_fraction(gap as f64 * GOLDEN_RATIO_CONJUGATE);
            turn.min(1.0 - turn) * 360.0
        })
        .fold(360.0, f64::min)
}

/// `x mod 1` in `[0, 1)`. `rem_euclid` rounds tiny negatives up to exactly 1.
fn unit_fraction(x: f64) -> f64 {
    let r = x.rem_euclid(1.0);
    if r >= 1.0 {
        0.0
    } else {
        r
    }
}
