//! Angle utilities shared by the classifier and the interpreter.

use std::f32::consts::{FRAC_PI_2, PI};

/// Coarse orientation of an undirected angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Within 30° of the horizontal axis.
    Horizontal,
    /// Within 30° of the vertical axis.
    Vertical,
    Diagonal,
}

impl Orientation {
    /// Classify `angle` (radians) from its absolute value in degrees:
    /// horizontal below 30° or above 150°, vertical strictly between 60° and
    /// 120°, diagonal otherwise.
    pub fn of(angle: f32) -> Self {
        let deg = angle.to_degrees().abs();
        if deg < 30.0 || deg > 150.0 {
            Orientation::Horizontal
        } else if deg > 60.0 && deg < 120.0 {
            Orientation::Vertical
        } else {
            Orientation::Diagonal
        }
    }
}

/// Wraps an angle into (-π, π].
#[inline]
pub fn wrap_pi(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Folds an undirected angle into (-π/2, π/2].
#[inline]
pub fn fold_half_pi(angle: f32) -> f32 {
    let mut a = wrap_pi(angle);
    if a > FRAC_PI_2 {
        a -= PI;
    } else if a <= -FRAC_PI_2 {
        a += PI;
    }
    a
}

/// Circular mean of `angles` via summed unit vectors. Empty input → 0.
pub fn circular_mean(angles: &[f32]) -> f32 {
    if angles.is_empty() {
        return 0.0;
    }
    let (sx, sy) = angles
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), a| (sx + a.cos(), sy + a.sin()));
    let n = angles.len() as f32;
    (sy / n).atan2(sx / n)
}
