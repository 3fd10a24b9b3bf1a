//! Easing curves for tween interpolation.
//!
//! Every curve maps `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

use std::f32::consts::PI;

/// Easing curve variants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Constant speed. Used for endless spins so repeats join without a seam.
    Linear,
    /// Slow start, fast end.
    QuadraticIn,
    /// Fast start, slow end.
    #[default]
    QuadraticOut,
    /// Slow start and end.
    QuadraticInOut,
    /// Stronger ease-out.
    CubicOut,
    /// Sinusoidal ease-in-out.
    SineInOut,
    /// Cubic Hermite with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite { c1: f32, c2: f32 },
}

impl Easing {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Easing::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}
