use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Loose tolerance for quantities that went through a view-factor
    /// calculation (ray counts make sums approximate).
    pub const fn view_factor() -> Self {
        Self {
            abs: 1e-3,
            rel: 1e-3,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check that `v` lies in `[min, max]`.
pub fn ensure_in_range(
    v: Real,
    min: Real,
    max: Real,
    what: &'static str,
) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(CoreError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Fraction in [0, 1].
pub fn ensure_fraction(v: Real, what: &'static str) -> Result<Real, CoreError> {
    ensure_in_range(v, 0.0, 1.0, what)
}

/// Round to `digits` decimal places the way result matrices are reported.
#[inline]
pub fn round_to(v: Real, digits: i32) -> Real {
    let scale = 10f64.powi(digits);
    (v * scale).round() / scale
}
