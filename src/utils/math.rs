//! # Noise Mathematics
//!
//! Small interpolation and vector helpers shared by the noise generator.

/// Hermite easing `3t² - 2t³`.
///
/// # Examples
///
/// ```
/// use wayfarer::s_curve;
///
/// assert_eq!(s_curve(0.0), 0.0);
/// assert_eq!(s_curve(0.5), 0.5);
/// assert_eq!(s_curve(1.0), 1.0);
/// ```
#[inline]
pub fn s_curve(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Scales `v` to unit length. Zero vectors are left untouched.
pub fn normalize<const N: usize>(v: &mut [f64; N]) {
    let length = v.iter().map(|c| c * c).sum::<f64>().sqrt();
    if length == 0.0 {
        return;
    }
    for component in v.iter_mut() {
        *component /= length;
    }
}

/// Dot product of a corner offset with a 2D gradient.
#[inline]
pub fn dot2(rx: f64, ry: f64, gradient: [f64; 2]) -> f64 {
    rx * gradient[0] + ry * gradient[1]
}
