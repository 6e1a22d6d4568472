//! Animatable value types
//!
//! Values a tween can drive between a start and an end value.

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` is usually in `[0, 1]` but overshooting curves push it past 1.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t as f64
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon as f64
    }
}

/// Pairs interpolate component-wise (used for 2D offsets)
impl Interpolate for (f32, f32) {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        (self.0.lerp(&other.0, t), self.1.lerp(&other.1, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.0.approx_eq(&other.0, epsilon) && self.1.approx_eq(&other.1, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(0.0f32.lerp(&100.0, 0.25), 25.0);
        assert_eq!(30.0f32.lerp(&0.0, 1.0), 0.0);
    }

    #[test]
    fn test_lerp_extrapolates_on_overshoot() {
        let v = 0.8f32.lerp(&1.0, 1.1);
        assert!(v > 1.0);
    }

    #[test]
    fn test_pair_lerp() {
        let a = (0.0f32, 10.0f32);
        let b = (10.0f32, 0.0f32);
        assert!(a.lerp(&b, 0.5).approx_eq(&(5.0, 5.0), 1e-6));
    }
}
