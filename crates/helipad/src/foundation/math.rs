//! Math utilities and types
//!
//! Provides the 2D math types used by the engine. Rotations are stored in
//! degrees, clockwise on screen (Y axis points down).

pub use nalgebra::{Matrix3, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type, used for homogeneous 2D coordinates
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type for homogeneous 2D transforms
pub type Mat3 = Matrix3<f32>;

/// Shorthand constructor for [`Vec2`]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

/// Linear interpolation between two scalars
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Linear interpolation between two vectors
pub fn lerp_vec2(from: &Vec2, to: &Vec2, t: f32) -> Vec2 {
    from + (to - from) * t
}

/// Math utility functions
pub mod utils {
    use super::Vec2;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians.to_degrees()
    }

    /// Unit vector pointing "right" for a rotation in degrees
    ///
    /// At 0 degrees this is `(1, 0)`.
    pub fn right_from_degrees(degrees: f32) -> Vec2 {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        Vec2::new(cos, sin)
    }

    /// Unit vector pointing "forward" for a rotation in degrees
    ///
    /// At 0 degrees this is `(0, 1)`.
    pub fn forward_from_degrees(degrees: f32) -> Vec2 {
        let (sin, cos) = deg_to_rad(degrees).sin_cos();
        Vec2::new(-sin, cos)
    }

    /// Scale a vector down so its length does not exceed `max_length`
    ///
    /// A non-positive limit means "unlimited".
    pub fn clamp_length(vector: Vec2, max_length: f32) -> Vec2 {
        if max_length <= 0.0 {
            return vector;
        }
        let length = vector.norm();
        if length > max_length {
            vector * (max_length / length)
        } else {
            vector
        }
    }

    /// Normalize a vector, returning zero for the zero vector
    pub fn normalize_or_zero(vector: Vec2) -> Vec2 {
        vector.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros)
    }
}
