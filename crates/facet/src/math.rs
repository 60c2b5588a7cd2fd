//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. Two seams live here:
//!
//! - [`Matrix4`]: anything that can hand over 16 column-major values for the
//!   3D projection step.
//! - [`Affine2d`]: the six-component 2D screen transform applied after
//!   projection, and [`Transform2d`], a position/rotation/scale way to build one.

use serde::{Deserialize, Serialize};

pub use glam::{DAffine2, DMat4, DVec2, DVec3, Mat4};

/// A 4x4 transform exposed as 16 values in column-major (OpenGL) order:
/// `values()[0..4]` is column 0, `values()[12..16]` is column 3 (translation).
pub trait Matrix4 {
    fn values(&self) -> [f64; 16];
}

impl Matrix4 for DMat4 {
    fn values(&self) -> [f64; 16] {
        self.to_cols_array()
    }
}

impl Matrix4 for Mat4 {
    fn values(&self) -> [f64; 16] {
        self.to_cols_array().map(f64::from)
    }
}

impl Matrix4 for [f64; 16] {
    fn values(&self) -> [f64; 16] {
        *self
    }
}

impl Matrix4 for [f32; 16] {
    fn values(&self) -> [f64; 16] {
        self.map(f64::from)
    }
}

impl<M: Matrix4 + ?Sized> Matrix4 for &M {
    fn values(&self) -> [f64; 16] {
        (**self).values()
    }
}

/// A 2D affine transform in canvas notation.
///
/// ```text
/// | a  c  e |   | x |
/// | b  d  f | * | y |
/// | 0  0  1 |   | 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine2d {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine2d {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pure translation.
    pub const fn from_translation(e: f64, f: f64) -> Self {
        Self { e, f, ..Self::IDENTITY }
    }

    /// Map a point through the transform.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Compose: the result applies `self` first, then `next`.
    pub fn then(&self, next: &Affine2d) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }
}

impl Default for Affine2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<DAffine2> for Affine2d {
    fn from(m: DAffine2) -> Self {
        Self {
            a: m.matrix2.x_axis.x,
            b: m.matrix2.x_axis.y,
            c: m.matrix2.y_axis.x,
            d: m.matrix2.y_axis.y,
            e: m.translation.x,
            f: m.translation.y,
        }
    }
}

impl From<Affine2d> for DAffine2 {
    fn from(m: Affine2d) -> Self {
        DAffine2::from_cols(
            DVec2::new(m.a, m.b),
            DVec2::new(m.c, m.d),
            DVec2::new(m.e, m.f),
        )
    }
}

/// Screen-space placement of a parent display object: translation, rotation
/// (radians) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2d {
    pub translation: DVec2,
    pub rotation: f64,
    pub scale: DVec2,
}

impl Transform2d {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: DVec2::ZERO,
        rotation: 0.0,
        scale: DVec2::ONE,
    };

    /// Create a transform at the given screen position.
    pub fn from_xy(x: f64, y: f64) -> Self {
        Self {
            translation: DVec2::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Return a copy rotated to `radians`.
    pub fn with_rotation(mut self, radians: f64) -> Self {
        self.rotation = radians;
        self
    }

    /// Return a copy with a non-uniform scale.
    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = DVec2::new(sx, sy);
        self
    }

    /// Translate · rotate · scale, in canvas form.
    pub fn matrix(&self) -> Affine2d {
        let (sin, cos) = self.rotation.sin_cos();
        Affine2d {
            a: cos * self.scale.x,
            b: sin * self.scale.x,
            c: -sin * self.scale.y,
            d: cos * self.scale.y,
            e: self.translation.x,
            f: self.translation.y,
        }
    }
}

impl Default for Transform2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn glam_matrices_are_column_major() {
        let m = DMat4::from_translation(DVec3::new(7.0, 8.0, 9.0));
        let v = m.values();
        assert_eq!(&v[12..15], &[7.0, 8.0, 9.0], "translation lives in column 3");
        assert_eq!(v[15], 1.0);

        let single = Mat4::from_translation(glam::Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(single.values(), v);
    }

    #[test]
    fn raw_arrays_pass_through() {
        let mut raw = [0.0f64; 16];
        raw[5] = 3.0;
        assert_eq!(raw.values()[5], 3.0);
        assert_eq!((&raw).values(), raw);
    }

    #[test]
    fn affine_apply_matches_canvas_convention() {
        let m = Affine2d::new(2.0, 0.5, -1.0, 3.0, 10.0, 20.0);
        let (x, y) = m.apply(4.0, 5.0);
        assert_eq!(x, 4.0 * 2.0 + 5.0 * -1.0 + 10.0);
        assert_eq!(y, 4.0 * 0.5 + 5.0 * 3.0 + 20.0);
    }

    #[test]
    fn then_applies_left_first() {
        let scale = Affine2d::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Affine2d::from_translation(5.0, -1.0);
        let (x, y) = scale.then(&shift).apply(3.0, 4.0);
        assert_eq!((x, y), (11.0, 7.0));
    }

    #[test]
    fn daffine_round_trip_keeps_components() {
        let m = Affine2d::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let glam_m: DAffine2 = m.into();
        let p = glam_m.transform_point2(DVec2::new(1.5, -2.0));
        let (x, y) = m.apply(1.5, -2.0);
        assert!(approx(p.x, x) && approx(p.y, y), "got {p:?}");
        assert_eq!(Affine2d::from(glam_m), m);
    }

    #[test]
    fn transform2d_rotates_then_translates() {
        let t = Transform2d::from_xy(100.0, 50.0)
            .with_rotation(std::f64::consts::FRAC_PI_2)
            .with_scale(2.0, 2.0);
        let (x, y) = t.matrix().apply(1.0, 0.0);
        assert!(approx(x, 100.0), "got {x}");
        assert!(approx(y, 52.0), "got {y}");
    }

    #[test]
    fn default_transform2d_is_identity_affine() {
        assert_eq!(Transform2d::default().matrix(), Affine2d::IDENTITY);
    }
}
