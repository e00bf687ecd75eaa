//! Transform math for placing, spinning and projecting a mesh.
//!
//! Every function here is a closed-form constructor over [`glam`] types. Nothing
//! holds state, and the only failure mode is degenerate input, which is reported
//! through [`MathError`] instead of leaking NaN-filled matrices.
//!
//! # Conventions
//!
//! - Angles are radians unless a function name says degrees.
//! - Matrices are column-major and applied as `M * v` to column vectors.
//! - Composed transforms apply scale and rotation before translation.
//!
//! # Example
//!
//! ```
//! use turntable::math::{homogeneous, rotation_y, translation};
//! use turntable::{Vec3, Vec4};
//!
//! let model = translation(Vec3::new(0.0, 1.0, 0.0)) * rotation_y(0.0);
//! let moved = model * homogeneous(Vec3::ZERO);
//! assert_eq!(moved, Vec4::new(0.0, 1.0, 0.0, 1.0));
//! ```

use glam::{Mat3, Mat4, Vec3, Vec4};
use std::f32::consts::PI;

/// Errors produced when a transform is built from degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    /// The matrix has a zero (or subnormal) determinant.
    #[error("non-invertible matrix (determinant {determinant})")]
    NonInvertible { determinant: f32 },
    /// Projection parameters would divide by zero or produce non-finite entries.
    #[error("degenerate projection: {0}")]
    DegenerateProjection(&'static str),
}

/// Which way +Z points relative to +X and +Y.
///
/// Left-handed projections look down +Z; right-handed ones look down -Z.
/// Both variants map the visible depth range to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    #[default]
    Left,
    Right,
}

pub fn radians_to_degrees(radians: f32) -> f32 {
    radians / PI * 180.0
}

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees / 180.0 * PI
}

pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// Identity with the translation column set to `offset`.
pub fn translation(offset: Vec3) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    m.w_axis.set_xyz(offset);
    m
}

/// Identity with the diagonal replaced by per-axis scale factors.
pub fn scaling(factors: Vec3) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    m.x_axis.x = factors.x;
    m.y_axis.y = factors.y;
    m.z_axis.z = factors.z;
    m
}

/// Single-scalar scale encoded in the homogeneous divisor: `[3][3] = 1 / factor`.
///
/// For points (`w = 1`) this scales by `factor` only once the perspective divide
/// runs, and it leaves `w != 1` behind for anything composed after it. Prefer
/// [`uniform_scaling`] unless a shader explicitly depends on this encoding.
pub fn homogeneous_scaling(factor: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    m.w_axis.w = 1.0 / factor;
    m
}

/// Conventional uniform scale: diagonal `(factor, factor, factor, 1)`.
pub fn uniform_scaling(factor: f32) -> Mat4 {
    scaling(Vec3::splat(factor))
}

/// Right-hand rotation about +X: takes +Y towards +Z.
pub fn rotation_x(angle: f32) -> Mat4 {
    let (sin, cos) = angle.sin_cos();
    let mut m = Mat4::IDENTITY;
    m.y_axis.y = cos;
    m.y_axis.z = sin;
    m.z_axis.y = -sin;
    m.z_axis.z = cos;
    m
}

/// Right-hand rotation about +Y: takes +Z towards +X.
pub fn rotation_y(angle: f32) -> Mat4 {
    let (sin, cos) = angle.sin_cos();
    let mut m = Mat4::IDENTITY;
    m.x_axis.x = cos;
    m.x_axis.z = -sin;
    m.z_axis.x = sin;
    m.z_axis.z = cos;
    m
}

/// Right-hand rotation about +Z: takes +X towards +Y.
pub fn rotation_z(angle: f32) -> Mat4 {
    let (sin, cos) = angle.sin_cos();
    let mut m = Mat4::IDENTITY;
    m.x_axis.x = cos;
    m.x_axis.y = sin;
    m.y_axis.x = -sin;
    m.y_axis.y = cos;
    m
}

/// Combined rotation `Rx * Ry * Rz`.
///
/// Applied to a column vector, Z rotates first and X last. Shaders that
/// reconstruct this matrix rely on the order.
pub fn rotation(angles: Vec3) -> Mat4 {
    rotation_x(angles.x) * rotation_y(angles.y) * rotation_z(angles.z)
}

/// The linear part of an affine transform, with translation dropped.
pub fn upper_left_3x3(m: Mat4) -> Mat3 {
    Mat3::from_cols(m.x_axis.xyz(), m.y_axis.xyz(), m.z_axis.xyz())
}

/// Builds a perspective projection whose depth range is `[0, 1]`.
///
/// Left-handed:
///
/// ```text
/// | x 0 0  0          |
/// | 0 y 0  0          |      z = far / (far - near)
/// | 0 0 z  z * -near  |
/// | 0 0 1  0          |
/// ```
///
/// Right-handed reflects Z: `z = far / (near - far)`, the `w` row carries `-1`
/// and the translation term is `z * near`.
///
/// # Errors
///
/// [`MathError::DegenerateProjection`] for a zero or non-finite aspect ratio,
/// coincident or non-finite clip planes, or a field of view with no finite
/// focal length.
pub fn perspective_projection(
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    handedness: Handedness,
) -> Result<Mat4, MathError> {
    if !aspect.is_finite() || aspect == 0.0 {
        return Err(MathError::DegenerateProjection(
            "aspect ratio must be finite and non-zero",
        ));
    }
    if !near.is_finite() || !far.is_finite() || near == far {
        return Err(MathError::DegenerateProjection(
            "near and far planes must be finite and distinct",
        ));
    }

    let y = 1.0 / (fov_y * 0.5).tan();
    if !y.is_finite() || y == 0.0 {
        return Err(MathError::DegenerateProjection(
            "field of view has no finite focal length",
        ));
    }
    let x = y / aspect;

    let m = match handedness {
        Handedness::Left => {
            let z = far / (far - near);
            Mat4::from_cols(
                Vec4::new(x, 0.0, 0.0, 0.0),
                Vec4::new(0.0, y, 0.0, 0.0),
                Vec4::new(0.0, 0.0, z, 1.0),
                Vec4::new(0.0, 0.0, z * -near, 0.0),
            )
        }
        Handedness::Right => {
            let z = far / (near - far);
            Mat4::from_cols(
                Vec4::new(x, 0.0, 0.0, 0.0),
                Vec4::new(0.0, y, 0.0, 0.0),
                Vec4::new(0.0, 0.0, z, -1.0),
                Vec4::new(0.0, 0.0, z * near, 0.0),
            )
        }
    };

    Ok(m)
}

/// Checked 4x4 inverse.
pub fn inverse(m: Mat4) -> Result<Mat4, MathError> {
    let determinant = m.determinant();
    if !determinant.is_normal() {
        return Err(MathError::NonInvertible { determinant });
    }
    Ok(m.inverse())
}

/// Checked 3x3 inverse via the adjugate.
///
/// With columns `a`, `b`, `c`, the rows of the adjugate are `b x c`, `c x a`
/// and `a x b`, and the determinant is `a . (b x c)`.
pub fn inverse_3x3(m: Mat3) -> Result<Mat3, MathError> {
    let (a, b, c) = (m.x_axis, m.y_axis, m.z_axis);
    let bc = b.cross(c);
    let ca = c.cross(a);
    let ab = a.cross(b);

    let determinant = a.dot(bc);
    if !determinant.is_normal() {
        return Err(MathError::NonInvertible { determinant });
    }

    Ok(Mat3::from_cols(bc, ca, ab).transpose() * determinant.recip())
}

/// Transform for surface normals: `transpose(inverse(upper_left_3x3(model)))`.
///
/// Needed whenever `model` carries non-uniform scale; for pure rotations it
/// equals the rotation itself.
///
/// # Errors
///
/// [`MathError::NonInvertible`] when the linear part is singular, e.g. a zero
/// scale on any axis.
pub fn normal_matrix(model: Mat4) -> Result<Mat3, MathError> {
    Ok(inverse_3x3(upper_left_3x3(model))?.transpose())
}

/// Promotes a point to homogeneous coordinates (`w = 1`).
pub fn homogeneous(point: Vec3) -> Vec4 {
    Vec4::new(point.x, point.y, point.z, 1.0)
}

/// Read and write access to the first three components of a 4-vector.
pub trait Swizzle3 {
    fn xyz(self) -> Vec3;

    /// Replaces x, y and z, leaving w untouched.
    fn set_xyz(&mut self, xyz: Vec3);
}

impl Swizzle3 for Vec4 {
    fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    fn set_xyz(&mut self, xyz: Vec3) {
        self.x = xyz.x;
        self.y = xyz.y;
        self.z = xyz.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f32 = 1e-5;

    fn depth(projection: Mat4, z: f32) -> f32 {
        let clip = projection * Vec4::new(0.0, 0.0, z, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn identity_preserves_vectors() {
        let v = Vec4::new(1.5, -2.0, 3.25, 1.0);
        assert_eq!(identity() * v, v);
        assert_eq!(identity(), Mat4::IDENTITY);
    }

    #[test]
    fn translation_moves_origin_to_offset() {
        let t = Vec3::new(3.0, -1.0, 7.5);
        assert_eq!(translation(t) * homogeneous(Vec3::ZERO), homogeneous(t));
    }

    #[test]
    fn translation_leaves_directions_alone() {
        let dir = Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert_eq!(translation(Vec3::new(5.0, 5.0, 5.0)) * dir, dir);
    }

    #[test]
    fn scaling_sets_diagonal() {
        let m = scaling(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(m * homogeneous(Vec3::ONE), Vec4::new(2.0, 3.0, 4.0, 1.0));
        assert_eq!(m.w_axis, Vec4::W);
    }

    #[test]
    fn uniform_scaling_is_diagonal() {
        assert_eq!(uniform_scaling(2.5), scaling(Vec3::splat(2.5)));
        assert_eq!(uniform_scaling(2.5).w_axis.w, 1.0);
    }

    #[test]
    fn homogeneous_scaling_only_touches_w() {
        let m = homogeneous_scaling(4.0);
        assert_eq!(upper_left_3x3(m), Mat3::IDENTITY);
        assert_eq!(m.w_axis, Vec4::new(0.0, 0.0, 0.0, 0.25));
    }

    #[test]
    fn homogeneous_scaling_matches_uniform_after_divide() {
        let p = homogeneous(Vec3::new(1.0, -2.0, 0.5));
        let projective = homogeneous_scaling(4.0) * p;
        let affine = uniform_scaling(4.0) * p;
        assert!((projective / projective.w).abs_diff_eq(affine, EPS));
        assert_ne!(projective.w, 1.0);
    }

    #[test]
    fn single_axis_rotations_undo_themselves() {
        for a in [0.3_f32, 1.0, -2.2, PI] {
            assert!((rotation_x(a) * rotation_x(-a)).abs_diff_eq(identity(), EPS));
            assert!((rotation_y(a) * rotation_y(-a)).abs_diff_eq(identity(), EPS));
            assert!((rotation_z(a) * rotation_z(-a)).abs_diff_eq(identity(), EPS));
        }
    }

    #[test]
    fn rotations_follow_right_hand_rule() {
        let y_to_z = rotation_x(FRAC_PI_2) * Vec4::Y;
        assert!(y_to_z.abs_diff_eq(Vec4::Z, EPS));

        let z_to_x = rotation_y(FRAC_PI_2) * Vec4::Z;
        assert!(z_to_x.abs_diff_eq(Vec4::X, EPS));

        let x_to_y = rotation_z(FRAC_PI_2) * Vec4::X;
        assert!(x_to_y.abs_diff_eq(Vec4::Y, EPS));
    }

    #[test]
    fn rotations_agree_with_glam() {
        let a = 0.7;
        assert!(rotation_x(a).abs_diff_eq(Mat4::from_rotation_x(a), EPS));
        assert!(rotation_y(a).abs_diff_eq(Mat4::from_rotation_y(a), EPS));
        assert!(rotation_z(a).abs_diff_eq(Mat4::from_rotation_z(a), EPS));
    }

    #[test]
    fn combined_rotation_isolates_each_axis() {
        let a = 1.1;
        assert!(rotation(Vec3::new(a, 0.0, 0.0)).abs_diff_eq(rotation_x(a), EPS));
        assert!(rotation(Vec3::new(0.0, a, 0.0)).abs_diff_eq(rotation_y(a), EPS));
        assert!(rotation(Vec3::new(0.0, 0.0, a)).abs_diff_eq(rotation_z(a), EPS));
    }

    #[test]
    fn combined_rotation_keeps_xyz_product_order() {
        let angles = Vec3::new(0.4, -1.2, 2.0);
        let expected = rotation_x(angles.x) * rotation_y(angles.y) * rotation_z(angles.z);
        let reversed = rotation_z(angles.z) * rotation_y(angles.y) * rotation_x(angles.x);
        assert!(rotation(angles).abs_diff_eq(expected, EPS));
        assert!(!rotation(angles).abs_diff_eq(reversed, EPS));
    }

    #[test]
    fn translation_has_no_linear_part() {
        let t = Vec3::new(-4.0, 9.0, 0.25);
        assert_eq!(upper_left_3x3(translation(t)), Mat3::IDENTITY);
    }

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let model = rotation(Vec3::new(0.3, 1.4, -0.8)) * translation(Vec3::new(1.0, 2.0, 3.0));
        let normal = normal_matrix(model).unwrap();
        assert!(normal.abs_diff_eq(upper_left_3x3(model), EPS));
    }

    #[test]
    fn normal_matrix_inverts_non_uniform_scale() {
        let normal = normal_matrix(scaling(Vec3::new(2.0, 4.0, 0.5))).unwrap();
        let expected = Mat3::from_diagonal(Vec3::new(0.5, 0.25, 2.0));
        assert!(normal.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn normal_matrix_rejects_singular_model() {
        let err = normal_matrix(scaling(Vec3::new(1.0, 0.0, 1.0))).unwrap_err();
        assert!(matches!(err, MathError::NonInvertible { .. }));
    }

    #[test]
    fn adjugate_inverse_agrees_with_glam() {
        let m = upper_left_3x3(rotation(Vec3::new(0.2, 0.5, 0.9)) * scaling(Vec3::new(1.5, 0.7, 3.0)));
        assert!(inverse_3x3(m).unwrap().abs_diff_eq(m.inverse(), EPS));
    }

    #[test]
    fn inverse_of_translation_negates_offset() {
        let t = Vec3::new(0.0, 0.5, -2.0);
        let inv = inverse(translation(t)).unwrap();
        assert!(inv.abs_diff_eq(translation(-t), EPS));
    }

    #[test]
    fn inverse_rejects_zero_matrix() {
        assert!(inverse(Mat4::ZERO).is_err());
    }

    #[test]
    fn left_handed_depth_spans_zero_to_one() {
        let proj = perspective_projection(degrees_to_radians(60.0), 0.1, 100.0, 1.0, Handedness::Left)
            .unwrap();
        assert!(depth(proj, 0.1).abs() < EPS);
        assert!((depth(proj, 100.0) - 1.0).abs() < EPS);
        assert_eq!(proj.z_axis.w, 1.0);
    }

    #[test]
    fn right_handed_depth_spans_zero_to_one() {
        let proj = perspective_projection(degrees_to_radians(60.0), 0.1, 100.0, 1.0, Handedness::Right)
            .unwrap();
        assert!(depth(proj, -0.1).abs() < EPS);
        assert!((depth(proj, -100.0) - 1.0).abs() < EPS);
        assert_eq!(proj.z_axis.w, -1.0);
    }

    #[test]
    fn projection_focal_length_accounts_for_aspect() {
        let aspect = 16.0 / 9.0;
        let proj = perspective_projection(FRAC_PI_3, 0.1, 100.0, aspect, Handedness::Left).unwrap();
        let y = 1.0 / degrees_to_radians(30.0).tan();
        assert!((proj.x_axis.x - y / aspect).abs() < EPS);
        assert!((proj.y_axis.y - y).abs() < EPS);
    }

    #[test]
    fn degenerate_projections_are_rejected() {
        let fov = FRAC_PI_3;
        let left = Handedness::Left;
        assert!(perspective_projection(fov, 0.1, 100.0, 0.0, left).is_err());
        assert!(perspective_projection(fov, 0.1, 100.0, f32::NAN, left).is_err());
        assert!(perspective_projection(fov, 5.0, 5.0, 1.0, left).is_err());
        assert!(perspective_projection(0.0, 0.1, 100.0, 1.0, left).is_err());
    }

    #[test]
    fn degree_radian_round_trip() {
        for x in [0.0_f32, 1.0, -3.5, 42.0, 1000.0] {
            assert!((degrees_to_radians(radians_to_degrees(x)) - x).abs() <= x.abs() * 1e-6 + 1e-6);
        }
        assert!((radians_to_degrees(PI) - 180.0).abs() < EPS);
        assert!((degrees_to_radians(90.0) - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn homogeneous_promotion_sets_w() {
        assert_eq!(homogeneous(Vec3::new(1.0, 2.0, 3.0)), Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn xyz_reads_and_writes_leave_w() {
        let mut v = Vec4::new(1.0, 2.0, 3.0, 0.0);
        assert_eq!(v.xyz(), Vec3::new(1.0, 2.0, 3.0));
        v.set_xyz(Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(v, Vec4::new(-1.0, -2.0, -3.0, 0.0));
    }
}
