//! The per-frame uniform block shared with `shaders/mesh.wgsl`.
//!
//! Field order and padding are a binary contract with the WGSL `FrameUniforms`
//! struct bound at group 0, binding 0. Change both sides together.
//!
//! | Field             | WGSL type       | Offset | Size |
//! |-------------------|-----------------|--------|------|
//! | `model`           | `mat4x4<f32>`   | 0      | 64   |
//! | `view`            | `mat4x4<f32>`   | 64     | 64   |
//! | `projection`      | `mat4x4<f32>`   | 128    | 64   |
//! | `normal`          | `mat3x3<f32>`   | 192    | 48   |
//! | `camera_position` | `vec3<f32>`     | 240    | 12   |
//! | `light_count`     | `u32`           | 252    | 4    |

use glam::{Mat3, Mat4, Vec3};

/// Immutable snapshot of everything the mesh shader needs for one frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Object to world.
    pub model: [[f32; 4]; 4],
    /// World to camera.
    pub view: [[f32; 4]; 4],
    /// Camera to clip space.
    pub projection: [[f32; 4]; 4],
    /// Inverse-transpose of the model's linear part. WGSL pads each `mat3x3`
    /// column to 16 bytes, so the fourth lane of every column is unused.
    pub normal: [[f32; 4]; 3],
    /// Camera position in world space.
    pub camera_position: [f32; 3],
    /// Number of lights the fragment stage should read.
    pub light_count: u32,
}

impl FrameUniforms {
    pub fn new(
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        normal: Mat3,
        camera_position: Vec3,
        light_count: u32,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            normal: pad_mat3(normal),
            camera_position: camera_position.to_array(),
            light_count,
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }

    pub fn normal(&self) -> Mat3 {
        let [x, y, z] = self.normal;
        Mat3::from_cols(
            Vec3::new(x[0], x[1], x[2]),
            Vec3::new(y[0], y[1], y[2]),
            Vec3::new(z[0], z[1], z[2]),
        )
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }
}

fn pad_mat3(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn layout_matches_wgsl_struct() {
        assert_eq!(size_of::<FrameUniforms>(), 256);
        assert_eq!(offset_of!(FrameUniforms, model), 0);
        assert_eq!(offset_of!(FrameUniforms, view), 64);
        assert_eq!(offset_of!(FrameUniforms, projection), 128);
        assert_eq!(offset_of!(FrameUniforms, normal), 192);
        assert_eq!(offset_of!(FrameUniforms, camera_position), 240);
        assert_eq!(offset_of!(FrameUniforms, light_count), 252);
    }

    #[test]
    fn accessors_recover_packed_values() {
        let model = Mat4::from_rotation_y(0.5);
        let view = Mat4::from_translation(Vec3::new(0.0, -0.5, 2.0));
        let projection = Mat4::perspective_lh(1.0, 1.5, 0.1, 100.0);
        let normal = Mat3::from_rotation_y(0.5);
        let camera = Vec3::new(0.0, 0.5, -2.0);

        let uniforms = FrameUniforms::new(model, view, projection, normal, camera, 3);

        assert_eq!(uniforms.model(), model);
        assert_eq!(uniforms.view(), view);
        assert_eq!(uniforms.projection(), projection);
        assert_eq!(uniforms.normal(), normal);
        assert_eq!(uniforms.camera_position(), camera);
        assert_eq!(uniforms.light_count, 3);
    }

    #[test]
    fn normal_columns_are_zero_padded() {
        let uniforms = FrameUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
            Vec3::ZERO,
            0,
        );
        assert_eq!(uniforms.normal[0], [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(uniforms.normal[2], [7.0, 8.0, 9.0, 0.0]);
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 256);
    }
}
