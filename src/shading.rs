//! Lighting, material and texture seams for the mesh shader.
//!
//! None of these carry real behavior yet. Each is a trait with a no-op default,
//! so a light rig, a material table or a texture loader can be dropped in later
//! without touching the transform core or the uniform block.
//!
//! The renderer reads them once at startup:
//!
//! - [`LightSource::lights`] fills the light array (group 0, binding 2) and its
//!   length becomes [`FrameUniforms::light_count`](crate::FrameUniforms).
//! - [`MaterialSource::material`] fills the material block (group 0, binding 1).
//! - [`TextureSource::load`] supplies the surface texture (group 1); `Ok(None)` binds
//!   a 1x1 white texture instead.

use crate::gpu::{GpuContext, RenderError};
use crate::texture::Texture;

/// Upper bound on lights the shader's fixed-size array can hold.
pub const MAX_LIGHTS: usize = 8;

/// A point light as laid out in the WGSL `Light` struct (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Light {
    pub position: [f32; 3],
    pub ambient_intensity: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl Light {
    pub fn new(position: [f32; 3], color: [f32; 3], ambient_intensity: f32) -> Self {
        Self {
            position,
            ambient_intensity,
            color,
            _padding: 0.0,
        }
    }
}

/// Specular response as laid out in the WGSL `Material` struct (16 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Material {
    pub specular_strength: f32,
    pub specular_power: f32,
    pub _padding: [f32; 2],
}

impl Material {
    pub fn new(specular_strength: f32, specular_power: f32) -> Self {
        Self {
            specular_strength,
            specular_power,
            _padding: [0.0; 2],
        }
    }
}

impl Default for Material {
    /// Matte: no specular highlight.
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Supplies the lights for the scene.
pub trait LightSource {
    fn lights(&self) -> &[Light];

    /// Lights the shader will actually read, capped at [`MAX_LIGHTS`].
    fn light_count(&self) -> u32 {
        self.lights().len().min(MAX_LIGHTS) as u32
    }
}

/// No lights. The shader falls back to a headlight from the camera.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLights;

impl LightSource for NoLights {
    fn lights(&self) -> &[Light] {
        &[]
    }
}

pub trait MaterialSource {
    fn material(&self) -> Material;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMaterial;

impl MaterialSource for DefaultMaterial {
    fn material(&self) -> Material {
        Material::default()
    }
}

/// Supplies the surface texture for the mesh.
pub trait TextureSource {
    /// `Ok(None)` means untextured.
    fn load(&self, gpu: &GpuContext) -> Result<Option<Texture>, RenderError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoTexture;

impl TextureSource for NoTexture {
    fn load(&self, _gpu: &GpuContext) -> Result<Option<Texture>, RenderError> {
        Ok(None)
    }
}

/// One of each shading seam. The default is all no-ops.
pub struct Shading {
    pub lights: Box<dyn LightSource>,
    pub material: Box<dyn MaterialSource>,
    pub texture: Box<dyn TextureSource>,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            lights: Box::new(NoLights),
            material: Box::new(DefaultMaterial),
            texture: Box::new(NoTexture),
        }
    }
}

impl Shading {
    /// Light array padded to [`MAX_LIGHTS`] for upload.
    pub fn light_block(&self) -> [Light; MAX_LIGHTS] {
        let mut block = [Light::default(); MAX_LIGHTS];
        for (slot, light) in block.iter_mut().zip(self.lights.lights()) {
            *slot = *light;
        }
        block
    }

    pub fn light_count(&self) -> u32 {
        self.lights.light_count()
    }
}

impl std::fmt::Debug for Shading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shading")
            .field("light_count", &self.light_count())
            .field("material", &self.material.material())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rig(Vec<Light>);

    impl LightSource for Rig {
        fn lights(&self) -> &[Light] {
            &self.0
        }
    }

    #[test]
    fn gpu_structs_have_wgsl_sizes() {
        assert_eq!(std::mem::size_of::<Light>(), 32);
        assert_eq!(std::mem::size_of::<Material>(), 16);
    }

    #[test]
    fn default_shading_is_inert() {
        let shading = Shading::default();
        assert_eq!(shading.light_count(), 0);
        assert_eq!(shading.material.material().specular_strength, 0.0);
        assert!(shading.light_block().iter().all(|l| *l == Light::default()));
    }

    #[test]
    fn light_count_is_capped() {
        let rig = Rig(vec![Light::new([0.0; 3], [1.0; 3], 0.1); MAX_LIGHTS + 3]);
        assert_eq!(rig.light_count(), MAX_LIGHTS as u32);
    }

    #[test]
    fn light_block_copies_lights_in_order() {
        let key = Light::new([1.0, 2.0, 3.0], [1.0, 0.9, 0.8], 0.2);
        let fill = Light::new([-1.0, 0.0, 0.0], [0.2, 0.2, 0.3], 0.0);
        let shading = Shading {
            lights: Box::new(Rig(vec![key, fill])),
            ..Shading::default()
        };
        let block = shading.light_block();
        assert_eq!(block[0], key);
        assert_eq!(block[1], fill);
        assert_eq!(block[2], Light::default());
        assert_eq!(shading.light_count(), 2);
    }
}
