//! Surface textures for the mesh shader's group 1.
//!
//! A [`Texture`] owns the GPU image and its sampler. Bind groups take a view
//! made from it with [`Texture::view`]. Without a texture source the renderer
//! binds [`Texture::white`], so untextured meshes sample plain white.

use crate::gpu::{GpuContext, RenderError};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const BYTES_PER_PIXEL: u32 = 4;

/// A sampled RGBA texture.
#[derive(Debug)]
pub struct Texture {
    texture: wgpu::Texture,
    sampler: wgpu::Sampler,
}

impl Texture {
    /// Uploads tightly packed RGBA8 pixels, row by row from the top.
    ///
    /// # Errors
    ///
    /// [`RenderError::TextureData`] if either dimension is zero or `data` is
    /// not exactly `width * height * 4` bytes.
    pub fn from_rgba(
        gpu: &GpuContext,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Result<Self, RenderError> {
        check_rgba_len(width, height, data.len())?;
        Ok(Self::upload(gpu, data, width, height, label))
    }

    /// 1x1 opaque white.
    pub fn white(gpu: &GpuContext) -> Self {
        Self::upload(gpu, &[u8::MAX; 4], 1, 1, "White Texture")
    }

    /// A fresh view over the whole texture.
    pub fn view(&self) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    fn upload(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * BYTES_PER_PIXEL),
                rows_per_image: Some(height),
            },
            size,
        );

        // Mesh UVs may run past [0, 1] on imported models; wrap them.
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, sampler }
    }
}

fn check_rgba_len(width: u32, height: u32, len: usize) -> Result<(), RenderError> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL as usize;
    if width == 0 || height == 0 || len != expected {
        return Err(RenderError::TextureData { width, height, len });
    }
    Ok(())
}
