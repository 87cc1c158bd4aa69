//! GPU texture cache: loads image files and provides solid-color fallbacks

use orrery_core::{Color, OrreryError, Result};
use std::collections::HashMap;
use std::path::Path;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Decode an image file into tightly packed RGBA8 rows, top row first
pub fn decode_image(path: &Path) -> Result<image::RgbaImage> {
    let img = image::open(path).map_err(|e| {
        OrreryError::TextureError(format!("failed to open image '{}': {}", path.display(), e))
    })?;
    Ok(img.to_rgba8())
}

/// Cache of GPU textures, keyed by name, with a white default
pub struct TextureCache {
    textures: HashMap<String, GpuTexture>,
    /// 1x1 white texture, returned for unknown names
    pub default_white: GpuTexture,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            textures: HashMap::new(),
            default_white: Self::upload_rgba(device, queue, "Default White", 1, 1, &[255; 4]),
        }
    }

    fn upload_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> GpuTexture {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            ..Default::default()
        });

        GpuTexture {
            texture,
            view,
            sampler,
        }
    }

    /// Load a texture from an image file on disk.
    /// Returns Ok(true) if newly loaded, Ok(false) if already cached.
    pub fn load_file(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
    ) -> Result<bool> {
        if self.textures.contains_key(name) {
            return Ok(false);
        }

        let rgba = decode_image(path)?;
        let (width, height) = rgba.dimensions();
        let texture = Self::upload_rgba(device, queue, name, width, height, &rgba);
        self.textures.insert(name.to_string(), texture);

        tracing::debug!("Loaded texture '{}' ({}x{}) from {}", name, width, height, path.display());
        Ok(true)
    }

    /// Store a 1x1 texture of a single color under `name`
    pub fn insert_solid(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        color: Color,
    ) {
        let texture = Self::upload_rgba(device, queue, name, 1, 1, &color.to_rgba8());
        self.textures.insert(name.to_string(), texture);
    }

    /// Load `path`, or fall back to a solid color when it is missing or unreadable.
    /// Returns true when the file was used.
    pub fn load_or_fallback(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
        fallback: Color,
    ) -> bool {
        match self.load_file(device, queue, name, path) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Texture '{}' unavailable, using solid color: {}", name, e);
                self.insert_solid(device, queue, name, fallback);
                false
            }
        }
    }

    /// Get a texture by name, or the white default
    pub fn get(&self, name: &str) -> &GpuTexture {
        self.textures.get(name).unwrap_or(&self.default_white)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_missing_file_is_texture_error() {
        let err = decode_image(Path::new("/no/such/earth.jpg")).unwrap_err();
        assert!(matches!(err, OrreryError::TextureError(_)));
        assert!(err.to_string().contains("earth.jpg"));
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let dir = std::env::temp_dir().join(format!("orrery-texture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("checker.png");

        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
