//! GPU-resident meshes and textures, created once at startup.
//!
//! Texture slot 0 is a reserved fallback. A texture that fails to decode
//! resolves to that slot, so draws referencing it still bind something and
//! only look wrong.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use thiserror::Error;

use crate::utils::{Mesh, MeshBuffer};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to import glTF {path}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("{0} contains no triangle geometry")]
    EmptyModel(PathBuf),
}

/// Index into the cache's texture table. `NULL` is the fallback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

impl TextureHandle {
    pub const NULL: TextureHandle = TextureHandle(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn from_channel_count(channels: u8) -> Self {
        if channels == 4 {
            PixelLayout::Rgba
        } else {
            PixelLayout::Rgb
        }
    }
}

/// Decoded image, always expanded to RGBA8 for upload. `layout` records what
/// the source file actually carried.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub rgba: RgbaImage,
}

pub fn decode_image(path: &Path) -> Result<DecodedImage, AssetError> {
    let img = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let layout = PixelLayout::from_channel_count(img.color().channel_count());
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        layout,
        rgba,
    })
}

/// Extent of every mip level, halving each axis (floor, min 1) until 1×1.
pub fn mip_chain_sizes(width: u32, height: u32) -> Vec<(u32, u32)> {
    let (mut w, mut h) = (width.max(1), height.max(1));
    let mut sizes = vec![(w, h)];
    while w > 1 || h > 1 {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        sizes.push((w, h));
    }
    sizes
}

/// Full mip chain for `base`, each level filtered down from the one above.
pub fn generate_mips(base: RgbaImage) -> Vec<RgbaImage> {
    let sizes = mip_chain_sizes(base.width(), base.height());
    let mut levels = Vec::with_capacity(sizes.len());
    levels.push(base);
    for &(w, h) in sizes.iter().skip(1) {
        let Some(prev) = levels.last() else { break };
        let next = imageops::resize(prev, w, h, FilterType::Triangle);
        levels.push(next);
    }
    levels
}

fn solid_pixel(rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(1, 1, image::Rgba(rgba))
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Which mesh a draw call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    Ground,
    Player,
    Sphere,
}

pub struct ResourceCache {
    pub texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<GpuTexture>,
    ground: MeshBuffer,
    player: MeshBuffer,
    sphere: MeshBuffer,
}

impl ResourceCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, ground: &Mesh, player: &Mesh, sphere: &Mesh) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Repeat wrapping so the ground's tiling factor works.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut cache = Self {
            texture_layout,
            sampler,
            textures: Vec::new(),
            ground: ground.upload(device, "Ground"),
            player: player.upload(device, "Player"),
            sphere: sphere.upload(device, "Sphere"),
        };

        // slot 0: fallback for textures that failed to load
        let fallback = cache.create_texture_rgba(device, queue, "fallback_texture", &[solid_pixel([0, 0, 0, 255])]);
        debug_assert!(fallback.is_null());
        cache
    }

    pub fn mesh(&self, kind: MeshKind) -> &MeshBuffer {
        match kind {
            MeshKind::Ground => &self.ground,
            MeshKind::Player => &self.player,
            MeshKind::Sphere => &self.sphere,
        }
    }

    /// Upload `levels` as one texture, level 0 first. Each entry must be half
    /// the size of the previous one, as produced by [`generate_mips`].
    pub fn create_texture_rgba(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        levels: &[RgbaImage],
    ) -> TextureHandle {
        let (width, height) = levels.first().map_or((1, 1), |base| base.dimensions());
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (w, h) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });

        self.textures.push(GpuTexture { _texture: texture, bind_group });
        TextureHandle(self.textures.len() - 1)
    }

    /// 1×1 opaque white, so a tint alone decides the color.
    pub fn create_white_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> TextureHandle {
        self.create_texture_rgba(device, queue, "white_texture", &[solid_pixel([255, 255, 255, 255])])
    }

    /// Decode and upload `path`. Failures are logged and yield
    /// [`TextureHandle::NULL`].
    pub fn load_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, path: &str) -> TextureHandle {
        match decode_image(Path::new(path)) {
            Ok(img) => {
                let levels = generate_mips(img.rgba);
                tracing::info!(
                    path,
                    width = img.width,
                    height = img.height,
                    layout = ?img.layout,
                    mips = levels.len(),
                    "texture loaded"
                );
                self.create_texture_rgba(device, queue, path, &levels)
            }
            Err(e) => {
                tracing::warn!("Failed to load texture: {e}");
                TextureHandle::NULL
            }
        }
    }

    pub fn bind_texture(&self, rp: &mut wgpu::RenderPass<'_>, group: u32, handle: TextureHandle) {
        let texture = self.textures.get(handle.0).unwrap_or(&self.textures[0]);
        rp.set_bind_group(group, &texture.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_count_picks_layout() {
        assert_eq!(PixelLayout::from_channel_count(4), PixelLayout::Rgba);
        assert_eq!(PixelLayout::from_channel_count(3), PixelLayout::Rgb);
        assert_eq!(PixelLayout::from_channel_count(1), PixelLayout::Rgb);
    }

    #[test]
    fn missing_image_is_an_error_not_a_panic() {
        let err = decode_image(Path::new("does/not/exist.png")).err().unwrap();
        assert!(matches!(err, AssetError::Image { .. }));
        assert!(err.to_string().contains("does/not/exist.png"));
    }

    #[test]
    fn decodes_rgb_png() {
        let dir = std::env::temp_dir().join(format!("runner-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("checker.png");
        let img = image::RgbImage::from_fn(2, 3, |x, y| image::Rgb([(x * 100) as u8, (y * 50) as u8, 7]));
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(decoded.layout, PixelLayout::Rgb);
        assert_eq!(decoded.rgba.as_raw().len(), 2 * 3 * 4);
        // pixel (1, 2), alpha filled in
        let i = (2 * 2 + 1) * 4;
        assert_eq!(&decoded.rgba.as_raw()[i..i + 4], &[100, 100, 7, 255]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let sizes = mip_chain_sizes(256, 64);
        assert_eq!(sizes.len(), 9);
        assert_eq!(sizes[0], (256, 64));
        assert_eq!(sizes[1], (128, 32));
        assert_eq!(sizes[6], (4, 1));
        assert_eq!(*sizes.last().unwrap(), (1, 1));

        // odd sizes round down
        assert_eq!(mip_chain_sizes(5, 3), vec![(5, 3), (2, 1), (1, 1)]);
        assert_eq!(mip_chain_sizes(1, 1), vec![(1, 1)]);
    }

    #[test]
    fn generated_mips_match_chain_sizes() {
        let base = RgbaImage::from_pixel(16, 4, image::Rgba([200, 100, 50, 255]));
        let levels = generate_mips(base);
        let dims: Vec<(u32, u32)> = levels.iter().map(|l| l.dimensions()).collect();
        assert_eq!(dims, mip_chain_sizes(16, 4));
        // a flat color stays flat at every level
        let px = levels[4].get_pixel(0, 0).0;
        for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "{px:?}");
        }
    }

    #[test]
    fn null_handle_is_slot_zero() {
        assert!(TextureHandle::NULL.is_null());
        assert!(!TextureHandle(3).is_null());
    }
}
