use crate::device::GpuContext;

/// Parameters for [`Texture::new`].
#[derive(Debug, Clone)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

impl<'a> TextureDesc<'a> {
    pub const DEFAULT_USAGE: wgpu::TextureUsages = wgpu::TextureUsages::TEXTURE_BINDING
        .union(wgpu::TextureUsages::STORAGE_BINDING)
        .union(wgpu::TextureUsages::COPY_DST)
        .union(wgpu::TextureUsages::COPY_SRC);

    pub fn new(label: &'a str, width: u32, height: u32) -> Self {
        Self {
            label,
            width,
            height,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: Self::DEFAULT_USAGE,
        }
    }
}

/// A single-mip 2D texture and its default view.
#[derive(Debug)]
pub struct Texture {
    label: String,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn new(ctx: &GpuContext, desc: TextureDesc<'_>) -> Self {
        let width = desc.width.max(1);
        let height = desc.height.max(1);

        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: desc.usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!(
            "texture `{}` created ({width}x{height}, {:?})",
            desc.label,
            desc.format
        );

        Self {
            label: desc.label.to_string(),
            texture,
            view,
            queue: ctx.queue().clone(),
            format: desc.format,
            usage: desc.usage,
            width,
            height,
        }
    }

    /// Uploads tightly packed texel rows covering the whole texture.
    pub fn write(&self, texels: &[u8]) {
        let bytes_per_texel = self.format.block_copy_size(None).unwrap_or(4);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * bytes_per_texel),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn usage(&self) -> wgpu::TextureUsages {
        self.usage
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn destroy(&self) {
        self.texture.destroy();
    }
}

/// Linear, clamped sampler for presenting textures.
pub fn linear_sampler(ctx: &GpuContext, label: &str) -> wgpu::Sampler {
    ctx.device().create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
