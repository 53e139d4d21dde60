#![allow(dead_code)]

use tandem_engine::device::{GpuContext, GpuInit};
use tandem_engine::texture::{Texture, TextureDesc};

/// Acquires a headless device, or `None` on machines without an adapter.
pub fn headless() -> Option<GpuContext> {
    match pollster::block_on(GpuContext::headless(&GpuInit::default())) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
    }
}

pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Offscreen color target standing in for a surface image.
pub fn offscreen_target(ctx: &GpuContext) -> Texture {
    Texture::new(
        ctx,
        TextureDesc {
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            ..TextureDesc::new("offscreen target", 64, 64)
        },
    )
}
