use anyhow::Result;
use rand::{Rng, SeedableRng};
use tandem_engine::buffer::{
    BufferContents, StorageBuffer, StorageBufferDesc, StorageSchema, UniformBuffer,
    UniformBufferDesc,
};
use tandem_engine::device::GpuContext;
use tandem_engine::frame::{ComputePassDesc, DebugConfig, TextureFrame, TextureFrameConfig};
use tandem_engine::layout::{Field, WgslType};

use super::Demo;

const NUM_PARTICLES: usize = 14;
const IMAGE_SIZE: u32 = 128;
const TILE: u32 = 16;

pub struct Particles {
    frame: TextureFrame,
}

impl Particles {
    pub fn new(ctx: &GpuContext, format: wgpu::TextureFormat, seed: u64) -> Result<Self> {
        let side = IMAGE_SIZE as f32;
        let options = UniformBuffer::new(
            ctx,
            UniformBufferDesc::new(
                "Options",
                vec![
                    ("image_size", Field::with_value(WgslType::Vec2F32, &[side, side])),
                    ("diffuse_rate", Field::with_value(WgslType::F32, &[0.607f32])),
                    ("decay_rate", Field::with_value(WgslType::F32, &[0.1f32])),
                    ("dt", Field::with_value(WgslType::F32, &[0.5f32])),
                ],
            ),
        )?;

        // [pos.x, pos.y, vel.x, vel.y] per particle.
        let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
        let particles: Vec<f32> = (0..NUM_PARTICLES)
            .flat_map(|_| {
                [
                    rng.random_range(0.0..side),
                    rng.random_range(0.0..side),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                ]
            })
            .collect();

        let state = StorageBuffer::new(
            ctx,
            StorageBufferDesc {
                contents: Some(BufferContents::F32(&particles)),
                ..StorageBufferDesc::new(
                    "Particle",
                    StorageSchema::new(
                        "Particle",
                        &[("pos", WgslType::Vec2F32), ("vel", WgslType::Vec2F32)],
                    ),
                )
            },
        )?;

        let tiles = IMAGE_SIZE / TILE;
        let config = TextureFrameConfig {
            passes: vec![
                ComputePassDesc {
                    entry_point: "Simulate",
                    workgroup_count: [1, 1],
                },
                ComputePassDesc {
                    entry_point: "Diffuse",
                    workgroup_count: [tiles, tiles],
                },
                ComputePassDesc {
                    entry_point: "Paint",
                    workgroup_count: [tiles, tiles],
                },
            ],
            debug: Some(DebugConfig {
                slots: NUM_PARTICLES as u32,
                ..DebugConfig::default()
            }),
            ..TextureFrameConfig::new(
                "particles",
                vec![options],
                state,
                include_str!("../shaders/particles.wgsl"),
                (IMAGE_SIZE, IMAGE_SIZE),
                format,
            )
        };

        Ok(Self {
            frame: TextureFrame::new(ctx, config)?,
        })
    }
}

impl Demo for Particles {
    fn step(&mut self, target: &wgpu::TextureView) -> Result<()> {
        // Reports are logged by the debug channel as they arrive.
        self.frame.tick(target)?;
        Ok(())
    }

    fn redraw(&self, target: &wgpu::TextureView) {
        self.frame.present(target);
    }

    fn destroy(&self) {
        self.frame.destroy();
    }
}
