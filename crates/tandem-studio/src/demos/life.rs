use anyhow::Result;
use rand::{Rng, SeedableRng};
use tandem_engine::buffer::{
    BufferContents, StorageBuffer, StorageBufferDesc, StorageSchema, UniformBuffer,
    UniformBufferDesc,
};
use tandem_engine::device::GpuContext;
use tandem_engine::frame::{FramePassConfig, PingPongConfig, PingPongFrame, RenderStage};
use tandem_engine::geometry::Geometry;
use tandem_engine::layout::{Field, WgslType};

use super::Demo;

const GRID_SIZE: u32 = 32;
const WORKGROUP_SIZE: u32 = 8;

pub struct Life {
    frame: PingPongFrame,
    pass: FramePassConfig,
}

impl Life {
    pub fn new(ctx: &GpuContext, format: wgpu::TextureFormat, seed: u64) -> Result<Self> {
        let options = UniformBuffer::new(
            ctx,
            UniformBufferDesc::new(
                "Options",
                vec![(
                    "grid_size",
                    Field::with_value(WgslType::Vec2F32, &[GRID_SIZE as f32, GRID_SIZE as f32]),
                )],
            ),
        )?;

        let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
        let cells: Vec<u32> = (0..GRID_SIZE * GRID_SIZE)
            .map(|_| u32::from(rng.random_bool(0.4)))
            .collect();

        let state = StorageBuffer::new(
            ctx,
            StorageBufferDesc {
                contents: Some(BufferContents::U32(&cells)),
                ..StorageBufferDesc::new(
                    "CellState",
                    StorageSchema::new("CellState", &[("state", WgslType::U32)]),
                )
            },
        )?;

        let config = PingPongConfig::new(
            "life",
            vec![options],
            state,
            include_str!("../shaders/life_compute.wgsl"),
            RenderStage::Geometry {
                geometry: Geometry::square(ctx, 0.8)?,
                shader: include_str!("../shaders/life_render.wgsl"),
            },
            format,
        );
        let frame = PingPongFrame::new(ctx, config)?;
        log::debug!("life interface:\n{}", frame.interface_code());

        let groups = GRID_SIZE.div_ceil(WORKGROUP_SIZE);
        Ok(Self {
            frame,
            pass: FramePassConfig {
                workgroup_count: [groups, groups],
                instances: GRID_SIZE * GRID_SIZE,
            },
        })
    }
}

impl Demo for Life {
    fn step(&mut self, target: &wgpu::TextureView) -> Result<()> {
        self.frame.tick(target, self.pass);
        Ok(())
    }

    fn redraw(&self, target: &wgpu::TextureView) {
        self.frame.render(target, self.pass.instances);
    }

    fn destroy(&self) {
        self.frame.destroy();
    }
}
