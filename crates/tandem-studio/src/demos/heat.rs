use anyhow::Result;
use tandem_engine::buffer::{
    StorageBuffer, StorageBufferDesc, StorageSchema, UniformBuffer, UniformBufferDesc,
};
use tandem_engine::device::GpuContext;
use tandem_engine::frame::{FramePassConfig, PingPongConfig, PingPongFrame, RenderStage};
use tandem_engine::layout::{Field, WgslType};

use super::Demo;

const GRID_SIZE: u32 = 128;
const WORKGROUP_SIZE: u32 = 8;
const ORBIT_SPEED: f32 = 0.05;

pub struct Heat {
    frame: PingPongFrame,
    pass: FramePassConfig,
    time: f32,
}

impl Heat {
    pub fn new(ctx: &GpuContext, format: wgpu::TextureFormat) -> Result<Self> {
        let options = UniformBuffer::new(
            ctx,
            UniformBufferDesc::new(
                "Options",
                vec![
                    (
                        "grid_size",
                        Field::with_value(WgslType::Vec2F32, &[GRID_SIZE as f32, GRID_SIZE as f32]),
                    ),
                    ("time", Field::with_value(WgslType::F32, &[0.0f32])),
                    ("diffusion", Field::with_value(WgslType::F32, &[0.9f32])),
                    ("cooling", Field::with_value(WgslType::F32, &[0.995f32])),
                ],
            ),
        )?;

        let cell_bytes = u64::from(GRID_SIZE * GRID_SIZE) * 4;
        let state = StorageBuffer::new(
            ctx,
            StorageBufferDesc {
                byte_len: Some(cell_bytes),
                ..StorageBufferDesc::new(
                    "HeatCell",
                    StorageSchema::new("HeatCell", &[("value", WgslType::F32)]),
                )
            },
        )?;

        let config = PingPongConfig {
            clear_color: wgpu::Color::BLACK,
            ..PingPongConfig::new(
                "heat",
                vec![options],
                state,
                include_str!("../shaders/heat_compute.wgsl"),
                RenderStage::Fullscreen {
                    fragment_shader: include_str!("../shaders/heat_fragment.wgsl"),
                },
                format,
            )
        };

        let groups = GRID_SIZE.div_ceil(WORKGROUP_SIZE);
        Ok(Self {
            frame: PingPongFrame::new(ctx, config)?,
            pass: FramePassConfig {
                workgroup_count: [groups, groups],
                instances: 1,
            },
            time: 0.0,
        })
    }
}

impl Demo for Heat {
    fn step(&mut self, target: &wgpu::TextureView) -> Result<()> {
        self.time += ORBIT_SPEED;
        if let Some(options) = self.frame.uniform_mut("Options") {
            options.update_field_pod("time", &[self.time])?;
        }
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
