use crate::binding::{Access, BindGroup, BindGroupDesc, Binding};
use crate::buffer::{StorageBuffer, UniformBuffer};
use crate::device::GpuContext;
use crate::error::{ConfigError, Result};
use crate::pipeline::{ComputePipeline, ComputePipelineDesc, RenderPipeline, RenderPipelineDesc};
use crate::texture::{linear_sampler, Texture, TextureDesc};

use super::debug::{DebugChannel, DebugConfig, DebugReport};
use super::fullscreen::{
    FRAME_SAMPLER_VAR, FRAME_TEXTURE_VAR, FULLSCREEN_TEXTURE_WGSL, FULLSCREEN_VERTEX_COUNT,
    FULLSCREEN_VERTEX_WGSL,
};
use super::orchestrator::{ping_pong_groups, role_names, state_pair};
use super::ping_pong::{Phase, PingPong};

/// One named stage of the per-tick compute chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputePassDesc<'a> {
    pub entry_point: &'a str,
    /// Must be non-zero on both axes.
    pub workgroup_count: [u32; 2],
}

/// Everything a [`TextureFrame`] is built from.
#[derive(Debug)]
pub struct TextureFrameConfig<'a> {
    pub name: &'a str,
    pub uniforms: Vec<UniformBuffer>,
    pub state: StorageBuffer,
    /// Base WGSL name for the state bindings (`<base>_in` / `<base>_out`).
    pub state_var: Option<&'a str>,
    /// Read-write buffers bound after the state pair in both groups.
    pub shared: Vec<StorageBuffer>,
    /// Base WGSL name for the images (`<base>_in` sampled, `<base>_out` written).
    pub image_var: &'a str,
    pub image_size: (u32, u32),
    pub image_format: wgpu::TextureFormat,
    /// Shader module holding every entry point named in `passes`.
    pub compute_shader: &'a str,
    /// Executed in order within each tick.
    pub passes: Vec<ComputePassDesc<'a>>,
    pub target_format: wgpu::TextureFormat,
    pub clear_color: wgpu::Color,
    pub debug: Option<DebugConfig>,
    pub inject_interface: bool,
}

impl<'a> TextureFrameConfig<'a> {
    pub fn new(
        name: &'a str,
        uniforms: Vec<UniformBuffer>,
        state: StorageBuffer,
        compute_shader: &'a str,
        image_size: (u32, u32),
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            name,
            uniforms,
            state,
            state_var: None,
            shared: Vec::new(),
            image_var: "image",
            image_size,
            image_format: wgpu::TextureFormat::Rgba8Unorm,
            compute_shader,
            passes: Vec::new(),
            target_format,
            clear_color: wgpu::Color::BLACK,
            debug: None,
            inject_interface: true,
        }
    }
}

#[derive(Debug)]
struct ChainStage {
    pipeline: ComputePipeline,
    workgroup_count: [u32; 2],
}

/// Ping-pong buffers plus ping-pong images, a chain of compute stages per
/// tick and a fullscreen presentation of the freshly written image.
#[derive(Debug)]
pub struct TextureFrame {
    name: String,
    ctx: GpuContext,
    uniforms: Vec<UniformBuffer>,
    state: [StorageBuffer; 2],
    shared: Vec<StorageBuffer>,
    images: [Texture; 2],
    sampler: wgpu::Sampler,
    compute_groups: [BindGroup; 2],
    render_groups: [BindGroup; 2],
    chain: Vec<ChainStage>,
    render: RenderPipeline,
    debug: Option<DebugChannel>,
    clear_color: wgpu::Color,
    ping_pong: PingPong,
}

impl TextureFrame {
    pub fn new(ctx: &GpuContext, config: TextureFrameConfig<'_>) -> Result<Self> {
        if config.passes.is_empty() {
            return Err(ConfigError::NoComputePasses.into());
        }

        let state = state_pair(ctx, config.state)?;
        let base = config
            .state_var
            .map(str::to_string)
            .unwrap_or_else(|| state[0].schema().default_var_name());
        let (read_var, write_var) = role_names(&base);
        let (image_in, image_out) = role_names(config.image_var);

        let (width, height) = config.image_size;
        let image_label = format!("{}_image", config.name);
        let image = |suffix: &str| {
            let label = format!("{image_label}{suffix}");
            Texture::new(
                ctx,
                TextureDesc {
                    format: config.image_format,
                    ..TextureDesc::new(&label, width, height)
                },
            )
        };
        let images = [image("_A"), image("_B")];

        // Compute group j samples image j and writes image 1 - j.
        let shared = config.shared;
        let compute_groups = ping_pong_groups(
            ctx,
            config.name,
            &config.uniforms,
            &state,
            &read_var,
            &write_var,
            |phase: Phase| {
                let mut extra: Vec<Binding<'_>> = shared
                    .iter()
                    .map(|b| Binding::storage(b, Access::ReadWrite))
                    .collect();
                extra.push(Binding::SampledTexture {
                    texture: &images[phase.read_index()],
                    name: &image_in,
                });
                extra.push(Binding::StorageTexture {
                    texture: &images[phase.write_index()],
                    name: &image_out,
                });
                extra
            },
        )?;

        // Render group j presents image j.
        let sampler = linear_sampler(ctx, "frame sampler");
        let render_name = format!("{} present", config.name);
        let present = |j: usize| BindGroupDesc {
            name: &render_name,
            group: 0,
            bindings: vec![
                Binding::SampledTexture {
                    texture: &images[j],
                    name: FRAME_TEXTURE_VAR,
                },
                Binding::Sampler {
                    sampler: &sampler,
                    name: FRAME_SAMPLER_VAR,
                },
            ],
        };
        let render_a = BindGroup::new(ctx, present(0))?;
        let render_b = BindGroup::new_compatible(ctx, present(1), &render_a)?;
        let render_groups = [render_a, render_b];

        let debug = config
            .debug
            .map(|cfg| DebugChannel::new(ctx, cfg))
            .transpose()?;

        let mut preamble = String::new();
        if config.inject_interface {
            preamble.push_str(&compute_groups[0].shader_code());
        }
        if let Some(d) = &debug {
            preamble.push_str(&d.preamble());
        }

        let mut layouts = vec![compute_groups[0].layout()];
        if let Some(d) = &debug {
            layouts.push(d.group().layout());
        }

        let chain = config
            .passes
            .iter()
            .map(|pass| {
                let label = format!("{} {}", config.name, pass.entry_point);
                let pipeline = ComputePipeline::new(
                    ctx,
                    ComputePipelineDesc {
                        name: &label,
                        bind_group_layouts: layouts.clone(),
                        shader: config.compute_shader,
                        entry_point: pass.entry_point,
                        preamble: Some(preamble.as_str()),
                    },
                );
                ChainStage {
                    pipeline,
                    workgroup_count: pass.workgroup_count,
                }
            })
            .collect::<Vec<_>>();

        let render_interface = render_groups[0].shader_code();
        let mut render_desc = RenderPipelineDesc::new(
            &render_name,
            FULLSCREEN_VERTEX_WGSL,
            vec![render_groups[0].layout()],
            config.target_format,
        );
        render_desc.fragment_shader = Some(FULLSCREEN_TEXTURE_WGSL);
        render_desc.preamble = Some(render_interface.as_str());
        let render = RenderPipeline::new(ctx, render_desc);

        let stages: Vec<&str> = config.passes.iter().map(|p| p.entry_point).collect();
        log::info!(
            "texture frame `{}` ready ({}x{}, chain: {}, debug: {})",
            config.name,
            width,
            height,
            stages.join(" -> "),
            debug.is_some()
        );

        Ok(Self {
            name: config.name.to_string(),
            ctx: ctx.clone(),
            uniforms: config.uniforms,
            state,
            shared,
            images,
            sampler,
            compute_groups,
            render_groups,
            chain,
            render,
            debug,
            clear_color: config.clear_color,
            ping_pong: PingPong::new(),
        })
    }

    /// Runs the compute chain, presents the written image into `target` and
    /// submits once. Returns a debug report when a paced readback completed.
    pub fn tick(&mut self, target: &wgpu::TextureView) -> Result<Option<DebugReport>> {
        let mut encoder = self
            .ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(self.name.as_str()),
            });

        let tick = self.ping_pong.tick();
        let group = &self.compute_groups[self.ping_pong.phase().group()];
        for stage in &self.chain {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(stage.pipeline.entry_point()),
                timestamp_writes: None,
            });
            stage.pipeline.set(&mut cpass);
            group.bind_compute(&mut cpass);
            if let Some(debug) = &self.debug {
                debug.group().bind_compute(&mut cpass);
            }
            let [x, y] = stage.workgroup_count;
            cpass.dispatch_workgroups(x, y, 1);
        }

        if let Some(debug) = self.debug.as_mut() {
            debug.capture(&self.ctx, &mut encoder, tick);
        }

        self.ping_pong.advance();

        self.encode_present(&mut encoder, target);

        self.ctx.queue().submit(std::iter::once(encoder.finish()));

        self.poll_debug()
    }

    /// Non-blocking: decodes a paced debug capture once its readback has
    /// landed. `tick` calls this itself; a capture still in flight when
    /// `tick` returns can be collected here later.
    pub fn poll_debug(&mut self) -> Result<Option<DebugReport>> {
        match self.debug.as_mut() {
            Some(debug) => debug.poll(&self.ctx),
            None => Ok(None),
        }
    }

    /// Presents the current image again without running the chain.
    pub fn present(&self, target: &wgpu::TextureView) -> wgpu::SubmissionIndex {
        let mut encoder = self
            .ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(self.render.name()),
            });
        self.encode_present(&mut encoder, target);
        self.ctx.queue().submit(std::iter::once(encoder.finish()))
    }

    fn encode_present(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.render.name()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        self.render.set(&mut rpass);
        self.render_groups[self.ping_pong.phase().group()].bind_render(&mut rpass);
        rpass.draw(0..FULLSCREEN_VERTEX_COUNT, 0..1);
    }

    /// Blocks and decodes the debug buffer as it is now.
    pub fn read_debug_now(&mut self) -> Result<Option<DebugReport>> {
        let tick = self.ping_pong.tick();
        match self.debug.as_mut() {
            Some(debug) => debug.read_now(&self.ctx, tick).map(Some),
            None => Ok(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tick_count(&self) -> u64 {
        self.ping_pong.tick()
    }

    pub fn phase(&self) -> Phase {
        self.ping_pong.phase()
    }

    /// Entry points of the compute chain, in execution order.
    pub fn stages(&self) -> Vec<&str> {
        self.chain.iter().map(|s| s.pipeline.entry_point()).collect()
    }

    /// The state copy written by the most recent tick.
    pub fn current_state(&self) -> &StorageBuffer {
        &self.state[self.ping_pong.phase().read_index()]
    }

    /// The image written by the most recent tick.
    pub fn current_image(&self) -> &Texture {
        &self.images[self.ping_pong.phase().read_index()]
    }

    pub fn shared_buffers(&self) -> &[StorageBuffer] {
        &self.shared
    }

    pub fn uniform_mut(&mut self, name: &str) -> Option<&mut UniformBuffer> {
        self.uniforms.iter_mut().find(|u| u.name() == name)
    }

    pub fn debug(&self) -> Option<&DebugChannel> {
        self.debug.as_ref()
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Generated WGSL interface for the compute chain, including the debug
    /// helpers when instrumentation is enabled.
    pub fn interface_code(&self) -> String {
        let mut code = self.compute_groups[0].shader_code();
        if let Some(debug) = &self.debug {
            code.push_str(&debug.preamble());
        }
        code
    }

    pub fn destroy(&self) {
        for u in &self.uniforms {
            u.destroy();
        }
        for b in self.state.iter().chain(&self.shared) {
            b.destroy();
        }
        for t in &self.images {
            t.destroy();
        }
        if let Some(debug) = &self.debug {
            debug.destroy();
        }
    }
}
