use crate::binding::{Access, BindGroup, BindGroupDesc, Binding};
use crate::buffer::{StorageBuffer, UniformBuffer};
use crate::device::GpuContext;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::pipeline::{
    ComputePipeline, ComputePipelineDesc, RenderPipeline, RenderPipelineDesc, COMPUTE_ENTRY,
};

use super::fullscreen::{FULLSCREEN_VERTEX_COUNT, FULLSCREEN_VERTEX_WGSL};
use super::ping_pong::{Phase, PingPong};

/// Per-tick dispatch and draw sizes.
///
/// Both counts must be non-zero; this is a precondition, not a runtime check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePassConfig {
    pub workgroup_count: [u32; 2],
    pub instances: u32,
}

/// What the render pass draws after each compute step.
#[derive(Debug)]
pub enum RenderStage<'a> {
    /// Instanced geometry; `shader` holds `vert_main` and `frag_main`.
    Geometry { geometry: Geometry, shader: &'a str },
    /// Built-in fullscreen quad; `fragment_shader` holds `frag_main`.
    Fullscreen { fragment_shader: &'a str },
}

/// Everything a [`PingPongFrame`] is built from.
#[derive(Debug)]
pub struct PingPongConfig<'a> {
    pub name: &'a str,
    pub uniforms: Vec<UniformBuffer>,
    /// Becomes copy A; copy B is allocated alongside it.
    pub state: StorageBuffer,
    /// Base WGSL name for the state bindings, declared as `<base>_in` (read)
    /// and `<base>_out` (read-write). Defaults to the schema's plural name.
    pub state_var: Option<&'a str>,
    pub compute_shader: &'a str,
    pub compute_entry: &'a str,
    pub render: RenderStage<'a>,
    pub target_format: wgpu::TextureFormat,
    pub clear_color: wgpu::Color,
    /// Prepend the generated bind group declarations to every shader.
    pub inject_interface: bool,
}

impl<'a> PingPongConfig<'a> {
    pub fn new(
        name: &'a str,
        uniforms: Vec<UniformBuffer>,
        state: StorageBuffer,
        compute_shader: &'a str,
        render: RenderStage<'a>,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            name,
            uniforms,
            state,
            state_var: None,
            compute_shader,
            compute_entry: COMPUTE_ENTRY,
            render,
            target_format,
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
            inject_interface: true,
        }
    }
}

/// Role names for a ping-pong pair.
pub(crate) fn role_names(base: &str) -> (String, String) {
    (format!("{base}_in"), format!("{base}_out"))
}

/// Builds the two bind groups of a ping-pong pair.
///
/// Group 0 reads `pair[0]` and writes `pair[1]`; group 1 is the mirror image
/// and shares group 0's layout object. `extra` is appended unchanged to both.
pub(crate) fn ping_pong_groups<'b>(
    ctx: &GpuContext,
    name: &str,
    uniforms: &'b [UniformBuffer],
    pair: &'b [StorageBuffer; 2],
    read_var: &'b str,
    write_var: &'b str,
    extra: impl Fn(Phase) -> Vec<Binding<'b>>,
) -> Result<[BindGroup; 2]> {
    let bindings = |phase: Phase| {
        let mut list: Vec<Binding<'b>> = uniforms.iter().map(Binding::Uniform).collect();
        list.push(Binding::storage_named(
            &pair[phase.read_index()],
            Access::ReadOnly,
            read_var,
        ));
        list.push(Binding::storage_named(
            &pair[phase.write_index()],
            Access::ReadWrite,
            write_var,
        ));
        list.extend(extra(phase));
        list
    };

    let name_a = format!("{name} group 0");
    let name_b = format!("{name} group 1");

    let first = BindGroup::new(
        ctx,
        BindGroupDesc {
            name: &name_a,
            group: 0,
            bindings: bindings(Phase::ReadAWriteB),
        },
    )?;
    let second = BindGroup::new_compatible(
        ctx,
        BindGroupDesc {
            name: &name_b,
            group: 0,
            bindings: bindings(Phase::ReadBWriteA),
        },
        &first,
    )?;

    Ok([first, second])
}

/// Splits the state buffer into an `_A`/`_B` pair of identical layout.
pub(crate) fn state_pair(ctx: &GpuContext, mut state: StorageBuffer) -> Result<[StorageBuffer; 2]> {
    let base = state.name().to_string();
    let b = state.clone_empty(ctx, "_B")?;
    state.rename(format!("{base}_A"));
    Ok([state, b])
}

/// One compute pass followed by one render pass per tick, over a
/// double-buffered storage state.
#[derive(Debug)]
pub struct PingPongFrame {
    name: String,
    ctx: GpuContext,
    uniforms: Vec<UniformBuffer>,
    state: [StorageBuffer; 2],
    groups: [BindGroup; 2],
    compute: ComputePipeline,
    render: RenderPipeline,
    geometry: Option<Geometry>,
    clear_color: wgpu::Color,
    ping_pong: PingPong,
}

impl PingPongFrame {
    pub fn new(ctx: &GpuContext, config: PingPongConfig<'_>) -> Result<Self> {
        let state = state_pair(ctx, config.state)?;
        let base = config
            .state_var
            .map(str::to_string)
            .unwrap_or_else(|| state[0].schema().default_var_name());
        let (read_var, write_var) = role_names(&base);

        let groups = ping_pong_groups(
            ctx,
            config.name,
            &config.uniforms,
            &state,
            &read_var,
            &write_var,
            |_| Vec::new(),
        )?;

        let interface = groups[0].shader_code();
        let preamble = config.inject_interface.then_some(interface.as_str());

        let compute_label = format!("{} compute", config.name);
        let compute = ComputePipeline::new(
            ctx,
            ComputePipelineDesc {
                name: &compute_label,
                bind_group_layouts: vec![groups[0].layout()],
                shader: config.compute_shader,
                entry_point: config.compute_entry,
                preamble,
            },
        );

        let render_label = format!("{} render", config.name);
        let (render, geometry) = match config.render {
            RenderStage::Geometry { geometry, shader } => {
                let mut desc = RenderPipelineDesc::new(
                    &render_label,
                    shader,
                    vec![groups[0].layout()],
                    config.target_format,
                );
                desc.vertex_buffers = vec![geometry.vertex_layout()];
                desc.preamble = preamble;
                let pipeline = RenderPipeline::new(ctx, desc);
                (pipeline, Some(geometry))
            }
            RenderStage::Fullscreen { fragment_shader } => {
                let mut desc = RenderPipelineDesc::new(
                    &render_label,
                    FULLSCREEN_VERTEX_WGSL,
                    vec![groups[0].layout()],
                    config.target_format,
                );
                desc.fragment_shader = Some(fragment_shader);
                desc.preamble = preamble;
                (RenderPipeline::new(ctx, desc), None)
            }
        };

        log::info!(
            "ping-pong frame `{}` ready ({} uniforms, state `{}`/`{}`)",
            config.name,
            config.uniforms.len(),
            state[0].name(),
            state[1].name()
        );

        Ok(Self {
            name: config.name.to_string(),
            ctx: ctx.clone(),
            uniforms: config.uniforms,
            state,
            groups,
            compute,
            render,
            geometry,
            clear_color: config.clear_color,
            ping_pong: PingPong::new(),
        })
    }

    /// Encodes one compute pass and one render pass into `target` and submits
    /// them as a single batch.
    pub fn tick(&mut self, target: &wgpu::TextureView, pass: FramePassConfig) -> wgpu::SubmissionIndex {
        let mut encoder = self
            .ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(self.name.as_str()),
            });
        self.encode(&mut encoder, target, pass);
        self.ctx.queue().submit(std::iter::once(encoder.finish()))
    }

    /// Records one tick into a caller-owned encoder. The tick counter
    /// advances between the two passes.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        pass: FramePassConfig,
    ) {
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(self.compute.name()),
                timestamp_writes: None,
            });
            self.compute.set(&mut cpass);
            self.groups[self.ping_pong.phase().group()].bind_compute(&mut cpass);
            let [x, y] = pass.workgroup_count;
            cpass.dispatch_workgroups(x, y, 1);
        }

        self.ping_pong.advance();
        self.encode_render(encoder, target, pass.instances);
    }

    /// Redraws the current state without advancing it.
    pub fn render(&self, target: &wgpu::TextureView, instances: u32) -> wgpu::SubmissionIndex {
        let mut encoder = self
            .ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(self.render.name()),
            });
        self.encode_render(&mut encoder, target, instances);
        self.ctx.queue().submit(std::iter::once(encoder.finish()))
    }

    fn encode_render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        instances: u32,
    ) {
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
        self.groups[self.ping_pong.phase().group()].bind_render(&mut rpass);
        match &self.geometry {
            Some(geometry) => geometry.draw(&mut rpass, instances),
            None => rpass.draw(0..FULLSCREEN_VERTEX_COUNT, 0..instances),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed compute passes.
    pub fn tick_count(&self) -> u64 {
        self.ping_pong.tick()
    }

    /// Phase the next compute pass will use.
    pub fn phase(&self) -> Phase {
        self.ping_pong.phase()
    }

    /// The copy written by the most recent compute pass (A before any tick).
    pub fn current_state(&self) -> &StorageBuffer {
        &self.state[self.ping_pong.phase().read_index()]
    }

    pub fn state_buffers(&self) -> &[StorageBuffer; 2] {
        &self.state
    }

    pub fn uniforms(&self) -> &[UniformBuffer] {
        &self.uniforms
    }

    pub fn uniform_mut(&mut self, name: &str) -> Option<&mut UniformBuffer> {
        self.uniforms.iter_mut().find(|u| u.name() == name)
    }

    pub fn bind_groups(&self) -> &[BindGroup; 2] {
        &self.groups
    }

    /// Generated WGSL interface shared by both groups.
    pub fn interface_code(&self) -> String {
        self.groups[0].shader_code()
    }

    /// Releases every buffer this frame owns.
    pub fn destroy(&self) {
        for u in &self.uniforms {
            u.destroy();
        }
        for s in &self.state {
            s.destroy();
        }
        if let Some(g) = &self.geometry {
            g.destroy();
        }
    }
}
