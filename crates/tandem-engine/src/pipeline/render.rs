use crate::device::GpuContext;

use super::source::{pipeline_layout, shader_module, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// Premultiplied-alpha "over" blending.
pub fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Parameters for [`RenderPipeline::new`].
#[derive(Debug, Clone)]
pub struct RenderPipelineDesc<'a> {
    pub name: &'a str,
    pub bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    pub vertex_shader: &'a str,
    /// Separate fragment module; `None` means the vertex module holds both stages.
    pub fragment_shader: Option<&'a str>,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    /// Empty for pipelines that synthesize vertices from `vertex_index`.
    pub vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    pub target_format: wgpu::TextureFormat,
    pub topology: wgpu::PrimitiveTopology,
    /// `None` replaces the target contents.
    pub blend: Option<wgpu::BlendState>,
    /// Prepended to both vertex and fragment sources.
    pub preamble: Option<&'a str>,
}

impl<'a> RenderPipelineDesc<'a> {
    pub fn new(
        name: &'a str,
        shader: &'a str,
        bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            name,
            bind_group_layouts,
            vertex_shader: shader,
            fragment_shader: None,
            vertex_entry: VERTEX_ENTRY,
            fragment_entry: FRAGMENT_ENTRY,
            vertex_buffers: Vec::new(),
            target_format,
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: None,
            preamble: None,
        }
    }
}

#[derive(Debug)]
pub struct RenderPipeline {
    name: String,
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
}

impl RenderPipeline {
    pub fn new(ctx: &GpuContext, desc: RenderPipelineDesc<'_>) -> Self {
        let vertex_module = shader_module(ctx, desc.name, desc.preamble, desc.vertex_shader);
        let fragment_module = desc
            .fragment_shader
            .map(|src| shader_module(ctx, desc.name, desc.preamble, src));
        let layout = pipeline_layout(ctx, desc.name, &desc.bind_group_layouts);

        let pipeline = ctx
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.name),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(desc.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &desc.vertex_buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: fragment_module.as_ref().unwrap_or(&vertex_module),
                    entry_point: Some(desc.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.target_format,
                        blend: desc.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        log::debug!(
            "render pipeline `{}` built ({:?}, {} groups)",
            desc.name,
            desc.target_format,
            desc.bind_group_layouts.len()
        );

        Self {
            name: desc.name.to_string(),
            format: desc.target_format,
            pipeline,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn set(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}
