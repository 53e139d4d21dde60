use crate::device::GpuContext;

use super::source::{pipeline_layout, shader_module, COMPUTE_ENTRY};

/// Parameters for [`ComputePipeline::new`].
#[derive(Debug, Clone)]
pub struct ComputePipelineDesc<'a> {
    pub name: &'a str,
    /// One layout per `@group` slot, in slot order.
    pub bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    pub shader: &'a str,
    pub entry_point: &'a str,
    pub preamble: Option<&'a str>,
}

impl<'a> ComputePipelineDesc<'a> {
    pub fn new(name: &'a str, shader: &'a str, bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>) -> Self {
        Self {
            name,
            bind_group_layouts,
            shader,
            entry_point: COMPUTE_ENTRY,
            preamble: None,
        }
    }
}

#[derive(Debug)]
pub struct ComputePipeline {
    name: String,
    entry_point: String,
    pipeline: wgpu::ComputePipeline,
}

impl ComputePipeline {
    pub fn new(ctx: &GpuContext, desc: ComputePipelineDesc<'_>) -> Self {
        let module = shader_module(ctx, desc.name, desc.preamble, desc.shader);
        let layout = pipeline_layout(ctx, desc.name, &desc.bind_group_layouts);

        let pipeline = ctx
            .device()
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(desc.name),
                layout: Some(&layout),
                module: &module,
                entry_point: Some(desc.entry_point),
                compilation_options: Default::default(),
                cache: None,
            });

        log::debug!(
            "compute pipeline `{}` built (entry `{}`, {} groups)",
            desc.name,
            desc.entry_point,
            desc.bind_group_layouts.len()
        );

        Self {
            name: desc.name.to_string(),
            entry_point: desc.entry_point.to_string(),
            pipeline,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn raw(&self) -> &wgpu::ComputePipeline {
        &self.pipeline
    }

    pub fn set(&self, pass: &mut wgpu::ComputePass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}
