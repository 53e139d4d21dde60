use crate::device::GpuContext;

pub const VERTEX_ENTRY: &str = "vert_main";
pub const FRAGMENT_ENTRY: &str = "frag_main";
pub const COMPUTE_ENTRY: &str = "comp_main";

/// Joins a generated preamble and a shader body into one WGSL module.
pub fn compose_source(preamble: Option<&str>, body: &str) -> String {
    match preamble {
        Some(p) if !p.trim().is_empty() => format!("{}\n{}", p.trim_end(), body),
        _ => body.to_string(),
    }
}

pub(crate) fn shader_module(
    ctx: &GpuContext,
    label: &str,
    preamble: Option<&str>,
    body: &str,
) -> wgpu::ShaderModule {
    let source = compose_source(preamble, body);
    ctx.device()
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
}

pub(crate) fn pipeline_layout(
    ctx: &GpuContext,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    ctx.device()
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts,
            immediate_size: 0,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_goes_first() {
        let s = compose_source(Some("struct A { x: f32, }\n\n"), "fn f() {}");
        assert_eq!(s, "struct A { x: f32, }\nfn f() {}");
    }

    #[test]
    fn blank_preamble_is_ignored() {
        assert_eq!(compose_source(Some("  \n"), "fn f() {}"), "fn f() {}");
        assert_eq!(compose_source(None, "fn f() {}"), "fn f() {}");
    }
}
