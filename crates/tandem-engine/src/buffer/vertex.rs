use crate::device::GpuContext;
use crate::error::{ConfigError, Result};

use super::{BufferContents, BufferDesc, GpuBuffer};

/// One named attribute inside a vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    pub name: String,
    pub format: wgpu::VertexFormat,
    pub offset: u64,
    /// Matches `@location(n)` in the vertex shader.
    pub shader_location: u32,
}

/// Parameters for [`VertexBuffer::new`].
#[derive(Debug, Clone)]
pub struct VertexBufferDesc<'a> {
    pub label: &'a str,
    pub contents: Option<BufferContents<'a>>,
    pub byte_len: Option<u64>,
    pub usage: wgpu::BufferUsages,
    /// Position in the render pipeline's vertex buffer list.
    pub slot: u32,
    pub stride: u64,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<VertexAttribute>,
}

impl Default for VertexBufferDesc<'_> {
    fn default() -> Self {
        Self {
            label: "vertex buffer",
            contents: None,
            byte_len: None,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            slot: 0,
            // xyzw * 4 bytes
            stride: 16,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Vec::new(),
        }
    }
}

/// Vertex data plus the layout a render pipeline needs to read it.
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: GpuBuffer,
    slot: u32,
    stride: u64,
    step_mode: wgpu::VertexStepMode,
    names: Vec<String>,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexBuffer {
    pub fn new(ctx: &GpuContext, desc: VertexBufferDesc<'_>) -> Result<Self> {
        if desc.attributes.is_empty() {
            return Err(ConfigError::MissingVertexAttributes {
                label: desc.label.to_string(),
            }
            .into());
        }
        if desc.stride == 0 {
            return Err(ConfigError::ZeroStride {
                label: desc.label.to_string(),
            }
            .into());
        }

        let buffer = GpuBuffer::new(
            ctx,
            BufferDesc {
                label: desc.label,
                contents: desc.contents,
                byte_len: desc.byte_len,
                usage: Some(desc.usage),
                mapped_at_creation: false,
            },
        )?;

        let (names, attributes) = desc
            .attributes
            .into_iter()
            .map(|a| {
                let raw = wgpu::VertexAttribute {
                    format: a.format,
                    offset: a.offset,
                    shader_location: a.shader_location,
                };
                (a.name, raw)
            })
            .unzip();

        Ok(Self {
            buffer,
            slot: desc.slot,
            stride: desc.stride,
            step_mode: desc.step_mode,
            names,
            attributes,
        })
    }

    /// Layout entry for `wgpu::VertexState::buffers`.
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }

    /// Number of whole vertices stored.
    pub fn item_count(&self) -> u32 {
        (self.buffer.byte_len() / self.stride) as u32
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&wgpu::VertexAttribute> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.attributes[i])
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(self.slot, self.buffer.raw().slice(..));
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}
