//! Fixed primitives for instanced render passes.
//!
//! Vertices are 2D positions (`@location(0) vec2<f32>`) in clip space; the
//! vertex shader is expected to place each instance itself.

use crate::buffer::{
    BufferContents, IndexBuffer, IndexBufferDesc, VertexAttribute, VertexBuffer, VertexBufferDesc,
};
use crate::device::GpuContext;
use crate::error::Result;

const POSITION_STRIDE: u64 = 2 * std::mem::size_of::<f32>() as u64;

const SQUARE_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

// Small arrow, pointing +Y.
const TRIANGLE_VERTICES: [f32; 6] = [-0.01, -0.02, 0.01, -0.02, 0.0, 0.02];

fn square_vertices(scale: f32) -> [f32; 8] {
    [-scale, -scale, scale, -scale, scale, scale, -scale, scale]
}

/// A vertex buffer plus an optional index buffer.
#[derive(Debug)]
pub struct Geometry {
    name: String,
    vertices: VertexBuffer,
    indices: Option<IndexBuffer>,
}

impl Geometry {
    /// Axis-aligned square spanning `[-scale, scale]` on both axes.
    pub fn square(ctx: &GpuContext, scale: f32) -> Result<Self> {
        let positions = square_vertices(scale);
        let vertices = Self::position_buffer(ctx, "square vertices", &positions)?;
        let indices = IndexBuffer::new(
            ctx,
            IndexBufferDesc {
                label: "square indices",
                contents: Some(BufferContents::U32(&SQUARE_INDICES)),
                ..Default::default()
            },
        )?;

        Ok(Self {
            name: "square".into(),
            vertices,
            indices: Some(indices),
        })
    }

    /// Single non-indexed triangle, sized for flocking agents.
    pub fn triangle(ctx: &GpuContext) -> Result<Self> {
        let vertices = Self::position_buffer(ctx, "triangle vertices", &TRIANGLE_VERTICES)?;
        Ok(Self {
            name: "triangle".into(),
            vertices,
            indices: None,
        })
    }

    fn position_buffer(ctx: &GpuContext, label: &str, positions: &[f32]) -> Result<VertexBuffer> {
        VertexBuffer::new(
            ctx,
            VertexBufferDesc {
                label,
                contents: Some(BufferContents::F32(positions)),
                stride: POSITION_STRIDE,
                attributes: vec![VertexAttribute {
                    name: "position".into(),
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
                ..Default::default()
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout to pass to the render pipeline.
    pub fn vertex_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        self.vertices.layout()
    }

    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&IndexBuffer> {
        self.indices.as_ref()
    }

    /// Binds the buffers and draws `instances` copies.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: u32) {
        self.vertices.bind(pass);
        match &self.indices {
            Some(indices) => {
                indices.bind(pass);
                pass.draw_indexed(0..indices.item_count(), 0, 0..instances);
            }
            None => pass.draw(0..self.vertices.item_count(), 0..instances),
        }
    }

    pub fn destroy(&self) {
        self.vertices.destroy();
        if let Some(indices) = &self.indices {
            indices.destroy();
        }
    }
}
