use crate::device::GpuContext;
use crate::error::{ConfigError, Result};

use super::{BufferContents, BufferDesc, GpuBuffer};

/// Parameters for [`IndexBuffer::new`].
#[derive(Debug, Clone)]
pub struct IndexBufferDesc<'a> {
    pub label: &'a str,
    /// Must be `U16` or `U32`; the element width selects the index format.
    pub contents: Option<BufferContents<'a>>,
    pub byte_len: Option<u64>,
    /// Format for buffers created from `byte_len` alone. Defaults to `Uint32`.
    pub format: Option<wgpu::IndexFormat>,
    pub usage: wgpu::BufferUsages,
}

impl Default for IndexBufferDesc<'_> {
    fn default() -> Self {
        Self {
            label: "index buffer",
            contents: None,
            byte_len: None,
            format: None,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// Infers the index format from the element type of `contents`.
pub(crate) fn index_format(
    label: &str,
    contents: &BufferContents<'_>,
) -> std::result::Result<wgpu::IndexFormat, ConfigError> {
    match contents {
        BufferContents::U16(_) => Ok(wgpu::IndexFormat::Uint16),
        BufferContents::U32(_) => Ok(wgpu::IndexFormat::Uint32),
        other => Err(ConfigError::UnsupportedIndexType {
            label: label.to_string(),
            element: other.element_name(),
        }),
    }
}

#[derive(Debug)]
pub struct IndexBuffer {
    buffer: GpuBuffer,
    format: wgpu::IndexFormat,
}

impl IndexBuffer {
    pub fn new(ctx: &GpuContext, desc: IndexBufferDesc<'_>) -> Result<Self> {
        let format = match &desc.contents {
            Some(contents) => index_format(desc.label, contents)?,
            None => desc.format.unwrap_or(wgpu::IndexFormat::Uint32),
        };

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

        Ok(Self { buffer, format })
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }

    /// Number of indices stored.
    pub fn item_count(&self) -> u32 {
        let width = match self.format {
            wgpu::IndexFormat::Uint16 => 2,
            wgpu::IndexFormat::Uint32 => 4,
        };
        (self.buffer.byte_len() / width) as u32
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_index_buffer(self.buffer.raw().slice(..), self.format);
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_and_u32_select_matching_formats() {
        let a = [0u16, 1, 2];
        let b = [0u32, 1, 2];
        assert_eq!(
            index_format("i", &BufferContents::U16(&a)),
            Ok(wgpu::IndexFormat::Uint16)
        );
        assert_eq!(
            index_format("i", &BufferContents::U32(&b)),
            Ok(wgpu::IndexFormat::Uint32)
        );
    }

    #[test]
    fn other_widths_are_rejected() {
        let f = [0.0f32; 3];
        let err = index_format("tri", &BufferContents::F32(&f)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedIndexType {
                label: "tri".into(),
                element: "f32"
            }
        );
    }
}
