use crate::device::GpuContext;
use crate::error::Result;
use crate::layout::WgslType;

use super::readback::read_blocking;
use super::{BufferContents, BufferDesc, GpuBuffer};

/// Element struct of a storage array, as seen by shaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSchema {
    pub struct_name: String,
    pub attributes: Vec<(String, WgslType)>,
}

impl StorageSchema {
    pub fn new<S: Into<String>>(struct_name: S, attributes: &[(&str, WgslType)]) -> Self {
        Self {
            struct_name: struct_name.into(),
            attributes: attributes
                .iter()
                .map(|(n, t)| (n.to_string(), *t))
                .collect(),
        }
    }

    /// Default binding variable name: `CellState` -> `cellStates`.
    pub fn default_var_name(&self) -> String {
        let mut chars = self.struct_name.chars();
        match chars.next() {
            Some(first) => format!("{}{}s", first.to_lowercase(), chars.as_str()),
            None => String::from("s"),
        }
    }
}

/// Parameters for [`StorageBuffer::new`].
#[derive(Debug, Clone)]
pub struct StorageBufferDesc<'a> {
    /// Buffer name; also its debug label.
    pub name: &'a str,
    pub schema: StorageSchema,
    pub contents: Option<BufferContents<'a>>,
    pub byte_len: Option<u64>,
    pub usage: wgpu::BufferUsages,
    /// Element stride in bytes, when the caller wants it recorded.
    pub stride: Option<u64>,
}

impl<'a> StorageBufferDesc<'a> {
    pub fn new(name: &'a str, schema: StorageSchema) -> Self {
        Self {
            name,
            schema,
            contents: None,
            byte_len: None,
            usage: Self::DEFAULT_USAGE,
            stride: None,
        }
    }

    /// `COPY_SRC` is included so state can always be read back for inspection.
    pub const DEFAULT_USAGE: wgpu::BufferUsages = wgpu::BufferUsages::STORAGE
        .union(wgpu::BufferUsages::COPY_DST)
        .union(wgpu::BufferUsages::COPY_SRC);
}

/// A storage buffer plus the schema of its elements.
#[derive(Debug)]
pub struct StorageBuffer {
    name: String,
    schema: StorageSchema,
    stride: Option<u64>,
    buffer: GpuBuffer,
}

impl StorageBuffer {
    pub fn new(ctx: &GpuContext, desc: StorageBufferDesc<'_>) -> Result<Self> {
        let buffer = GpuBuffer::new(
            ctx,
            BufferDesc {
                label: desc.name,
                contents: desc.contents,
                byte_len: desc.byte_len,
                usage: Some(desc.usage),
                mapped_at_creation: false,
            },
        )?;

        Ok(Self {
            name: desc.name.to_string(),
            schema: desc.schema,
            stride: desc.stride,
            buffer,
        })
    }

    /// Allocates a second buffer with the same length, usage and schema but
    /// zeroed contents. The new name is this name plus `suffix`.
    pub fn clone_empty(&self, ctx: &GpuContext, suffix: &str) -> Result<Self> {
        let name = format!("{}{}", self.name, suffix);
        let buffer = GpuBuffer::new(
            ctx,
            BufferDesc {
                label: &name,
                contents: None,
                byte_len: Some(self.buffer.byte_len()),
                usage: Some(self.buffer.usage()),
                mapped_at_creation: false,
            },
        )?;

        Ok(Self {
            name,
            schema: self.schema.clone(),
            stride: self.stride,
            buffer,
        })
    }

    /// Renames the buffer (host-side only; the debug label is fixed at creation).
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Copies the current contents back to the host, blocking until done.
    pub fn read_to_vec(&self, ctx: &GpuContext) -> Result<Vec<u8>> {
        read_blocking(ctx, self.buffer.raw(), self.buffer.byte_len(), &self.name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &StorageSchema {
        &self.schema
    }

    pub fn stride(&self) -> Option<u64> {
        self.stride
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}
