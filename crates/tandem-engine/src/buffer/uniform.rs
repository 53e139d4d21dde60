use crate::device::GpuContext;
use crate::error::{ConfigError, Result};
use crate::layout::{pack, AlignedField, Field, PackedLayout};

use super::{BufferDesc, GpuBuffer};

/// Named, packed description of a uniform struct. Pure host data.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLayout {
    name: String,
    packed: PackedLayout,
}

impl UniformLayout {
    pub fn new<S: AsRef<str>>(name: &str, fields: &[(S, Field)]) -> Self {
        Self {
            name: name.to_string(),
            packed: pack(fields),
        }
    }

    /// Struct name used in generated WGSL.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_len(&self) -> u64 {
        self.packed.byte_len
    }

    pub fn fields(&self) -> &[AlignedField] {
        &self.packed.fields
    }

    pub fn field(&self, name: &str) -> Option<&AlignedField> {
        self.packed.get(name)
    }

    /// Resolves `name` and checks that `len` bytes fit inside it.
    pub(crate) fn locate(&self, name: &str, len: usize) -> std::result::Result<u64, ConfigError> {
        let field = self
            .packed
            .get(name)
            .ok_or_else(|| ConfigError::UnknownUniformField {
                buffer: self.name.clone(),
                field: name.to_string(),
            })?;
        if len as u64 > field.byte_size {
            return Err(ConfigError::FieldValueTooLarge {
                buffer: self.name.clone(),
                field: name.to_string(),
                got: len,
                size: field.byte_size,
            });
        }
        Ok(field.byte_offset)
    }

    fn store(&mut self, name: &str, value: &[u8]) {
        if let Some(field) = self.packed.get_mut(name) {
            field.value = Some(value.to_vec());
        }
    }
}

/// Parameters for [`UniformBuffer::new`].
#[derive(Debug, Clone)]
pub struct UniformBufferDesc<'a> {
    pub name: &'a str,
    pub fields: Vec<(&'a str, Field)>,
    pub usage: wgpu::BufferUsages,
}

impl<'a> UniformBufferDesc<'a> {
    pub fn new(name: &'a str, fields: Vec<(&'a str, Field)>) -> Self {
        Self {
            name,
            fields,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// A uniform buffer whose fields can be updated individually by name.
#[derive(Debug)]
pub struct UniformBuffer {
    layout: UniformLayout,
    buffer: GpuBuffer,
}

impl UniformBuffer {
    pub fn new(ctx: &GpuContext, desc: UniformBufferDesc<'_>) -> Result<Self> {
        let layout = UniformLayout::new(desc.name, &desc.fields);

        // Validate every initial value before allocating anything.
        let mut initial = Vec::new();
        for field in layout.fields() {
            if let Some(value) = &field.value {
                let offset = layout.locate(&field.name, value.len())?;
                initial.push((offset, value.clone()));
            }
        }

        let buffer = GpuBuffer::new(
            ctx,
            BufferDesc {
                label: desc.name,
                contents: None,
                byte_len: Some(layout.byte_len()),
                usage: Some(desc.usage),
                mapped_at_creation: false,
            },
        )?;

        for (offset, value) in &initial {
            buffer.write(*offset, value);
        }

        Ok(Self { layout, buffer })
    }

    /// Rewrites a single field in place.
    ///
    /// An unknown field name is reported as [`ConfigError::UnknownUniformField`]
    /// and logged; nothing is written. Animation loops that prefer to carry on
    /// can drop the error explicitly.
    pub fn update_field(&mut self, name: &str, value: &[u8]) -> Result<()> {
        let offset = match self.layout.locate(name, value.len()) {
            Ok(offset) => offset,
            Err(e) => {
                log::warn!("{e}");
                return Err(e.into());
            }
        };
        self.layout.store(name, value);
        self.buffer.write(offset, value);
        Ok(())
    }

    /// Typed convenience over [`UniformBuffer::update_field`].
    pub fn update_field_pod<T: bytemuck::Pod>(&mut self, name: &str, value: &[T]) -> Result<()> {
        self.update_field(name, bytemuck::cast_slice(value))
    }

    pub fn name(&self) -> &str {
        self.layout.name()
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}
