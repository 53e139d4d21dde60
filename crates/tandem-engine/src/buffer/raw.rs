use wgpu::util::DeviceExt;

use crate::device::GpuContext;
use crate::error::{ConfigError, Result};

/// Typed initial contents for a buffer.
///
/// `I8`/`U8` exist so callers can hand over any host array, but they are
/// rejected at construction: 8-bit elements have no host-shareable WGSL type.
#[derive(Debug, Copy, Clone)]
pub enum BufferContents<'a> {
    F32(&'a [f32]),
    I32(&'a [i32]),
    U32(&'a [u32]),
    I16(&'a [i16]),
    U16(&'a [u16]),
    I8(&'a [i8]),
    U8(&'a [u8]),
}

impl<'a> BufferContents<'a> {
    /// Element type name, for diagnostics.
    pub fn element_name(&self) -> &'static str {
        match self {
            BufferContents::F32(_) => "f32",
            BufferContents::I32(_) => "i32",
            BufferContents::U32(_) => "u32",
            BufferContents::I16(_) => "i16",
            BufferContents::U16(_) => "u16",
            BufferContents::I8(_) => "i8",
            BufferContents::U8(_) => "u8",
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            BufferContents::F32(s) => s.len(),
            BufferContents::I32(s) => s.len(),
            BufferContents::U32(s) => s.len(),
            BufferContents::I16(s) => s.len(),
            BufferContents::U16(s) => s.len(),
            BufferContents::I8(s) => s.len(),
            BufferContents::U8(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes, or `None` for unsupported element types.
    pub fn bytes(&self) -> Option<&'a [u8]> {
        match *self {
            BufferContents::F32(s) => Some(bytemuck::cast_slice(s)),
            BufferContents::I32(s) => Some(bytemuck::cast_slice(s)),
            BufferContents::U32(s) => Some(bytemuck::cast_slice(s)),
            BufferContents::I16(s) => Some(bytemuck::cast_slice(s)),
            BufferContents::U16(s) => Some(bytemuck::cast_slice(s)),
            BufferContents::I8(_) | BufferContents::U8(_) => None,
        }
    }
}

/// Construction parameters shared by every buffer kind.
///
/// Exactly one of `contents` / `byte_len` is used; `contents` wins when both
/// are set. A zero `byte_len` counts as missing.
#[derive(Debug, Clone, Default)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub contents: Option<BufferContents<'a>>,
    pub byte_len: Option<u64>,
    pub usage: Option<wgpu::BufferUsages>,
    /// Only meaningful without `contents`; typed contents are always uploaded
    /// through a mapped-at-creation buffer.
    pub mapped_at_creation: bool,
}

/// What [`GpuBuffer::new`] will do for a validated [`BufferDesc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BufferPlan<'a> {
    Init {
        usage: wgpu::BufferUsages,
        bytes: &'a [u8],
    },
    Empty {
        usage: wgpu::BufferUsages,
        byte_len: u64,
    },
}

impl<'a> BufferDesc<'a> {
    pub(crate) fn plan(&self) -> std::result::Result<BufferPlan<'a>, ConfigError> {
        let usage = self.usage.ok_or_else(|| ConfigError::MissingUsage {
            label: self.label.to_string(),
        })?;

        if let Some(contents) = self.contents {
            let bytes = contents
                .bytes()
                .ok_or_else(|| ConfigError::UnsupportedElementType {
                    label: self.label.to_string(),
                    element: contents.element_name(),
                })?;
            if bytes.is_empty() {
                return Err(ConfigError::MissingContents {
                    label: self.label.to_string(),
                });
            }
            return Ok(BufferPlan::Init { usage, bytes });
        }

        match self.byte_len {
            Some(byte_len) if byte_len > 0 => Ok(BufferPlan::Empty { usage, byte_len }),
            _ => Err(ConfigError::MissingContents {
                label: self.label.to_string(),
            }),
        }
    }
}

/// One GPU buffer plus the queue used for out-of-band writes.
#[derive(Debug)]
pub struct GpuBuffer {
    label: String,
    buffer: wgpu::Buffer,
    queue: wgpu::Queue,
    byte_len: u64,
    usage: wgpu::BufferUsages,
}

impl GpuBuffer {
    pub fn new(ctx: &GpuContext, desc: BufferDesc<'_>) -> Result<Self> {
        let plan = desc.plan()?;

        let (buffer, byte_len, usage) = match plan {
            BufferPlan::Init { usage, bytes } => {
                let buffer =
                    ctx.device()
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(desc.label),
                            contents: bytes,
                            usage,
                        });
                (buffer, bytes.len() as u64, usage)
            }
            BufferPlan::Empty { usage, byte_len } => {
                // Mapped creation requires a size aligned to COPY_BUFFER_ALIGNMENT.
                let size = if desc.mapped_at_creation {
                    byte_len.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
                } else {
                    byte_len
                };
                let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
                    label: Some(desc.label),
                    size,
                    usage,
                    mapped_at_creation: desc.mapped_at_creation,
                });
                (buffer, byte_len, usage)
            }
        };

        log::debug!(
            "created buffer `{}` ({} bytes, {:?})",
            desc.label,
            byte_len,
            usage
        );

        Ok(Self {
            label: desc.label.to_string(),
            buffer,
            queue: ctx.queue().clone(),
            byte_len,
            usage,
        })
    }

    /// Queues a write of `data` at `offset`.
    ///
    /// No bounds checks happen here: writing past the end is a device-level
    /// validation error, not something recovered locally.
    pub fn write(&self, offset: u64, data: &[u8]) {
        self.queue.write_buffer(&self.buffer, offset, data);
    }

    /// Typed convenience over [`GpuBuffer::write`].
    pub fn write_pod<T: bytemuck::Pod>(&self, offset: u64, data: &[T]) {
        self.write(offset, bytemuck::cast_slice(data));
    }

    /// Unmaps a buffer created with `mapped_at_creation`.
    pub fn unmap(&self) {
        self.buffer.unmap();
    }

    /// Releases the GPU allocation. The handle must not be used afterwards.
    pub fn destroy(&self) {
        log::debug!("destroying buffer `{}`", self.label);
        self.buffer.destroy();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Byte length requested at creation (before any copy-alignment padding).
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    pub fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc<'a>() -> BufferDesc<'a> {
        BufferDesc {
            label: "test",
            usage: Some(wgpu::BufferUsages::STORAGE),
            ..Default::default()
        }
    }

    #[test]
    fn typed_contents_become_init_plan() {
        let data = [1.0f32, 2.0, 3.0];
        let d = BufferDesc {
            contents: Some(BufferContents::F32(&data)),
            ..desc()
        };
        match d.plan().unwrap() {
            BufferPlan::Init { bytes, .. } => assert_eq!(bytes.len(), 12),
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[test]
    fn byte_len_becomes_empty_plan() {
        let d = BufferDesc {
            byte_len: Some(64),
            ..desc()
        };
        assert_eq!(
            d.plan().unwrap(),
            BufferPlan::Empty {
                usage: wgpu::BufferUsages::STORAGE,
                byte_len: 64
            }
        );
    }

    #[test]
    fn missing_contents_and_length_is_rejected() {
        assert!(matches!(
            desc().plan(),
            Err(ConfigError::MissingContents { .. })
        ));
        let zero = BufferDesc {
            byte_len: Some(0),
            ..desc()
        };
        assert!(matches!(
            zero.plan(),
            Err(ConfigError::MissingContents { .. })
        ));
    }

    #[test]
    fn missing_usage_is_rejected() {
        let d = BufferDesc {
            byte_len: Some(16),
            usage: None,
            ..desc()
        };
        assert!(matches!(d.plan(), Err(ConfigError::MissingUsage { .. })));
    }

    #[test]
    fn byte_elements_are_unsupported() {
        let data = [1u8, 2, 3, 4];
        let d = BufferDesc {
            contents: Some(BufferContents::U8(&data)),
            ..desc()
        };
        assert_eq!(
            d.plan(),
            Err(ConfigError::UnsupportedElementType {
                label: "test".into(),
                element: "u8"
            })
        );
    }

    #[test]
    fn contents_win_over_byte_len() {
        let data = [7u32; 4];
        let d = BufferDesc {
            contents: Some(BufferContents::U32(&data)),
            byte_len: Some(1024),
            ..desc()
        };
        assert!(matches!(d.plan(), Ok(BufferPlan::Init { bytes, .. }) if bytes.len() == 16));
    }
}
