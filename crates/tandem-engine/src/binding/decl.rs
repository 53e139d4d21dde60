//! Host-side binding declarations.
//!
//! Everything here is plain data: layouts and shader text are derived from a
//! `&[BindingDecl]` without touching the device.

use crate::buffer::{StorageSchema, UniformLayout};
use crate::error::ConfigError;
use crate::texture::storage_format_name;

/// Access mode of a storage buffer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

impl Access {
    pub fn wgsl_name(self) -> &'static str {
        match self {
            Access::ReadOnly => "read",
            Access::ReadWrite => "read_write",
        }
    }
}

/// Resource kind of one binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Uniform,
    Storage(Access),
    SampledTexture,
    StorageTexture(wgpu::TextureFormat),
    Sampler,
}

impl BindingKind {
    // Uniforms, then storage buffers, then images and samplers.
    fn rank(self) -> u8 {
        match self {
            BindingKind::Uniform => 0,
            BindingKind::Storage(_) => 1,
            BindingKind::SampledTexture | BindingKind::StorageTexture(_) | BindingKind::Sampler => 2,
        }
    }

    /// Stages allowed to see this binding.
    ///
    /// Read-write storage is hidden from the vertex stage.
    pub fn visibility(self) -> wgpu::ShaderStages {
        use wgpu::ShaderStages as S;
        match self {
            BindingKind::Uniform | BindingKind::Storage(Access::ReadOnly) => {
                S::VERTEX | S::FRAGMENT | S::COMPUTE
            }
            BindingKind::Storage(Access::ReadWrite) => S::FRAGMENT | S::COMPUTE,
            BindingKind::SampledTexture | BindingKind::Sampler => S::FRAGMENT | S::COMPUTE,
            BindingKind::StorageTexture(_) => S::COMPUTE,
        }
    }

    pub fn binding_type(self) -> wgpu::BindingType {
        match self {
            BindingKind::Uniform => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingKind::Storage(access) => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage {
                    read_only: access == Access::ReadOnly,
                },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingKind::SampledTexture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            BindingKind::StorageTexture(format) => wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            BindingKind::Sampler => {
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
            }
        }
    }
}

/// Everything needed to lay out a binding and declare it in WGSL.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingDecl {
    Uniform(UniformLayout),
    Storage {
        schema: StorageSchema,
        access: Access,
        var_name: String,
    },
    SampledTexture {
        var_name: String,
    },
    StorageTexture {
        var_name: String,
        format: wgpu::TextureFormat,
    },
    Sampler {
        var_name: String,
    },
}

impl BindingDecl {
    pub fn kind(&self) -> BindingKind {
        match self {
            BindingDecl::Uniform(_) => BindingKind::Uniform,
            BindingDecl::Storage { access, .. } => BindingKind::Storage(*access),
            BindingDecl::SampledTexture { .. } => BindingKind::SampledTexture,
            BindingDecl::StorageTexture { format, .. } => BindingKind::StorageTexture(*format),
            BindingDecl::Sampler { .. } => BindingKind::Sampler,
        }
    }

    /// Variable name in generated WGSL. Uniforms use their lowercased name.
    pub fn var_name(&self) -> String {
        match self {
            BindingDecl::Uniform(layout) => layout.name().to_lowercase(),
            BindingDecl::Storage { var_name, .. }
            | BindingDecl::SampledTexture { var_name }
            | BindingDecl::StorageTexture { var_name, .. }
            | BindingDecl::Sampler { var_name } => var_name.clone(),
        }
    }
}

/// One resolved slot of a bind group layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub binding: u32,
    pub kind: BindingKind,
    pub visibility: wgpu::ShaderStages,
}

impl LayoutEntry {
    pub fn to_wgpu(&self) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility,
            ty: self.kind.binding_type(),
            count: None,
        }
    }
}

/// Binding index is list position; nothing else is consulted.
pub fn layout_entries(decls: &[BindingDecl]) -> Vec<LayoutEntry> {
    decls
        .iter()
        .enumerate()
        .map(|(i, decl)| {
            let kind = decl.kind();
            LayoutEntry {
                binding: i as u32,
                kind,
                visibility: kind.visibility(),
            }
        })
        .collect()
}

/// Rejects empty groups, out-of-order kinds and storage texture formats
/// that cannot be declared in WGSL.
pub fn validate(group: &str, decls: &[BindingDecl]) -> Result<(), ConfigError> {
    if decls.is_empty() {
        return Err(ConfigError::EmptyBindGroup {
            group: group.to_string(),
        });
    }

    for (i, pair) in decls.windows(2).enumerate() {
        let (prev, next) = (pair[0].kind(), pair[1].kind());
        if next.rank() < prev.rank() {
            return Err(ConfigError::BindingOrder {
                group: group.to_string(),
                detail: format!(
                    "binding {} ({next:?}) follows binding {i} ({prev:?}); \
                     expected uniforms, then storage buffers, then textures and samplers",
                    i + 1
                ),
            });
        }
    }

    for decl in decls {
        if let BindingKind::StorageTexture(format) = decl.kind() {
            if storage_format_name(format).is_none() {
                return Err(ConfigError::UnsupportedStorageFormat {
                    group: group.to_string(),
                    format: format!("{format:?}"),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Field, WgslType};

    fn uniform(name: &str) -> BindingDecl {
        BindingDecl::Uniform(UniformLayout::new(
            name,
            &[("size", Field::new(WgslType::Vec2F32))],
        ))
    }

    fn storage(access: Access, var: &str) -> BindingDecl {
        BindingDecl::Storage {
            schema: StorageSchema::new("Cell", &[("state", WgslType::U32)]),
            access,
            var_name: var.to_string(),
        }
    }

    // ── layout entries ───────────────────────────────────────────────────

    #[test]
    fn bindings_are_contiguous_from_zero() {
        let decls = [
            uniform("Grid"),
            uniform("Options"),
            storage(Access::ReadOnly, "cells_in"),
            storage(Access::ReadWrite, "cells_out"),
        ];
        let entries = layout_entries(&decls);
        let indices: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(entries[0].kind, BindingKind::Uniform);
        assert_eq!(entries[3].kind, BindingKind::Storage(Access::ReadWrite));
    }

    #[test]
    fn read_write_storage_is_hidden_from_vertex() {
        let entries = layout_entries(&[
            uniform("Grid"),
            storage(Access::ReadOnly, "a"),
            storage(Access::ReadWrite, "b"),
        ]);
        assert!(entries[0].visibility.contains(wgpu::ShaderStages::VERTEX));
        assert!(entries[1].visibility.contains(wgpu::ShaderStages::VERTEX));
        assert!(!entries[2].visibility.contains(wgpu::ShaderStages::VERTEX));
        assert!(entries[2].visibility.contains(wgpu::ShaderStages::COMPUTE));
    }

    #[test]
    fn same_declarations_give_identical_layouts() {
        let decls = || vec![uniform("Grid"), storage(Access::ReadWrite, "x")];
        assert_eq!(layout_entries(&decls()), layout_entries(&decls()));
    }

    #[test]
    fn storage_texture_is_compute_only() {
        assert_eq!(
            BindingKind::StorageTexture(wgpu::TextureFormat::Rgba8Unorm).visibility(),
            wgpu::ShaderStages::COMPUTE
        );
    }

    // ── validation ───────────────────────────────────────────────────────

    #[test]
    fn empty_group_is_rejected() {
        assert_eq!(
            validate("g", &[]),
            Err(ConfigError::EmptyBindGroup { group: "g".into() })
        );
    }

    #[test]
    fn uniform_after_storage_is_rejected() {
        let err = validate("g", &[storage(Access::ReadOnly, "a"), uniform("Grid")]).unwrap_err();
        assert!(matches!(err, ConfigError::BindingOrder { .. }));
    }

    #[test]
    fn storage_after_texture_is_rejected() {
        let decls = [
            BindingDecl::SampledTexture {
                var_name: "src".into(),
            },
            storage(Access::ReadOnly, "a"),
        ];
        assert!(matches!(
            validate("g", &decls),
            Err(ConfigError::BindingOrder { .. })
        ));
    }

    #[test]
    fn textures_and_samplers_may_mix() {
        let decls = [
            uniform("Options"),
            BindingDecl::Sampler {
                var_name: "smp".into(),
            },
            BindingDecl::SampledTexture {
                var_name: "src".into(),
            },
        ];
        assert_eq!(validate("g", &decls), Ok(()));
    }

    #[test]
    fn unnamed_storage_format_is_rejected() {
        let decls = [BindingDecl::StorageTexture {
            var_name: "dst".into(),
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
        }];
        assert!(matches!(
            validate("g", &decls),
            Err(ConfigError::UnsupportedStorageFormat { .. })
        ));
    }
}
