use crate::buffer::{StorageBuffer, UniformBuffer};
use crate::device::GpuContext;
use crate::error::{ConfigError, Result};
use crate::texture::Texture;

use super::decl::{layout_entries, validate, Access, BindingDecl, BindingKind, LayoutEntry};
use super::shader_decl;

/// One resource to bind, tagged with its kind.
///
/// The position in [`BindGroupDesc::bindings`] is the binding index.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    Uniform(&'a UniformBuffer),
    Storage {
        buffer: &'a StorageBuffer,
        access: Access,
        /// WGSL variable name; defaults to the schema's plural form.
        name: Option<&'a str>,
    },
    SampledTexture {
        texture: &'a Texture,
        name: &'a str,
    },
    StorageTexture {
        texture: &'a Texture,
        name: &'a str,
    },
    Sampler {
        sampler: &'a wgpu::Sampler,
        name: &'a str,
    },
}

impl<'a> Binding<'a> {
    pub fn storage(buffer: &'a StorageBuffer, access: Access) -> Self {
        Binding::Storage {
            buffer,
            access,
            name: None,
        }
    }

    pub fn storage_named(buffer: &'a StorageBuffer, access: Access, name: &'a str) -> Self {
        Binding::Storage {
            buffer,
            access,
            name: Some(name),
        }
    }

    pub fn decl(&self) -> BindingDecl {
        match *self {
            Binding::Uniform(buffer) => BindingDecl::Uniform(buffer.layout().clone()),
            Binding::Storage {
                buffer,
                access,
                name,
            } => BindingDecl::Storage {
                schema: buffer.schema().clone(),
                access,
                var_name: name
                    .map(str::to_string)
                    .unwrap_or_else(|| buffer.schema().default_var_name()),
            },
            Binding::SampledTexture { name, .. } => BindingDecl::SampledTexture {
                var_name: name.to_string(),
            },
            Binding::StorageTexture { texture, name } => BindingDecl::StorageTexture {
                var_name: name.to_string(),
                format: texture.format(),
            },
            Binding::Sampler { name, .. } => BindingDecl::Sampler {
                var_name: name.to_string(),
            },
        }
    }

    fn resource(&self) -> wgpu::BindingResource<'a> {
        match *self {
            Binding::Uniform(buffer) => buffer.buffer().raw().as_entire_binding(),
            Binding::Storage { buffer, .. } => buffer.buffer().raw().as_entire_binding(),
            Binding::SampledTexture { texture, .. } | Binding::StorageTexture { texture, .. } => {
                wgpu::BindingResource::TextureView(texture.view())
            }
            Binding::Sampler { sampler, .. } => wgpu::BindingResource::Sampler(sampler),
        }
    }
}

/// Complete description of a bind group. Built once; there is no incremental
/// add-then-create step.
#[derive(Debug, Clone)]
pub struct BindGroupDesc<'a> {
    pub name: &'a str,
    /// `@group(n)` index the group is bound at.
    pub group: u32,
    pub bindings: Vec<Binding<'a>>,
}

/// A realized bind group together with the layout it was derived from.
#[derive(Debug)]
pub struct BindGroup {
    name: String,
    group: u32,
    decls: Vec<BindingDecl>,
    entries: Vec<LayoutEntry>,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl BindGroup {
    pub fn new(ctx: &GpuContext, desc: BindGroupDesc<'_>) -> Result<Self> {
        let (decls, entries) = Self::derive(&desc)?;

        let raw_entries: Vec<wgpu::BindGroupLayoutEntry> =
            entries.iter().map(LayoutEntry::to_wgpu).collect();
        let layout = ctx
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.name),
                entries: &raw_entries,
            });

        Ok(Self::realize(ctx, &desc, decls, entries, layout))
    }

    /// Builds a group that reuses `other`'s layout object, so a pipeline
    /// created against `other` accepts either group.
    ///
    /// The derived layout entries must match exactly.
    pub fn new_compatible(ctx: &GpuContext, desc: BindGroupDesc<'_>, other: &BindGroup) -> Result<Self> {
        let (decls, entries) = Self::derive(&desc)?;
        if entries != other.entries || desc.group != other.group {
            return Err(ConfigError::IncompatibleLayout {
                group: desc.name.to_string(),
                other: other.name.clone(),
            }
            .into());
        }
        Ok(Self::realize(ctx, &desc, decls, entries, other.layout.clone()))
    }

    fn derive(desc: &BindGroupDesc<'_>) -> Result<(Vec<BindingDecl>, Vec<LayoutEntry>)> {
        let decls: Vec<BindingDecl> = desc.bindings.iter().map(Binding::decl).collect();
        validate(desc.name, &decls)?;
        let entries = layout_entries(&decls);
        Ok((decls, entries))
    }

    fn realize(
        ctx: &GpuContext,
        desc: &BindGroupDesc<'_>,
        decls: Vec<BindingDecl>,
        entries: Vec<LayoutEntry>,
        layout: wgpu::BindGroupLayout,
    ) -> Self {
        let group_entries: Vec<wgpu::BindGroupEntry<'_>> = desc
            .bindings
            .iter()
            .zip(&entries)
            .map(|(binding, entry)| wgpu::BindGroupEntry {
                binding: entry.binding,
                resource: binding.resource(),
            })
            .collect();

        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(desc.name),
            layout: &layout,
            entries: &group_entries,
        });

        log::debug!(
            "bind group `{}` @group({}) created with {} bindings",
            desc.name,
            desc.group,
            entries.len()
        );

        Self {
            name: desc.name.to_string(),
            group: desc.group,
            decls,
            entries,
            layout,
            bind_group,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `@group(n)` index.
    pub fn index(&self) -> u32 {
        self.group
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn raw(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn decls(&self) -> &[BindingDecl] {
        &self.decls
    }

    /// `(binding, kind)` pairs in binding order.
    pub fn layout_bindings(&self) -> Vec<(u32, BindingKind)> {
        self.entries.iter().map(|e| (e.binding, e.kind)).collect()
    }

    /// WGSL declarations matching this group's layout.
    pub fn shader_code(&self) -> String {
        shader_decl::generate(self.group, &self.decls)
    }

    pub fn bind_compute(&self, pass: &mut wgpu::ComputePass<'_>) {
        pass.set_bind_group(self.group, &self.bind_group, &[]);
    }

    pub fn bind_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(self.group, &self.bind_group, &[]);
    }
}
