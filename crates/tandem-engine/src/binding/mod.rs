//! Bind groups and the WGSL interface text that matches them.
//!
//! A bind group is described by one ordered list of tagged [`Binding`]s:
//! uniform buffers first, then storage buffers, then textures and samplers.
//! The binding index of every entry is its list position, and the same list
//! drives both the device layout and the generated shader declarations.

mod bind_group;
mod decl;
mod shader_decl;

pub use bind_group::{BindGroup, BindGroupDesc, Binding};
pub use decl::{layout_entries, validate, Access, BindingDecl, BindingKind, LayoutEntry};
pub use shader_decl::{generate, parse_bindings};
