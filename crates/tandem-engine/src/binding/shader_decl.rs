//! WGSL interface text for a bind group, and a small parser that reads the
//! binding slots back out of such text.

use std::fmt::Write;

use crate::texture::{parse_storage_format, storage_format_name};

use super::decl::{Access, BindingDecl, BindingKind};

/// Generates struct and binding declarations for `decls` at `@group(group)`.
///
/// Each struct is emitted once even when several bindings share it, so two
/// ping-pong groups over the same schema produce identical text.
pub fn generate(group: u32, decls: &[BindingDecl]) -> String {
    let mut out = String::new();
    let mut emitted: Vec<&str> = Vec::new();

    for decl in decls {
        match decl {
            BindingDecl::Uniform(layout) => {
                if emitted.contains(&layout.name()) {
                    continue;
                }
                emitted.push(layout.name());
                let fields = layout.fields().iter().map(|f| (f.name.as_str(), f.ty));
                write_struct(&mut out, layout.name(), fields);
            }
            BindingDecl::Storage { schema, .. } => {
                if emitted.contains(&schema.struct_name.as_str()) {
                    continue;
                }
                emitted.push(&schema.struct_name);
                let fields = schema.attributes.iter().map(|(n, t)| (n.as_str(), *t));
                write_struct(&mut out, &schema.struct_name, fields);
            }
            _ => {}
        }
    }

    for (binding, decl) in decls.iter().enumerate() {
        let var = decl.var_name();
        let decl_text = match decl {
            BindingDecl::Uniform(layout) => format!("var<uniform> {var}: {}", layout.name()),
            BindingDecl::Storage { schema, access, .. } => format!(
                "var<storage, {}> {var}: array<{}>",
                access.wgsl_name(),
                schema.struct_name
            ),
            BindingDecl::SampledTexture { .. } => format!("var {var}: texture_2d<f32>"),
            BindingDecl::StorageTexture { format, .. } => format!(
                "var {var}: texture_storage_2d<{}, write>",
                storage_format_name(*format).unwrap_or("rgba8unorm")
            ),
            BindingDecl::Sampler { .. } => format!("var {var}: sampler"),
        };
        let _ = writeln!(out, "@group({group}) @binding({binding}) {decl_text};");
    }

    out
}

fn write_struct<'a>(
    out: &mut String,
    name: &str,
    fields: impl Iterator<Item = (&'a str, crate::layout::WgslType)>,
) {
    let _ = writeln!(out, "struct {name} {{");
    for (field, ty) in fields {
        let _ = writeln!(out, "    {field}: {ty},");
    }
    out.push_str("}\n\n");
}

/// Recovers `(binding, kind)` pairs, in text order, from declarations of the
/// shape produced by [`generate`]. Lines that are not binding declarations
/// are skipped.
pub fn parse_bindings(text: &str) -> Vec<(u32, BindingKind)> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(u32, BindingKind)> {
    let rest = line.trim().split_once("@binding(")?.1;
    let (index, rest) = rest.split_once(')')?;
    let binding = index.trim().parse().ok()?;

    let rest = rest.trim_start().strip_prefix("var")?;
    let kind = if let Some(qualified) = rest.strip_prefix('<') {
        let (space, _) = qualified.split_once('>')?;
        let mut parts = space.split(',').map(str::trim);
        match (parts.next()?, parts.next()) {
            ("uniform", None) => BindingKind::Uniform,
            ("storage", None | Some("read")) => BindingKind::Storage(Access::ReadOnly),
            ("storage", Some("read_write")) => BindingKind::Storage(Access::ReadWrite),
            _ => return None,
        }
    } else {
        let ty = rest.split_once(':')?.1.trim().trim_end_matches(';').trim();
        if let Some(params) = ty.strip_prefix("texture_storage_2d<") {
            let format = params.split(',').next()?.trim();
            BindingKind::StorageTexture(parse_storage_format(format)?)
        } else if ty.starts_with("texture_2d") {
            BindingKind::SampledTexture
        } else if ty == "sampler" {
            BindingKind::Sampler
        } else {
            return None;
        }
    };

    Some((binding, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::layout_entries;
    use crate::buffer::{StorageSchema, UniformLayout};
    use crate::layout::{Field, WgslType};

    fn cell_schema() -> StorageSchema {
        StorageSchema::new("CellState", &[("state", WgslType::U32)])
    }

    fn game_of_life(read: &str, write: &str) -> Vec<BindingDecl> {
        vec![
            BindingDecl::Uniform(UniformLayout::new(
                "Grid",
                &[("size", Field::new(WgslType::Vec2F32))],
            )),
            BindingDecl::Storage {
                schema: cell_schema(),
                access: Access::ReadOnly,
                var_name: read.into(),
            },
            BindingDecl::Storage {
                schema: cell_schema(),
                access: Access::ReadWrite,
                var_name: write.into(),
            },
        ]
    }

    fn pairs(decls: &[BindingDecl]) -> Vec<(u32, BindingKind)> {
        layout_entries(decls)
            .into_iter()
            .map(|e| (e.binding, e.kind))
            .collect()
    }

    // ── generation ───────────────────────────────────────────────────────

    #[test]
    fn shared_struct_is_declared_once() {
        let text = generate(0, &game_of_life("cells_in", "cells_out"));
        assert_eq!(text.matches("struct CellState").count(), 1);
        assert_eq!(text.matches("struct Grid").count(), 1);
    }

    #[test]
    fn declarations_follow_layout_indices() {
        let text = generate(0, &game_of_life("cells_in", "cells_out"));
        assert!(text.contains("@group(0) @binding(0) var<uniform> grid: Grid;"));
        assert!(text.contains(
            "@group(0) @binding(1) var<storage, read> cells_in: array<CellState>;"
        ));
        assert!(text.contains(
            "@group(0) @binding(2) var<storage, read_write> cells_out: array<CellState>;"
        ));
    }

    #[test]
    fn struct_fields_use_wgsl_spelling() {
        let text = generate(0, &game_of_life("a", "b"));
        assert!(text.contains("struct Grid {\n    size: vec2<f32>,\n}"));
        assert!(text.contains("    state: u32,"));
    }

    #[test]
    fn textures_and_samplers_are_declared() {
        let decls = vec![
            BindingDecl::SampledTexture {
                var_name: "src".into(),
            },
            BindingDecl::StorageTexture {
                var_name: "dst".into(),
                format: wgpu::TextureFormat::Rgba8Unorm,
            },
            BindingDecl::Sampler {
                var_name: "smp".into(),
            },
        ];
        let text = generate(2, &decls);
        assert!(text.contains("@group(2) @binding(0) var src: texture_2d<f32>;"));
        assert!(text.contains("@group(2) @binding(1) var dst: texture_storage_2d<rgba8unorm, write>;"));
        assert!(text.contains("@group(2) @binding(2) var smp: sampler;"));
    }

    #[test]
    fn role_names_make_ping_pong_groups_agree() {
        // Group A reads buffer A, group B reads buffer B; the interface is the same.
        let a = generate(0, &game_of_life("cells_in", "cells_out"));
        let b = generate(0, &game_of_life("cells_in", "cells_out"));
        assert_eq!(a, b);
    }

    // ── round trip ───────────────────────────────────────────────────────

    #[test]
    fn parsed_bindings_match_layout() {
        let decls = game_of_life("cells_in", "cells_out");
        assert_eq!(parse_bindings(&generate(0, &decls)), pairs(&decls));
    }

    #[test]
    fn parsed_bindings_match_layout_with_textures() {
        let decls = vec![
            BindingDecl::Uniform(UniformLayout::new(
                "Options",
                &[
                    ("screen_size", Field::new(WgslType::Vec2F32)),
                    ("decay_rate", Field::new(WgslType::F32)),
                ],
            )),
            BindingDecl::Storage {
                schema: StorageSchema::new(
                    "Agent",
                    &[("pos", WgslType::Vec2F32), ("angle", WgslType::F32)],
                ),
                access: Access::ReadWrite,
                var_name: "agents".into(),
            },
            BindingDecl::SampledTexture {
                var_name: "trail_in".into(),
            },
            BindingDecl::StorageTexture {
                var_name: "trail_out".into(),
                format: wgpu::TextureFormat::Rgba16Float,
            },
            BindingDecl::Sampler {
                var_name: "trail_sampler".into(),
            },
        ];
        assert_eq!(parse_bindings(&generate(0, &decls)), pairs(&decls));
    }

    // ── parsing ──────────────────────────────────────────────────────────

    #[test]
    fn parser_accepts_hand_written_shader() {
        let src = "
            // cells
            @group(0) @binding(0) var<uniform> grid: vec2f;
            @group(0) @binding(1) var<storage> cellStateIn: array<u32>;
            @group(0) @binding(2) var<storage, read_write> cellStateOut: array<u32>;

            @compute @workgroup_size(8, 8)
            fn comp_main() {}
        ";
        assert_eq!(
            parse_bindings(src),
            vec![
                (0, BindingKind::Uniform),
                (1, BindingKind::Storage(Access::ReadOnly)),
                (2, BindingKind::Storage(Access::ReadWrite)),
            ]
        );
    }

    #[test]
    fn unknown_declarations_are_skipped() {
        assert!(parse_bindings("@group(0) @binding(0) var t: texture_3d<f32>;").is_empty());
        assert!(parse_bindings("fn main() {}").is_empty());
    }
}
