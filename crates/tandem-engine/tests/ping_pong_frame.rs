mod common;

use tandem_engine::buffer::{
    BufferContents, StorageBuffer, StorageBufferDesc, StorageSchema, UniformBuffer,
    UniformBufferDesc,
};
use tandem_engine::device::GpuContext;
use tandem_engine::frame::{
    words_from_bytes, FramePassConfig, Phase, PingPongConfig, PingPongFrame, RenderStage,
};
use tandem_engine::geometry::Geometry;
use tandem_engine::layout::{Field, WgslType};

const LIFE_COMPUTE: &str = r#"
@compute @workgroup_size(8, 8)
fn comp_main(@builtin(global_invocation_id) id: vec3<u32>) {
    let size = vec2<u32>(options.grid_size);
    if (id.x >= size.x || id.y >= size.y) {
        return;
    }

    var alive = 0u;
    for (var dy = -1; dy <= 1; dy++) {
        for (var dx = -1; dx <= 1; dx++) {
            if (dx == 0 && dy == 0) {
                continue;
            }
            let x = (i32(id.x) + dx + i32(size.x)) % i32(size.x);
            let y = (i32(id.y) + dy + i32(size.y)) % i32(size.y);
            alive += cells_in[u32(y) * size.x + u32(x)].state;
        }
    }

    let i = id.y * size.x + id.x;
    var fresh = 0u;
    if (alive == 3u || (alive == 2u && cells_in[i].state == 1u)) {
        fresh = 1u;
    }
    cells_out[i].state = fresh;
}
"#;

const LIFE_RENDER: &str = r#"
struct VertexOut {
    @builtin(position) position: vec4<f32>,
};

@vertex
fn vert_main(@location(0) pos: vec2<f32>, @builtin(instance_index) instance: u32) -> VertexOut {
    let size = options.grid_size;
    let cols = u32(size.x);
    let cell = vec2<f32>(f32(instance % cols), f32(instance / cols));
    let state = f32(cells_in[instance].state);
    let offset = cell / size * 2.0;

    var out: VertexOut;
    out.position = vec4<f32>((pos * state + 1.0) / size - 1.0 + offset, 0.0, 1.0);
    return out;
}

@fragment
fn frag_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

fn life_frame(ctx: &GpuContext, side: u32, cells: &[u32]) -> PingPongFrame {
    let options = UniformBuffer::new(
        ctx,
        UniformBufferDesc::new(
            "Options",
            vec![(
                "grid_size",
                Field::with_value(WgslType::Vec2F32, &[side as f32, side as f32]),
            )],
        ),
    )
    .unwrap();

    let state = StorageBuffer::new(
        ctx,
        StorageBufferDesc {
            contents: Some(BufferContents::U32(cells)),
            ..StorageBufferDesc::new("Cell", StorageSchema::new("Cell", &[("state", WgslType::U32)]))
        },
    )
    .unwrap();

    let config = PingPongConfig::new(
        "life",
        vec![options],
        state,
        LIFE_COMPUTE,
        RenderStage::Geometry {
            geometry: Geometry::square(ctx, 0.8).unwrap(),
            shader: LIFE_RENDER,
        },
        common::TARGET_FORMAT,
    );
    PingPongFrame::new(ctx, config).unwrap()
}

fn read_cells(ctx: &GpuContext, frame: &PingPongFrame) -> Vec<u32> {
    words_from_bytes(&frame.current_state().read_to_vec(ctx).unwrap())
}

// ── ordering ─────────────────────────────────────────────────────────────

#[test]
fn render_sees_the_state_written_this_tick() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);
    let mut frame = life_frame(&ctx, 2, &[1, 0, 0, 1]);

    // Garbage in B proves the compute pass overwrote it.
    frame.state_buffers()[1].buffer().write_pod(0, &[7u32; 4]);

    let pass = FramePassConfig {
        workgroup_count: [1, 1],
        instances: 4,
    };
    let idx = frame.tick(target.view(), pass);
    ctx.wait_idle(Some(idx)).unwrap();

    assert_eq!(frame.tick_count(), 1);
    assert_eq!(frame.phase(), Phase::ReadBWriteA);
    assert!(frame.current_state().name().ends_with("_B"));
    // On a 2x2 torus each live diagonal cell sees four live neighbours.
    assert_eq!(read_cells(&ctx, &frame), vec![0, 0, 0, 0]);

    // Redrawing leaves the simulation where it was.
    let idx = frame.render(target.view(), pass.instances);
    ctx.wait_idle(Some(idx)).unwrap();
    assert_eq!(frame.tick_count(), 1);
    assert_eq!(frame.phase(), Phase::ReadBWriteA);

    frame.destroy();
}

#[test]
fn block_survives_many_ticks() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);

    #[rustfmt::skip]
    let block = [
        0, 0, 0, 0,
        0, 1, 1, 0,
        0, 1, 1, 0,
        0, 0, 0, 0,
    ];
    let mut frame = life_frame(&ctx, 4, &block);

    let pass = FramePassConfig {
        workgroup_count: [1, 1],
        instances: 16,
    };
    for _ in 0..5 {
        frame.tick(target.view(), pass);
    }

    assert_eq!(frame.tick_count(), 5);
    assert!(frame.current_state().name().ends_with("_B"));
    assert_eq!(read_cells(&ctx, &frame), block.to_vec());
}

// ── fullscreen stage ─────────────────────────────────────────────────────

const COUNT_COMPUTE: &str = r#"
@compute @workgroup_size(1)
fn comp_main(@builtin(global_invocation_id) id: vec3<u32>) {
    values_out[id.x].v = values_in[id.x].v + options.gain;
}
"#;

const COUNT_FRAGMENT: &str = r#"
struct FullscreenIn {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@fragment
fn frag_main(frag: FullscreenIn) -> @location(0) vec4<f32> {
    let t = fract(values_in[0].v * 0.1);
    return vec4<f32>(t, frag.uv, 1.0);
}
"#;

fn counting_frame(ctx: &GpuContext) -> PingPongFrame {
    let options = UniformBuffer::new(
        ctx,
        UniformBufferDesc::new(
            "Options",
            vec![("gain", Field::with_value(WgslType::F32, &[1.0f32]))],
        ),
    )
    .unwrap();

    let state = StorageBuffer::new(
        ctx,
        StorageBufferDesc {
            contents: Some(BufferContents::F32(&[0.0, 0.0])),
            ..StorageBufferDesc::new(
                "Value",
                StorageSchema::new("Value", &[("v", WgslType::F32)]),
            )
        },
    )
    .unwrap();

    let config = PingPongConfig {
        state_var: Some("values"),
        ..PingPongConfig::new(
            "counter",
            vec![options],
            state,
            COUNT_COMPUTE,
            RenderStage::Fullscreen {
                fragment_shader: COUNT_FRAGMENT,
            },
            common::TARGET_FORMAT,
        )
    };
    PingPongFrame::new(ctx, config).unwrap()
}

#[test]
fn fullscreen_stage_advances_and_alternates_copies() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);
    let mut frame = counting_frame(&ctx);

    let pass = FramePassConfig {
        workgroup_count: [2, 1],
        instances: 1,
    };
    for t in 1..=3u32 {
        let idx = frame.tick(target.view(), pass);
        ctx.wait_idle(Some(idx)).unwrap();

        let suffix = if t % 2 == 1 { "_B" } else { "_A" };
        assert!(frame.current_state().name().ends_with(suffix));
        let values: Vec<f32> = read_cells(&ctx, &frame)
            .into_iter()
            .map(f32::from_bits)
            .collect();
        assert_eq!(values, vec![t as f32; 2]);
    }
    assert_eq!(frame.tick_count(), 3);
    assert_eq!(frame.current_state().name(), "Value_B");

    let code = frame.interface_code();
    assert!(code.contains("var<storage, read> values_in: array<Value>;"));

    frame.destroy();
}

// ── interface ────────────────────────────────────────────────────────────

#[test]
fn both_groups_share_one_interface() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let frame = life_frame(&ctx, 2, &[0, 0, 0, 0]);
    let [a, b] = frame.bind_groups();

    assert_eq!(a.shader_code(), b.shader_code());
    assert_eq!(a.layout_bindings(), b.layout_bindings());

    let code = frame.interface_code();
    assert!(code.contains("var<uniform> options: Options;"));
    assert!(code.contains("var<storage, read> cells_in: array<Cell>;"));
    assert!(code.contains("var<storage, read_write> cells_out: array<Cell>;"));
}

#[test]
fn uniform_updates_go_through_the_frame() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let mut frame = life_frame(&ctx, 2, &[0, 0, 0, 0]);

    let options = frame.uniform_mut("Options").unwrap();
    assert!(options.update_field_pod("grid_size", &[4.0f32, 4.0]).is_ok());
    assert!(options.update_field_pod("missing", &[1.0f32]).is_err());
    assert!(frame.uniform_mut("Nope").is_none());
}
