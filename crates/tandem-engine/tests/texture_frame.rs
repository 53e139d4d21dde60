mod common;

use tandem_engine::buffer::{
    BufferContents, StorageBuffer, StorageBufferDesc, StorageSchema, UniformBuffer,
    UniformBufferDesc,
};
use tandem_engine::device::GpuContext;
use tandem_engine::frame::{
    words_from_bytes, ComputePassDesc, DebugConfig, DebugEntry, DebugReport, DebugValue,
    TextureFrame, TextureFrameConfig,
};
use tandem_engine::layout::{Field, WgslType};
use tandem_engine::{ConfigError, Error};

const CHAIN: &str = r#"
@compute @workgroup_size(1)
fn stamp(@builtin(global_invocation_id) id: vec3<u32>) {
    dbg_init(id.x);
    for (var i = 0u; i < 25u; i++) {
        dbg_u32m(i32(i), i * 10u);
    }
    particles_out[id.x].pos = particles_in[id.x].pos + vec2<f32>(1.0, 0.0);
}

@compute @workgroup_size(1)
fn paint(@builtin(global_invocation_id) id: vec3<u32>) {
    let prev = textureLoad(image_in, vec2<i32>(id.xy), 0);
    textureStore(image_out, vec2<i32>(id.xy), prev + vec4<f32>(0.25));
}
"#;

fn config<'a>(ctx: &GpuContext, passes: Vec<ComputePassDesc<'a>>) -> TextureFrameConfig<'a> {
    let options = UniformBuffer::new(
        ctx,
        UniformBufferDesc::new(
            "Options",
            vec![("size", Field::with_value(WgslType::Vec2F32, &[4.0f32, 4.0]))],
        ),
    )
    .unwrap();

    let state = StorageBuffer::new(
        ctx,
        StorageBufferDesc {
            contents: Some(BufferContents::F32(&[0.0, 0.0])),
            ..StorageBufferDesc::new(
                "Particle",
                StorageSchema::new("Particle", &[("pos", WgslType::Vec2F32)]),
            )
        },
    )
    .unwrap();

    let mut config = TextureFrameConfig::new(
        "particles",
        vec![options],
        state,
        CHAIN,
        (4, 4),
        common::TARGET_FORMAT,
    );
    config.passes = passes;
    config.debug = Some(DebugConfig {
        slots: 4,
        marks: 20,
        ..DebugConfig::default()
    });
    config
}

fn chain() -> Vec<ComputePassDesc<'static>> {
    vec![
        ComputePassDesc {
            entry_point: "stamp",
            workgroup_count: [1, 1],
        },
        ComputePassDesc {
            entry_point: "paint",
            workgroup_count: [4, 4],
        },
    ]
}

#[test]
fn empty_chain_is_rejected() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let err = TextureFrame::new(&ctx, config(&ctx, Vec::new())).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::NoComputePasses)));
}

#[test]
fn chain_runs_in_order_and_state_flips() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);
    let mut frame = TextureFrame::new(&ctx, config(&ctx, chain())).unwrap();
    assert_eq!(frame.stages(), vec!["stamp", "paint"]);

    frame.tick(target.view()).unwrap();
    let state = words_from_bytes(&frame.current_state().read_to_vec(&ctx).unwrap());
    assert_eq!(f32::from_bits(state[0]), 1.0);
    assert!(frame.current_image().label().ends_with("_B"));

    frame.tick(target.view()).unwrap();
    let state = words_from_bytes(&frame.current_state().read_to_vec(&ctx).unwrap());
    assert_eq!(f32::from_bits(state[0]), 2.0);
    assert!(frame.current_image().label().ends_with("_A"));
}

#[test]
fn debug_ring_keeps_first_marks_and_counts_all_calls() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);
    let mut frame = TextureFrame::new(&ctx, config(&ctx, chain())).unwrap();

    frame.tick(target.view()).unwrap();
    let report = frame.read_debug_now().unwrap().unwrap();

    let slot = report.slot(0).unwrap();
    assert_eq!(slot.total_calls, 25);
    assert_eq!(slot.entries.len(), 20);
    assert!(slot.overflowed());
    assert_eq!(
        slot.entries[5],
        DebugEntry {
            mark: 5,
            value: DebugValue::U32(50),
        }
    );
    // Only invocation 0 ran the instrumented stage.
    assert!(report.slot(1).is_none());
}

#[test]
fn interface_names_images_by_role() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let frame = TextureFrame::new(&ctx, config(&ctx, chain())).unwrap();
    let code = frame.interface_code();
    assert!(code.contains("var image_in: texture_2d<f32>;"));
    assert!(code.contains("var image_out: texture_storage_2d<rgba8unorm, write>;"));
    assert!(code.contains("var<storage, read_write> particles_out: array<Particle>;"));
}

// ── paced readback ───────────────────────────────────────────────────────

fn paced_frame(ctx: &GpuContext, readback_interval: u64) -> TextureFrame {
    let mut cfg = config(ctx, chain());
    cfg.debug = Some(DebugConfig {
        slots: 4,
        marks: 20,
        readback_interval,
        ..DebugConfig::default()
    });
    TextureFrame::new(ctx, cfg).unwrap()
}

/// Ticks once and collects whatever paced report that tick produced,
/// waiting for the device if the readback was still in flight.
fn tick_and_settle(
    ctx: &GpuContext,
    frame: &mut TextureFrame,
    target: &wgpu::TextureView,
) -> Option<DebugReport> {
    if let Some(report) = frame.tick(target).unwrap() {
        return Some(report);
    }
    ctx.wait_idle(None).unwrap();
    frame.poll_debug().unwrap()
}

#[test]
fn every_tick_reports_when_interval_is_one() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);
    let mut frame = paced_frame(&ctx, 1);

    for t in 0..4 {
        let report = tick_and_settle(&ctx, &mut frame, target.view()).unwrap();
        assert_eq!(report.tick, t);
        assert_eq!(report.slot(0).unwrap().total_calls, 25);
    }
    assert_eq!(frame.debug().unwrap().last_report().unwrap().tick, 3);
}

#[test]
fn ticks_between_intervals_capture_nothing() {
    let Some(ctx) = common::headless() else {
        return;
    };
    let target = common::offscreen_target(&ctx);
    let mut frame = paced_frame(&ctx, 3);

    let reported: Vec<u64> = (0..7)
        .filter_map(|_| tick_and_settle(&ctx, &mut frame, target.view()))
        .map(|report| report.tick)
        .collect();
    assert_eq!(reported, vec![0, 3, 6]);
}
