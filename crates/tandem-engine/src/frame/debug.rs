//! Per-invocation debug capture for compute shaders.
//!
//! Shaders include a generated preamble, call `dbg_init(slot)` once and then
//! `dbg_u32m(mark, v)` / `dbg_i32m` / `dbg_f32m` (or the unmarked
//! `dbg_u32` / `dbg_i32` / `dbg_f32`). Each call appends a
//! `[type, value, mark]` record to the invocation's slot. Only the first
//! `marks` records are kept, but the slot's count word keeps counting.
//!
//! Buffer layout, in `u32` words:
//!
//! ```text
//! [0..16)               header: word 0 = slots, word 1 = marks
//! per slot (1 + 3*marks):
//!   count               total calls made by the invocation
//!   [type, value, mark] * marks
//! ```

use std::fmt;

use crate::binding::{Access, BindGroup, BindGroupDesc, Binding};
use crate::buffer::{Readback, StorageBuffer, StorageBufferDesc, StorageSchema};
use crate::device::GpuContext;
use crate::error::Result;
use crate::layout::WgslType;

/// Mark used by the unmarked helpers.
pub const DEFAULT_MARK: u32 = 999_999;

pub const TYPE_U32: u32 = 1;
pub const TYPE_I32: u32 = 2;
pub const TYPE_F32: u32 = 3;

const DEBUG_VAR: &str = "dbg_words";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugConfig {
    /// Invocation slots; `dbg_init` ignores ids at or beyond this.
    pub slots: u32,
    /// Records kept per slot.
    pub marks: u32,
    /// Copy the buffer back every this many ticks (at least 1).
    pub readback_interval: u64,
    /// `@group` index the debug buffer is bound at.
    pub group: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            slots: 32,
            marks: 20,
            readback_interval: 60,
            group: 1,
        }
    }
}

/// Word offsets derived from a [`DebugConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugLayout {
    pub slots: u32,
    pub marks: u32,
}

impl DebugLayout {
    pub const HEADER_WORDS: u32 = 16;

    pub fn new(slots: u32, marks: u32) -> Self {
        Self { slots, marks }
    }

    pub fn slot_words(&self) -> u32 {
        1 + self.marks * 3
    }

    pub fn slot_offset(&self, slot: u32) -> u32 {
        Self::HEADER_WORDS + slot * self.slot_words()
    }

    pub fn word_len(&self) -> u32 {
        self.slot_offset(self.slots)
    }

    pub fn byte_len(&self) -> u64 {
        u64::from(self.word_len()) * 4
    }
}

/// A decoded debug value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugValue {
    U32(u32),
    I32(i32),
    F32(f32),
    Unknown { tag: u32, bits: u32 },
}

impl DebugValue {
    pub fn from_tagged(tag: u32, bits: u32) -> Self {
        match tag {
            TYPE_U32 => DebugValue::U32(bits),
            TYPE_I32 => DebugValue::I32(bits as i32),
            TYPE_F32 => DebugValue::F32(f32::from_bits(bits)),
            _ => DebugValue::Unknown { tag, bits },
        }
    }
}

impl fmt::Display for DebugValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugValue::U32(v) => write!(f, "{v}u"),
            DebugValue::I32(v) => write!(f, "{v}i"),
            DebugValue::F32(v) => write!(f, "{v}f"),
            DebugValue::Unknown { tag, bits } => write!(f, "?{tag}:{bits:#010x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugEntry {
    pub mark: u32,
    pub value: DebugValue,
}

impl fmt::Display for DebugEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mark == DEFAULT_MARK {
            write!(f, "{}", self.value)
        } else {
            write!(f, "#{}={}", self.mark, self.value)
        }
    }
}

/// Records captured for one invocation slot.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugSlot {
    pub slot: u32,
    /// Calls made, including those that did not fit.
    pub total_calls: u32,
    pub entries: Vec<DebugEntry>,
}

impl DebugSlot {
    pub fn overflowed(&self) -> bool {
        self.total_calls as usize > self.entries.len()
    }
}

/// Every non-empty slot of one capture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DebugReport {
    /// Tick at which the buffer was copied back.
    pub tick: u64,
    pub slots: Vec<DebugSlot>,
}

impl DebugReport {
    pub fn slot(&self, slot: u32) -> Option<&DebugSlot> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    pub fn log(&self) {
        for slot in &self.slots {
            let values: Vec<String> = slot.entries.iter().map(|e| e.to_string()).collect();
            log::info!(
                "dbg tick {} slot {} [{}] {}",
                self.tick,
                slot.slot,
                slot.entries.len(),
                values.join(" ")
            );
            if slot.overflowed() {
                log::warn!(
                    "dbg slot {}: {} calls, only the first {} kept",
                    slot.slot,
                    slot.total_calls,
                    slot.entries.len()
                );
            }
        }
    }
}

/// Decodes a copied-back debug buffer. Missing trailing words read as zero.
pub fn decode(layout: DebugLayout, words: &[u32], tick: u64) -> DebugReport {
    let word = |i: u32| words.get(i as usize).copied().unwrap_or(0);

    let mut slots = Vec::new();
    for slot in 0..layout.slots {
        let base = layout.slot_offset(slot);
        let total_calls = word(base);
        if total_calls == 0 {
            continue;
        }

        let kept = total_calls.min(layout.marks);
        let entries = (0..kept)
            .map(|i| {
                let at = base + 1 + i * 3;
                DebugEntry {
                    value: DebugValue::from_tagged(word(at), word(at + 1)),
                    mark: word(at + 2),
                }
            })
            .collect();

        slots.push(DebugSlot {
            slot,
            total_calls,
            entries,
        });
    }

    DebugReport { tick, slots }
}

/// Reinterprets native-endian bytes as `u32` words, dropping a trailing remainder.
pub fn words_from_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// WGSL helpers operating on `dbg_words`. The binding itself comes from the
/// debug bind group's generated declaration.
pub fn helper_wgsl(layout: DebugLayout) -> String {
    format!(
        r#"
const DBG_OFF: u32 = 0xffffffffu;
var<private> dbg_slot: u32 = DBG_OFF;

fn dbg_init(uid: u32) {{
    if (uid >= {slots}u) {{
        dbg_slot = DBG_OFF;
        return;
    }}
    dbg_slot = {header}u + uid * {stride}u;
    {var}[dbg_slot].bits = 0u;
}}

fn dbg_32m(mark: i32, val: u32, vtype: i32) {{
    if (dbg_slot == DBG_OFF) {{
        return;
    }}
    let count = {var}[dbg_slot].bits;
    {var}[dbg_slot].bits = count + 1u;
    if (count >= {marks}u) {{
        return;
    }}
    let at = dbg_slot + 1u + count * 3u;
    {var}[at].bits = u32(vtype);
    {var}[at + 1u].bits = val;
    {var}[at + 2u].bits = u32(mark);
}}

fn dbg_u32m(mark: i32, val: u32) {{ dbg_32m(mark, val, {t_u32}); }}
fn dbg_i32m(mark: i32, val: i32) {{ dbg_32m(mark, bitcast<u32>(val), {t_i32}); }}
fn dbg_f32m(mark: i32, val: f32) {{ dbg_32m(mark, bitcast<u32>(val), {t_f32}); }}

fn dbg_u32(val: u32) {{ dbg_u32m({mark}, val); }}
fn dbg_i32(val: i32) {{ dbg_i32m({mark}, val); }}
fn dbg_f32(val: f32) {{ dbg_f32m({mark}, val); }}
"#,
        slots = layout.slots,
        header = DebugLayout::HEADER_WORDS,
        stride = layout.slot_words(),
        marks = layout.marks,
        var = DEBUG_VAR,
        t_u32 = TYPE_U32,
        t_i32 = TYPE_I32,
        t_f32 = TYPE_F32,
        mark = DEFAULT_MARK,
    )
}

/// Debug buffer, its bind group and the paced readback.
#[derive(Debug)]
pub struct DebugChannel {
    config: DebugConfig,
    layout: DebugLayout,
    buffer: StorageBuffer,
    group: BindGroup,
    pending: Option<(u64, Readback)>,
    last: Option<DebugReport>,
}

impl DebugChannel {
    pub fn new(ctx: &GpuContext, config: DebugConfig) -> Result<Self> {
        let layout = DebugLayout::new(config.slots, config.marks);

        let buffer = StorageBuffer::new(
            ctx,
            StorageBufferDesc {
                byte_len: Some(layout.byte_len()),
                ..StorageBufferDesc::new(
                    "debug words",
                    StorageSchema::new("DebugWord", &[("bits", WgslType::U32)]),
                )
            },
        )?;
        buffer
            .buffer()
            .write_pod(0, &[layout.slots, layout.marks]);

        let group = BindGroup::new(
            ctx,
            BindGroupDesc {
                name: "debug group",
                group: config.group,
                bindings: vec![Binding::storage_named(&buffer, Access::ReadWrite, DEBUG_VAR)],
            },
        )?;

        log::debug!(
            "debug channel: {} slots x {} marks ({} bytes)",
            layout.slots,
            layout.marks,
            layout.byte_len()
        );

        Ok(Self {
            config,
            layout,
            buffer,
            group,
            pending: None,
            last: None,
        })
    }

    /// Binding declaration plus helper functions, ready to prepend to a shader.
    pub fn preamble(&self) -> String {
        format!("{}{}", self.group.shader_code(), helper_wgsl(self.layout))
    }

    pub fn group(&self) -> &BindGroup {
        &self.group
    }

    pub fn layout(&self) -> DebugLayout {
        self.layout
    }

    pub fn buffer(&self) -> &StorageBuffer {
        &self.buffer
    }

    /// Most recently decoded report.
    pub fn last_report(&self) -> Option<&DebugReport> {
        self.last.as_ref()
    }

    /// Records a copy of the buffer if one is due at `tick` and none is in flight.
    pub fn capture(&mut self, ctx: &GpuContext, encoder: &mut wgpu::CommandEncoder, tick: u64) -> bool {
        let interval = self.config.readback_interval.max(1);
        if self.pending.is_some() || tick % interval != 0 {
            return false;
        }
        let readback = Readback::request(
            ctx,
            encoder,
            self.buffer.buffer().raw(),
            self.layout.byte_len(),
            "debug readback",
        );
        self.pending = Some((tick, readback));
        true
    }

    /// Non-blocking: decodes and logs a finished capture, if any.
    pub fn poll(&mut self, ctx: &GpuContext) -> Result<Option<DebugReport>> {
        let Some((tick, readback)) = self.pending.as_mut() else {
            return Ok(None);
        };
        let tick = *tick;
        let Some(bytes) = readback.try_take(ctx)? else {
            return Ok(None);
        };
        let report = decode(self.layout, &words_from_bytes(&bytes), tick);
        self.pending = None;
        Ok(Some(self.publish(report)))
    }

    /// Blocking read of the current buffer contents.
    pub fn read_now(&mut self, ctx: &GpuContext, tick: u64) -> Result<DebugReport> {
        let bytes = self.buffer.read_to_vec(ctx)?;
        let report = decode(self.layout, &words_from_bytes(&bytes), tick);
        Ok(self.publish(report))
    }

    fn publish(&mut self, report: DebugReport) -> DebugReport {
        report.log();
        self.last = Some(report.clone());
        report
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}
