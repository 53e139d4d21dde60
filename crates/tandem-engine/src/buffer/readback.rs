use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::device::GpuContext;
use crate::error::{DeviceError, Result};

type MapResult = std::result::Result<(), wgpu::BufferAsyncError>;

/// A host-visible copy of a GPU buffer that is being mapped for reading.
///
/// Created by [`Readback::request`], which records a copy into a staging
/// buffer on the caller's encoder. After the encoder is submitted call
/// [`Readback::start`], then either poll with [`Readback::try_take`] from a
/// render loop or block with [`Readback::wait`].
#[derive(Debug)]
pub struct Readback {
    label: String,
    staging: wgpu::Buffer,
    byte_len: u64,
    receiver: Option<Receiver<MapResult>>,
}

impl Readback {
    /// Records a full copy of `src` into a fresh staging buffer.
    pub fn request(
        ctx: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        src: &wgpu::Buffer,
        byte_len: u64,
        label: &str,
    ) -> Self {
        let size = src.size();
        let staging = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        encoder.copy_buffer_to_buffer(src, 0, &staging, 0, size);

        Self {
            label: label.to_string(),
            staging,
            byte_len: byte_len.min(size),
            receiver: None,
        }
    }

    /// Starts mapping the staging buffer. The copy must already be submitted.
    pub fn start(&mut self) {
        if self.receiver.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.staging
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = tx.send(result);
            });
        self.receiver = Some(rx);
    }

    /// Non-blocking: returns the bytes once the map has completed.
    pub fn try_take(&mut self, ctx: &GpuContext) -> Result<Option<Vec<u8>>> {
        self.start();
        ctx.poll()?;

        let Some(rx) = self.receiver.as_ref() else {
            return Ok(None);
        };
        match rx.try_recv() {
            Ok(result) => self.finish(result).map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(DeviceError::MapDropped {
                label: self.label.clone(),
            }
            .into()),
        }
    }

    /// Blocks until the map completes and returns the bytes.
    pub fn wait(mut self, ctx: &GpuContext) -> Result<Vec<u8>> {
        self.start();
        ctx.wait_idle(None)?;

        let result = self
            .receiver
            .as_ref()
            .and_then(|rx| rx.recv().ok())
            .ok_or_else(|| DeviceError::MapDropped {
                label: self.label.clone(),
            })?;
        self.finish(result)
    }

    fn finish(&mut self, result: MapResult) -> Result<Vec<u8>> {
        result.map_err(|source| DeviceError::Map {
            label: self.label.clone(),
            source,
        })?;

        let bytes = {
            let view = self.staging.slice(..).get_mapped_range();
            view[..self.byte_len as usize].to_vec()
        };
        self.staging.unmap();
        self.receiver = None;
        Ok(bytes)
    }
}

impl Drop for Readback {
    fn drop(&mut self) {
        self.staging.destroy();
    }
}

/// Copies `src` to the host, blocking until the device is idle.
pub(crate) fn read_blocking(
    ctx: &GpuContext,
    src: &wgpu::Buffer,
    byte_len: u64,
    label: &str,
) -> Result<Vec<u8>> {
    let mut encoder = ctx
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tandem readback encoder"),
        });
    let readback = Readback::request(ctx, &mut encoder, src, byte_len, label);
    ctx.queue().submit(std::iter::once(encoder.finish()));
    readback.wait(ctx)
}
