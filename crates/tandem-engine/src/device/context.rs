use crate::error::{DeviceError, Result};

use super::GpuInit;

/// Adapter, logical device and queue shared by every engine resource.
///
/// Cloning is cheap: wgpu handles are reference counted.
#[derive(Debug, Clone)]
pub struct GpuContext {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuContext {
    /// Acquires a device without any presentation surface.
    ///
    /// Used for offscreen work and tests.
    pub async fn headless(init: &GpuInit) -> Result<Self> {
        let adapter = init
            .instance()
            .request_adapter(&init.adapter_options(None))
            .await
            .map_err(DeviceError::from)?;

        Self::from_adapter(adapter, init).await
    }

    /// Requests a device/queue pair from an already selected adapter.
    pub async fn from_adapter(adapter: wgpu::Adapter, init: &GpuInit) -> Result<Self> {
        let info = adapter.get_info();
        log::debug!("using adapter `{}` ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&init.device_descriptor())
            .await
            .map_err(DeviceError::from)?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Returns the selected adapter.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Blocks until `submission` (or all outstanding work) has completed.
    pub fn wait_idle(&self, submission: Option<wgpu::SubmissionIndex>) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: submission,
                timeout: None,
            })
            .map_err(DeviceError::from)?;
        Ok(())
    }

    /// Drives pending callbacks without blocking.
    pub fn poll(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Poll)
            .map_err(DeviceError::from)?;
        Ok(())
    }
}
