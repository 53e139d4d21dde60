use winit::window::WindowId;

use crate::device::{Gpu, GpuContext};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// `'a` is the duration of the callback, `'w` the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window_id: WindowId,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Device context shared with engine resources.
    pub fn context(&self) -> &GpuContext {
        self.gpu.context()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    /// Acquires the surface image, lets `draw` submit work targeting its view,
    /// then presents it.
    ///
    /// Surface errors are mapped through [`Gpu::handle_surface_error`]: lost or
    /// outdated surfaces are reconfigured and the frame is skipped; fatal ones
    /// end the app. An error from `draw` is logged and also ends the app.
    pub fn present<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&GpuContext, &wgpu::TextureView) -> anyhow::Result<()>,
    {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                if self.gpu.handle_surface_error(err).is_fatal() {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        if let Err(e) = draw(self.gpu.context(), &frame.view) {
            log::error!("frame failed: {e:#}");
            return AppControl::Exit;
        }

        frame.present();
        AppControl::Continue
    }
}
