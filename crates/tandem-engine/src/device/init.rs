/// Device and surface settings shared by headless and windowed setups.
///
/// [`GpuContext::headless`](super::GpuContext::headless) uses only the
/// instance, adapter and device settings; [`Gpu`](super::Gpu) also reads the
/// surface ones.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick an adapter from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Features every simulation needs; empty stays portable.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Prefer an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,

    /// FIFO paces stepping to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    pub(crate) fn instance(&self) -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        })
    }

    pub(crate) fn adapter_options<'a, 'w>(
        &self,
        surface: Option<&'a wgpu::Surface<'w>>,
    ) -> wgpu::RequestAdapterOptions<'a, 'w> {
        wgpu::RequestAdapterOptions {
            power_preference: self.power_preference,
            compatible_surface: surface,
            force_fallback_adapter: false,
        }
    }

    pub(crate) fn device_descriptor(&self) -> wgpu::DeviceDescriptor<'static> {
        wgpu::DeviceDescriptor {
            label: Some("tandem device"),
            required_features: self.required_features,
            required_limits: self.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_portable_and_vsynced() {
        let init = GpuInit::default();
        assert!(init.required_features.is_empty());
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(init.backends, wgpu::Backends::all());
    }

    #[test]
    fn device_descriptor_carries_requirements() {
        let init = GpuInit {
            required_features: wgpu::Features::TIMESTAMP_QUERY,
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..GpuInit::default()
        };
        let desc = init.device_descriptor();
        assert_eq!(desc.required_features, wgpu::Features::TIMESTAMP_QUERY);
        assert_eq!(
            desc.required_limits.max_storage_buffers_per_shader_stage,
            wgpu::Limits::downlevel_defaults().max_storage_buffers_per_shader_stage
        );
    }

    #[test]
    fn headless_adapter_options_have_no_surface() {
        let opts = GpuInit::default().adapter_options(None);
        assert!(opts.compatible_surface.is_none());
        assert_eq!(opts.power_preference, wgpu::PowerPreference::HighPerformance);
    }
}
