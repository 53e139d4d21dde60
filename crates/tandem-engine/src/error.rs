use thiserror::Error;

/// Engine result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level engine error.
///
/// Configuration problems are surfaced immediately and are never retried.
/// Device problems terminate the affected pipeline or frame.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Invalid construction input or API misuse detected on the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("buffer `{label}`: either contents or a byte length must be given")]
    MissingContents { label: String },

    #[error("buffer `{label}`: usage flags must be defined")]
    MissingUsage { label: String },

    #[error("buffer `{label}`: unsupported element type `{element}`")]
    UnsupportedElementType { label: String, element: &'static str },

    #[error("index buffer `{label}`: indices must be u16 or u32, got `{element}`")]
    UnsupportedIndexType { label: String, element: &'static str },

    #[error("uniform buffer `{buffer}` has no field named `{field}`")]
    UnknownUniformField { buffer: String, field: String },

    #[error("uniform `{buffer}.{field}`: value is {got} bytes but the field holds {size}")]
    FieldValueTooLarge {
        buffer: String,
        field: String,
        got: usize,
        size: u64,
    },

    #[error("bind group `{group}`: {detail}")]
    BindingOrder { group: String, detail: String },

    #[error("bind group `{group}` has no bindings")]
    EmptyBindGroup { group: String },

    #[error("bind group `{group}`: storage texture format `{format}` has no WGSL name")]
    UnsupportedStorageFormat { group: String, format: String },

    #[error("bind group `{group}` does not match the layout of `{other}`")]
    IncompatibleLayout { group: String, other: String },

    #[error("vertex buffer `{label}` declares no attributes")]
    MissingVertexAttributes { label: String },

    #[error("stride must be non-zero for `{label}`")]
    ZeroStride { label: String },

    #[error("texture frame: no compute passes registered")]
    NoComputePasses,
}

/// Failures reported by the device or the host/device boundary.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to map `{label}` for reading: {source}")]
    Map {
        label: String,
        #[source]
        source: wgpu::BufferAsyncError,
    },

    #[error("map callback for `{label}` was dropped")]
    MapDropped { label: String },

    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
}
