// Storage texture formats that can be spelled in WGSL without extensions.
const STORAGE_FORMATS: [(wgpu::TextureFormat, &str); 9] = [
    (wgpu::TextureFormat::Rgba8Unorm, "rgba8unorm"),
    (wgpu::TextureFormat::Rgba8Snorm, "rgba8snorm"),
    (wgpu::TextureFormat::Rgba8Uint, "rgba8uint"),
    (wgpu::TextureFormat::Rgba16Float, "rgba16float"),
    (wgpu::TextureFormat::Rgba32Float, "rgba32float"),
    (wgpu::TextureFormat::Rgba32Uint, "rgba32uint"),
    (wgpu::TextureFormat::R32Float, "r32float"),
    (wgpu::TextureFormat::R32Uint, "r32uint"),
    (wgpu::TextureFormat::R32Sint, "r32sint"),
];

/// WGSL texel format name for a storage texture, if it has one.
pub fn storage_format_name(format: wgpu::TextureFormat) -> Option<&'static str> {
    STORAGE_FORMATS
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, name)| *name)
}

/// Inverse of [`storage_format_name`].
pub fn parse_storage_format(name: &str) -> Option<wgpu::TextureFormat> {
    STORAGE_FORMATS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(f, _)| *f)
}
