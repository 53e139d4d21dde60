//! 2D textures used as ping-pong images and presentation sources.

mod format;
mod image;

pub use format::{parse_storage_format, storage_format_name};
pub use image::{linear_sampler, Texture, TextureDesc};
