use std::fmt;

/// Host-visible WGSL value types that can appear in uniform and storage structs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WgslType {
    F32,
    I32,
    U32,
    Vec2F32,
    Vec2I32,
    Vec2U32,
    Vec3F32,
    Vec3I32,
    Vec3U32,
    Vec4F32,
    Vec4I32,
    Vec4U32,
    Mat3x3F32,
    Mat4x4F32,
}

impl WgslType {
    /// Returns `(alignment, size)` in bytes under the 16-byte block rule.
    ///
    /// `vec3` is the odd one out: it aligns like a `vec4` but only occupies 12 bytes,
    /// so a following scalar may share its block.
    pub const fn align_and_size(self) -> (u64, u64) {
        match self {
            WgslType::F32 | WgslType::I32 | WgslType::U32 => (4, 4),
            WgslType::Vec2F32 | WgslType::Vec2I32 | WgslType::Vec2U32 => (8, 8),
            WgslType::Vec3F32 | WgslType::Vec3I32 | WgslType::Vec3U32 => (16, 12),
            WgslType::Vec4F32 | WgslType::Vec4I32 | WgslType::Vec4U32 => (16, 16),
            WgslType::Mat3x3F32 => (48, 48),
            WgslType::Mat4x4F32 => (64, 64),
        }
    }

    /// Natural byte size of one value.
    #[inline]
    pub const fn size(self) -> u64 {
        self.align_and_size().1
    }

    /// WGSL spelling used in generated declarations.
    pub const fn wgsl_name(self) -> &'static str {
        match self {
            WgslType::F32 => "f32",
            WgslType::I32 => "i32",
            WgslType::U32 => "u32",
            WgslType::Vec2F32 => "vec2<f32>",
            WgslType::Vec2I32 => "vec2<i32>",
            WgslType::Vec2U32 => "vec2<u32>",
            WgslType::Vec3F32 => "vec3<f32>",
            WgslType::Vec3I32 => "vec3<i32>",
            WgslType::Vec3U32 => "vec3<u32>",
            WgslType::Vec4F32 => "vec4<f32>",
            WgslType::Vec4I32 => "vec4<i32>",
            WgslType::Vec4U32 => "vec4<u32>",
            WgslType::Mat3x3F32 => "mat3x3<f32>",
            WgslType::Mat4x4F32 => "mat4x4<f32>",
        }
    }
}

impl fmt::Display for WgslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wgsl_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_aligns_like_vec4_but_is_smaller() {
        assert_eq!(WgslType::Vec3F32.align_and_size(), (16, 12));
        assert_eq!(WgslType::Vec4U32.align_and_size(), (16, 16));
    }

    #[test]
    fn matrices_span_whole_blocks() {
        assert_eq!(WgslType::Mat3x3F32.size() % 16, 0);
        assert_eq!(WgslType::Mat4x4F32.size() % 16, 0);
    }

    #[test]
    fn display_uses_wgsl_spelling() {
        assert_eq!(WgslType::Vec2F32.to_string(), "vec2<f32>");
        assert_eq!(WgslType::Mat4x4F32.to_string(), "mat4x4<f32>");
        assert_eq!(WgslType::U32.to_string(), "u32");
    }
}
