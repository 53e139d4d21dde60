use super::WgslType;

/// Size of one uniform block in bytes.
pub const BLOCK_SIZE: u64 = 16;

/// A declared uniform field: a fixed type and an optional initial value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: WgslType,
    pub value: Option<Vec<u8>>,
}

impl Field {
    pub fn new(ty: WgslType) -> Self {
        Self { ty, value: None }
    }

    /// Declares a field with initial contents taken from any `Pod` slice.
    pub fn with_value<T: bytemuck::Pod>(ty: WgslType, value: &[T]) -> Self {
        Self {
            ty,
            value: Some(bytemuck::cast_slice(value).to_vec()),
        }
    }
}

/// A field with its placement inside the packed buffer.
///
/// `byte_size` includes any padding absorbed after the value, so consecutive
/// fields tile the buffer without gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedField {
    pub name: String,
    pub ty: WgslType,
    pub value: Option<Vec<u8>>,
    pub byte_offset: u64,
    pub byte_size: u64,
}

/// Result of [`pack`]: total length plus fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedLayout {
    pub byte_len: u64,
    pub fields: Vec<AlignedField>,
}

impl PackedLayout {
    pub fn get(&self, name: &str) -> Option<&AlignedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AlignedField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// Lays out `fields` in declaration order under the 16-byte block rule.
///
/// A field that does not fit in what is left of the current block starts a
/// new one; the previous field's `byte_size` grows to absorb the gap. Two
/// back-to-back full blocks (e.g. `vec4` then `vec4`) never need padding.
/// The returned `byte_len` is always a multiple of [`BLOCK_SIZE`].
pub fn pack<S: AsRef<str>>(fields: &[(S, Field)]) -> PackedLayout {
    let mut out: Vec<AlignedField> = Vec::with_capacity(fields.len());

    // Bytes consumed in the current block, and bytes emitted overall.
    let mut used = 0u64;
    let mut offset = 0u64;

    for (name, field) in fields {
        let (align, size) = field.ty.align_and_size();

        let start = used.next_multiple_of(align.min(BLOCK_SIZE));
        let fits = used == 0 || (align <= BLOCK_SIZE && start + size <= BLOCK_SIZE);
        let pad = if fits { start - used } else { BLOCK_SIZE - used };

        if pad > 0 {
            // `used > 0` here, so a previous field exists.
            if let Some(prev) = out.last_mut() {
                prev.byte_size += pad;
            }
            offset += pad;
        }
        used = if fits { start } else { 0 };

        out.push(AlignedField {
            name: name.as_ref().to_string(),
            ty: field.ty,
            value: field.value.clone(),
            byte_offset: offset,
            byte_size: size,
        });

        offset += size;
        used = (used + size) % BLOCK_SIZE;
    }

    PackedLayout {
        byte_len: offset.next_multiple_of(BLOCK_SIZE),
        fields: out,
    }
}
