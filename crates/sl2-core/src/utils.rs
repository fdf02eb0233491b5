//! Little-endian field helpers

/// Read a little-endian u32 at `pos`, or `None` if it does not fit
pub fn read_u32_le(bytes: &[u8], pos: usize) -> Option<u32> {
    let field = bytes.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

/// Write a little-endian u32 at `pos`; returns false if it does not fit
pub fn write_u32_le(bytes: &mut [u8], pos: usize, value: u32) -> bool {
    match pos
        .checked_add(4)
        .and_then(|end| bytes.get_mut(pos..end))
    {
        Some(field) => {
            field.copy_from_slice(&value.to_le_bytes());
            true
        }
        None => false,
    }
}
