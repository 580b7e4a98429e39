//! Bit-field accessors used by the register decoders

/// Read a single bit of `value`
#[inline]
pub(crate) const fn get_bit(value: u8, bit: u8) -> bool {
    (value >> bit) & 0x01 != 0
}

/// Read the field `mask` located `shift` bits up in `value`
#[inline]
pub(crate) const fn get_bits(value: u8, mask: u8, shift: u8) -> u8 {
    (value >> shift) & mask
}

/// Return `value` with a single bit forced on or off
#[inline]
pub(crate) const fn set_bit(value: u8, bit: u8, on: bool) -> u8 {
    if on {
        value | (1 << bit)
    } else {
        value & !(1 << bit)
    }
}

/// Return `value` with the field `mask << shift` replaced by `field`
///
/// `field` is masked to its width first, so oversized inputs cannot leak into
/// neighbouring bits.
#[inline]
pub(crate) const fn set_bits(value: u8, mask: u8, shift: u8, field: u8) -> u8 {
    (value & !(mask << shift)) | ((field & mask) << shift)
}
