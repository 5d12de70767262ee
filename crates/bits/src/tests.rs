use crate::{BitOrdering, write_bits};

#[track_caller]
pub fn assert_write_read_eq<O>(raw: u32, bit_offset: usize, n_bits: usize)
where
    O: BitOrdering,
{
    let mask = if n_bits == 32 {
        u32::MAX
    } else {
        (1 << n_bits) - 1
    };
    let bytes = write_bits::<O>(raw, bit_offset, n_bits);
    assert_eq!(bytes.len(), (bit_offset + n_bits).div_ceil(8));
    assert_eq!(O::read_raw(&bytes, bit_offset, n_bits), raw & mask);
}
