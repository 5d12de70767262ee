use bitvec::{
    order::{BitOrder, Lsb0, Msb0},
    view::BitView,
};

/// Packing convention of a field within its own bit span.
///
/// Bit `i` of a span starting at `bit_offset` always lives in byte
/// `(bit_offset + i) / 8`. The ordering decides which bit of that byte it is
/// and whether the first bit read is the least or the most significant bit
/// of the raw value:
///
/// * [`Lsb0`]: bit position `(bit_offset + i) % 8`, first bit is the LSB
/// * [`Msb0`]: bit position `7 - (bit_offset + i) % 8`, first bit is the MSB
pub trait BitOrdering: BitOrder + 'static {
    /// Reads `n_bits` (at most 32) starting at `bit_offset`.
    ///
    /// # Panics
    ///
    /// When `bytes` holds less than `bit_offset + n_bits` bits.
    fn read_raw(bytes: &[u8], bit_offset: usize, n_bits: usize) -> u32;

    /// Packs the low `n_bits` of `raw` into `ceil(n_bits / 8)` bytes
    /// starting at bit 0. Unused bits of the last byte are zero.
    fn write_raw(raw: u32, n_bits: usize) -> Vec<u8>;

    /// OR-combines `src`, produced by [`write_raw`](BitOrdering::write_raw),
    /// into `dst` so that its bit 0 lands on `bit_offset`. Bits shifted out
    /// of a byte are carried into the next one.
    fn splice(dst: &mut [u8], bit_offset: usize, src: &[u8]);
}

impl BitOrdering for Lsb0 {
    #[inline]
    fn read_raw(bytes: &[u8], bit_offset: usize, n_bits: usize) -> u32 {
        debug_assert!(n_bits <= 32, "excessive bits for raw value");
        bytes.view_bits::<Self>()[bit_offset..bit_offset + n_bits]
            .iter()
            .by_vals()
            .enumerate()
            .fold(0, |raw, (i, bit)| raw | (bit as u32) << i)
    }

    #[inline]
    fn write_raw(raw: u32, n_bits: usize) -> Vec<u8> {
        let mut bytes = vec![0; n_bits.div_ceil(8)];
        let bits = bytes.view_bits_mut::<Self>();
        for i in 0..n_bits {
            bits.set(i, (raw >> i) & 1 == 1);
        }
        bytes
    }

    fn splice(dst: &mut [u8], bit_offset: usize, src: &[u8]) {
        let (byte_offset, shift) = (bit_offset / 8, bit_offset % 8);
        let mut overflow = 0u16;
        for (i, byte) in src.iter().enumerate() {
            let word = (*byte as u16) << shift | overflow;
            dst[byte_offset + i] |= word as u8;
            overflow = word >> 8;
        }
        if overflow != 0 {
            if let Some(last) = dst.get_mut(byte_offset + src.len()) {
                *last |= overflow as u8;
            }
        }
    }
}

impl BitOrdering for Msb0 {
    #[inline]
    fn read_raw(bytes: &[u8], bit_offset: usize, n_bits: usize) -> u32 {
        debug_assert!(n_bits <= 32, "excessive bits for raw value");
        bytes.view_bits::<Self>()[bit_offset..bit_offset + n_bits]
            .iter()
            .by_vals()
            .fold(0, |raw, bit| raw << 1 | bit as u32)
    }

    #[inline]
    fn write_raw(raw: u32, n_bits: usize) -> Vec<u8> {
        let mut bytes = vec![0; n_bits.div_ceil(8)];
        let bits = bytes.view_bits_mut::<Self>();
        for i in 0..n_bits {
            bits.set(i, (raw >> (n_bits - i - 1)) & 1 == 1);
        }
        bytes
    }

    fn splice(dst: &mut [u8], bit_offset: usize, src: &[u8]) {
        let (byte_offset, shift) = (bit_offset / 8, bit_offset % 8);
        let mut carry = 0u8;
        for (i, byte) in src.iter().enumerate() {
            // high byte stays, low byte spills into the next one
            let word = (*byte as u16) << (8 - shift);
            dst[byte_offset + i] |= (word >> 8) as u8 | carry;
            carry = word as u8;
        }
        if carry != 0 {
            if let Some(last) = dst.get_mut(byte_offset + src.len()) {
                *last |= carry;
            }
        }
    }
}

/// Reads `n_bits` at `bit_offset` with ordering `O`.
#[inline]
pub fn read_bits<O>(bytes: &[u8], bit_offset: usize, n_bits: usize) -> u32
where
    O: BitOrdering,
{
    O::read_raw(bytes, bit_offset, n_bits)
}

/// Writes the low `n_bits` of `raw` at `bit_offset` into a zeroed buffer of
/// `ceil((bit_offset + n_bits) / 8)` bytes.
#[inline]
pub fn write_bits<O>(raw: u32, bit_offset: usize, n_bits: usize) -> Vec<u8>
where
    O: BitOrdering,
{
    let mut dst = vec![0; (bit_offset + n_bits).div_ceil(8)];
    O::splice(&mut dst, bit_offset, &O::write_raw(raw, n_bits));
    dst
}
