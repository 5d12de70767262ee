use core::fmt::{Debug, Display};

use num_traits::PrimInt;

/// Scalar that can back a field of at most 32 bits.
///
/// Raw bits are reinterpreted, never converted: [`from_raw`](FieldValue::from_raw)
/// keeps the low [`WIDTH`](FieldValue::WIDTH) bits as they are (no sign
/// extension) and [`into_raw`](FieldValue::into_raw) zero-extends.
pub trait FieldValue: PrimInt + Debug + Display + Send + Sync + 'static {
    /// Width of the type in bits
    const WIDTH: usize;
    const ZERO: Self;

    fn from_raw(raw: u32) -> Self;

    fn into_raw(self) -> u32;

    /// Largest value accepted by the default range check of an `n_bits`
    /// wide field: `min(MAX, 2^n_bits - 1)`, or `MAX` when the field spans
    /// the whole type.
    fn width_max(n_bits: usize) -> Self;

    /// Default range check: `MIN <= self <= width_max(n_bits)`
    #[inline]
    fn fits(self, n_bits: usize) -> bool {
        self >= Self::min_value() && self <= Self::width_max(n_bits)
    }
}

macro_rules! impl_field_value {
    ($($t:tt as $u:tt)+) => {$(
        impl FieldValue for $t {
            const WIDTH: usize = $t::BITS as usize;
            const ZERO: Self = 0;

            #[inline]
            fn from_raw(raw: u32) -> Self {
                raw as $u as $t
            }

            #[inline]
            fn into_raw(self) -> u32 {
                self as $u as u32
            }

            #[inline]
            fn width_max(n_bits: usize) -> Self {
                if n_bits >= Self::WIDTH {
                    return $t::MAX;
                }
                let cap = (1i64 << n_bits) - 1;
                if cap < $t::MAX as i64 {
                    cap as $t
                } else {
                    $t::MAX
                }
            }
        }
    )+};
}
impl_field_value! {
    u8 as u8
    u16 as u16
    u32 as u32
    i8 as u8
    i16 as u16
    i32 as u32
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn from_raw_truncates_without_sign_extension() {
        assert_eq!(i16::from_raw(0x0FFF), 4095);
        assert_eq!(i8::from_raw(0x1FF), -1);
        assert_eq!(u8::from_raw(0x1_23), 0x23);
    }

    #[test]
    fn into_raw_zero_extends() {
        assert_eq!((-1i8).into_raw(), 0xFF);
        assert_eq!((-2i16).into_raw(), 0xFFFE);
        assert_eq!(u32::MAX.into_raw(), u32::MAX);
    }

    #[rstest]
    #[case(4, 15)]
    #[case(12, 4095)]
    #[case(15, 32767)]
    #[case(16, u16::MAX)]
    fn width_max_u16(#[case] n_bits: usize, #[case] max: u16) {
        assert_eq!(u16::width_max(n_bits), max);
    }

    #[test]
    fn width_max_full_width() {
        assert_eq!(u32::width_max(32), u32::MAX);
        assert_eq!(i32::width_max(32), i32::MAX);
        assert_eq!(i8::width_max(8), i8::MAX);
        assert_eq!(i8::width_max(7), i8::MAX);
    }

    #[rstest]
    #[case(0, true)]
    #[case(15, true)]
    #[case(16, false)]
    #[case(u16::MAX, false)]
    fn fits_four_bits(#[case] value: u16, #[case] ok: bool) {
        assert_eq!(value.fits(4), ok);
    }

    #[test]
    fn fits_signed_accepts_negatives() {
        assert!((-5i16).fits(4));
        assert!(!16i16.fits(4));
    }
}
