use core::any::TypeId;

use itertools::Itertools;

use crate::{BitField, bits::BitOrdering};

/// Ordered, fixed-arity list of fields packed back to back.
///
/// Implemented for tuples of 1 to 12 [`BitField`]s. Fields are not
/// re-aligned to byte boundaries: each one starts at the bit where the
/// previous one ended.
pub trait FieldList: 'static {
    /// Number of fields
    const LEN: usize;
    /// Sum of field widths in bits
    const BITS: usize;
    /// Width of the marshalled form in bytes
    const BYTES: usize = Self::BITS.div_ceil(8);

    /// Decodes fields in declaration order starting at `bit_offset`.
    ///
    /// Stops at the first rejected field and returns its
    /// [`ID`](BitField::ID). Fields after it keep their previous contents.
    /// Otherwise returns the bit offset right after the last field.
    fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> Result<usize, u32>;

    /// OR-combines every marshalled field into `dst` starting at
    /// `bit_offset` and returns the bit offset right after the last field
    fn marshal_into(&self, dst: &mut [u8], bit_offset: usize) -> usize;

    /// Whether every field is individually valid
    fn is_valid(&self) -> bool;

    /// [`ID`](BitField::ID) of the first invalid field
    fn first_invalid(&self) -> Option<u32>;

    /// [`ID`](BitField::ID)s in declaration order
    fn ids() -> Vec<u32>;

    /// Whether no field type is declared twice
    fn is_distinct() -> bool;
}

/// Position marker used by [`Selector`]
pub struct At<const N: usize>;

/// Typed access to the field `T` found at position `I`.
///
/// The position is inferred, so it is ambiguous (and rejected at compile
/// time) when `T` occurs more than once.
pub trait Selector<T, I> {
    fn select(&self) -> &T;

    fn select_mut(&mut self) -> &mut T;
}

/// Appends the fields of `Rhs` after `Self`
pub trait Concat<Rhs> {
    type Output: FieldList;

    fn concat(self, rhs: Rhs) -> Self::Output;
}

macro_rules! impl_field_list_for_tuple {
    ($($n:tt:$t:ident),+) => {
        impl<$($t),+> FieldList for ($($t,)+)
        where $(
            $t: BitField,
        )+
        {
            const LEN: usize = [$($n),+].len();
            const BITS: usize = 0 $(+ $t::BITS)+;

            #[inline]
            fn unmarshal(&mut self, bytes: &[u8], mut bit_offset: usize) -> Result<usize, u32> {
                $(
                    if !self.$n.unmarshal(bytes, bit_offset) {
                        return Err($t::ID);
                    }
                    bit_offset += $t::BITS;
                )+
                Ok(bit_offset)
            }

            #[inline]
            fn marshal_into(&self, dst: &mut [u8], mut bit_offset: usize) -> usize {
                $(
                    <$t::Order as BitOrdering>::splice(dst, bit_offset, &self.$n.marshal());
                    bit_offset += $t::BITS;
                )+
                bit_offset
            }

            #[inline]
            fn is_valid(&self) -> bool {
                true $(&& self.$n.is_valid())+
            }

            #[inline]
            fn first_invalid(&self) -> Option<u32> {
                $(
                    if !self.$n.is_valid() {
                        return Some($t::ID);
                    }
                )+
                None
            }

            #[inline]
            fn ids() -> Vec<u32> {
                vec![$($t::ID),+]
            }

            #[inline]
            fn is_distinct() -> bool {
                [$(TypeId::of::<$t>()),+].into_iter().all_unique()
            }
        }

        impl_selector_for_tuple!([$($n:$t),+] $($n:$t)+);
    };
}

macro_rules! impl_selector_for_tuple {
    (@at [$($n:tt:$t:ident),+] $i:tt:$ti:ident) => {
        impl<$($t),+> Selector<$ti, At<$i>> for ($($t,)+) {
            #[inline]
            fn select(&self) -> &$ti {
                &self.$i
            }

            #[inline]
            fn select_mut(&mut self) -> &mut $ti {
                &mut self.$i
            }
        }
    };
    ($all:tt $($n:tt:$t:ident)+) => {$(
        impl_selector_for_tuple!(@at $all $n:$t);
    )+};
}

impl_field_list_for_tuple!(0:T0);
impl_field_list_for_tuple!(0:T0,1:T1);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5,6:T6);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5,6:T6,7:T7);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5,6:T6,7:T7,8:T8);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5,6:T6,7:T7,8:T8,9:T9);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5,6:T6,7:T7,8:T8,9:T9,10:T10);
impl_field_list_for_tuple!(0:T0,1:T1,2:T2,3:T3,4:T4,5:T5,6:T6,7:T7,8:T8,9:T9,10:T10,11:T11);

macro_rules! impl_concat_for_tuple {
    ([$($l:ident)+] [$($r:ident)*]) => {
        #[allow(non_snake_case)]
        impl<$($l,)+ $($r,)*> Concat<($($r,)*)> for ($($l,)+)
        where
            ($($l,)+ $($r,)*): FieldList,
        {
            type Output = ($($l,)+ $($r,)*);

            #[inline]
            fn concat(self, rhs: ($($r,)*)) -> Self::Output {
                let ($($l,)+) = self;
                let ($($r,)*) = rhs;
                ($($l,)+ $($r,)*)
            }
        }
    };
    ([$($l:ident)+] [$($r:ident)*] $next:ident $($rest:ident)*) => {
        impl_concat_for_tuple!([$($l)+] [$($r)*]);
        impl_concat_for_tuple!([$($l)+] [$($r)* $next] $($rest)*);
    };
}

impl_concat_for_tuple!([L0] [] R0 R1 R2 R3 R4 R5 R6 R7 R8 R9 R10);
impl_concat_for_tuple!([L0 L1] [] R0 R1 R2 R3 R4 R5 R6 R7 R8 R9);
impl_concat_for_tuple!([L0 L1 L2] [] R0 R1 R2 R3 R4 R5 R6 R7 R8);
impl_concat_for_tuple!([L0 L1 L2 L3] [] R0 R1 R2 R3 R4 R5 R6 R7);
impl_concat_for_tuple!([L0 L1 L2 L3 L4] [] R0 R1 R2 R3 R4 R5 R6);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5] [] R0 R1 R2 R3 R4 R5);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5 L6] [] R0 R1 R2 R3 R4);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5 L6 L7] [] R0 R1 R2 R3);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5 L6 L7 L8] [] R0 R1 R2);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5 L6 L7 L8 L9] [] R0 R1);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5 L6 L7 L8 L9 L10] [] R0);
impl_concat_for_tuple!([L0 L1 L2 L3 L4 L5 L6 L7 L8 L9 L10 L11] []);

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use crate::{Field, bits::Msb0};

    use super::*;

    type A = Field<u8, 4, 1>;
    type B = Field<u16, 12, 2>;
    type C = Field<u8, 3, 3, Msb0>;

    #[test]
    fn sizes() {
        assert_eq!(<(A, B, C)>::LEN, 3);
        assert_eq!(<(A, B, C)>::BITS, 19);
        assert_eq!(<(A, B, C)>::BYTES, 3);
        assert_eq!(<(A, B, C)>::ids(), [1, 2, 3]);
    }

    #[test]
    fn distinct_types() {
        assert!(<(A, B, C)>::is_distinct());
        assert!(!<(A, B, A)>::is_distinct());
    }

    #[test]
    fn unmarshal_threads_offsets() {
        let mut list = (A::any(), B::any(), C::any());
        assert_eq!(list.unmarshal(&hex!("84 0A A0"), 0), Ok(19));
        assert_eq!(list.0.value(), 0x4);
        assert_eq!(list.1.value(), 0x0A8);
        // bits 16..19 in MSB-first order: top three bits of 0xA0
        assert_eq!(list.2.value(), 0b101);
        assert!(list.is_valid());
    }

    #[test]
    fn unmarshal_stops_at_first_rejected_field() {
        let mut list = (A::between(0, 2), B::any().init(7), C::any());
        assert_eq!(list.unmarshal(&hex!("84 0A A0"), 0), Err(1));
        assert_eq!(list.0.value(), 4);
        assert_eq!(list.1.value(), 7);
        assert_eq!(list.first_invalid(), Some(1));
    }

    #[test]
    fn marshal_into_packs_back_to_back() {
        let list = (A::new(4), B::new(0x0A8), C::new(0b101));
        let mut dst = [0; 3];
        assert_eq!(list.marshal_into(&mut dst, 0), 19);
        assert_eq!(dst, hex!("84 0A A0"));
    }

    #[test]
    fn select_by_type() {
        let mut list = (A::new(1), B::new(2), C::new(3));
        assert_eq!(Selector::<B, _>::select(&list).value(), 2);
        Selector::<C, _>::select_mut(&mut list).set(5);
        assert_eq!(list.2.value(), 5);
    }

    #[test]
    fn concat_appends() {
        let list = (A::new(1),).concat((B::new(2), C::new(3)));
        assert_eq!(<(A, B, C)>::LEN, 3);
        assert_eq!(list.1.value(), 2);
        assert_eq!(list.2.value(), 3);
    }
}
