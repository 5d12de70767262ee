//! Fixed-width bit fields carrying their own acceptance [`Condition`].
mod condition;

pub use self::condition::*;

use core::{
    cmp::Ordering,
    fmt::{self, Debug},
    marker::PhantomData,
};

use impl_tools::autoimpl;

use crate::bits::{BitOrdering, FieldValue, Lsb0};

/// Field surface a [`Message`](crate::Message) composes.
pub trait BitField: Sized + 'static {
    type Value: FieldValue;
    type Order: BitOrdering;

    /// Width in bits
    const BITS: usize;
    /// Width of the marshalled form in bytes
    const BYTES: usize = Self::BITS.div_ceil(8);
    /// Identifier reported to loggers
    const ID: u32;

    fn value(&self) -> Self::Value;

    fn is_valid(&self) -> bool;

    /// Re-applies the condition to the current value
    fn validate(&mut self) -> bool;

    /// Sets the value and marks it valid, bypassing the condition
    fn force(&mut self, value: Self::Value);

    /// Decodes [`BITS`](BitField::BITS) bits at `bit_offset` and validates
    /// the result
    fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> bool;

    /// Encodes the value into [`BYTES`](BitField::BYTES) bytes, starting
    /// at bit 0
    fn marshal(&self) -> Vec<u8>;

    /// Replaces the condition and re-validates the current value
    fn set_condition(&mut self, condition: Condition<Self::Value, Self>) -> bool;

    /// Drops the value, keeping only the acceptance rule
    fn into_condition(self) -> Condition<Self::Value, Self>;
}

/// Atomic `BITS` wide scalar of type `T`.
///
/// `ID` identifies the declaration in diagnostics and, together with the
/// width, value type and bit order `O` ([`Lsb0`] or
/// [`Msb0`](crate::bits::Msb0)), makes every declaration a distinct type:
///
/// ```rust
/// # use bitmsg::{Field, bits::Msb0};
/// type Version = Field<u8, 3, 1>;
/// type Flags = Field<u8, 5, 2, Msb0>;
/// ```
///
/// A field starts out invalid. Decoding, assignment and
/// [`validate`](Field::validate) run its condition, [`force`](Field::force)
/// bypasses it.
#[autoimpl(Clone where T: Copy)]
pub struct Field<T, const BITS: usize, const ID: u32 = 0, O = Lsb0> {
    value: T,
    valid: bool,
    condition: Condition<T, Field<T, BITS, ID, O>>,
    _order: PhantomData<O>,
}

impl<T, const BITS: usize, const ID: u32, O> Field<T, BITS, ID, O>
where
    T: FieldValue,
    O: BitOrdering,
{
    const WIDTH_CHECK: () = assert!(
        BITS > 0 && BITS <= T::WIDTH,
        "field width must be within 1..=bit width of its value type"
    );

    /// Field with given condition and a zero, not yet validated, value
    #[inline]
    pub const fn with_condition(condition: Condition<T, Self>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WIDTH_CHECK;
        Self {
            value: T::ZERO,
            valid: false,
            condition,
            _order: PhantomData,
        }
    }

    /// Field holding `value`, validated by the default width check
    #[inline]
    pub fn new(value: T) -> Self {
        Self::default().init(value)
    }

    /// Field decoded from `bytes` at `bit_offset` with the default width
    /// check.
    ///
    /// # Panics
    ///
    /// When `bytes` is shorter than `bit_offset + BITS` bits.
    #[inline]
    pub fn from_bytes(bytes: &[u8], bit_offset: usize) -> Self {
        let mut field = Self::default();
        field.unmarshal(bytes, bit_offset);
        field
    }

    /// Assigns `value` and validates it, chaining
    #[inline]
    pub fn init(mut self, value: T) -> Self {
        self.set(value);
        self
    }

    #[inline]
    pub const fn id(&self) -> u32 {
        ID
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Assigns `value` and validates it
    #[inline]
    pub fn set(&mut self, value: T) -> bool {
        self.value = value;
        self.validate()
    }

    #[inline]
    pub fn force(&mut self, value: T) {
        self.value = value;
        self.valid = true;
    }

    /// Re-applies the condition to the current value.
    ///
    /// A [`Clamp`](Condition::Clamp) condition forces an out of range value
    /// to its nearest bound.
    pub fn validate(&mut self) -> bool {
        if let Some(clamped) = self.condition.clamped(self.value) {
            self.force(clamped);
            return true;
        }
        self.valid = self.condition.accepts(self, self.value, BITS);
        self.valid
    }

    /// Decodes `BITS` bits starting at `bit_offset`, validates the result
    /// and returns its validity.
    ///
    /// # Panics
    ///
    /// When `bytes` is shorter than `bit_offset + BITS` bits.
    #[inline]
    pub fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> bool {
        self.value = T::from_raw(O::read_raw(bytes, bit_offset, BITS));
        self.validate()
    }

    /// Encodes the value into `ceil(BITS / 8)` bytes starting at bit 0,
    /// unused bits of the last byte zeroed
    #[inline]
    pub fn marshal(&self) -> Vec<u8> {
        O::write_raw(self.value.into_raw(), BITS)
    }

    /// Replaces the condition and re-validates the current value
    #[inline]
    pub fn set_condition(&mut self, condition: Condition<T, Self>) -> bool {
        self.condition = condition;
        self.validate()
    }

    #[inline]
    pub fn into_condition(self) -> Condition<T, Self> {
        self.condition
    }

    /// Accepts every value
    #[inline]
    pub const fn any() -> Self {
        Self::with_condition(Condition::Any)
    }

    #[inline]
    pub const fn equal_to(value: T) -> Self {
        Self::with_condition(Condition::Equal(value))
    }

    /// Accepts any member of `values`
    #[inline]
    pub fn one_of(values: impl IntoIterator<Item = T>) -> Self {
        Self::with_condition(Condition::OneOf(values.into_iter().collect()))
    }

    #[inline]
    pub const fn not_equal_to(value: T) -> Self {
        Self::with_condition(Condition::NotEqual(value))
    }

    #[inline]
    pub const fn greater_than(value: T) -> Self {
        Self::with_condition(Condition::GreaterThan(value))
    }

    #[inline]
    pub const fn less_than(value: T) -> Self {
        Self::with_condition(Condition::LessThan(value))
    }

    #[inline]
    pub const fn greater_equal_to(value: T) -> Self {
        Self::with_condition(Condition::GreaterEqual(value))
    }

    #[inline]
    pub const fn less_equal_to(value: T) -> Self {
        Self::with_condition(Condition::LessEqual(value))
    }

    /// Accepts `min <= value <= max`
    #[inline]
    pub const fn between(min: T, max: T) -> Self {
        Self::with_condition(Condition::Between(min, max))
    }

    /// Accepts every value after forcing it into `[min, max]`
    #[inline]
    pub const fn clamp(min: T, max: T) -> Self {
        Self::with_condition(Condition::Clamp(min, max))
    }

    /// Accepts whatever `predicate` accepts
    #[inline]
    pub fn condition(predicate: impl Fn(&Self, T) -> bool + Send + Sync + 'static) -> Self {
        Self::with_condition(Condition::custom(predicate))
    }
}

impl<T, const BITS: usize, const ID: u32, O> BitField for Field<T, BITS, ID, O>
where
    T: FieldValue,
    O: BitOrdering,
{
    type Value = T;
    type Order = O;

    const BITS: usize = BITS;
    const ID: u32 = ID;

    #[inline]
    fn value(&self) -> T {
        self.value
    }

    #[inline]
    fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    fn validate(&mut self) -> bool {
        Field::validate(self)
    }

    #[inline]
    fn force(&mut self, value: T) {
        Field::force(self, value)
    }

    #[inline]
    fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> bool {
        Field::unmarshal(self, bytes, bit_offset)
    }

    #[inline]
    fn marshal(&self) -> Vec<u8> {
        Field::marshal(self)
    }

    #[inline]
    fn set_condition(&mut self, condition: Condition<T, Self>) -> bool {
        Field::set_condition(self, condition)
    }

    #[inline]
    fn into_condition(self) -> Condition<T, Self> {
        Field::into_condition(self)
    }
}

impl<T, const BITS: usize, const ID: u32, O> Default for Field<T, BITS, ID, O>
where
    T: FieldValue,
    O: BitOrdering,
{
    #[inline]
    fn default() -> Self {
        Self::with_condition(Condition::Width)
    }
}

impl<T, const BITS: usize, const ID: u32, O> PartialEq for Field<T, BITS, ID, O>
where
    T: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T, const BITS: usize, const ID: u32, O> PartialOrd for Field<T, BITS, ID, O>
where
    T: PartialOrd,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T, const BITS: usize, const ID: u32, O> Debug for Field<T, BITS, ID, O>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &ID)
            .field("bits", &BITS)
            .field("value", &self.value)
            .field("valid", &self.valid)
            .field("condition", &self.condition)
            .finish()
    }
}
