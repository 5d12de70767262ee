//! Fixed compositions of distinct [`BitField`]s packed into one record.
mod factory;
mod list;

pub use self::{factory::*, list::*};

use core::fmt::{self, Debug};
use std::sync::Arc;

use impl_tools::autoimpl;

use crate::{BitField, Condition, DecodeError, MessageLogger, NoopLogger};

/// Side effect fired once per successful decode
pub type Callback<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Whole-message acceptance rule, run after every field passed
pub type Validator<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;

/// Object safe view of a [`Message`], as handed to loggers
pub trait BitMessage {
    fn id(&self) -> u32;

    /// Sum of field widths
    fn n_bits(&self) -> usize;

    fn n_fields(&self) -> usize;

    fn is_valid(&self) -> bool;

    fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> bool;

    fn marshal(&self) -> Vec<u8>;
}

/// Progress of the last [`unmarshal`](Message::unmarshal) call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// No decode attempted yet
    #[default]
    Unconfigured,
    Decoding,
    Valid,
    Invalid,
}

/// Ordered record of distinct fields `F`, a tuple of [`BitField`]s,
/// reporting decode events to `L`.
///
/// ```rust
/// # use bitmsg::{Field, Message};
/// type First = Field<u16, 4, 1>;
/// type Second = Field<u16, 12, 2>;
///
/// let mut msg = Message::new(7, (First::between(0, 2), Second::default()));
/// assert!(!msg.unmarshal(&[0x84, 0x0A], 0));
/// assert_eq!(msg.value_of::<First, _>(), 4);
///
/// assert!(msg.unmarshal(&[0x80, 0x0A], 0));
/// assert_eq!(msg.value_of::<Second, _>(), 0x0A8);
/// ```
#[autoimpl(Clone where F: Clone, L: Clone)]
pub struct Message<F, L = NoopLogger> {
    id: u32,
    fields: F,
    state: DecodeState,
    logger: L,
    callback: Option<Callback<Self>>,
    validator: Option<Validator<Self>>,
}

impl<F> Message<F>
where
    F: FieldList,
{
    /// Message without diagnostics.
    ///
    /// # Panics
    ///
    /// When a field type occurs more than once in `F`.
    #[inline]
    pub fn new(id: u32, fields: F) -> Self {
        Self::with_logger(NoopLogger, id, fields)
    }
}

impl<F, L> Message<F, L>
where
    F: FieldList,
    L: MessageLogger,
{
    pub const N_FIELDS: usize = F::LEN;
    pub const N_BITS: usize = F::BITS;
    pub const N_BYTES: usize = F::BYTES;

    /// # Panics
    ///
    /// When a field type occurs more than once in `F`.
    pub fn with_logger(logger: L, id: u32, fields: F) -> Self {
        assert!(
            F::is_distinct(),
            "message {id} declares a field type more than once: {:?}",
            F::ids()
        );
        Self {
            id,
            fields,
            state: DecodeState::Unconfigured,
            logger,
            callback: None,
            validator: None,
        }
    }

    #[inline]
    pub const fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub const fn state(&self) -> DecodeState {
        self.state
    }

    #[inline]
    pub const fn fields(&self) -> &F {
        &self.fields
    }

    #[inline]
    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    #[inline]
    pub fn into_fields(self) -> F {
        self.fields
    }

    #[inline]
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// Decodes all fields from `bytes` starting at `bit_offset` and reports
    /// whether the message is valid.
    ///
    /// See [`try_unmarshal`](Message::try_unmarshal) for the exact sequence.
    #[inline]
    pub fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> bool {
        self.try_unmarshal(bytes, bit_offset).is_ok()
    }

    /// Decodes all fields from `bytes` starting at `bit_offset`:
    ///
    /// 1. A buffer holding less than [`N_BITS`](Message::N_BITS) bits past
    ///    `bit_offset` fails with [`DecodeError::BitSize`], no field touched.
    /// 2. Fields decode in order, each one starting where the previous one
    ///    ended. The first rejected field keeps its value and fails the call
    ///    with [`DecodeError::Field`]. Fields after it are left as they were.
    /// 3. The custom validator runs on the fully decoded message and fails
    ///    the call with [`DecodeError::Rejected`].
    /// 4. Otherwise the message becomes valid and the callback fires.
    pub fn try_unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> Result<(), DecodeError> {
        self.state = DecodeState::Unconfigured;
        self.logger.on_unmarshal_start(self);

        let got = (bytes.len() * 8).saturating_sub(bit_offset);
        if got < F::BITS {
            self.state = DecodeState::Invalid;
            self.logger.on_error_bit_size(self, got, F::BITS);
            return Err(DecodeError::BitSize {
                got,
                expected: F::BITS,
            });
        }

        self.state = DecodeState::Decoding;
        let decoded = self.fields.unmarshal(bytes, bit_offset);
        self.logger.on_unmarshal_end(self);
        if let Err(id) = decoded {
            self.state = DecodeState::Invalid;
            self.logger.on_error_condition(self, id);
            self.logger.on_error_unmarshal(self, id);
            return Err(DecodeError::Field { id });
        }

        if !self.accepted_by_validator() {
            self.state = DecodeState::Invalid;
            return Err(DecodeError::Rejected);
        }

        self.state = DecodeState::Valid;
        if let Some(callback) = &self.callback {
            callback(self);
        }
        Ok(())
    }

    /// Packs all fields back to back into [`N_BYTES`](Message::N_BYTES)
    /// bytes, unused trailing bits zeroed
    pub fn marshal(&self) -> Vec<u8> {
        let mut bytes = vec![0; F::BYTES];
        self.fields.marshal_into(&mut bytes, 0);
        bytes
    }

    /// Every field is valid and the custom validator, if any, accepts.
    ///
    /// Recomputed on each call and independent of [`state`](Message::state).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.fields.is_valid() && self.accepted_by_validator()
    }

    #[inline]
    fn accepted_by_validator(&self) -> bool {
        self.validator
            .as_ref()
            .is_none_or(|validator| validator(self))
    }

    /// Field of type `T`
    #[inline]
    pub fn get<T, I>(&self) -> &T
    where
        F: Selector<T, I>,
    {
        self.fields.select()
    }

    #[inline]
    pub fn get_mut<T, I>(&mut self) -> &mut T
    where
        F: Selector<T, I>,
    {
        self.fields.select_mut()
    }

    /// Current value of the field of type `T`
    #[inline]
    pub fn value_of<T, I>(&self) -> T::Value
    where
        T: BitField,
        F: Selector<T, I>,
    {
        self.get::<T, I>().value()
    }

    /// Gives the field of type `T` the condition carried by `other` and
    /// re-validates it. The value of `other` is ignored.
    #[inline]
    pub fn set_condition<T, I>(&mut self, other: T) -> bool
    where
        T: BitField,
        F: Selector<T, I>,
    {
        self.get_mut::<T, I>().set_condition(other.into_condition())
    }

    /// Makes the field of type `T` accept whatever `predicate` accepts and
    /// re-validates it
    #[inline]
    pub fn set_predicate<T, I>(
        &mut self,
        predicate: impl Fn(&T, T::Value) -> bool + Send + Sync + 'static,
    ) -> bool
    where
        T: BitField,
        F: Selector<T, I>,
    {
        self.get_mut::<T, I>()
            .set_condition(Condition::custom(predicate))
    }

    #[inline]
    pub fn set_callback(&mut self, callback: impl Fn(&Self) + Send + Sync + 'static) -> &mut Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    #[inline]
    pub fn set_custom_validator(
        &mut self,
        validator: impl Fn(&Self) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    #[inline]
    pub fn with_callback(mut self, callback: impl Fn(&Self) + Send + Sync + 'static) -> Self {
        self.set_callback(callback);
        self
    }

    #[inline]
    pub fn with_custom_validator(
        mut self,
        validator: impl Fn(&Self) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.set_custom_validator(validator);
        self
    }
}

impl<F, L> BitMessage for Message<F, L>
where
    F: FieldList,
    L: MessageLogger,
{
    #[inline]
    fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    fn n_bits(&self) -> usize {
        F::BITS
    }

    #[inline]
    fn n_fields(&self) -> usize {
        F::LEN
    }

    #[inline]
    fn is_valid(&self) -> bool {
        Message::is_valid(self)
    }

    #[inline]
    fn unmarshal(&mut self, bytes: &[u8], bit_offset: usize) -> bool {
        Message::unmarshal(self, bytes, bit_offset)
    }

    #[inline]
    fn marshal(&self) -> Vec<u8> {
        Message::marshal(self)
    }
}

impl<F, L> PartialEq for Message<F, L>
where
    F: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fields == other.fields
    }
}

impl<F, L> Debug for Message<F, L>
where
    F: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("fields", &self.fields)
            .field("callback", &self.callback.is_some())
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}
