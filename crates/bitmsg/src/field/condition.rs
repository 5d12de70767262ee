use core::fmt::{self, Debug};
use std::sync::Arc;

use crate::bits::FieldValue;

/// Custom acceptance rule over a field and its candidate value
pub type Predicate<T, F> = Arc<dyn Fn(&F, T) -> bool + Send + Sync>;

/// Acceptance rule of a field.
///
/// `T` is the value type and `F` the field the rule is attached to, which
/// is only needed by [`Custom`](Condition::Custom) predicates. Every kind
/// only reports, except [`Clamp`](Condition::Clamp) which repairs an out of
/// range value to the nearest bound and accepts it.
pub enum Condition<T, F> {
    /// Value lies within `[MIN, min(MAX, 2^n_bits - 1)]` of its field width
    Width,
    Any,
    Equal(T),
    /// Value equals any member
    OneOf(Arc<[T]>),
    NotEqual(T),
    GreaterThan(T),
    LessThan(T),
    GreaterEqual(T),
    LessEqual(T),
    /// `min <= value <= max`
    Between(T, T),
    /// Always accepts, forcing the value into `[min, max]` first
    Clamp(T, T),
    Custom(Predicate<T, F>),
}

impl<T, F> Condition<T, F>
where
    T: FieldValue,
{
    #[inline]
    pub fn custom(predicate: impl Fn(&F, T) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    /// Whether this kind may rewrite the value it is applied to
    #[inline]
    pub const fn is_mutating(&self) -> bool {
        matches!(self, Self::Clamp(..))
    }

    /// Evaluates the rule against `value` of an `n_bits` wide `field`.
    ///
    /// For [`Clamp`](Condition::Clamp) this only reports acceptance, the
    /// repaired value is computed by [`clamped`](Condition::clamped).
    pub fn accepts(&self, field: &F, value: T, n_bits: usize) -> bool {
        match self {
            Self::Width => value.fits(n_bits),
            Self::Any | Self::Clamp(..) => true,
            Self::Equal(v) => value == *v,
            Self::OneOf(values) => values.contains(&value),
            Self::NotEqual(v) => value != *v,
            Self::GreaterThan(v) => value > *v,
            Self::LessThan(v) => value < *v,
            Self::GreaterEqual(v) => value >= *v,
            Self::LessEqual(v) => value <= *v,
            Self::Between(min, max) => *min <= value && value <= *max,
            Self::Custom(predicate) => predicate(field, value),
        }
    }

    /// Value a [`Clamp`](Condition::Clamp) forces, if it has to
    #[inline]
    pub fn clamped(&self, value: T) -> Option<T> {
        match *self {
            Self::Clamp(min, _) if value < min => Some(min),
            Self::Clamp(_, max) if value > max => Some(max),
            _ => None,
        }
    }
}

impl<T, F> Clone for Condition<T, F>
where
    T: Copy,
{
    fn clone(&self) -> Self {
        match self {
            Self::Width => Self::Width,
            Self::Any => Self::Any,
            Self::Equal(v) => Self::Equal(*v),
            Self::OneOf(values) => Self::OneOf(Arc::clone(values)),
            Self::NotEqual(v) => Self::NotEqual(*v),
            Self::GreaterThan(v) => Self::GreaterThan(*v),
            Self::LessThan(v) => Self::LessThan(*v),
            Self::GreaterEqual(v) => Self::GreaterEqual(*v),
            Self::LessEqual(v) => Self::LessEqual(*v),
            Self::Between(min, max) => Self::Between(*min, *max),
            Self::Clamp(min, max) => Self::Clamp(*min, *max),
            Self::Custom(predicate) => Self::Custom(Arc::clone(predicate)),
        }
    }
}

impl<T, F> Default for Condition<T, F> {
    #[inline]
    fn default() -> Self {
        Self::Width
    }
}

impl<T, F> Debug for Condition<T, F>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => f.write_str("Width"),
            Self::Any => f.write_str("Any"),
            Self::Equal(v) => f.debug_tuple("Equal").field(v).finish(),
            Self::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Self::NotEqual(v) => f.debug_tuple("NotEqual").field(v).finish(),
            Self::GreaterThan(v) => f.debug_tuple("GreaterThan").field(v).finish(),
            Self::LessThan(v) => f.debug_tuple("LessThan").field(v).finish(),
            Self::GreaterEqual(v) => f.debug_tuple("GreaterEqual").field(v).finish(),
            Self::LessEqual(v) => f.debug_tuple("LessEqual").field(v).finish(),
            Self::Between(min, max) => f.debug_tuple("Between").field(min).field(max).finish(),
            Self::Clamp(min, max) => f.debug_tuple("Clamp").field(min).field(max).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
