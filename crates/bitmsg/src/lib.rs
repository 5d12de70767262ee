//! Typed, bit-packed fields and messages with declarative validation.
//!
//! A [`Field`] is a fixed-width scalar that knows its bit order and carries
//! a [`Condition`] its decoded value has to satisfy. A [`Message`] packs a
//! tuple of distinct fields back to back, without re-aligning them to byte
//! boundaries, and is valid when every field is and its optional custom
//! validator agrees.
//!
//! ```rust
//! use bitmsg::{Field, bits::Msb0, make_msg};
//!
//! type Version = Field<u8, 3, 1, Msb0>;
//! type Kind = Field<u8, 5, 2, Msb0>;
//! type Length = Field<u16, 12, 3, Msb0>;
//!
//! let mut msg = make_msg(
//!     1,
//!     |msg| println!("kind {}", msg.value_of::<Kind, _>()),
//!     (Version::equal_to(1), Kind::any(), Length::clamp(0, 1500)),
//! );
//!
//! assert!(msg.unmarshal(&[0b001_00100, 0xFF, 0xF0], 0));
//! assert_eq!(msg.value_of::<Kind, _>(), 4);
//! // clamped to the upper bound
//! assert_eq!(msg.value_of::<Length, _>(), 1500);
//!
//! assert!(!msg.unmarshal(&[0b010_00100, 0x00, 0x00], 0));
//! ```
//!
//! Decode events can be observed through a [`MessageLogger`], see
//! [`TracingLogger`] with the `tracing` feature.
mod error;
mod field;
mod logger;
mod message;

#[cfg(test)]
mod tests;

pub use self::{error::*, field::*, logger::*, message::*};

pub use bitmsg_bits::{self as bits, BitOrdering, FieldValue, Lsb0, Msb0};
