//! Bit arithmetic for fixed-width fields that start and end at arbitrary,
//! not necessarily byte-aligned, bit offsets.
mod order;
mod value;

pub use self::{order::*, value::*};

pub use bitvec;
pub use bitvec::order::{Lsb0, Msb0};

#[cfg(test)]
mod tests;
