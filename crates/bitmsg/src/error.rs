use thiserror::Error;

/// Why a [`Message`](crate::Message) failed to decode
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer holds {got} bits, {expected} expected")]
    BitSize { got: usize, expected: usize },
    #[error("field {id} rejected by its condition")]
    Field { id: u32 },
    #[error("rejected by custom validator")]
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            DecodeError::BitSize {
                got: 8,
                expected: 16
            }
            .to_string(),
            "buffer holds 8 bits, 16 expected"
        );
        assert_eq!(
            DecodeError::Field { id: 2 }.to_string(),
            "field 2 rejected by its condition"
        );
    }
}
