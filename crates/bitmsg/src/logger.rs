use std::{rc::Rc, sync::Arc};

use impl_tools::autoimpl;

use crate::BitMessage;

/// Observer of message decoding.
///
/// Every hook defaults to doing nothing. Hooks never influence the outcome
/// of a decode.
#[autoimpl(for<T: trait + ?Sized> &T, &mut T, Box<T>, Rc<T>, Arc<T>)]
pub trait MessageLogger {
    /// Decode of `msg` begins
    #[inline]
    fn on_unmarshal_start(&self, _msg: &dyn BitMessage) {}

    /// All fields of `msg` were visited or decode stopped at a rejected one
    #[inline]
    fn on_unmarshal_end(&self, _msg: &dyn BitMessage) {}

    /// Buffer handed to `msg` holds `got` bits where `expected` are needed
    #[inline]
    fn on_error_bit_size(&self, _msg: &dyn BitMessage, _got: usize, _expected: usize) {}

    /// Field `field_id` of `msg` was rejected by its condition
    #[inline]
    fn on_error_condition(&self, _msg: &dyn BitMessage, _field_id: u32) {}

    /// Decode of `msg` stopped at field `field_id`
    #[inline]
    fn on_error_unmarshal(&self, _msg: &dyn BitMessage, _field_id: u32) {}
}

/// Logger that discards every event
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoopLogger;

impl MessageLogger for NoopLogger {}

/// Emits [`tracing`] events: `TRACE` around each decode, `WARN` on short
/// buffers and `DEBUG` on rejected fields.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TracingLogger;

#[cfg(feature = "tracing")]
impl MessageLogger for TracingLogger {
    fn on_unmarshal_start(&self, msg: &dyn BitMessage) {
        tracing::trace!(msg_id = msg.id(), n_bits = msg.n_bits(), "unmarshal started");
    }

    fn on_unmarshal_end(&self, msg: &dyn BitMessage) {
        tracing::trace!(msg_id = msg.id(), "unmarshal finished");
    }

    fn on_error_bit_size(&self, msg: &dyn BitMessage, got: usize, expected: usize) {
        tracing::warn!(msg_id = msg.id(), got, expected, "buffer too short");
    }

    fn on_error_condition(&self, msg: &dyn BitMessage, field_id: u32) {
        tracing::debug!(msg_id = msg.id(), field_id, "field rejected by its condition");
    }

    fn on_error_unmarshal(&self, msg: &dyn BitMessage, field_id: u32) {
        tracing::debug!(msg_id = msg.id(), field_id, "unmarshal aborted");
    }
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use hex_literal::hex;

    use crate::{Field, Message};

    use super::*;

    #[test]
    fn tracing_logger_does_not_change_outcome() {
        type Nibble = Field<u8, 4, 1>;

        let mut msg = Message::with_logger(TracingLogger, 3, (Nibble::between(0, 2),));
        assert!(!msg.unmarshal(&hex!("84"), 0));
        assert!(!msg.unmarshal(&[], 0));
        assert!(msg.unmarshal(&hex!("81"), 0));
    }
}
