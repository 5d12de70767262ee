use crate::{MessageLogger, NoopLogger};

use super::{Concat, FieldList, Message};

/// Message `id` over `fields` that calls `callback` after every
/// successful decode
#[inline]
pub fn make_msg<F>(
    id: u32,
    callback: impl Fn(&Message<F>) + Send + Sync + 'static,
    fields: F,
) -> Message<F>
where
    F: FieldList,
{
    make_msg_with_log(NoopLogger, id, callback, fields)
}

/// Same as [`make_msg`], reporting decode events to `logger`
#[inline]
pub fn make_msg_with_log<F, L>(
    logger: L,
    id: u32,
    callback: impl Fn(&Message<F, L>) + Send + Sync + 'static,
    fields: F,
) -> Message<F, L>
where
    F: FieldList,
    L: MessageLogger,
{
    Message::with_logger(logger, id, fields).with_callback(callback)
}

/// Extends the layout of `other`: the new message holds copies of the
/// fields of `other` (values and conditions) followed by `fields`, and
/// shares its logger.
///
/// ```rust
/// # use bitmsg::{Field, Message, make_msg_cat};
/// type Head = Field<u8, 4, 1>;
/// type Body = Field<u16, 12, 2>;
///
/// let head = Message::new(1, (Head::any(),));
/// let mut full = make_msg_cat(2, |_| {}, &head, (Body::any(),));
/// assert!(full.unmarshal(&[0x84, 0x0A], 0));
/// assert_eq!(full.value_of::<Body, _>(), 0x0A8);
/// ```
#[inline]
pub fn make_msg_cat<F, L, R>(
    id: u32,
    callback: impl Fn(&Message<F::Output, L>) + Send + Sync + 'static,
    other: &Message<F, L>,
    fields: R,
) -> Message<F::Output, L>
where
    F: FieldList + Concat<R> + Clone,
    L: MessageLogger + Clone,
{
    make_msg_with_log(
        other.logger().clone(),
        id,
        callback,
        other.fields().clone().concat(fields),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use hex_literal::hex;

    use crate::{
        Field,
        bits::Msb0,
        tests::{Event, RecordingLogger},
    };

    use super::*;

    type A = Field<u8, 4, 1>;
    type B = Field<u16, 12, 2>;
    type C = Field<u8, 3, 3, Msb0>;
    type D = Field<u8, 5, 4, Msb0>;

    #[test]
    fn make_msg_fires_callback() {
        let seen = Arc::new(AtomicU32::new(0));
        let store = seen.clone();
        let mut msg = make_msg(
            5,
            move |msg| store.store(msg.value_of::<B, _>().into(), Ordering::Relaxed),
            (A::any(), B::any()),
        );
        assert!(msg.unmarshal(&hex!("84 0A"), 0));
        assert_eq!(seen.load(Ordering::Relaxed), 0x0A8);
    }

    #[test]
    fn make_msg_with_log_reports() {
        let logger = Arc::new(RecordingLogger::default());
        let mut msg = make_msg_with_log(logger.clone(), 5, |_| {}, (A::between(0, 2),));
        assert!(!msg.unmarshal(&hex!("03"), 0));
        assert_eq!(
            logger.events(),
            [
                Event::Start(5),
                Event::End(5),
                Event::Condition(1),
                Event::Unmarshal(1),
            ]
        );
    }

    #[test]
    fn cat_appends_fields() {
        let head = Message::new(1, (A::any(), B::any()));
        let full = make_msg_cat(2, |_| {}, &head, (C::any(), D::any()));
        assert_eq!(full.id(), 2);
        assert_eq!(
            Message::<(A, B, C, D)>::N_FIELDS,
            Message::<(A, B)>::N_FIELDS + 2
        );
        assert_eq!(Message::<(A, B, C, D)>::N_BITS, 24);
        let _: &Message<(A, B, C, D)> = &full;
    }

    #[test]
    fn cat_decodes_like_its_parts() {
        let bytes = hex!("84 0A B3");

        let mut head = Message::new(1, (A::any(), B::any()));
        let mut tail = Message::new(3, (C::any(), D::any()));
        let mut full = make_msg_cat(2, |_| {}, &head, (C::any(), D::any()));

        assert!(head.unmarshal(&bytes, 0));
        assert!(tail.unmarshal(&bytes, Message::<(A, B)>::N_BITS));
        assert!(full.unmarshal(&bytes, 0));

        assert_eq!(full.value_of::<A, _>(), head.value_of::<A, _>());
        assert_eq!(full.value_of::<B, _>(), head.value_of::<B, _>());
        assert_eq!(full.value_of::<C, _>(), tail.value_of::<C, _>());
        assert_eq!(full.value_of::<D, _>(), tail.value_of::<D, _>());
        assert_eq!(full.value_of::<C, _>(), 0b101);
        assert_eq!(full.value_of::<D, _>(), 0b10011);
    }

    #[test]
    fn cat_keeps_conditions() {
        let head = Message::new(1, (A::between(0, 2),));
        let mut full = make_msg_cat(2, |_| {}, &head, (B::any(),));
        assert!(!full.unmarshal(&hex!("84 0A"), 0));
        assert!(full.unmarshal(&hex!("82 0A"), 0));
    }

    #[test]
    fn cat_shares_logger() {
        let logger = Arc::new(RecordingLogger::default());
        let head = Message::with_logger(logger.clone(), 1, (A::any(),));
        let mut full = make_msg_cat(2, |_| {}, &head, (B::any(),));
        assert!(full.unmarshal(&hex!("84 0A"), 0));
        assert_eq!(logger.events(), [Event::Start(2), Event::End(2)]);
    }
}
