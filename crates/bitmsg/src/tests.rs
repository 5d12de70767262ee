use std::sync::Mutex;

use crate::{BitField, BitMessage, MessageLogger, bits::BitOrdering};

#[track_caller]
pub fn assert_marshal_unmarshal_eq<F>(field: F)
where
    F: BitField + Default,
{
    let bytes = field.marshal();
    assert_eq!(bytes.len(), F::BYTES, "marshalled length");

    let padding = F::BYTES * 8 - F::BITS;
    if padding > 0 {
        assert_eq!(
            <F::Order as BitOrdering>::read_raw(&bytes, F::BITS, padding),
            0,
            "unused bits must be zero"
        );
    }

    let mut got = F::default();
    got.unmarshal(&bytes, 0);
    assert_eq!(got.value(), field.value());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start(u32),
    End(u32),
    BitSize { got: usize, expected: usize },
    Condition(u32),
    Unmarshal(u32),
}

/// Keeps every event in order of arrival
#[derive(Debug, Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<Event>>,
}

impl RecordingLogger {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl MessageLogger for RecordingLogger {
    fn on_unmarshal_start(&self, msg: &dyn BitMessage) {
        self.push(Event::Start(msg.id()));
    }

    fn on_unmarshal_end(&self, msg: &dyn BitMessage) {
        self.push(Event::End(msg.id()));
    }

    fn on_error_bit_size(&self, _msg: &dyn BitMessage, got: usize, expected: usize) {
        self.push(Event::BitSize { got, expected });
    }

    fn on_error_condition(&self, _msg: &dyn BitMessage, field_id: u32) {
        self.push(Event::Condition(field_id));
    }

    fn on_error_unmarshal(&self, _msg: &dyn BitMessage, field_id: u32) {
        self.push(Event::Unmarshal(field_id));
    }
}
