//! Server-sent event frames.

use bytes::Bytes;

/// A named event pushed down an open stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub name: String,
    pub data: String,
}

impl SseEvent {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Encode as a `text/event-stream` frame.
    ///
    /// Every line of `data` gets its own `data:` field so embedded newlines
    /// cannot terminate the frame early.
    pub fn to_frame(&self) -> Bytes {
        let mut frame = String::with_capacity(self.name.len() + self.data.len() + 16);
        frame.push_str("event: ");
        frame.push_str(&self.name);
        frame.push('\n');
        for line in self.data.split('\n') {
            frame.push_str("data: ");
            frame.push_str(line.strip_suffix('\r').unwrap_or(line));
            frame.push('\n');
        }
        frame.push('\n');
        Bytes::from(frame)
    }

    /// Comment frame sent on idle streams so proxies keep the connection open.
    pub fn keep_alive_frame() -> Bytes {
        Bytes::from_static(b": keep-alive\n\n")
    }
}
