//! Serial line protocol input side.
//!
//! Characters arrive at interrupt level and are accumulated into a
//! [`LineBuffer`] owned by a [`SerialInbox`]; the main loop picks up a
//! line only once its `\n` has been seen.

pub mod inbox;
pub mod line_buffer;

pub use inbox::SerialInbox;
pub use line_buffer::LineBuffer;
