//! Low-level byte codec primitives (C1) and the buffered transport (C3).

mod buf;
mod buf_mut;
mod stream;

pub(crate) use buf::Buf;
pub(crate) use buf_mut::BufMut;
pub(crate) use stream::BufStream;
