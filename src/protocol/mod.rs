//! Protocol Layer: Flat Binary Encoding
//!
//! Layout:
//! ┌──────────────────────────────────────────────────────┐
//! │ header_count (u8, 0-63)                              │
//! ├──────────────────────────────────────────────────────┤
//! │ repeated header_count times:                         │
//! │   name_len (u16 BE) │ name │ value_len (u16 BE) │ value │
//! ├──────────────────────────────────────────────────────┤
//! │ Payload (sisa buffer, max 256KB)                     │
//! └──────────────────────────────────────────────────────┘
//!
//! Prinsip desain:
//! - Flat Binary: tidak ada padding, alignment, atau checksum
//! - Payload selalu field terakhir, jadi tidak butuh length field
//! - Zero-Copy decode: payload hasil decode meminjam buffer input

mod decoder;
mod encoder;
mod error;
mod limits;
mod message;


pub use decoder::{decode, decode_with, Decoder};
pub use encoder::{encode, encode_to, encoded_len, Encoder};
pub use error::{DecodeError, EncodeError, HeaderField};
pub use limits::{
    Limits, HEADER_COUNT_SIZE, LENGTH_FIELD_SIZE, MAX_HEADER_COUNT, MAX_HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
pub use message::Message;
