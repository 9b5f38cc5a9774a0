//! flatmsg - Flat Binary Message Codec
//!
//! Satu pesan = header string key/value + payload opaque, di-encode
//! ke satu buffer datar tanpa length prefix keseluruhan.
//!
//! ```
//! use flatmsg::protocol::{decode, encode, Message};
//!
//! let msg = Message::new()
//!     .with_header("content-type", "application/octet-stream")
//!     .with_payload(vec![0xFF, 0x00]);
//!
//! let bytes = encode(&msg).unwrap();
//! let decoded = decode(&bytes).unwrap();
//! assert_eq!(decoded, msg);
//! ```

pub mod protocol;

pub use protocol::{decode, encode, DecodeError, EncodeError, Limits, Message};
