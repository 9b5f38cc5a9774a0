//! Encoder: Message -> flat bytes
//!
//! Validasi dilakukan penuh sebelum satu byte pun ditulis, jadi tidak
//! pernah ada buffer setengah jadi saat error.

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, trace};

use super::error::{EncodeError, HeaderField};
use super::limits::{Limits, HEADER_COUNT_SIZE, LENGTH_FIELD_SIZE};
use super::message::Message;

/// Encoder dengan scratch buffer yang bisa di-reuse.
///
/// Buffer tumbuh sesuai kebutuhan lalu dipakai ulang, jadi encode
/// berulang tidak alokasi lagi setelah pesan terbesar. Setiap instance
/// punya buffer sendiri; jangan share satu encoder antar thread.
pub struct Encoder {
    buffer: Vec<u8>,
    limits: Limits,
}

impl Encoder {
    /// Membuat encoder dengan kapasitas awal tertentu
    pub fn new(capacity: usize) -> Self {
        Self::with_limits(capacity, Limits::default())
    }

    pub fn with_limits(capacity: usize, limits: Limits) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            limits,
        }
    }

    /// Reset encoder untuk reuse
    #[inline(always)]
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Encode pesan ke buffer internal, menggantikan isi sebelumnya.
    ///
    /// Returns slice ke encoded data. Saat error buffer dibiarkan kosong.
    pub fn encode(&mut self, message: &Message<'_>) -> Result<&[u8], EncodeError> {
        self.buffer.clear();
        encode_with(message, &self.limits, &mut self.buffer)?;
        Ok(&self.buffer)
    }

    /// Encoded data terakhir
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Encode pesan ke buffer baru dengan ukuran pas
pub fn encode(message: &Message<'_>) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_with(message, &Limits::default(), &mut buf)?;
    Ok(buf)
}

/// Encode pesan, append ke `buf`. Saat error `buf` tidak berubah.
pub fn encode_to(message: &Message<'_>, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    encode_with(message, &Limits::default(), buf)
}

/// Ukuran encoded pesan dalam bytes, tanpa validasi batas
pub fn encoded_len(message: &Message<'_>) -> usize {
    HEADER_COUNT_SIZE
        + message
            .headers
            .iter()
            .map(|(name, value)| 2 * LENGTH_FIELD_SIZE + name.len() + value.len())
            .sum::<usize>()
        + message.payload.len()
}

fn encode_with(
    message: &Message<'_>,
    limits: &Limits,
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    validate(message, limits)?;

    let total_size = encoded_len(message);
    let start = buf.len();
    buf.resize(start + total_size, 0);
    let out = &mut buf[start..];

    // Header count, sudah dijamin <= 63 oleh validate
    out[0] = message.headers.len() as u8;
    let mut pos = HEADER_COUNT_SIZE;

    for (name, value) in &message.headers {
        pos = write_field(out, pos, name.as_bytes());
        pos = write_field(out, pos, value.as_bytes());
    }

    // Payload selalu terakhir, tanpa length field
    out[pos..].copy_from_slice(&message.payload);

    trace!(
        headers = message.headers.len(),
        payload_len = message.payload.len(),
        total_size,
        "encoded message"
    );
    Ok(())
}

/// Tulis `len (u16 BE) + bytes`, return posisi berikutnya
#[inline(always)]
fn write_field(out: &mut [u8], pos: usize, bytes: &[u8]) -> usize {
    BigEndian::write_u16(&mut out[pos..pos + LENGTH_FIELD_SIZE], bytes.len() as u16);
    let data_start = pos + LENGTH_FIELD_SIZE;
    let data_end = data_start + bytes.len();
    out[data_start..data_end].copy_from_slice(bytes);
    data_end
}

/// Cek batas dengan urutan: jumlah header, ukuran header, ukuran payload.
/// Ukuran header diukur dalam bytes UTF-8, bukan jumlah karakter.
fn validate(message: &Message<'_>, limits: &Limits) -> Result<(), EncodeError> {
    let count = message.headers.len();
    if count > limits.max_header_count() {
        debug!(count, max = limits.max_header_count(), "rejecting message: too many headers");
        return Err(EncodeError::HeaderCountExceeded {
            count,
            max: limits.max_header_count(),
        });
    }

    let max = limits.max_header_size();
    for (name, value) in &message.headers {
        let oversized = if name.len() > max {
            Some((HeaderField::Name, name.len()))
        } else if value.len() > max {
            Some((HeaderField::Value, value.len()))
        } else {
            None
        };

        if let Some((field, len)) = oversized {
            debug!(%field, len, max, "rejecting message: header too large");
            return Err(EncodeError::header_size(name, field, len, max));
        }
    }

    let len = message.payload.len();
    if len > limits.max_payload_size() {
        debug!(len, max = limits.max_payload_size(), "rejecting message: payload too large");
        return Err(EncodeError::PayloadSizeExceeded {
            len,
            max: limits.max_payload_size(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{MAX_HEADER_COUNT, MAX_HEADER_SIZE, MAX_PAYLOAD_SIZE};

    #[test]
    fn test_encode_empty_message() {
        let bytes = encode(&Message::new()).unwrap();
        assert_eq!(bytes, vec![0u8]);
    }

    #[test]
    fn test_encode_single_header_layout() {
        let msg = Message::new()
            .with_header("a", "1")
            .with_payload(vec![0xFF, 0x00]);

        let bytes = encode(&msg).unwrap();
        assert_eq!(bytes, vec![0x01, 0x00, 0x01, b'a', 0x00, 0x01, b'1', 0xFF, 0x00]);
        assert_eq!(bytes.len(), encoded_len(&msg));
    }

    #[test]
    fn test_header_count_checked_before_sizes() {
        let mut msg = Message::new();
        for i in 0..=MAX_HEADER_COUNT {
            msg.insert_header(format!("h{i}"), "x".repeat(MAX_HEADER_SIZE + 1));
        }
        msg.set_payload(vec![0u8; MAX_PAYLOAD_SIZE + 1]);

        let err = encode(&msg).unwrap_err();
        assert_eq!(err, EncodeError::HeaderCountExceeded { count: 64, max: 63 });
    }

    #[test]
    fn test_header_size_checked_before_payload() {
        let msg = Message::new()
            .with_header("big", "v".repeat(MAX_HEADER_SIZE + 1))
            .with_payload(vec![0u8; MAX_PAYLOAD_SIZE + 1]);

        match encode(&msg).unwrap_err() {
            EncodeError::HeaderSizeExceeded { name, field, len, max } => {
                assert_eq!(name, "big");
                assert_eq!(field, HeaderField::Value);
                assert_eq!(len, 1024);
                assert_eq!(max, 1023);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_encode_to_leaves_buffer_untouched_on_error() {
        let mut buf = vec![0xAA, 0xBB];
        let msg = Message::new().with_payload(vec![0u8; MAX_PAYLOAD_SIZE + 1]);

        assert!(encode_to(&msg, &mut buf).is_err());
        assert_eq!(buf, vec![0xAA, 0xBB]);

        encode_to(&Message::new(), &mut buf).unwrap();
        assert_eq!(buf, vec![0xAA, 0xBB, 0x00]);
    }

    #[test]
    fn test_encoder_reuse() {
        let mut encoder = Encoder::new(64);

        let first = Message::new().with_header("seq", "1").with_payload(b"First".as_slice());
        encoder.encode(&first).unwrap();

        let second = Message::new().with_payload(b"Second".as_slice());
        let bytes = encoder.encode(&second).unwrap();

        // Isi sebelumnya diganti, bukan di-append
        assert_eq!(bytes, b"\x00Second");
        assert_eq!(encoder.as_bytes(), b"\x00Second");

        encoder.reset();
        assert!(encoder.as_bytes().is_empty());
    }

    #[test]
    fn test_encoder_custom_limits() {
        let mut encoder = Encoder::with_limits(0, Limits::new(1, 4, 8));

        let ok = Message::new().with_header("abcd", "wxyz").with_payload(vec![0u8; 8]);
        assert!(encoder.encode(&ok).is_ok());

        let too_many = Message::new().with_header("a", "1").with_header("b", "2");
        assert_eq!(
            encoder.encode(&too_many).unwrap_err(),
            EncodeError::HeaderCountExceeded { count: 2, max: 1 }
        );
        assert!(encoder.as_bytes().is_empty());

        let big_payload = Message::new().with_payload(vec![0u8; 9]);
        assert_eq!(
            encoder.encode(&big_payload).unwrap_err(),
            EncodeError::PayloadSizeExceeded { len: 9, max: 8 }
        );
    }

    #[test]
    fn test_multibyte_measured_in_bytes() {
        // "ü" = 2 bytes UTF-8; 512 karakter = 1024 bytes
        let name = "ü".repeat(512);
        let msg = Message::new().with_header(name, "v");

        match encode(&msg).unwrap_err() {
            EncodeError::HeaderSizeExceeded { field, len, .. } => {
                assert_eq!(field, HeaderField::Name);
                assert_eq!(len, 1024);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
