//! Zero-copy decoder: flat bytes -> Message
//!
//! Semua pembacaan lewat cursor yang bounds-checked. Panjang yang
//! diklaim stream tidak pernah dipercaya melebihi isi buffer.

use std::borrow::Cow;
use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, trace};

use super::error::{DecodeError, HeaderField};
use super::limits::{Limits, HEADER_COUNT_SIZE, LENGTH_FIELD_SIZE};
use super::message::Message;

/// Cursor di atas buffer input
pub struct Decoder<'a> {
    buffer: &'a [u8],
    read_pos: usize,
}

impl<'a> Decoder<'a> {
    /// Membuat decoder dari buffer
    #[inline(always)]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            read_pos: 0,
        }
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let bytes = self.read_bytes(1, "unexpected end of input")?;
        Ok(bytes[0])
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(LENGTH_FIELD_SIZE, "truncated length field")?;
        Ok(BigEndian::read_u16(bytes))
    }

    /// Ambil `len` bytes (zero-copy). `reason` dipakai jika buffer kurang.
    #[inline(always)]
    pub fn read_bytes(
        &mut self,
        len: usize,
        reason: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::malformed(self.read_pos, reason));
        }
        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.buffer[start..self.read_pos])
    }

    /// Sisa buffer dari posisi sekarang sampai akhir
    #[inline(always)]
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buffer[self.read_pos..];
        self.read_pos = self.buffer.len();
        rest
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// Remaining bytes
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read_pos)
    }

    /// Decode satu pesan penuh dari posisi cursor
    pub fn decode_message(&mut self, limits: &Limits) -> Result<Message<'a>, DecodeError> {
        let count = self.read_u8()? as usize;
        if count > limits.max_header_count() {
            // header_count selalu di offset 0
            return Err(DecodeError::malformed(0, "header count exceeds maximum"));
        }

        // Setiap header minimal 4 bytes (dua length field)
        let min_needed = count * 2 * LENGTH_FIELD_SIZE;
        if min_needed > self.remaining() {
            return Err(DecodeError::malformed(
                HEADER_COUNT_SIZE,
                "header count exceeds available input",
            ));
        }

        let mut headers = HashMap::with_capacity(count);
        for _ in 0..count {
            let name = self.read_text(limits, HeaderField::Name)?;
            let value = self.read_text(limits, HeaderField::Value)?;
            // Duplikat: yang terakhir menang
            headers.insert(name, value);
        }

        // Semua sisa bytes adalah payload, tanpa cek ukuran
        Ok(Message {
            headers,
            payload: Cow::Borrowed(self.rest()),
        })
    }

    fn read_text(&mut self, limits: &Limits, field: HeaderField) -> Result<String, DecodeError> {
        let field_pos = self.position();
        let len = self.read_u16()? as usize;
        if len > limits.max_header_size() {
            let reason = match field {
                HeaderField::Name => "header name length exceeds maximum",
                HeaderField::Value => "header value length exceeds maximum",
            };
            return Err(DecodeError::malformed(field_pos, reason));
        }

        let data_pos = self.position();
        let past_end = match field {
            HeaderField::Name => "header name runs past end of input",
            HeaderField::Value => "header value runs past end of input",
        };
        let bytes = self.read_bytes(len, past_end)?;

        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(_) => {
                let reason = match field {
                    HeaderField::Name => "header name is not valid UTF-8",
                    HeaderField::Value => "header value is not valid UTF-8",
                };
                Err(DecodeError::malformed(data_pos, reason))
            }
        }
    }
}

/// Decode pesan dengan limits default.
///
/// Payload hasil meminjam `data`; panggil [`Message::into_owned`]
/// jika pesan harus hidup lebih lama dari buffer.
pub fn decode(data: &[u8]) -> Result<Message<'_>, DecodeError> {
    decode_with(data, &Limits::default())
}

/// Decode pesan dengan limits tertentu
pub fn decode_with<'a>(data: &'a [u8], limits: &Limits) -> Result<Message<'a>, DecodeError> {
    let mut decoder = Decoder::new(data);
    match decoder.decode_message(limits) {
        Ok(message) => {
            trace!(
                headers = message.headers.len(),
                payload_len = message.payload.len(),
                input_len = data.len(),
                "decoded message"
            );
            Ok(message)
        }
        Err(err) => {
            debug!(input_len = data.len(), error = %err, "rejecting malformed input");
            Err(err)
        }
    }
}
