//! Error types untuk encode dan decode.

use std::fmt;

use thiserror::Error;

/// Panjang maksimum nama header yang ditampilkan di pesan error.
const MAX_NAME_DISPLAY_LEN: usize = 64;

/// Bagian header yang melanggar batas ukuran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Name,
    Value,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Value => f.write_str("value"),
        }
    }
}

/// Pelanggaran batas saat encode. Semuanya kesalahan caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Jumlah header melebihi batas
    #[error("header count {count} exceeds maximum of {max}")]
    HeaderCountExceeded { count: usize, max: usize },

    /// Name atau value header melebihi batas bytes
    #[error("header {field} of {name:?} is {len} bytes, exceeds maximum of {max}")]
    HeaderSizeExceeded {
        /// Nama header (dipotong untuk display)
        name: String,
        field: HeaderField,
        len: usize,
        max: usize,
    },

    /// Payload melebihi batas
    #[error("payload of {len} bytes exceeds maximum of {max}")]
    PayloadSizeExceeded { len: usize, max: usize },
}

impl EncodeError {
    pub(crate) fn header_size(name: &str, field: HeaderField, len: usize, max: usize) -> Self {
        Self::HeaderSizeExceeded {
            name: truncate_name(name),
            field,
            len,
            max,
        }
    }
}

/// Input decode tidak valid. Satu kind saja; `offset` dan `reason`
/// hanya konteks diagnostik.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed input at offset {offset}: {reason}")]
    MalformedInput { offset: usize, reason: &'static str },
}

impl DecodeError {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        Self::MalformedInput { offset, reason }
    }

    /// Offset byte tempat decode berhenti
    pub fn offset(&self) -> usize {
        match self {
            Self::MalformedInput { offset, .. } => *offset,
        }
    }
}

fn truncate_name(name: &str) -> String {
    if name.len() <= MAX_NAME_DISPLAY_LEN {
        return name.to_string();
    }
    // Potong di char boundary
    let mut end = MAX_NAME_DISPLAY_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &name[..end])
}
