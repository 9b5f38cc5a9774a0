//! Logical message: string headers + opaque payload.

use std::borrow::Cow;
use std::collections::HashMap;

/// Pesan logis yang di-encode ke wire format flat.
///
/// Urutan iterasi header tidak dijamin (`HashMap`). Batas jumlah dan
/// ukuran hanya dicek saat encode, jadi `Message` boleh sementara
/// berisi data di luar batas.
///
/// Payload hasil `decode` meminjam buffer input (zero-copy), sehingga
/// `Message<'a>` tidak boleh hidup lebih lama dari buffer tersebut.
/// Gunakan [`Message::into_owned`] untuk melepas pinjaman.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message<'a> {
    pub headers: HashMap<String, String>,
    pub payload: Cow<'a, [u8]>,
}

impl<'a> Message<'a> {
    /// Pesan kosong: tanpa header, payload kosong
    pub fn new() -> Self {
        Self::default()
    }

    /// Menambah header (builder). Nama yang sama menimpa nilai lama.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Set payload (builder)
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Cow<'a, [u8]>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Insert header, mengembalikan nilai lama jika ada
    pub fn insert_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.headers.insert(name.into(), value.into())
    }

    pub fn set_payload(&mut self, payload: impl Into<Cow<'a, [u8]>>) {
        self.payload = payload.into();
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// True jika payload masih meminjam buffer decode
    pub fn is_borrowed(&self) -> bool {
        matches!(self.payload, Cow::Borrowed(_))
    }

    /// Copy payload sehingga pesan lepas dari buffer input
    pub fn into_owned(self) -> Message<'static> {
        Message {
            headers: self.headers,
            payload: Cow::Owned(self.payload.into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let msg = Message::new();
        assert_eq!(msg.header_count(), 0);
        assert!(msg.payload().is_empty());
        assert!(!msg.is_borrowed());
    }

    #[test]
    fn test_builder_overwrites_duplicate_name() {
        let msg = Message::new()
            .with_header("k", "first")
            .with_header("k", "second")
            .with_payload(b"body".as_slice());

        assert_eq!(msg.header_count(), 1);
        assert_eq!(msg.header("k"), Some("second"));
        assert_eq!(msg.payload(), b"body");
        assert!(msg.is_borrowed());
    }

    #[test]
    fn test_owned_and_borrowed_payload_compare_by_bytes() {
        let data = vec![1u8, 2, 3];
        let borrowed = Message::new().with_payload(data.as_slice());
        let owned = Message::new().with_payload(vec![1u8, 2, 3]);
        assert_eq!(borrowed, owned);

        let detached = borrowed.into_owned();
        assert!(!detached.is_borrowed());
        assert_eq!(detached, owned);
    }
}
