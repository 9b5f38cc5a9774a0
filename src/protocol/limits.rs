//! Wire format constants dan batas validasi.

/// Ukuran field header_count di wire
pub const HEADER_COUNT_SIZE: usize = 1;
/// Ukuran field panjang name/value di wire (u16 BE)
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Maksimum jumlah header per pesan
pub const MAX_HEADER_COUNT: usize = 63;
/// Maksimum panjang name atau value header, dalam bytes (bukan karakter)
pub const MAX_HEADER_SIZE: usize = 1023;
/// Maksimum ukuran payload (256KB)
pub const MAX_PAYLOAD_SIZE: usize = 256 * 1024;

/// Batas yang dipakai encoder dan decoder.
///
/// Default sama dengan konstanta wire. Batas hanya bisa diperketat:
/// nilai di atas konstanta wire di-clamp, sehingga encoder tidak pernah
/// menghasilkan stream yang ditolak decoder lain dengan limit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_header_count: usize,
    max_header_size: usize,
    max_payload_size: usize,
}

impl Limits {
    /// Membuat limits, di-clamp ke maksimum wire format
    pub const fn new(
        max_header_count: usize,
        max_header_size: usize,
        max_payload_size: usize,
    ) -> Self {
        Self {
            max_header_count: min(max_header_count, MAX_HEADER_COUNT),
            max_header_size: min(max_header_size, MAX_HEADER_SIZE),
            max_payload_size: min(max_payload_size, MAX_PAYLOAD_SIZE),
        }
    }

    pub const fn max_header_count(&self) -> usize {
        self.max_header_count
    }

    /// Batas name/value header, dalam bytes
    pub const fn max_header_size(&self) -> usize {
        self.max_header_size
    }

    pub const fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(MAX_HEADER_COUNT, MAX_HEADER_SIZE, MAX_PAYLOAD_SIZE)
    }
}

const fn min(a: usize, b: usize) -> usize {
    if a < b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_wire_constants() {
        let limits = Limits::default();
        assert_eq!(limits.max_header_count, 63);
        assert_eq!(limits.max_header_size, 1023);
        assert_eq!(limits.max_payload_size, 262_144);
    }

    #[test]
    fn test_limits_are_clamped() {
        let limits = Limits::new(255, 65_535, usize::MAX);
        assert_eq!(limits, Limits::default());

        let tight = Limits::new(4, 16, 128);
        assert_eq!(tight.max_header_count, 4);
        assert_eq!(tight.max_header_size, 16);
        assert_eq!(tight.max_payload_size, 128);
    }

    #[test]
    fn test_header_count_fits_in_one_byte() {
        assert!(MAX_HEADER_COUNT <= u8::MAX as usize);
        assert!(MAX_HEADER_SIZE <= u16::MAX as usize);
    }
}
