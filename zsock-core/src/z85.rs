//! Z85 text encoding (ZeroMQ RFC 32).
//!
//! Z85 maps every 4 bytes to 5 printable characters. CURVE keys are exchanged
//! in this form: a 32-byte key is a 40-character string.

use thiserror::Error;

const ALPHABET: &[u8; 85] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#";

/// Z85 encoding/decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Z85Error {
    /// Input length is not a multiple of 4 (encode) or 5 (decode)
    #[error("invalid length {len}: must be a multiple of {multiple}")]
    InvalidLength { len: usize, multiple: usize },

    /// A character outside the Z85 alphabet
    #[error("invalid Z85 character {0:?}")]
    InvalidCharacter(char),

    /// A 5-character group that does not fit in 32 bits
    #[error("Z85 group out of range at offset {0}")]
    Overflow(usize),
}

/// Encode bytes as Z85.
///
/// # Examples
///
/// ```
/// use zsock_core::z85;
///
/// let text = z85::encode(&[0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B]).unwrap();
/// assert_eq!(text, "HelloWorld");
/// ```
pub fn encode(data: &[u8]) -> Result<String, Z85Error> {
    if data.len() % 4 != 0 {
        return Err(Z85Error::InvalidLength {
            len: data.len(),
            multiple: 4,
        });
    }

    let mut out = String::with_capacity(data.len() / 4 * 5);
    for chunk in data.chunks_exact(4) {
        let mut value = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let mut group = [0u8; 5];
        for slot in group.iter_mut().rev() {
            *slot = ALPHABET[(value % 85) as usize];
            value /= 85;
        }
        out.extend(group.iter().map(|&b| b as char));
    }
    Ok(out)
}

/// Decode a Z85 string.
pub fn decode(text: &str) -> Result<Vec<u8>, Z85Error> {
    let bytes = text.as_bytes();
    if bytes.len() % 5 != 0 {
        return Err(Z85Error::InvalidLength {
            len: bytes.len(),
            multiple: 5,
        });
    }

    let mut out = Vec::with_capacity(bytes.len() / 5 * 4);
    for (index, group) in bytes.chunks_exact(5).enumerate() {
        let mut value: u64 = 0;
        for &b in group {
            let digit = ALPHABET
                .iter()
                .position(|&a| a == b)
                .ok_or(Z85Error::InvalidCharacter(b as char))?;
            value = value * 85 + digit as u64;
        }
        let value = u32::try_from(value).map_err(|_| Z85Error::Overflow(index * 5))?;
        out.extend_from_slice(&value.to_be_bytes());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc_vector() {
        let data = [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B];
        assert_eq!(encode(&data).unwrap(), "HelloWorld");
        assert_eq!(decode("HelloWorld").unwrap(), data);
    }

    #[test]
    fn test_key_sized_input() {
        let key = [0xABu8; 32];
        let text = encode(&key).unwrap();
        assert_eq!(text.len(), 40);
        assert_eq!(decode(&text).unwrap(), key);
    }

    #[test]
    fn test_invalid_lengths() {
        assert_eq!(
            encode(&[1, 2, 3]),
            Err(Z85Error::InvalidLength { len: 3, multiple: 4 })
        );
        assert_eq!(
            decode("Hello!"),
            Err(Z85Error::InvalidLength { len: 6, multiple: 5 })
        );
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(decode("Hell~"), Err(Z85Error::InvalidCharacter('~')));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(decode("#####"), Err(Z85Error::Overflow(0)));
    }
}
