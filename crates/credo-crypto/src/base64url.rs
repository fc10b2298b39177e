use base64ct::{Base64UrlUnpadded, Encoding};

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64url decode a string to bytes.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64UrlUnpadded::decode_vec(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"credential envelope";
        assert_eq!(base64url_decode(&base64url_encode(data)).unwrap(), data);
    }

    #[test]
    fn unpadded_and_url_safe() {
        // Bytes that produce + / = in standard base64
        let encoded = base64url_encode(&[0xfb, 0xff, 0xfe, 0x01]);
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(base64url_decode("not base64!").is_err());
    }
}
