use base64::Engine as _;

pub fn encode_byte_to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode_base64_to_bytes(data_b64: &str) -> anyhow::Result<Vec<u8>> {
    use anyhow::Context;

    base64::engine::general_purpose::STANDARD
        .decode(data_b64.trim())
        .context("Base64 decoding failed")
}

pub fn current_timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_decoding_tolerates_surrounding_whitespace() {
        let encoded = encode_byte_to_base64(b"pixels");
        let decoded = decode_base64_to_bytes(&format!(" {encoded}\n")).expect("decode");
        assert_eq!(decoded, b"pixels");
    }

    #[test]
    fn base64_decoding_rejects_garbage() {
        assert!(decode_base64_to_bytes("not base64 !!").is_err());
    }
}
