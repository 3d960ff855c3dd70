use base64::{engine::general_purpose, Engine as _};

use super::AudioError;

/// Decode a base64 PCM payload into signed 16-bit little-endian samples.
///
/// Upstream APIs are inconsistent about the alphabet and padding they
/// emit, so the input is normalized first: URL-safe characters are mapped
/// back to the standard alphabet and `=` padding is restored to a
/// multiple of four characters.
pub fn decode_base64_samples(payload: &str) -> Result<Vec<i16>, AudioError> {
    let bytes = decode_base64(payload)?;
    bytes_to_samples(&bytes)
}

/// Normalize and decode a base64 payload to raw bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, AudioError> {
    let mut normalized: String = payload
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    general_purpose::STANDARD
        .decode(&normalized)
        .map_err(|e| AudioError::MalformedInput(format!("base64 decode failed: {}", e)))
}

/// Reinterpret consecutive byte pairs as little-endian i16 samples.
pub fn bytes_to_samples(bytes: &[u8]) -> Result<Vec<i16>, AudioError> {
    if bytes.len() % 2 != 0 {
        return Err(AudioError::MalformedInput(format!(
            "PCM payload has odd byte length {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}
