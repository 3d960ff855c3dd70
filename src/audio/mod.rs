pub mod transport;

pub use transport::decode_base64_samples;

/// Size of the canonical RIFF/WAVE header produced by [`encode_wav`].
pub const WAV_HEADER_LEN: usize = 44;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Little-endian byte writer over a pre-sized buffer.
///
/// Keeps offset bookkeeping out of the header layout code; each write
/// appends its field and nothing else.
struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    fn write_tag(&mut self, tag: &[u8; 4]) {
        self.buf.extend_from_slice(tag);
    }

    fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_i16_le(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Encode signed 16-bit mono PCM samples as a self-contained WAV buffer.
///
/// The output is the canonical 44-byte RIFF/WAVE header followed by the
/// samples in little-endian order. An empty slice yields a header-only
/// file with a zero-length data chunk, which decoders accept.
///
/// Downstream players parse this layout directly, so every field is
/// written at its fixed offset with the exact value the format mandates.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidArgument(
            "sample rate must be positive".to_string(),
        ));
    }

    // ByteRate is a u32 field; rates above u32::MAX / 2 cannot be encoded.
    let byte_rate = sample_rate.checked_mul(2).ok_or_else(|| {
        AudioError::InvalidArgument(format!("sample rate {} too large to encode", sample_rate))
    })?;

    let data_len = u32::try_from(samples.len() * 2)
        .ok()
        .filter(|&n| n <= u32::MAX - 36)
        .ok_or_else(|| {
            AudioError::InvalidArgument(format!(
                "PCM payload of {} samples too large for a WAV container",
                samples.len()
            ))
        })?;

    let mut w = ByteWriter::with_capacity(WAV_HEADER_LEN + samples.len() * 2);

    // RIFF chunk descriptor
    w.write_tag(b"RIFF");
    w.write_u32_le(36 + data_len);
    w.write_tag(b"WAVE");

    // fmt subchunk: linear PCM, mono, 16-bit
    w.write_tag(b"fmt ");
    w.write_u32_le(16);
    w.write_u16_le(1);
    w.write_u16_le(1);
    w.write_u32_le(sample_rate);
    w.write_u32_le(byte_rate);
    w.write_u16_le(2);
    w.write_u16_le(16);

    // data subchunk
    w.write_tag(b"data");
    w.write_u32_le(data_len);

    for &sample in samples {
        w.write_i16_le(sample);
    }

    Ok(w.into_inner())
}

/// Validate a sample rate arriving from an untrusted transport integer.
///
/// Upstream APIs report the rate as a bare JSON number, so zero, negative
/// and absurdly large values all have to be rejected before encoding.
pub fn checked_sample_rate(rate: i64) -> Result<u32, AudioError> {
    if rate <= 0 {
        return Err(AudioError::InvalidArgument(format!(
            "sample rate must be positive, got {}",
            rate
        )));
    }

    u32::try_from(rate).map_err(|_| {
        AudioError::InvalidArgument(format!("sample rate {} out of range", rate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn u32_at(buf: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(buf: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn header_layout() {
        let samples = [0i16, 1000, -1000, i16::MAX, i16::MIN];
        let wav = encode_wav(&samples, 24000).unwrap();

        assert_eq!(wav.len(), WAV_HEADER_LEN + samples.len() * 2);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 10);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1); // linear PCM
        assert_eq!(u16_at(&wav, 22), 1); // mono
        assert_eq!(u32_at(&wav, 24), 24000);
        assert_eq!(u32_at(&wav, 28), 48000);
        assert_eq!(u16_at(&wav, 32), 2);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 10);
    }

    #[test]
    fn empty_input_is_header_only() {
        let wav = encode_wav(&[], 24000).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN);
        assert_eq!(u32_at(&wav, 4), 36); // ChunkSize
        assert_eq!(u32_at(&wav, 40), 0); // Subchunk2Size
    }

    #[test]
    fn round_trips_through_independent_decoder() {
        let samples: Vec<i16> = (0..317).map(|i| (i * 97 - 15000) as i16).collect();
        let wav = encode_wav(&samples, 22050).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn sample_rate_propagates() {
        for rate in [8000u32, 16000, 24000, 44100, 48000] {
            let wav = encode_wav(&[1, 2, 3], rate).unwrap();
            assert_eq!(u32_at(&wav, 24), rate);
            assert_eq!(u32_at(&wav, 28), rate * 2);
        }
    }

    #[test]
    fn oversized_sample_rate_rejected_not_overflowed() {
        // Any rate a transport integer can carry must either encode or
        // error; it must never overflow the ByteRate multiply.
        let rate = checked_sample_rate(u32::MAX as i64).unwrap();
        let err = encode_wav(&[], rate).unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument(_)));

        // Largest rate whose byte rate still fits in the header field.
        let boundary = u32::MAX / 2;
        let wav = encode_wav(&[], boundary).unwrap();
        assert_eq!(&wav[24..28], &boundary.to_le_bytes());
        assert_eq!(&wav[28..32], &(boundary * 2).to_le_bytes());

        assert!(matches!(
            encode_wav(&[], boundary + 1),
            Err(AudioError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_sample_rate_rejected() {
        let err = encode_wav(&[1, 2], 0).unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument(_)));
    }

    #[test]
    fn negative_transport_rate_rejected() {
        assert!(matches!(
            checked_sample_rate(-5),
            Err(AudioError::InvalidArgument(_))
        ));
        assert!(matches!(
            checked_sample_rate(0),
            Err(AudioError::InvalidArgument(_))
        ));
        assert!(matches!(
            checked_sample_rate(1 << 40),
            Err(AudioError::InvalidArgument(_))
        ));
        assert_eq!(checked_sample_rate(24000).unwrap(), 24000);
    }

    #[test]
    fn samples_written_little_endian() {
        let wav = encode_wav(&[0x0102, -2], 8000).unwrap();
        assert_eq!(&wav[44..48], &[0x02, 0x01, 0xFE, 0xFF]);
    }
}
