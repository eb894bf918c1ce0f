//! Text-encoding detection for source files
//!
//! Files arrive in whatever encoding the uploader's tooling produced, so
//! the leading bytes are sniffed before decoding instead of assuming UTF-8.

/// How many leading bytes feed the detector.
const SAMPLE_BYTES: usize = 100_000;

/// Decode `bytes` using a detected encoding.
///
/// Detection samples at most [`SAMPLE_BYTES`] leading bytes. A decode that
/// produces replacement characters is reported as an error rather than
/// silently accepted; the caller maps it to a parse failure.
pub(crate) fn decode(bytes: &[u8]) -> std::result::Result<String, String> {
    let sample = &bytes[..bytes.len().min(SAMPLE_BYTES)];
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(sample, bytes.len() <= SAMPLE_BYTES);
    let encoding = detector.guess(None, true);

    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(format!("content is not valid {}", encoding.name()));
    }
    Ok(decoded.into_owned())
}
