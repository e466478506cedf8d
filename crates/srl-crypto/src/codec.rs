use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Errors from value encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// NaN and infinities have no stable encoding.
    #[error("cannot encode non-finite value")]
    NonFinite,

    /// The input is neither a tagged encoding nor plain decimal text.
    #[error("malformed encoded value {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

/// Reversible encoding between a plain number and a tagged string.
///
/// Encoded form: `FHE-` followed by the standard base64 of the number's
/// shortest round-trip decimal text (`42` -> `FHE-NDI=`).
///
/// This is **not** encryption. The transform needs no key and anyone who
/// can read an encoded value can decode it. It only gives the ledger a
/// stable, losslessly invertible representation in the slot a real
/// confidentiality-preserving scheme would occupy.
pub struct ValueCodec;

impl ValueCodec {
    /// Scheme marker prefixed to every encoded value.
    pub const TAG: &'static str = "FHE-";

    /// Encode a finite number. Fails fast on NaN and infinities.
    pub fn encode(value: f64) -> Result<String, CodecError> {
        if !value.is_finite() {
            return Err(CodecError::NonFinite);
        }
        // `Display` for f64 prints the shortest text that parses back to the
        // same bits, and keeps the sign of negative zero.
        let text = value.to_string();
        Ok(format!("{}{}", Self::TAG, STANDARD.encode(text.as_bytes())))
    }

    /// Decode a tagged value, or untagged decimal text written by older
    /// clients.
    pub fn decode(text: &str) -> Result<f64, CodecError> {
        let trimmed = text.trim();
        let plain = match trimmed.strip_prefix(Self::TAG) {
            Some(payload) => {
                let bytes = STANDARD
                    .decode(payload)
                    .map_err(|e| malformed(text, e.to_string()))?;
                String::from_utf8(bytes).map_err(|e| malformed(text, e.to_string()))?
            }
            None => trimmed.to_string(),
        };
        let value: f64 = plain
            .trim()
            .parse()
            .map_err(|e: std::num::ParseFloatError| malformed(text, e.to_string()))?;
        if !value.is_finite() {
            return Err(malformed(text, "decoded value is not finite".into()));
        }
        Ok(value)
    }

    /// Returns `true` if `text` carries the scheme marker.
    pub fn is_tagged(text: &str) -> bool {
        text.trim_start().starts_with(Self::TAG)
    }
}

fn malformed(input: &str, reason: String) -> CodecError {
    CodecError::Malformed {
        input: input.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_integers_like_decimal_text() {
        assert_eq!(ValueCodec::encode(42.0).unwrap(), "FHE-NDI=");
        assert_eq!(ValueCodec::decode("FHE-NDI=").unwrap(), 42.0);
    }

    #[test]
    fn decodes_untagged_text() {
        assert_eq!(ValueCodec::decode("17.5").unwrap(), 17.5);
        assert_eq!(ValueCodec::decode(" -3 ").unwrap(), -3.0);
        assert!(!ValueCodec::is_tagged("17.5"));
    }

    #[test]
    fn rejects_non_finite_input() {
        assert_eq!(ValueCodec::encode(f64::NAN), Err(CodecError::NonFinite));
        assert_eq!(ValueCodec::encode(f64::INFINITY), Err(CodecError::NonFinite));
        assert_eq!(
            ValueCodec::encode(f64::NEG_INFINITY),
            Err(CodecError::NonFinite)
        );
    }

    #[test]
    fn rejects_non_finite_decoded_text() {
        assert!(ValueCodec::decode("inf").is_err());
        assert!(ValueCodec::decode("NaN").is_err());
        let tagged_nan = format!("FHE-{}", STANDARD.encode("NaN"));
        assert!(ValueCodec::decode(&tagged_nan).is_err());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            ValueCodec::decode("FHE-!!!not-base64"),
            Err(CodecError::Malformed { .. })
        ));
        assert!(ValueCodec::decode("forty-two").is_err());
        assert!(ValueCodec::decode("").is_err());
        let tagged_words = format!("FHE-{}", STANDARD.encode("forty-two"));
        assert!(ValueCodec::decode(&tagged_words).is_err());
    }

    #[test]
    fn negative_zero_keeps_its_sign() {
        let decoded = ValueCodec::decode(&ValueCodec::encode(-0.0).unwrap()).unwrap();
        assert_eq!(decoded.to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn extremes_roundtrip() {
        for v in [f64::MAX, f64::MIN, f64::MIN_POSITIVE, 5e-324, 0.1 + 0.2] {
            let decoded = ValueCodec::decode(&ValueCodec::encode(v).unwrap()).unwrap();
            assert_eq!(decoded.to_bits(), v.to_bits());
        }
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            v in prop::num::f64::POSITIVE
                | prop::num::f64::NEGATIVE
                | prop::num::f64::NORMAL
                | prop::num::f64::SUBNORMAL
                | prop::num::f64::ZERO
        ) {
            let encoded = ValueCodec::encode(v).unwrap();
            prop_assert!(ValueCodec::is_tagged(&encoded));
            let decoded = ValueCodec::decode(&encoded).unwrap();
            prop_assert_eq!(decoded.to_bits(), v.to_bits());
        }
    }
}
