//! Tests for the chunked base64 codec and data URL helpers.

use mediaref_codec::{
    Base64Codec, Base64Strategy, CHUNK_SIZE, decode_base64, encode_base64, encode_data_url,
    parse_data_url,
};
use mediaref_error::EncodingErrorKind;

fn codecs() -> [Base64Codec; 2] {
    [
        Base64Codec::with_strategy(Base64Strategy::Native),
        Base64Codec::with_strategy(Base64Strategy::Portable),
    ]
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + i / 7) as u8).collect()
}

#[test]
fn test_rfc4648_vectors() {
    let vectors: [(&[u8], &str); 7] = [
        (b"", ""),
        (b"f", "Zg=="),
        (b"fo", "Zm8="),
        (b"foo", "Zm9v"),
        (b"foob", "Zm9vYg=="),
        (b"fooba", "Zm9vYmE="),
        (b"foobar", "Zm9vYmFy"),
    ];

    for codec in codecs() {
        for (plain, encoded) in vectors {
            assert_eq!(codec.encode(plain), encoded, "{:?}", codec.strategy());
            assert_eq!(codec.decode(encoded).unwrap(), plain);
        }
    }
}

#[test]
fn test_round_trip_tail_cases() {
    for codec in codecs() {
        for len in [0, 1, 2, 3, 4, 5] {
            let data = pattern(len);
            assert_eq!(codec.decode(&codec.encode(&data)).unwrap(), data);
        }
    }
}

#[test]
fn test_round_trip_across_chunk_boundaries() {
    for codec in codecs() {
        for len in [CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE + 1, 0x8000 + 2, 100_000] {
            let data = pattern(len);
            let encoded = codec.encode(&data);
            assert_eq!(encoded.len(), len.div_ceil(3) * 4);
            assert_eq!(codec.decode(&encoded).unwrap(), data);
        }
    }
}

#[test]
fn test_strategies_agree() {
    let data = pattern(70_001);
    let [native, portable] = codecs();
    assert_eq!(native.encode(&data), portable.encode(&data));
}

#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..=255).collect();
    let encoded = encode_base64(&data);
    assert!(encoded.contains('+') && encoded.contains('/'));
    assert_eq!(decode_base64(&encoded).unwrap(), data);
}

#[test]
fn test_rejects_bad_length() {
    for codec in codecs() {
        let err = codec.decode("Zm9vY").unwrap_err();
        assert_eq!(err.kind, EncodingErrorKind::InvalidLength(5));
    }
}

#[test]
fn test_rejects_non_alphabet() {
    for codec in codecs() {
        let err = codec.decode("Zm9-").unwrap_err();
        assert_eq!(
            err.kind,
            EncodingErrorKind::InvalidCharacter {
                character: '-',
                offset: 3
            }
        );
        // URL-safe alphabet is not accepted
        assert!(codec.decode("Zm9_").is_err());
        assert!(codec.decode("Zm9v\nYmFy").is_err());
    }
}

#[test]
fn test_rejects_misplaced_padding() {
    for codec in codecs() {
        for input in ["=Zm9", "Zm=v", "Z===", "Zg==Zm9v"] {
            let err = codec.decode(input).unwrap_err();
            assert!(
                matches!(err.kind, EncodingErrorKind::InvalidPadding(_)),
                "{} -> {:?}",
                input,
                err.kind
            );
        }
    }
}

#[test]
fn test_rejects_stray_trailing_bits() {
    for codec in codecs() {
        // "Zh==" decodes to 'f' but sets bits the padding says are unused
        let err = codec.decode("Zh==").unwrap_err();
        assert!(matches!(
            err.kind,
            EncodingErrorKind::InvalidCharacter { character: 'h', .. }
        ));
    }
}

#[test]
fn test_detect_is_stable() {
    let codec = Base64Codec::detect();
    assert_eq!(codec.strategy(), Base64Codec::shared().strategy());
    assert_eq!(Base64Codec::default(), *Base64Codec::shared());
}

#[test]
fn test_data_url_round_trip() {
    let bytes = pattern(1_000);
    let url = encode_data_url(&bytes, "video/mp4");
    assert!(url.starts_with("data:video/mp4;base64,"));

    let parsed = parse_data_url(&url).unwrap();
    assert_eq!(parsed.mime_type, "video/mp4");
    assert!(parsed.base64);
    assert_eq!(parsed.into_blob().bytes(), bytes.as_slice());
}

#[test]
fn test_data_url_defaults_and_plain_payload() {
    assert_eq!(
        encode_data_url(b"x", ""),
        "data:application/octet-stream;base64,eA=="
    );

    let parsed = parse_data_url("data:,hello").unwrap();
    assert_eq!(parsed.mime_type, "application/octet-stream");
    assert!(!parsed.base64);
    assert_eq!(parsed.bytes, b"hello");
}

#[test]
fn test_data_url_malformed() {
    let err = parse_data_url("data:image/png;base64").unwrap_err();
    assert!(matches!(err.kind, EncodingErrorKind::MalformedDataUrl(_)));

    let err = parse_data_url("blob:mediaref/1").unwrap_err();
    assert!(matches!(err.kind, EncodingErrorKind::MalformedDataUrl(_)));

    let err = parse_data_url("data:image/png;base64,@@@@").unwrap_err();
    assert!(matches!(err.kind, EncodingErrorKind::InvalidCharacter { .. }));
}
