//! Chunked base64 encoding with a once-probed strategy.

use mediaref_error::{EncodingError, EncodingErrorKind};
use std::sync::OnceLock;

/// Bytes encoded per chunk: 32 KiB rounded down to whole 3-byte groups, so
/// chunks never need padding of their own.
pub const CHUNK_SIZE: usize = 0x8000 / 3 * 3;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: u8 = b'=';

/// Which base64 implementation a codec calls through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Base64Strategy {
    /// The `base64` crate's standard engine
    #[display("native")]
    Native,
    /// Hand-rolled 6-bit-group encoder
    #[display("portable")]
    Portable,
}

/// Base64 codec bound to one strategy.
///
/// Both strategies produce identical output and accept identical input; the
/// native one is faster.
///
/// # Examples
///
/// ```
/// use mediaref_codec::{Base64Codec, Base64Strategy};
///
/// let codec = Base64Codec::with_strategy(Base64Strategy::Portable);
/// assert_eq!(codec.encode(b"fo"), "Zm8=");
/// assert_eq!(codec.decode("Zm8=").unwrap(), b"fo");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base64Codec {
    strategy: Base64Strategy,
}

impl Base64Codec {
    /// Probe the environment and pick the fastest available strategy.
    pub fn detect() -> Self {
        let strategy = if cfg!(feature = "native") {
            Base64Strategy::Native
        } else {
            Base64Strategy::Portable
        };
        tracing::debug!(%strategy, "Selected base64 strategy");
        Self { strategy }
    }

    /// Codec pinned to `strategy`.
    ///
    /// Asking for [`Base64Strategy::Native`] without the `native` feature
    /// yields the portable strategy.
    pub fn with_strategy(strategy: Base64Strategy) -> Self {
        let strategy = match strategy {
            Base64Strategy::Native if !cfg!(feature = "native") => Base64Strategy::Portable,
            other => other,
        };
        Self { strategy }
    }

    /// The process-wide codec, probed on first use.
    pub fn shared() -> &'static Self {
        static CODEC: OnceLock<Base64Codec> = OnceLock::new();
        CODEC.get_or_init(Self::detect)
    }

    /// Strategy this codec calls through.
    pub fn strategy(&self) -> Base64Strategy {
        self.strategy
    }

    /// Encode `bytes` as standard, padded base64.
    pub fn encode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
        for chunk in bytes.chunks(CHUNK_SIZE) {
            match self.strategy {
                Base64Strategy::Native => encode_native(chunk, &mut out),
                Base64Strategy::Portable => encode_portable(chunk, &mut out),
            }
        }
        out
    }

    /// Decode standard, padded base64.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] if the length is not a multiple of four, a
    /// character is outside the alphabet, padding is misplaced, or the final
    /// symbol carries stray bits.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        let input = text.as_bytes();
        validate(input)?;
        match self.strategy {
            Base64Strategy::Native => decode_native(input),
            Base64Strategy::Portable => decode_portable(input),
        }
    }
}

impl Default for Base64Codec {
    fn default() -> Self {
        *Self::shared()
    }
}

/// Encode with the process-wide codec.
pub fn encode_base64(bytes: &[u8]) -> String {
    Base64Codec::shared().encode(bytes)
}

/// Decode with the process-wide codec.
///
/// # Errors
///
/// See [`Base64Codec::decode`].
pub fn decode_base64(text: &str) -> Result<Vec<u8>, EncodingError> {
    Base64Codec::shared().decode(text)
}

fn validate(input: &[u8]) -> Result<(), EncodingError> {
    if input.len() % 4 != 0 {
        return Err(EncodingError::new(EncodingErrorKind::InvalidLength(
            input.len(),
        )));
    }
    let len = input.len();
    for (offset, &byte) in input.iter().enumerate() {
        if byte == PAD {
            let trailing = len - offset;
            let rest_is_pad = input[offset..].iter().all(|&b| b == PAD);
            if trailing > 2 || !rest_is_pad {
                return Err(EncodingError::new(EncodingErrorKind::InvalidPadding(offset)));
            }
            break;
        }
        if sextet(byte).is_none() {
            return Err(EncodingError::new(EncodingErrorKind::InvalidCharacter {
                character: char::from(byte),
                offset,
            }));
        }
    }
    Ok(())
}

fn sextet(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

fn push_sextets(out: &mut String, group: u32, count: usize) {
    for shift in [18u32, 12, 6, 0].iter().take(count) {
        out.push(char::from(ALPHABET[((group >> shift) & 0x3F) as usize]));
    }
}

fn encode_portable(bytes: &[u8], out: &mut String) {
    let mut groups = bytes.chunks_exact(3);
    for g in &mut groups {
        let group = u32::from(g[0]) << 16 | u32::from(g[1]) << 8 | u32::from(g[2]);
        push_sextets(out, group, 4);
    }
    match *groups.remainder() {
        [a] => {
            push_sextets(out, u32::from(a) << 16, 2);
            out.push_str("==");
        }
        [a, b] => {
            push_sextets(out, u32::from(a) << 16 | u32::from(b) << 8, 3);
            out.push('=');
        }
        _ => {}
    }
}

fn decode_portable(input: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::with_capacity(input.len() / 4 * 3);
    for (index, quad) in input.chunks_exact(4).enumerate() {
        let base = index * 4;
        let data = quad.iter().take_while(|&&b| b != PAD).count();
        let mut group = 0u32;
        for (i, &byte) in quad[..data].iter().enumerate() {
            // validate() has already rejected anything outside the alphabet
            let value = sextet(byte).ok_or_else(|| {
                EncodingError::new(EncodingErrorKind::InvalidCharacter {
                    character: char::from(byte),
                    offset: base + i,
                })
            })?;
            group |= u32::from(value) << (18 - 6 * i);
        }
        let produced = match data {
            4 => 3,
            3 => 2,
            2 => 1,
            _ => return Err(EncodingError::new(EncodingErrorKind::InvalidPadding(base + data))),
        };
        let stray = match produced {
            2 => group & 0xFF,
            1 => group & 0xFFFF,
            _ => 0,
        };
        if stray != 0 {
            let offset = base + data - 1;
            return Err(EncodingError::new(EncodingErrorKind::InvalidCharacter {
                character: char::from(quad[data - 1]),
                offset,
            }));
        }
        let bytes = group.to_be_bytes();
        out.extend_from_slice(&bytes[1..1 + produced]);
    }
    Ok(out)
}

#[cfg(feature = "native")]
fn encode_native(bytes: &[u8], out: &mut String) {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode_string(bytes, out);
}

#[cfg(not(feature = "native"))]
fn encode_native(bytes: &[u8], out: &mut String) {
    encode_portable(bytes, out);
}

#[cfg(feature = "native")]
fn decode_native(input: &[u8]) -> Result<Vec<u8>, EncodingError> {
    use base64::{DecodeError, Engine as _};
    base64::engine::general_purpose::STANDARD
        .decode(input)
        .map_err(|e| match e {
            DecodeError::InvalidByte(offset, byte) | DecodeError::InvalidLastSymbol(offset, byte) => {
                EncodingError::new(EncodingErrorKind::InvalidCharacter {
                    character: char::from(byte),
                    offset,
                })
            }
            DecodeError::InvalidLength(len) => {
                EncodingError::new(EncodingErrorKind::InvalidLength(len))
            }
            DecodeError::InvalidPadding => {
                EncodingError::new(EncodingErrorKind::InvalidPadding(input.len()))
            }
        })
}

#[cfg(not(feature = "native"))]
fn decode_native(input: &[u8]) -> Result<Vec<u8>, EncodingError> {
    decode_portable(input)
}
