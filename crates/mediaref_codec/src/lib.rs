//! Base64 and data URL codecs.
//!
//! The encoder walks its input in 32 KiB chunks (rounded down to whole 3-byte
//! groups) so very large media never has to be converted in one pass. Two
//! interchangeable strategies exist: the `base64` crate's engine, available
//! with the `native` feature, and a portable 6-bit-group implementation of the
//! standard alphabet. The strategy is probed once per process.
//!
//! # Example
//!
//! ```
//! use mediaref_codec::{decode_base64, encode_base64};
//!
//! let text = encode_base64(b"foobar");
//! assert_eq!(text, "Zm9vYmFy");
//! assert_eq!(decode_base64(&text).unwrap(), b"foobar");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod base64_codec;
mod data_url;

pub use base64_codec::{
    Base64Codec, Base64Strategy, CHUNK_SIZE, decode_base64, encode_base64,
};
pub use data_url::{DataUrl, encode_blob_data_url, encode_data_url, parse_data_url};
