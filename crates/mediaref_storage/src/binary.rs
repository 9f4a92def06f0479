//! Normalization of host read results.

use mediaref_error::{StorageError, StorageErrorKind};

/// Shapes a host read can come back in.
///
/// Normalize with [`BinaryResult::into_bytes`] before inspecting the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryResult {
    /// A buffer owning exactly the file's bytes
    RawBuffer(Vec<u8>),
    /// A view over part of a larger buffer
    TypedArrayView {
        /// Backing buffer
        buffer: Vec<u8>,
        /// Offset of the first byte of the view
        byte_offset: usize,
        /// Length of the view
        byte_length: usize,
    },
}

impl BinaryResult {
    /// Wrap `bytes` as a view over the whole buffer.
    pub fn view(buffer: Vec<u8>) -> Self {
        let byte_length = buffer.len();
        BinaryResult::TypedArrayView {
            buffer,
            byte_offset: 0,
            byte_length,
        }
    }

    /// Canonical byte buffer for either shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a view extends past its backing buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediaref_storage::BinaryResult;
    ///
    /// let view = BinaryResult::TypedArrayView {
    ///     buffer: vec![9, 1, 2, 3, 9],
    ///     byte_offset: 1,
    ///     byte_length: 3,
    /// };
    /// assert_eq!(view.into_bytes().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn into_bytes(self) -> Result<Vec<u8>, StorageError> {
        match self {
            BinaryResult::RawBuffer(bytes) => Ok(bytes),
            BinaryResult::TypedArrayView {
                mut buffer,
                byte_offset,
                byte_length,
            } => {
                let end = byte_offset
                    .checked_add(byte_length)
                    .filter(|end| *end <= buffer.len())
                    .ok_or_else(|| {
                        StorageError::new(StorageErrorKind::FileRead(format!(
                            "view {}..+{} exceeds buffer of {} bytes",
                            byte_offset,
                            byte_length,
                            buffer.len()
                        )))
                    })?;
                if byte_offset == 0 && end == buffer.len() {
                    return Ok(buffer);
                }
                buffer.truncate(end);
                Ok(buffer.split_off(byte_offset))
            }
        }
    }
}
