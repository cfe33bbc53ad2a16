//! The Change Cipher Spec protocol message (RFC 5246 §7.1).
//!
//! The message is a single byte carried as the whole payload of its own
//! record. Only the value `1` is defined.
//!
//! Change Cipher Spec 协议消息：单字节，唯一合法值为 `1`。

use super::buffer::{BufferError, ByteReader, ByteWriter};

/// Wire value of the Change Cipher Spec message type.
pub const CHANGE_CIPHER_SPEC_TYPE: u8 = 1;

/// Outcome of reading one Change Cipher Spec byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCipherSpec {
    Valid,
    Unknown(u8),
}

impl ChangeCipherSpec {
    pub fn from_byte(byte: u8) -> Self {
        if byte == CHANGE_CIPHER_SPEC_TYPE {
            ChangeCipherSpec::Valid
        } else {
            ChangeCipherSpec::Unknown(byte)
        }
    }

    /// Reads exactly one byte from `reader`.
    pub fn read_from<R: ByteReader + ?Sized>(reader: &mut R) -> Result<Self, BufferError> {
        reader.read_u8().map(Self::from_byte)
    }

    /// Writes the single valid message byte into `writer`.
    pub fn write_to<W: ByteWriter + ?Sized>(writer: &mut W) -> Result<(), BufferError> {
        writer.write_u8(CHANGE_CIPHER_SPEC_TYPE)
    }
}
