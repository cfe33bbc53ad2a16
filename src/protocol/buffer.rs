//! Growable byte buffer with an independent read cursor.
//!
//! Used for the handshake I/O stream and for partially received alert bytes.
//! Bytes are appended at the write end and consumed from the read cursor;
//! `wipe` zeroizes everything and resets both ends.
//!
//! 带独立读游标的可增长字节缓冲区，用于握手 I/O 流以及部分接收的告警字节。

use thiserror::Error;
use zeroize::Zeroize;

/// Failures of an [`IoBuffer`] read or write.
///
/// [`IoBuffer`] 读写失败。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("requested {requested} bytes but only {available} are available")]
    OutOfData { requested: usize, available: usize },

    #[error("buffer is full (limit {limit} bytes)")]
    Full { limit: usize },
}

/// Sequential byte source.
///
/// 顺序字节源。
pub trait ByteReader {
    fn read_u8(&mut self) -> Result<u8, BufferError>;
}

/// Sequential byte sink.
///
/// 顺序字节汇。
pub trait ByteWriter {
    fn write_u8(&mut self, value: u8) -> Result<(), BufferError>;
}

/// Byte buffer with a read cursor, zeroized on wipe and on drop.
///
/// 带读游标的字节缓冲区，在清除及释放时清零。
#[derive(Debug, Clone, Default)]
pub struct IoBuffer {
    data: Vec<u8>,
    read_cursor: usize,
    limit: Option<usize>,
}

impl IoBuffer {
    /// Creates an empty buffer without a size limit.
    ///
    /// 创建一个无大小限制的空缓冲区。
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer that refuses writes beyond `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            read_cursor: 0,
            limit: Some(limit),
        }
    }

    /// Creates a buffer pre-filled with `bytes`, ready to be read.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: bytes.into(),
            read_cursor: 0,
            limit: None,
        }
    }

    /// Appends `bytes` at the write end, failing with `Full` past the limit.
    ///
    /// 在写入端追加 `bytes`；超出限制时返回 `Full`。
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        if let Some(limit) = self.limit {
            if self.data.len() + bytes.len() > limit {
                return Err(BufferError::Full { limit });
            }
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Consumes `len` bytes from the read cursor, or fails with `OutOfData`
    /// without moving it.
    ///
    /// 从读游标处读取 `len` 个字节；数据不足时返回 `OutOfData` 且游标不动。
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], BufferError> {
        let available = self.data_available();
        if len > available {
            return Err(BufferError::OutOfData {
                requested: len,
                available,
            });
        }
        let start = self.read_cursor;
        self.read_cursor += len;
        Ok(&self.data[start..self.read_cursor])
    }

    /// Consumes every unread byte.
    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.read_cursor;
        self.read_cursor = self.data.len();
        &self.data[start..]
    }

    /// Number of written bytes not yet consumed.
    pub fn data_available(&self) -> usize {
        self.data.len() - self.read_cursor
    }

    /// Total number of bytes written since the last wipe.
    pub fn written(&self) -> usize {
        self.data.len()
    }

    /// True when nothing has been written since the last wipe.
    ///
    /// 自上次清除以来未写入任何字节时返回 true。
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All written bytes, including those already read.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Offset of the next byte to be read.
    ///
    /// 下一个待读字节的偏移量。
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Moves the read cursor back to a position previously returned by
    /// [`IoBuffer::read_cursor`].
    pub(crate) fn rewind_to(&mut self, position: usize) {
        self.read_cursor = position.min(self.data.len());
    }

    /// Drops written bytes past `len`, zeroizing them first.
    pub(crate) fn truncate_written(&mut self, len: usize) {
        if len < self.data.len() {
            self.data[len..].zeroize();
            self.data.truncate(len);
            self.read_cursor = self.read_cursor.min(len);
        }
    }

    /// Zeroizes the contents and resets both cursors.
    ///
    /// 清零内容并重置读写游标。
    pub fn wipe(&mut self) {
        self.data.zeroize();
        self.read_cursor = 0;
    }
}

impl ByteReader for IoBuffer {
    fn read_u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.read_bytes(1)?[0])
    }
}

impl ByteWriter for IoBuffer {
    fn write_u8(&mut self, value: u8) -> Result<(), BufferError> {
        self.write_bytes(&[value])
    }
}

impl Drop for IoBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_follow_writes() {
        let mut buffer = IoBuffer::new();
        buffer.write_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(buffer.read_u8().unwrap(), 1);
        assert_eq!(buffer.data_available(), 2);
        assert_eq!(buffer.read_bytes(2).unwrap(), &[2, 3]);
        assert_eq!(
            buffer.read_u8(),
            Err(BufferError::OutOfData {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn limit_rejects_oversized_writes() {
        let mut buffer = IoBuffer::with_limit(2);
        buffer.write_u8(7).unwrap();
        buffer.write_u8(8).unwrap();
        assert_eq!(buffer.write_u8(9), Err(BufferError::Full { limit: 2 }));
        assert_eq!(buffer.written(), 2);
    }

    #[test]
    fn wipe_empties_the_buffer() {
        let mut buffer = IoBuffer::from_bytes(vec![0x15, 0x03]);
        buffer.read_u8().unwrap();
        buffer.wipe();
        assert!(buffer.is_empty());
        assert_eq!(buffer.data_available(), 0);
        assert_eq!(buffer.read_cursor(), 0);
    }

    #[test]
    fn rewind_and_truncate_restore_earlier_positions() {
        let mut buffer = IoBuffer::from_bytes(vec![1, 2]);
        let mark = buffer.read_cursor();
        buffer.read_u8().unwrap();
        buffer.rewind_to(mark);
        assert_eq!(buffer.read_u8().unwrap(), 1);

        let written = buffer.written();
        buffer.write_u8(3).unwrap();
        buffer.truncate_written(written);
        assert_eq!(buffer.as_slice(), &[1, 2]);
    }
}
