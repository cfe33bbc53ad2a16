//! Manages the hashing of the handshake transcript.
//!
//! Every handshake message body is appended in the order it was sent or
//! received. Change Cipher Spec is not a handshake message and never enters
//! the transcript.
//!
//! 管理握手记录的哈希计算。Change Cipher Spec 不是握手消息，不计入握手记录。
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    /// Creates a new, empty transcript.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Updates the transcript with the raw bytes of a handshake message.
    ///
    /// 使用握手消息的原始字节更新握手记录。
    pub fn update(&mut self, message: &[u8]) {
        self.hasher.update(message);
    }

    /// Returns the current hash without consuming the transcript.
    ///
    /// 返回当前的哈希值，而不会消耗握手记录。
    pub fn current_hash(&self) -> Vec<u8> {
        self.hasher.clone().finalize().to_vec()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
