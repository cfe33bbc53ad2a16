//! Security parameter sets, sequence registers and the Finished computation.
//!
//! 安全参数集、序列号寄存器以及 Finished 消息计算。

pub mod finished;
pub mod keys;
pub mod prf;
pub mod sequence;

use thiserror::Error;

/// Failures raised by the cryptographic collaborators of the handshake core.
///
/// 握手核心的密码学协作组件产生的错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("sequence number space exhausted")]
    SequenceOverflow,

    #[error("master secret has not been negotiated")]
    MissingMasterSecret,

    #[error("invalid MAC key length")]
    InvalidKeyLength,

    #[error("finished verify data does not match")]
    FinishedMismatch,

    #[error("finished verify data must be {expected} bytes, got {actual}")]
    InvalidVerifyDataLength { expected: usize, actual: usize },

    #[error("finished generator failed: {0}")]
    Generator(String),
}
