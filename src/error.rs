use crate::crypto::CryptoError;
use crate::protocol::state::HandshakeState;
use crate::protocol::buffer::BufferError;
use std::fmt;
use thiserror::Error;

/// Identifies which step of a transition failed.
///
/// 标识转换过程中失败的步骤。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    ReadMessageType,
    WriteMessageType,
    WriteMessageBody,
    ResetSequenceNumber,
    ActivateParameters,
    ComputeFinished,
    /// Copying an inbound record payload into the handshake I/O buffer.
    StageInboundBody,
    VerifyFinished,
    AdvanceState,
}

impl fmt::Display for TransitionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionStep::ReadMessageType => "read message type",
            TransitionStep::WriteMessageType => "write message type",
            TransitionStep::WriteMessageBody => "write message body",
            TransitionStep::ResetSequenceNumber => "reset sequence number",
            TransitionStep::ActivateParameters => "activate parameters",
            TransitionStep::ComputeFinished => "compute finished",
            TransitionStep::StageInboundBody => "stage inbound message body",
            TransitionStep::VerifyFinished => "verify finished",
            TransitionStep::AdvanceState => "advance state",
        };
        f.write_str(name)
    }
}

/// The four kinds of failure a caller has to tell apart.
///
/// 调用方需要区分的四类失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unexpected message.
    ProtocolViolation,
    /// Sequence register or Finished computation failure.
    CryptoFailure,
    /// Handshake stream read or write failure.
    IoFailure,
    /// Copy or activation of the security state failed.
    StateFailure,
}

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("unknown change cipher spec message type: {0:#04x}")]
    UnknownChangeCipherSpecType(u8),

    #[error("change cipher spec record must carry exactly one byte, got {0}")]
    InvalidChangeCipherSpecLength(usize),

    #[error("received {received:?} while expecting {expected:?}")]
    UnexpectedMessage {
        expected: HandshakeState,
        received: HandshakeState,
    },

    #[error("cryptographic operation failed during {step}")]
    Crypto {
        step: TransitionStep,
        #[source]
        source: CryptoError,
    },

    #[error("handshake stream failure during {step}")]
    Io {
        step: TransitionStep,
        #[source]
        source: BufferError,
    },

    #[error("security state could not be updated during {step}: {reason}")]
    State {
        step: TransitionStep,
        reason: &'static str,
    },
}

impl HandshakeError {
    /// Classifies the error into one of the four failure kinds.
    ///
    /// 将错误归入四类失败之一。
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandshakeError::UnknownChangeCipherSpecType(_)
            | HandshakeError::InvalidChangeCipherSpecLength(_)
            | HandshakeError::UnexpectedMessage { .. } => ErrorKind::ProtocolViolation,
            HandshakeError::Crypto { .. } => ErrorKind::CryptoFailure,
            HandshakeError::Io { .. } => ErrorKind::IoFailure,
            HandshakeError::State { .. } => ErrorKind::StateFailure,
        }
    }

    /// The failing step, when the error came out of a multi-step transition.
    pub fn step(&self) -> Option<TransitionStep> {
        match self {
            HandshakeError::Crypto { step, .. }
            | HandshakeError::Io { step, .. }
            | HandshakeError::State { step, .. } => Some(*step),
            HandshakeError::UnknownChangeCipherSpecType(_)
            | HandshakeError::InvalidChangeCipherSpecLength(_) => {
                Some(TransitionStep::ReadMessageType)
            }
            HandshakeError::UnexpectedMessage { .. } => None,
        }
    }

    pub(crate) fn crypto(step: TransitionStep) -> impl FnOnce(CryptoError) -> Self {
        move |source| HandshakeError::Crypto { step, source }
    }

    pub(crate) fn io(step: TransitionStep) -> impl FnOnce(BufferError) -> Self {
        move |source| HandshakeError::Io { step, source }
    }
}

pub type Result<T> = std::result::Result<T, HandshakeError>;
