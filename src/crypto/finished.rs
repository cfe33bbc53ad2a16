//! Computes the Finished verification value for one role.
//!
//! The handshake core treats the Finished computation as a collaborator
//! behind [`FinishedGenerator`]. [`Tls12Finished`] is the RFC 5246 §7.4.9
//! implementation:
//!
//! ```text
//! verify_data = PRF(master_secret, finished_label, SHA-256(handshake_messages))[0..12]
//! ```
//!
//! 计算某一角色的 Finished 校验值。握手核心通过 [`FinishedGenerator`] 调用该组件。

use super::keys::MasterSecret;
use super::{CryptoError, prf::prf};
use crate::protocol::state::Role;
use subtle::ConstantTimeEq;

/// Length of TLS 1.2 `verify_data`.
pub const VERIFY_DATA_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyData([u8; VERIFY_DATA_LEN]);

impl VerifyData {
    pub fn new(bytes: [u8; VERIFY_DATA_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; VERIFY_DATA_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidVerifyDataLength {
                    expected: VERIFY_DATA_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Constant-time comparison against a received Finished body.
    ///
    /// 与收到的 Finished 消息体进行常量时间比较。
    pub fn matches(&self, received: &[u8]) -> bool {
        received.len() == VERIFY_DATA_LEN && bool::from(self.0[..].ct_eq(received))
    }
}

/// What a Finished computation may read from the connection.
#[derive(Debug)]
pub struct FinishedInputs<'a> {
    pub master_secret: Option<&'a MasterSecret>,
    /// SHA-256 over every handshake message exchanged so far.
    pub transcript_hash: &'a [u8],
}

/// Computes the Finished value a role sends (or is expected to send) in the
/// epoch that is being activated.
///
/// 计算某一角色在即将激活的纪元中发送（或应当发送）的 Finished 值。
pub trait FinishedGenerator {
    fn compute_finished(
        &mut self,
        inputs: &FinishedInputs<'_>,
        role: Role,
    ) -> Result<VerifyData, CryptoError>;
}

impl<F> FinishedGenerator for F
where
    F: FnMut(&FinishedInputs<'_>, Role) -> Result<VerifyData, CryptoError>,
{
    fn compute_finished(
        &mut self,
        inputs: &FinishedInputs<'_>,
        role: Role,
    ) -> Result<VerifyData, CryptoError> {
        (*self)(inputs, role)
    }
}

/// RFC 5246 Finished computation with the SHA-256 PRF.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tls12Finished;

impl Tls12Finished {
    fn label(role: Role) -> &'static [u8] {
        match role {
            Role::Client => b"client finished",
            Role::Server => b"server finished",
        }
    }
}

impl FinishedGenerator for Tls12Finished {
    fn compute_finished(
        &mut self,
        inputs: &FinishedInputs<'_>,
        role: Role,
    ) -> Result<VerifyData, CryptoError> {
        let master_secret = inputs
            .master_secret
            .ok_or(CryptoError::MissingMasterSecret)?;
        let mut verify_data = [0u8; VERIFY_DATA_LEN];
        prf(
            master_secret.as_bytes(),
            Self::label(role),
            inputs.transcript_hash,
            &mut verify_data,
        )?;
        Ok(VerifyData(verify_data))
    }
}
