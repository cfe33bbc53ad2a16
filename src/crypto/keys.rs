//! Per-epoch security parameter sets and the negotiated master secret.
//!
//! A [`SecurityParameters`] value is the whole bundle one epoch needs: the
//! negotiated cipher suite, write keys, IVs and MAC keys for both directions,
//! and one sequence register per direction. Key material is filled in by the
//! key-derivation collaborator; the handshake core only copies sets and resets
//! sequence registers.
//!
//! 每个纪元的安全参数集以及协商得到的主密钥。密钥材料由密钥派生组件填充，
//! 握手核心只负责复制参数集并重置序列号。

use super::sequence::SequenceNumber;
use crate::protocol::state::Role;
use std::collections::TryReserveError;
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the TLS 1.2 master secret.
pub const MASTER_SECRET_LEN: usize = 48;

/// Opaque key bytes, zeroized on drop.
///
/// 不透明的密钥字节，在释放时清零。
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn try_clone(&self) -> Result<Self, TryReserveError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(self.0.len())?;
        bytes.extend_from_slice(&self.0);
        Ok(Self(bytes))
    }
}

impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for KeyMaterial {}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.0.len())
    }
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret([u8; MASTER_SECRET_LEN]);

impl MasterSecret {
    pub fn new(bytes: [u8; MASTER_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(..)")
    }
}

/// The security parameters of one epoch.
///
/// `Clone` is a full deep copy: after cloning, the two values share nothing,
/// so mutating one can never be observed through the other.
///
/// 单个纪元的安全参数。`Clone` 为完整的深拷贝，两份值互不共享。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityParameters {
    /// Cipher suite protecting records written by the client, `None` for the
    /// initial null cipher.
    ///
    /// 保护客户端写入记录的密码套件；初始空密码为 `None`。
    pub client_cipher_suite: Option<u16>,
    /// Cipher suite protecting records written by the server.
    ///
    /// 保护服务器写入记录的密码套件。
    pub server_cipher_suite: Option<u16>,
    pub client_sequence_number: SequenceNumber,
    pub server_sequence_number: SequenceNumber,
    pub client_write_mac_key: KeyMaterial,
    pub server_write_mac_key: KeyMaterial,
    pub client_write_key: KeyMaterial,
    pub server_write_key: KeyMaterial,
    pub client_write_iv: KeyMaterial,
    pub server_write_iv: KeyMaterial,
}

impl SecurityParameters {
    /// True for the initial, unprotected parameter set.
    pub fn is_null(&self) -> bool {
        self.client_cipher_suite.is_none() && self.server_cipher_suite.is_none()
    }

    /// The cipher suite for records written by `direction`.
    pub fn cipher_suite(&self, direction: Role) -> Option<u16> {
        match direction {
            Role::Client => self.client_cipher_suite,
            Role::Server => self.server_cipher_suite,
        }
    }

    /// Records a newly negotiated suite for both directions of this set.
    ///
    /// 为本参数集的两个方向记录新协商的密码套件。
    pub fn set_cipher_suite(&mut self, suite: u16) {
        self.client_cipher_suite = Some(suite);
        self.server_cipher_suite = Some(suite);
    }

    /// The sequence register for records written by `direction`.
    pub fn sequence_number(&self, direction: Role) -> SequenceNumber {
        match direction {
            Role::Client => self.client_sequence_number,
            Role::Server => self.server_sequence_number,
        }
    }

    pub(crate) fn sequence_number_mut(&mut self, direction: Role) -> &mut SequenceNumber {
        match direction {
            Role::Client => &mut self.client_sequence_number,
            Role::Server => &mut self.server_sequence_number,
        }
    }

    /// Overwrites the fields `direction` writes with (cipher suite, keys, IV,
    /// MAC key and sequence register) by a copy of those in `source`.
    ///
    /// 用 `source` 中 `direction` 方向的字段（密码套件、密钥、IV、MAC 密钥和序列号）覆盖本参数集的对应字段。
    pub(crate) fn adopt_direction(
        &mut self,
        source: &SecurityParameters,
        direction: Role,
    ) -> Result<(), TryReserveError> {
        match direction {
            Role::Client => {
                self.client_cipher_suite = source.client_cipher_suite;
                self.client_write_mac_key = source.client_write_mac_key.try_clone()?;
                self.client_write_key = source.client_write_key.try_clone()?;
                self.client_write_iv = source.client_write_iv.try_clone()?;
                self.client_sequence_number = source.client_sequence_number;
            }
            Role::Server => {
                self.server_cipher_suite = source.server_cipher_suite;
                self.server_write_mac_key = source.server_write_mac_key.try_clone()?;
                self.server_write_key = source.server_write_key.try_clone()?;
                self.server_write_iv = source.server_write_iv.try_clone()?;
                self.server_sequence_number = source.server_sequence_number;
            }
        }
        Ok(())
    }

    /// Deep copy that reports allocation failure instead of aborting.
    ///
    /// 深拷贝；分配失败时返回错误而不是中止。
    pub fn try_clone(&self) -> Result<Self, TryReserveError> {
        Ok(Self {
            client_cipher_suite: self.client_cipher_suite,
            server_cipher_suite: self.server_cipher_suite,
            client_sequence_number: self.client_sequence_number,
            server_sequence_number: self.server_sequence_number,
            client_write_mac_key: self.client_write_mac_key.try_clone()?,
            server_write_mac_key: self.server_write_mac_key.try_clone()?,
            client_write_key: self.client_write_key.try_clone()?,
            server_write_key: self.server_write_key.try_clone()?,
            client_write_iv: self.client_write_iv.try_clone()?,
            server_write_iv: self.server_write_iv.try_clone()?,
        })
    }
}
