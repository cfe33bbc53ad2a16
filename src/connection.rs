//! The per-connection state owned by one processing context.
//!
//! A [`Connection`] holds two security parameter sets: `pending`, being
//! negotiated, and `active`, in force for protected traffic. Each traffic
//! direction carries a [`ParamSlot`] tag saying which of the two it currently
//! reads and writes through. Handlers receive the connection by `&mut`, so no
//! other code can observe a transition half-way.
//!
//! 单个处理上下文独占的连接状态。连接持有 `pending` 与 `active` 两个安全参数集，
//! 每个流量方向通过 [`ParamSlot`] 标记当前使用哪一个。

use crate::crypto::CryptoError;
use crate::crypto::finished::{Tls12Finished, VerifyData};
use crate::crypto::keys::{MasterSecret, SecurityParameters};
use crate::crypto::sequence::SequenceNumber;
use crate::protocol::buffer::IoBuffer;
use crate::protocol::state::{HandshakeFlavor, HandshakeState, Role};
use crate::protocol::transcript::Transcript;
use std::fmt;
use tracing::trace;

mod builder;

pub use builder::{ConnectionBuilder, ConnectionConfig, Missing};

/// Which parameter set a traffic direction resolves to.
///
/// 某一流量方向当前解析到的参数集。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    /// Still negotiating: records of this direction are not yet protected by
    /// the negotiated parameters.
    Pending,
    /// Protected by the active parameter set.
    Active,
}

/// Handshake bookkeeping: the message I/O buffer, transcript and position in
/// the state machine.
#[derive(Debug)]
pub struct HandshakeData {
    pub(crate) io: IoBuffer,
    pub(crate) transcript: Transcript,
    pub(crate) next_state: HandshakeState,
    pub(crate) flavor: HandshakeFlavor,
    pub(crate) client_finished: Option<VerifyData>,
    pub(crate) server_finished: Option<VerifyData>,
}

impl HandshakeData {
    fn new(flavor: HandshakeFlavor, io: IoBuffer) -> Self {
        Self {
            io,
            transcript: Transcript::new(),
            next_state: HandshakeState::ClientHello,
            flavor,
            client_finished: None,
            server_finished: None,
        }
    }

    /// The handshake I/O buffer holding the current message.
    ///
    /// 握手 I/O 缓冲区，保存当前消息。
    pub fn io(&self) -> &IoBuffer {
        &self.io
    }

    /// Running hash over the handshake messages exchanged so far.
    ///
    /// 到目前为止已交换握手消息的累计哈希。
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The next message this connection expects.
    ///
    /// 连接期望的下一条消息。
    pub fn next_state(&self) -> HandshakeState {
        self.next_state
    }

    /// The message order this handshake follows.
    ///
    /// 本次握手遵循的消息顺序。
    pub fn flavor(&self) -> HandshakeFlavor {
        self.flavor
    }

    /// The Finished value computed for `role` at its Change Cipher Spec.
    pub fn finished(&self, role: Role) -> Option<&VerifyData> {
        match role {
            Role::Client => self.client_finished.as_ref(),
            Role::Server => self.server_finished.as_ref(),
        }
    }

    pub(crate) fn set_finished(&mut self, role: Role, verify_data: VerifyData) {
        match role {
            Role::Client => self.client_finished = Some(verify_data),
            Role::Server => self.server_finished = Some(verify_data),
        }
    }
}

/// One TLS connection as seen by the handshake core.
///
/// `F` computes Finished values; [`Tls12Finished`] by default.
pub struct Connection<F = Tls12Finished> {
    pub(crate) mode: Role,
    pub(crate) pending: SecurityParameters,
    pub(crate) active: SecurityParameters,
    pub(crate) client_slot: ParamSlot,
    pub(crate) server_slot: ParamSlot,
    pub(crate) master_secret: Option<MasterSecret>,
    pub(crate) handshake: HandshakeData,
    pub(crate) alert_in: IoBuffer,
    pub(crate) finished_generator: F,
}

impl Connection<Tls12Finished> {
    /// Returns a builder for a `Connection`.
    ///
    /// 返回一个 `Connection` 的构建器。
    pub fn builder() -> ConnectionBuilder<Missing, Tls12Finished> {
        ConnectionBuilder::new()
    }
}

impl<F> Connection<F> {
    pub(crate) fn new(
        mode: Role,
        flavor: HandshakeFlavor,
        io: IoBuffer,
        finished_generator: F,
    ) -> Self {
        Self {
            mode,
            pending: SecurityParameters::default(),
            active: SecurityParameters::default(),
            client_slot: ParamSlot::Pending,
            server_slot: ParamSlot::Pending,
            master_secret: None,
            handshake: HandshakeData::new(flavor, io),
            alert_in: IoBuffer::new(),
            finished_generator,
        }
    }

    /// The local role.
    pub fn mode(&self) -> Role {
        self.mode
    }

    /// Parameters being negotiated for the next epoch.
    ///
    /// 正在为下一纪元协商的参数。
    pub fn pending(&self) -> &SecurityParameters {
        &self.pending
    }

    /// Mutable access for the key-derivation collaborator populating the next
    /// epoch. Changes here never reach `active` until the next transition.
    ///
    /// 供密钥派生组件填充下一纪元参数的可变访问；在下一次转换之前不会影响 `active`。
    pub fn pending_mut(&mut self) -> &mut SecurityParameters {
        &mut self.pending
    }

    /// Parameters in force for every direction whose slot is `Active`.
    ///
    /// 槽位为 `Active` 的方向当前生效的参数。
    pub fn active(&self) -> &SecurityParameters {
        &self.active
    }

    /// Which parameter set `direction` currently resolves to.
    ///
    /// `direction` 方向当前解析到的参数集。
    pub fn slot(&self, direction: Role) -> ParamSlot {
        match direction {
            Role::Client => self.client_slot,
            Role::Server => self.server_slot,
        }
    }

    pub(crate) fn slot_mut(&mut self, direction: Role) -> &mut ParamSlot {
        match direction {
            Role::Client => &mut self.client_slot,
            Role::Server => &mut self.server_slot,
        }
    }

    /// The parameter set records written by `direction` currently use.
    pub fn params_for(&self, direction: Role) -> &SecurityParameters {
        match self.slot(direction) {
            ParamSlot::Pending => &self.pending,
            ParamSlot::Active => &self.active,
        }
    }

    /// Hands out the sequence number for the next record written by
    /// `direction`, resolved through that direction's slot.
    ///
    /// 为 `direction` 方向的下一条记录分配序列号，通过该方向的槽位解析参数集。
    pub fn next_sequence_number(&mut self, direction: Role) -> Result<SequenceNumber, CryptoError> {
        let slot = self.slot(direction);
        let params = match slot {
            ParamSlot::Pending => &mut self.pending,
            ParamSlot::Active => &mut self.active,
        };
        let value = params.sequence_number_mut(direction).advance()?;
        trace!(?direction, ?slot, sequence = value, "sequence number consumed");
        Ok(SequenceNumber::new(value))
    }

    /// The negotiated master secret, if key exchange has produced one.
    ///
    /// 协商得到的主密钥（若密钥交换已完成）。
    pub fn master_secret(&self) -> Option<&MasterSecret> {
        self.master_secret.as_ref()
    }

    /// Installs the master secret produced by key exchange.
    pub fn set_master_secret(&mut self, master_secret: MasterSecret) {
        self.master_secret = Some(master_secret);
    }

    /// Handshake bookkeeping: I/O buffer, transcript, position and Finished values.
    ///
    /// 握手簿记：I/O 缓冲区、握手记录、当前位置以及 Finished 值。
    pub fn handshake(&self) -> &HandshakeData {
        &self.handshake
    }

    /// The next message this connection expects.
    ///
    /// 连接期望的下一条消息。
    pub fn next_state(&self) -> HandshakeState {
        self.handshake.next_state
    }

    /// True once both Finished messages have been exchanged.
    ///
    /// 双方 Finished 消息均已交换时返回 true。
    pub fn is_handshake_complete(&self) -> bool {
        self.handshake.next_state == HandshakeState::HandshakeOver
    }

    /// The handshake I/O buffer the Change Cipher Spec byte is read from and
    /// written to.
    pub fn handshake_io_mut(&mut self) -> &mut IoBuffer {
        &mut self.handshake.io
    }

    /// Drains and returns every unread byte of the handshake I/O buffer.
    pub fn take_handshake_output(&mut self) -> Vec<u8> {
        let output = self.handshake.io.read_remaining().to_vec();
        self.handshake.io.wipe();
        output
    }

    /// Alert bytes received without a complete alert yet.
    ///
    /// 尚未构成完整告警的已接收告警字节。
    pub fn alert_in(&self) -> &IoBuffer {
        &self.alert_in
    }

    /// Buffer for alert bytes received without a complete alert yet.
    pub fn alert_in_mut(&mut self) -> &mut IoBuffer {
        &mut self.alert_in
    }

    /// The Finished computation this connection was built with.
    ///
    /// 构建连接时配置的 Finished 计算组件。
    pub fn finished_generator(&self) -> &F {
        &self.finished_generator
    }
}

impl<F> fmt::Debug for Connection<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .field("active", &self.active)
            .field("client_slot", &self.client_slot)
            .field("server_slot", &self.server_slot)
            .field("handshake", &self.handshake)
            .field("alert_in", &self.alert_in.written())
            .finish_non_exhaustive()
    }
}
