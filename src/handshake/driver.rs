//! Drives a [`Connection`] through its handshake flavor one message at a time.
//!
//! Every entry point first checks that the message is the one `next_state`
//! expects and that it travels in the right direction, then wipes the
//! handshake I/O buffer (one message per buffer). Change Cipher Spec states
//! are handed to the transition handlers; Finished states are checked against
//! the value computed at the matching Change Cipher Spec; every other message
//! body is opaque here and only enters the transcript.
//!
//! 按消息逐条驱动 [`Connection`] 完成握手。每个入口先检查消息是否为 `next_state`
//! 所期望的消息以及方向是否正确；Change Cipher Spec 交给转换处理函数，
//! Finished 与对应 Change Cipher Spec 时计算的值进行比较，其余消息体只计入握手记录。

use super::transition;
use crate::connection::Connection;
use crate::crypto::CryptoError;
use crate::crypto::finished::FinishedGenerator;
use crate::error::{HandshakeError, Result, TransitionStep};
use crate::protocol::state::{HandshakeState, Role};
use tracing::{debug, warn};

impl<F: FinishedGenerator> Connection<F> {
    /// Fails with `UnexpectedMessage` unless `state` is the next expected
    /// message and `writer` is the role that sends it.
    fn check_turn(&self, state: HandshakeState, writer: Role) -> Result<()> {
        let expected = self.handshake.next_state;
        if state != expected || state.writer() != Some(writer) {
            warn!(?expected, received = ?state, ?writer, "out of order handshake message");
            return Err(HandshakeError::UnexpectedMessage {
                expected,
                received: state,
            });
        }
        Ok(())
    }

    fn advance_past(&mut self, state: HandshakeState) -> Result<()> {
        let next = self
            .handshake
            .flavor
            .next_after(state)
            .ok_or(HandshakeError::State {
                step: TransitionStep::AdvanceState,
                reason: "state has no successor in this handshake flavor",
            })?;
        self.handshake.next_state = next;
        debug!(from = ?state, to = ?next, "handshake advanced");
        Ok(())
    }

    /// Processes one message written by the peer.
    ///
    /// For a Change Cipher Spec state `body` is the record payload and must be
    /// exactly one byte. For a Finished state `body` is the peer's
    /// `verify_data`. Any other body is recorded in the transcript as is.
    ///
    /// 处理对端发送的一条消息。
    pub fn recv_message(&mut self, state: HandshakeState, body: &[u8]) -> Result<()> {
        let peer = self.mode.peer();
        self.check_turn(state, peer)?;
        self.handshake.io.wipe();

        if state.is_change_cipher_spec() {
            if body.len() != 1 {
                return Err(HandshakeError::InvalidChangeCipherSpecLength(body.len()));
            }
            self.handshake
                .io
                .write_bytes(body)
                .map_err(HandshakeError::io(TransitionStep::StageInboundBody))?;
            return transition::receive(self, peer);
        }

        if state.is_finished() {
            self.verify_peer_finished(peer, body)?;
        }
        self.handshake.transcript.update(body);
        self.advance_past(state)
    }

    fn verify_peer_finished(&self, peer: Role, body: &[u8]) -> Result<()> {
        let expected = self.handshake.finished(peer).ok_or(HandshakeError::State {
            step: TransitionStep::VerifyFinished,
            reason: "no finished value computed for the peer",
        })?;
        if !expected.matches(body) {
            warn!(?peer, "peer finished verify data mismatch");
            return Err(HandshakeError::Crypto {
                step: TransitionStep::VerifyFinished,
                source: CryptoError::FinishedMismatch,
            });
        }
        Ok(())
    }

    /// Emits one ordinary handshake message written by the local role into
    /// the handshake I/O buffer.
    ///
    /// Change Cipher Spec and Finished have dedicated entry points.
    ///
    /// 将本地角色发送的一条普通握手消息写入握手 I/O 缓冲区。
    pub fn send_message(&mut self, state: HandshakeState, body: &[u8]) -> Result<()> {
        self.check_turn(state, self.mode)?;
        if state.is_change_cipher_spec() || state.is_finished() {
            return Err(HandshakeError::UnexpectedMessage {
                expected: self.handshake.next_state,
                received: state,
            });
        }
        self.handshake.io.wipe();
        self.handshake
            .io
            .write_bytes(body)
            .map_err(HandshakeError::io(TransitionStep::WriteMessageBody))?;
        self.handshake.transcript.update(body);
        self.advance_past(state)
    }

    /// Emits the local role's Change Cipher Spec.
    pub fn send_change_cipher_spec(&mut self) -> Result<()> {
        let local = self.mode;
        self.check_turn(local.change_cipher_spec_state(), local)?;
        self.handshake.io.wipe();
        transition::send(self, local)
    }

    /// Emits the local role's Finished message, using the value computed
    /// when its Change Cipher Spec was sent.
    ///
    /// 发送本地角色的 Finished 消息，其值在发送 Change Cipher Spec 时已计算。
    pub fn send_finished(&mut self) -> Result<()> {
        let local = self.mode;
        let state = local.finished_state();
        self.check_turn(state, local)?;
        let verify_data = self
            .handshake
            .finished(local)
            .cloned()
            .ok_or(HandshakeError::State {
                step: TransitionStep::ComputeFinished,
                reason: "no finished value computed for the local role",
            })?;

        self.handshake.io.wipe();
        self.handshake
            .io
            .write_bytes(verify_data.as_bytes())
            .map_err(HandshakeError::io(TransitionStep::WriteMessageBody))?;
        self.handshake.transcript.update(verify_data.as_bytes());
        self.advance_past(state)
    }

    /// Starts a new handshake on an established connection. The active
    /// parameters stay in force until the new handshake's transitions
    /// replace them.
    ///
    /// 在已建立的连接上开始新的握手；在新握手完成转换之前，当前 active 参数继续生效。
    pub fn renegotiate(&mut self) -> Result<()> {
        if !self.is_handshake_complete() {
            return Err(HandshakeError::UnexpectedMessage {
                expected: self.handshake.next_state,
                received: HandshakeState::ClientHello,
            });
        }
        self.handshake.transcript = Default::default();
        self.handshake.client_finished = None;
        self.handshake.server_finished = None;
        self.handshake.io.wipe();
        self.handshake.next_state = HandshakeState::ClientHello;
        debug!(mode = ?self.mode, "renegotiation started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::protocol::state::HandshakeFlavor;

    #[test]
    fn messages_must_arrive_in_order() {
        let mut server = Connection::builder().mode(Role::Server).build();
        let err = server
            .recv_message(HandshakeState::ClientKey, b"key exchange")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
        assert_eq!(server.next_state(), HandshakeState::ClientHello);

        server.recv_message(HandshakeState::ClientHello, b"hello").unwrap();
        assert_eq!(server.next_state(), HandshakeState::ServerHello);
    }

    #[test]
    fn direction_must_match_the_writer() {
        let mut client = Connection::builder().mode(Role::Client).build();
        let err = client
            .recv_message(HandshakeState::ClientHello, b"hello")
            .unwrap_err();
        assert!(matches!(err, HandshakeError::UnexpectedMessage { .. }));

        client.send_message(HandshakeState::ClientHello, b"hello").unwrap();
        assert_eq!(client.take_handshake_output(), b"hello".to_vec());
    }

    #[test]
    fn change_cipher_spec_payload_must_be_one_byte() {
        let mut server = Connection::builder()
            .mode(Role::Server)
            .flavor(HandshakeFlavor::Full)
            .build();
        server.handshake.next_state = HandshakeState::ClientChangeCipherSpec;

        let err = server
            .recv_message(HandshakeState::ClientChangeCipherSpec, &[0x01, 0x01])
            .unwrap_err();
        assert!(matches!(err, HandshakeError::InvalidChangeCipherSpecLength(2)));
        assert_eq!(server.next_state(), HandshakeState::ClientChangeCipherSpec);
    }

    #[test]
    fn staging_an_inbound_body_past_the_limit_is_an_io_failure() {
        let mut server = Connection::builder()
            .mode(Role::Server)
            .handshake_io_limit(0)
            .build();
        server.handshake.next_state = HandshakeState::ClientChangeCipherSpec;

        let err = server
            .recv_message(HandshakeState::ClientChangeCipherSpec, &[0x01])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert_eq!(err.step(), Some(TransitionStep::StageInboundBody));
        assert_eq!(server.slot(Role::Client), crate::connection::ParamSlot::Pending);
    }

    #[test]
    fn send_message_refuses_dedicated_states() {
        let mut client = Connection::builder().mode(Role::Client).build();
        client.handshake.next_state = HandshakeState::ClientChangeCipherSpec;
        assert!(
            client
                .send_message(HandshakeState::ClientChangeCipherSpec, &[0x01])
                .is_err()
        );
    }

    #[test]
    fn renegotiate_requires_a_finished_handshake() {
        let mut client = Connection::builder().mode(Role::Client).build();
        assert!(client.renegotiate().is_err());
        client.handshake.next_state = HandshakeState::HandshakeOver;
        client.renegotiate().unwrap();
        assert_eq!(client.next_state(), HandshakeState::ClientHello);
    }
}
