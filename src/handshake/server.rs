//! Change Cipher Spec handlers for the server's message.
//!
//! `server_ccs_recv` runs on the client when the server's Change Cipher Spec
//! arrives; `server_ccs_send` runs on the server when it emits one. Both leave
//! `next_state` at [`HandshakeState::ServerFinished`] on success.
//!
//! 服务器 Change Cipher Spec 消息的处理函数。
//!
//! [`HandshakeState::ServerFinished`]: crate::protocol::state::HandshakeState::ServerFinished

use super::transition;
use crate::connection::Connection;
use crate::crypto::finished::FinishedGenerator;
use crate::error::Result;
use crate::protocol::state::Role;

/// Reads the server's Change Cipher Spec from the handshake I/O buffer and
/// activates the server-to-client direction.
///
/// On success the server sequence register of the new active set is zero,
/// the server direction resolves to `active`, the expected server Finished
/// value is computed, partial alert bytes are wiped and `next_state` is
/// `ServerFinished`. On failure nothing changes.
///
/// 从握手 I/O 缓冲区读取服务器的 Change Cipher Spec，并激活服务器到客户端方向。
/// 失败时连接状态保持不变。
pub fn server_ccs_recv<F: FinishedGenerator>(conn: &mut Connection<F>) -> Result<()> {
    transition::receive(conn, Role::Server)
}

/// Writes the server's Change Cipher Spec into the handshake I/O buffer,
/// activates the server-to-client direction and computes the server Finished
/// value.
///
/// 将服务器的 Change Cipher Spec 写入握手 I/O 缓冲区，激活服务器到客户端方向，
/// 并计算服务器的 Finished 值。
pub fn server_ccs_send<F: FinishedGenerator>(conn: &mut Connection<F>) -> Result<()> {
    transition::send(conn, Role::Server)
}
