//! Change Cipher Spec handlers for the client's message.
//!
//! The mirror of [`super::server`]: `client_ccs_recv` runs on the server,
//! `client_ccs_send` on the client. Both leave `next_state` at
//! `ClientFinished` on success.
//!
//! 客户端 Change Cipher Spec 消息的处理函数，与 [`super::server`] 对称。

use super::transition;
use crate::connection::Connection;
use crate::crypto::finished::FinishedGenerator;
use crate::error::Result;
use crate::protocol::state::Role;

/// Reads the client's Change Cipher Spec and activates the client-to-server
/// direction.
///
/// 读取客户端的 Change Cipher Spec 并激活客户端到服务器方向。
pub fn client_ccs_recv<F: FinishedGenerator>(conn: &mut Connection<F>) -> Result<()> {
    transition::receive(conn, Role::Client)
}

/// Writes the client's Change Cipher Spec and activates the client-to-server
/// direction.
///
/// 写入客户端的 Change Cipher Spec 并激活客户端到服务器方向。
pub fn client_ccs_send<F: FinishedGenerator>(conn: &mut Connection<F>) -> Result<()> {
    transition::send(conn, Role::Client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ParamSlot;
    use crate::crypto::keys::{KeyMaterial, MasterSecret};
    use crate::crypto::sequence::SequenceNumber;
    use crate::error::ErrorKind;
    use crate::protocol::buffer::ByteWriter;
    use crate::protocol::state::HandshakeState;

    fn server_connection() -> Connection {
        let mut conn = Connection::builder().mode(Role::Server).build();
        conn.set_master_secret(MasterSecret::new([0x24; 48]));
        let pending = conn.pending_mut();
        pending.set_cipher_suite(0x009c);
        pending.client_write_key = KeyMaterial::new(vec![0x01; 16]);
        pending.server_write_key = KeyMaterial::new(vec![0x02; 16]);
        conn
    }

    #[test]
    fn recv_wipes_partial_alert_bytes() {
        let mut conn = server_connection();
        conn.alert_in_mut().write_bytes(&[0x02]).unwrap();
        conn.handshake_io_mut().write_u8(0x01).unwrap();

        client_ccs_recv(&mut conn).unwrap();

        assert!(conn.alert_in().is_empty());
        assert_eq!(conn.slot(Role::Client), ParamSlot::Active);
        assert_eq!(conn.next_state(), HandshakeState::ClientFinished);
    }

    #[test]
    fn failed_recv_keeps_partial_alert_bytes() {
        let mut conn = server_connection();
        conn.alert_in_mut().write_bytes(&[0x02]).unwrap();
        conn.handshake_io_mut().write_u8(0x00).unwrap();

        let err = client_ccs_recv(&mut conn).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
        assert_eq!(conn.alert_in().as_slice(), &[0x02]);
    }

    #[test]
    fn send_does_not_touch_the_alert_buffer() {
        let mut conn = server_connection();
        conn.mode = Role::Client;
        conn.alert_in_mut().write_bytes(&[0x01]).unwrap();

        client_ccs_send(&mut conn).unwrap();

        assert_eq!(conn.alert_in().as_slice(), &[0x01]);
        assert_eq!(conn.take_handshake_output(), vec![0x01]);
        assert!(conn.active().client_sequence_number.is_zero());
    }

    #[test]
    fn second_direction_keeps_the_first_directions_counter() {
        let mut conn = server_connection();
        conn.handshake_io_mut().write_u8(0x01).unwrap();
        client_ccs_recv(&mut conn).unwrap();
        conn.take_handshake_output();

        // The client's Finished record consumed a sequence number.
        assert_eq!(conn.next_sequence_number(Role::Client).unwrap(), SequenceNumber::ZERO);
        crate::handshake::server::server_ccs_send(&mut conn).unwrap();

        assert_eq!(conn.active().client_sequence_number.value(), 1);
        assert!(conn.active().server_sequence_number.is_zero());
        assert_eq!(conn.slot(Role::Server), ParamSlot::Active);
        assert_eq!(conn.active().server_write_key.as_bytes(), &[0x02; 16]);
    }
}
