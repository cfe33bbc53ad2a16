//! Defines the states of the TLS 1.2 handshake state machine and the order in
//! which each handshake flavor visits them.
//!
//! Each state names the next message the connection expects to read or write.
//! Which side writes that message is fixed by the state itself, so the same
//! table drives both the client and the server.
//!
//! 定义 TLS 1.2 握手状态机的各个状态，以及每种握手类型经过这些状态的顺序。
//! 每个状态表示连接下一条要读或写的消息；写入方由状态本身决定。

use serde::{Deserialize, Serialize};

/// One side of the connection, also used to name a traffic direction
/// (the direction a role writes in).
///
/// 连接的一方，也用于表示流量方向（该角色写入的方向）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub fn peer(self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }

    /// The state expecting this role's Finished message.
    pub fn finished_state(self) -> HandshakeState {
        match self {
            Role::Client => HandshakeState::ClientFinished,
            Role::Server => HandshakeState::ServerFinished,
        }
    }

    /// The state expecting this role's Change Cipher Spec message.
    pub fn change_cipher_spec_state(self) -> HandshakeState {
        match self {
            Role::Client => HandshakeState::ClientChangeCipherSpec,
            Role::Server => HandshakeState::ServerChangeCipherSpec,
        }
    }
}

/// The next message a connection expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandshakeState {
    ClientHello,
    ServerHello,
    ServerCert,
    ServerKey,
    ServerCertReq,
    ServerHelloDone,
    ClientCert,
    ClientKey,
    ClientCertVerify,
    ClientChangeCipherSpec,
    ClientFinished,
    ServerChangeCipherSpec,
    ServerFinished,
    HandshakeOver,
}

impl HandshakeState {
    /// The role that writes the message for this state, `None` once the
    /// handshake is over.
    pub fn writer(self) -> Option<Role> {
        use HandshakeState::*;
        match self {
            ClientHello | ClientCert | ClientKey | ClientCertVerify | ClientChangeCipherSpec
            | ClientFinished => Some(Role::Client),
            ServerHello | ServerCert | ServerKey | ServerCertReq | ServerHelloDone
            | ServerChangeCipherSpec | ServerFinished => Some(Role::Server),
            HandshakeOver => None,
        }
    }

    pub fn is_change_cipher_spec(self) -> bool {
        matches!(
            self,
            HandshakeState::ClientChangeCipherSpec | HandshakeState::ServerChangeCipherSpec
        )
    }

    pub fn is_finished(self) -> bool {
        matches!(
            self,
            HandshakeState::ClientFinished | HandshakeState::ServerFinished
        )
    }
}

/// The message orders the handshake core knows how to drive.
///
/// 握手核心能够驱动的消息顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeFlavor {
    /// Full handshake, server-authenticated only.
    #[default]
    Full,
    /// Full handshake where the server requests a client certificate.
    FullWithClientAuth,
    /// Abbreviated handshake: the server changes cipher spec first.
    Abbreviated,
}

const FULL: &[HandshakeState] = &[
    HandshakeState::ClientHello,
    HandshakeState::ServerHello,
    HandshakeState::ServerCert,
    HandshakeState::ServerKey,
    HandshakeState::ServerHelloDone,
    HandshakeState::ClientKey,
    HandshakeState::ClientChangeCipherSpec,
    HandshakeState::ClientFinished,
    HandshakeState::ServerChangeCipherSpec,
    HandshakeState::ServerFinished,
    HandshakeState::HandshakeOver,
];

const FULL_WITH_CLIENT_AUTH: &[HandshakeState] = &[
    HandshakeState::ClientHello,
    HandshakeState::ServerHello,
    HandshakeState::ServerCert,
    HandshakeState::ServerKey,
    HandshakeState::ServerCertReq,
    HandshakeState::ServerHelloDone,
    HandshakeState::ClientCert,
    HandshakeState::ClientKey,
    HandshakeState::ClientCertVerify,
    HandshakeState::ClientChangeCipherSpec,
    HandshakeState::ClientFinished,
    HandshakeState::ServerChangeCipherSpec,
    HandshakeState::ServerFinished,
    HandshakeState::HandshakeOver,
];

const ABBREVIATED: &[HandshakeState] = &[
    HandshakeState::ClientHello,
    HandshakeState::ServerHello,
    HandshakeState::ServerChangeCipherSpec,
    HandshakeState::ServerFinished,
    HandshakeState::ClientChangeCipherSpec,
    HandshakeState::ClientFinished,
    HandshakeState::HandshakeOver,
];

impl HandshakeFlavor {
    /// Every state of this flavor, in protocol order.
    pub fn states(self) -> &'static [HandshakeState] {
        match self {
            HandshakeFlavor::Full => FULL,
            HandshakeFlavor::FullWithClientAuth => FULL_WITH_CLIENT_AUTH,
            HandshakeFlavor::Abbreviated => ABBREVIATED,
        }
    }

    pub fn contains(self, state: HandshakeState) -> bool {
        self.states().contains(&state)
    }

    /// The state following `state`, or `None` for the last state or a state
    /// this flavor never visits.
    pub fn next_after(self, state: HandshakeState) -> Option<HandshakeState> {
        let states = self.states();
        let position = states.iter().position(|s| *s == state)?;
        states.get(position + 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_cipher_spec_is_always_followed_by_finished_of_the_same_role() {
        for flavor in [
            HandshakeFlavor::Full,
            HandshakeFlavor::FullWithClientAuth,
            HandshakeFlavor::Abbreviated,
        ] {
            for state in flavor.states().iter().copied().filter(|s| s.is_change_cipher_spec()) {
                let writer = state.writer().unwrap();
                assert_eq!(flavor.next_after(state), Some(writer.finished_state()));
            }
        }
    }

    #[test]
    fn every_flavor_ends_with_handshake_over() {
        for flavor in [
            HandshakeFlavor::Full,
            HandshakeFlavor::FullWithClientAuth,
            HandshakeFlavor::Abbreviated,
        ] {
            assert_eq!(flavor.states().first(), Some(&HandshakeState::ClientHello));
            assert_eq!(flavor.states().last(), Some(&HandshakeState::HandshakeOver));
            assert_eq!(flavor.next_after(HandshakeState::HandshakeOver), None);
        }
    }

    #[test]
    fn states_outside_a_flavor_have_no_successor() {
        assert!(!HandshakeFlavor::Abbreviated.contains(HandshakeState::ClientKey));
        assert_eq!(
            HandshakeFlavor::Abbreviated.next_after(HandshakeState::ClientKey),
            None
        );
    }

    #[test]
    fn roles_map_to_their_states() {
        assert_eq!(Role::Server.finished_state(), HandshakeState::ServerFinished);
        assert_eq!(
            Role::Client.change_cipher_spec_state(),
            HandshakeState::ClientChangeCipherSpec
        );
        assert_eq!(Role::Client.peer(), Role::Server);
        assert_eq!(HandshakeState::HandshakeOver.writer(), None);
    }
}
