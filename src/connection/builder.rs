use super::Connection;
use crate::crypto::finished::{FinishedGenerator, Tls12Finished};
use crate::protocol::buffer::IoBuffer;
use crate::protocol::state::{HandshakeFlavor, Role};
use serde::{Deserialize, Serialize};

/// Marker type for a missing field in the builder.
///
/// 用于在构建器中标记缺失字段的类型。
pub struct Missing;

/// Serializable connection settings.
///
/// 可序列化的连接配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// The local role.
    pub mode: Role,
    #[serde(default)]
    pub flavor: HandshakeFlavor,
    /// Upper bound on bytes buffered in the handshake I/O stream.
    #[serde(default)]
    pub handshake_io_limit: Option<usize>,
}

/// A builder for creating a `Connection`.
///
/// `build` only becomes available once the local role is known.
///
/// 用于创建 `Connection` 的构建器；只有在设置本地角色后才能调用 `build`。
pub struct ConnectionBuilder<Mode, F> {
    mode: Mode,
    flavor: HandshakeFlavor,
    handshake_io_limit: Option<usize>,
    finished_generator: F,
}

impl ConnectionBuilder<Missing, Tls12Finished> {
    /// Creates a new `ConnectionBuilder`.
    pub fn new() -> Self {
        Self {
            mode: Missing,
            flavor: HandshakeFlavor::default(),
            handshake_io_limit: None,
            finished_generator: Tls12Finished,
        }
    }
}

impl Default for ConnectionBuilder<Missing, Tls12Finished> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, F> ConnectionBuilder<M, F> {
    /// Sets the local role.
    ///
    /// 设置本地角色。
    pub fn mode(self, mode: Role) -> ConnectionBuilder<Role, F> {
        ConnectionBuilder {
            mode,
            flavor: self.flavor,
            handshake_io_limit: self.handshake_io_limit,
            finished_generator: self.finished_generator,
        }
    }

    pub fn flavor(mut self, flavor: HandshakeFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn handshake_io_limit(mut self, limit: usize) -> Self {
        self.handshake_io_limit = Some(limit);
        self
    }

    /// Applies every setting from a [`ConnectionConfig`].
    pub fn config(self, config: ConnectionConfig) -> ConnectionBuilder<Role, F> {
        ConnectionBuilder {
            mode: config.mode,
            flavor: config.flavor,
            handshake_io_limit: config.handshake_io_limit,
            finished_generator: self.finished_generator,
        }
    }

    /// Replaces the Finished computation.
    ///
    /// 替换 Finished 计算组件。
    pub fn finished_generator<G: FinishedGenerator>(self, generator: G) -> ConnectionBuilder<M, G> {
        ConnectionBuilder {
            mode: self.mode,
            flavor: self.flavor,
            handshake_io_limit: self.handshake_io_limit,
            finished_generator: generator,
        }
    }
}

impl<F: FinishedGenerator> ConnectionBuilder<Role, F> {
    /// Builds the `Connection`, positioned before the ClientHello.
    ///
    /// 构建 `Connection`，初始状态为等待 ClientHello。
    pub fn build(self) -> Connection<F> {
        let io = match self.handshake_io_limit {
            Some(limit) => IoBuffer::with_limit(limit),
            None => IoBuffer::new(),
        };
        Connection::new(self.mode, self.flavor, io, self.finished_generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::state::HandshakeState;

    #[test]
    fn config_round_trips_through_json() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{ "mode": "server", "flavor": "full_with_client_auth" }"#)
                .unwrap();
        assert_eq!(config.mode, Role::Server);
        assert_eq!(config.flavor, HandshakeFlavor::FullWithClientAuth);
        assert_eq!(config.handshake_io_limit, None);

        let conn = Connection::builder().config(config).build();
        assert_eq!(conn.mode(), Role::Server);
        assert_eq!(conn.handshake().flavor(), HandshakeFlavor::FullWithClientAuth);
        assert_eq!(conn.next_state(), HandshakeState::ClientHello);
    }

    #[test]
    fn flavor_defaults_to_full() {
        let config: ConnectionConfig = serde_json::from_str(r#"{ "mode": "client" }"#).unwrap();
        assert_eq!(config.flavor, HandshakeFlavor::Full);
    }
}
