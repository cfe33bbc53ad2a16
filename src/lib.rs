//! Handshake control core for TLS 1.2.
//!
//! Drives a connection through the handshake message order and, at each Change
//! Cipher Spec boundary, activates the negotiated security parameters for one
//! direction of traffic.
//!
//! TLS 1.2 握手控制核心：驱动连接按握手消息顺序推进，并在 Change Cipher Spec
//! 边界为单一流量方向激活新协商的安全参数。

pub mod connection;
pub mod crypto;
pub mod error;
pub mod handshake;
pub mod protocol;

pub use connection::{Connection, ConnectionBuilder, ConnectionConfig, ParamSlot};
pub use error::{ErrorKind, HandshakeError, Result, TransitionStep};
pub use protocol::state::{HandshakeFlavor, HandshakeState, Role};
