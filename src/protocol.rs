//! Wire-level pieces of the handshake: byte buffers, the Change Cipher Spec
//! message, the state order and the transcript.
//!
//! 握手的线路层组件：字节缓冲区、Change Cipher Spec 消息、状态顺序和握手记录。

pub mod buffer;
pub mod message;
pub mod state;
pub mod transcript;
