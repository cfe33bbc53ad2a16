//! Change Cipher Spec transitions and the handshake driver.
//!
//! [`server`] and [`client`] hold the four Change Cipher Spec handlers, one
//! receive and one send path per role. [`driver`] is the ordering boundary:
//! it only hands a message to a handler when `next_state` expects it.
//!
//! Change Cipher Spec 转换以及握手驱动。[`driver`] 负责消息顺序检查，
//! 只有当 `next_state` 期望某条消息时才交给对应的处理函数。

pub mod client;
pub mod driver;
pub mod server;
mod transition;
