//! Line-oriented transports.
//!
//! A transport moves whole lines, without their terminator. `recv_line`
//! yields `None` once the peer has closed the stream.

use std::string::String;

#[async_trait::async_trait]
pub trait LineTransport: Send + Sync {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()>;
    async fn recv_line(&mut self) -> anyhow::Result<Option<String>>;
}

pub mod in_memory;
pub mod tcp;
