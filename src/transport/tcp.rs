use std::net::SocketAddr;
use std::string::String;
use std::vec::Vec;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::config::MAX_LINE_LEN;
use crate::transport::LineTransport;

/// Newline-framed text over a TCP stream.
///
/// Every line is flushed as soon as it is written. A line longer than
/// `max_line_len` bytes or one that is not valid UTF-8 is a transport
/// failure, not a protocol error.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    max_line_len: usize,
    peer: Option<SocketAddr>,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_max_line_len(stream, MAX_LINE_LEN)
    }

    pub fn with_max_line_len(stream: TcpStream, max_line_len: usize) -> Self {
        let peer = stream.peer_addr().ok();
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer,
            max_line_len,
            peer,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Close the write side so the peer sees end of stream.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

fn map_io(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection closed by peer")
        }
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

#[async_trait::async_trait]
impl LineTransport for TcpTransport {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await.map_err(map_io)?;
        self.writer.write_all(b"\n").await.map_err(map_io)?;
        self.writer.flush().await.map_err(map_io)?;
        Ok(())
    }

    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut buf = Vec::new();
        // room for the content plus "\r\n"
        let limit = self.max_line_len as u64 + 2;
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(map_io)?;
        if n == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        if buf.len() > self.max_line_len {
            return Err(anyhow::anyhow!(
                "Line too long (max: {} bytes)",
                self.max_line_len
            ));
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|_| anyhow::anyhow!("Line is not valid UTF-8"))
    }
}
