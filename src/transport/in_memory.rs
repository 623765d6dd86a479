use std::collections::VecDeque;
use std::string::{String, ToString};
use std::sync::{Arc, Mutex};

use tokio::task::yield_now;

use crate::transport::LineTransport;

type Queue = Arc<Mutex<VecDeque<String>>>;

/// One end of an in-process line pipe. Dropping an end closes the pipe for the other.
pub struct InMemoryTransport {
    recv_queue: Queue,
    send_queue: Queue,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let q1 = Arc::new(Mutex::new(VecDeque::new()));
        let q2 = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                send_queue: q2.clone(),
            },
            Self {
                recv_queue: q2,
                send_queue: q1,
            },
        )
    }
}

#[async_trait::async_trait]
impl LineTransport for InMemoryTransport {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        if Arc::strong_count(&self.send_queue) == 1 {
            return Err(anyhow::anyhow!("Channel closed"));
        }
        let mut queue = self
            .send_queue
            .lock()
            .map_err(|_| anyhow::anyhow!("Channel poisoned"))?;
        queue.push_back(line.to_string());
        Ok(())
    }

    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            let next = {
                let mut queue = self
                    .recv_queue
                    .lock()
                    .map_err(|_| anyhow::anyhow!("Channel poisoned"))?;
                queue.pop_front()
            };
            if let Some(line) = next {
                return Ok(Some(line));
            }
            if Arc::strong_count(&self.recv_queue) == 1 {
                return Ok(None);
            }
            yield_now().await;
        }
    }
}
