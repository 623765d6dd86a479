#![cfg(feature = "std")]
//! Single-table TCP game server.
//!
//! Connections are accepted concurrently with the running match, but only
//! one session is admitted at a time. Anyone else is told the server is
//! busy and disconnected without touching the active session.

use std::future::Future;
use std::net::SocketAddr;
use std::string::ToString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use crate::{
    config::ServerConfig,
    protocol::ServerMessage,
    session::{Session, SessionPhase},
    transport::{tcp::TcpTransport, LineTransport},
};

/// Accept or turn away a new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admit,
    Reject,
}

impl AdmissionDecision {
    /// The decision depends on nothing but whether a session is live.
    pub fn for_occupancy(occupied: bool) -> Self {
        if occupied {
            AdmissionDecision::Reject
        } else {
            AdmissionDecision::Admit
        }
    }
}

/// Holds at most one live session. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct Admission {
    occupied: Arc<AtomicBool>,
}

impl Admission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }

    /// Claim the slot. The slot is released when the guard drops.
    pub fn try_admit(&self) -> Option<AdmissionGuard> {
        let occupied = self
            .occupied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err();
        match AdmissionDecision::for_occupancy(occupied) {
            AdmissionDecision::Admit => Some(AdmissionGuard {
                occupied: self.occupied.clone(),
            }),
            AdmissionDecision::Reject => None,
        }
    }
}

#[derive(Debug)]
pub struct AdmissionGuard {
    occupied: Arc<AtomicBool>,
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        self.occupied.store(false, Ordering::Release);
    }
}

/// Drive `session` over `transport` until it finishes or closes.
///
/// One line is read, all of its responses are written in order, then the
/// next line is read. End of stream or a transport error closes the session.
pub async fn run_session<T: LineTransport + ?Sized>(
    transport: &mut T,
    session: &mut Session,
) -> anyhow::Result<SessionPhase> {
    while !session.is_over() {
        let line = match transport.recv_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::debug!("peer closed the stream");
                session.close();
                break;
            }
            Err(e) => {
                session.close();
                return Err(e);
            }
        };
        for msg in session.handle_line(&line) {
            log::debug!("-> {}", msg);
            if let Err(e) = transport.send_line(&msg.to_string()).await {
                session.close();
                return Err(e);
            }
        }
    }
    Ok(session.phase())
}

pub struct GameServer {
    listener: TcpListener,
    config: ServerConfig,
    admission: Admission,
    sessions: u64,
}

impl GameServer {
    pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        log::info!("listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            config,
            admission: Admission::new(),
            sessions: 0,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn admission(&self) -> &Admission {
        &self.admission
    }

    /// Serve until `shutdown` resolves. Sessions already running are left to finish.
    pub async fn run_until<F: Future<Output = ()>>(mut self, shutdown: F) -> anyhow::Result<()> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("server stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.dispatch(stream, addr),
                    Err(e) => log::warn!("accept error: {}", e),
                },
            }
        }
    }

    fn dispatch(&mut self, stream: TcpStream, addr: SocketAddr) {
        let Some(guard) = self.admission.try_admit() else {
            log::warn!("rejecting {}: server busy", addr);
            tokio::spawn(async move {
                let mut transport = TcpTransport::new(stream);
                let _ = transport
                    .send_line(&ServerMessage::error("server busy").to_string())
                    .await;
                let _ = transport.shutdown().await;
            });
            return;
        };

        log::info!("player connected from {}", addr);
        let rng = self.config.session_rng(self.sessions);
        self.sessions += 1;
        let max_line_len = self.config.max_line_len;
        tokio::spawn(async move {
            let _guard = guard;
            let mut transport = TcpTransport::with_max_line_len(stream, max_line_len);
            let mut session = Session::new(rng);
            match run_session(&mut transport, &mut session).await {
                Ok(phase) => log::info!("session with {} ended in {:?}", addr, phase),
                Err(e) => log::warn!("session with {} failed: {}", addr, e),
            }
            let _ = transport.shutdown().await;
        });
    }
}
