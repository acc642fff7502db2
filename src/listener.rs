//! Accept loop: pairs inbound connections in arrival order and runs one
//! [`Session`] task per pair.
//!
//! Sessions share nothing. A failed or panicking session is logged and
//! counted; the accept loop keeps going. Shutdown stops accepting, gives
//! running games `drain_timeout` to finish, then aborts the rest.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinError, JoinSet};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{ServerConfig, SessionConfig};
use crate::error::{ListenerError, SessionError};
use crate::game::Outcome;
use crate::session::Session;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Live counters, readable while the listener is serving.
#[derive(Debug, Default)]
pub struct SessionStats {
    started: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    panicked: AtomicUsize,
    aborted: AtomicUsize,
}

impl SessionStats {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn panicked(&self) -> usize {
        self.panicked.load(Ordering::Relaxed)
    }

    /// Cancelled at shutdown after the drain timeout.
    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Sessions spawned and not yet reaped.
    pub fn active(&self) -> usize {
        self.started().saturating_sub(
            self.completed() + self.failed() + self.panicked() + self.aborted(),
        )
    }
}

/// Final tally returned by [`Listener::serve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub started: usize,
    pub completed: usize,
    pub failed: usize,
    pub panicked: usize,
    /// Still running when the drain timeout expired.
    pub aborted: usize,
}

type SessionResult = Result<Outcome, SessionError>;

struct SessionRegistry {
    tasks: JoinSet<SessionResult>,
    next_id: u64,
    stats: Arc<SessionStats>,
}

impl SessionRegistry {
    fn new(stats: Arc<SessionStats>) -> Self {
        Self {
            tasks: JoinSet::new(),
            next_id: 1,
            stats,
        }
    }

    fn spawn(
        &mut self,
        first: (TcpStream, SocketAddr),
        second: (TcpStream, SocketAddr),
        base: SessionConfig,
    ) {
        let id = self.next_id;
        self.next_id += 1;

        let (player1, addr1) = first;
        let (player2, addr2) = second;
        // distinct but reproducible computer moves per game
        let config = SessionConfig {
            seed: base.seed.map(|seed| seed.wrapping_add(id)),
            ..base
        };
        let span = info_span!("session", id, player1 = %addr1, player2 = %addr2);

        self.stats.started.fetch_add(1, Ordering::Relaxed);
        self.tasks.spawn(
            async move {
                let result = Session::new(player1, player2, config).run().await;
                match &result {
                    Ok(outcome) => info!(?outcome, "session complete"),
                    Err(err) => warn!(%err, "session ended early"),
                }
                result
            }
            .instrument(span),
        );
    }

    fn reap(&self, joined: Result<SessionResult, JoinError>) {
        match joined {
            Ok(Ok(_)) => {
                self.stats.completed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Err(_)) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) if err.is_panic() => {
                error!(%err, "session panicked");
                self.stats.panicked.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                debug!(%err, "session cancelled");
                self.stats.aborted.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Waits up to `limit` for running sessions, then aborts the rest.
    async fn drain(&mut self, limit: Duration) {
        if !self.tasks.is_empty() {
            info!(live = self.tasks.len(), "waiting for running games");
        }

        let deadline = tokio::time::sleep(limit);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                joined = self.tasks.join_next() => match joined {
                    Some(joined) => self.reap(joined),
                    None => break,
                },
                _ = &mut deadline => break,
            }
        }

        if !self.tasks.is_empty() {
            warn!(live = self.tasks.len(), "aborting games still running");
            self.tasks.abort_all();
            // a game that finished before the abort landed still counts as finished
            while let Some(joined) = self.tasks.join_next().await {
                self.reap(joined);
            }
        }
    }

    fn summary(&self) -> ServeSummary {
        ServeSummary {
            started: self.stats.started(),
            completed: self.stats.completed(),
            failed: self.stats.failed(),
            panicked: self.stats.panicked(),
            aborted: self.stats.aborted(),
        }
    }
}

pub struct Listener {
    listener: TcpListener,
    config: ServerConfig,
    stats: Arc<SessionStats>,
}

impl Listener {
    pub async fn bind(config: ServerConfig) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|source| ListenerError::Bind { addr: config.bind, source })?;
        Ok(Self {
            listener,
            config,
            stats: Arc::default(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ListenerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    /// Accepts connections until `shutdown` resolves. The first connection
    /// of each pair is player 1 (X) and picks the mode.
    ///
    /// A connection still waiting for a partner at shutdown is dropped.
    pub async fn serve<F>(self, shutdown: F) -> ServeSummary
    where
        F: Future<Output = ()>,
    {
        let mut registry = SessionRegistry::new(Arc::clone(&self.stats));
        let mut waiting: Option<(TcpStream, SocketAddr)> = None;
        tokio::pin!(shutdown);

        info!(addr = ?self.listener.local_addr().ok(), "waiting for players");

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                Some(joined) = registry.tasks.join_next(), if !registry.tasks.is_empty() => {
                    registry.reap(joined);
                }

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => match waiting.take() {
                        None => {
                            info!(%peer, "player 1 connected, waiting for player 2");
                            waiting = Some((stream, peer));
                        }
                        Some(first) => {
                            info!(%peer, "player 2 connected, starting game");
                            registry.spawn(first, (stream, peer), self.config.session);
                        }
                    },
                    Err(err) => {
                        warn!(%err, "accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        if let Some((_, peer)) = waiting.take() {
            info!(%peer, "dropping unpaired connection");
        }
        info!("listener stopped");

        registry.drain(self.config.drain_timeout).await;
        let summary = registry.summary();
        info!(?summary, "shutdown complete");
        summary
    }
}
