use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_PORT: u16 = 5500;
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-session knobs handed to every [`Session`](crate::session::Session).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Applies to each read and write on a player connection. `None`
    /// waits forever.
    pub io_timeout: Option<Duration>,
    /// Seed for the computer player. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// How long shutdown waits for running sessions before aborting them.
    pub drain_timeout: Duration,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            session: SessionConfig::default(),
        }
    }
}

/// Tic-tac-toe host: pairs connections two at a time and runs one game per pair.
#[derive(Parser, Debug)]
#[command(name = "server", version)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(short, long, default_value_t = SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))]
    pub bind: SocketAddr,

    /// Drop a player that stays silent this many seconds (0 = wait forever)
    #[arg(long, default_value_t = 0)]
    pub io_timeout_secs: u64,

    /// Seconds to wait for running games on shutdown
    #[arg(long, default_value_t = DEFAULT_DRAIN_TIMEOUT.as_secs())]
    pub drain_timeout_secs: u64,

    /// Seed for computer moves, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Increase log detail (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ServerArgs {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            drain_timeout: Duration::from_secs(self.drain_timeout_secs),
            session: SessionConfig {
                io_timeout: (self.io_timeout_secs > 0)
                    .then(|| Duration::from_secs(self.io_timeout_secs)),
                seed: self.seed,
            },
        }
    }
}
