//! Two-player tic-tac-toe host over raw TCP.
//!
//! - [`game`] holds the board, win/draw evaluation and the random
//!   computer player.
//! - [`protocol`] defines the fixed-size byte framing and the [`Mode`]
//!   schedule.
//! - [`session`] runs one game between two connections.
//! - [`listener`] pairs connections in arrival order and supervises one
//!   task per game.

pub mod config;
pub mod error;
pub mod game;
pub mod listener;
pub mod logger;
pub mod protocol;
pub mod session;

pub use config::{ServerArgs, ServerConfig, SessionConfig};
pub use error::{ListenerError, SessionError};
pub use game::{Board, Cell, Mark, Outcome};
pub use listener::{Listener, ServeSummary, SessionStats};
pub use protocol::{Mode, ProtocolError, UnrecognizedMode};
pub use session::Session;
