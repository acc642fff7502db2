use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::UnrecognizedMode;

/// Why a single session stopped before reaching a result.
///
/// None of these reach the accept loop; the listener logs and counts them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("player 1 sent an unrecognized mode {0:?}")]
    UnrecognizedMode(String),
    #[error("a player disconnected mid-game")]
    Disconnected,
    #[error("no data from a player within {0:?}")]
    TimedOut(Duration),
    #[error("connection I/O failed: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => SessionError::Disconnected,
            _ => SessionError::Io(err),
        }
    }
}

impl From<UnrecognizedMode> for SessionError {
    fn from(UnrecognizedMode(literal): UnrecognizedMode) -> Self {
        SessionError::UnrecognizedMode(literal)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("listener socket error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_connections_map_to_disconnected() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(SessionError::from(eof), SessionError::Disconnected));

        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(SessionError::from(reset), SessionError::Disconnected));

        let other = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(SessionError::from(other), SessionError::Io(_)));
    }

    #[test]
    fn unrecognized_mode_keeps_the_literal() {
        let err = SessionError::from(UnrecognizedMode("Chess".into()));
        assert!(matches!(err, SessionError::UnrecognizedMode(ref s) if s == "Chess"));
    }
}
