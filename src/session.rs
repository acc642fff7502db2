use std::future::Future;
use std::io;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::game::{Board, Mark, Outcome, random_empty_cell};
use crate::protocol::{
    MODE_PROMPT, MODE_REPLY_LEN, MOVE_LEN, Mode, Seat, Turn, decode_mode, decode_move,
    encode_result,
};

/// One game between two paired connections.
///
/// Everything happens sequentially on the task that calls [`Session::run`];
/// the session owns both streams and closes them when it returns.
pub struct Session<S> {
    players: [S; 2],
    board: Board,
    current: Mark,
    io_timeout: Option<Duration>,
    rng: StdRng,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(player1: S, player2: S, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            players: [player1, player2],
            board: Board::new(),
            current: Mark::X,
            io_timeout: config.io_timeout,
            rng,
        }
    }

    /// Runs mode selection and the turn loop to a win or draw, then sends
    /// the result to both players.
    pub async fn run(mut self) -> Result<Outcome, SessionError> {
        let result = self.play().await;
        self.close().await;
        result
    }

    async fn play(&mut self) -> Result<Outcome, SessionError> {
        let mode = self.select_mode().await?;
        info!(%mode, "game started");

        loop {
            for &turn in mode.round() {
                match turn {
                    Turn::Human(seat) => self.human_turn(seat).await?,
                    Turn::Computer => self.computer_turn().await?,
                }

                let outcome = self.board.evaluate();
                if let Some(result) = encode_result(outcome) {
                    self.broadcast(result.as_bytes()).await?;
                    debug!(?outcome, "game finished");
                    return Ok(outcome);
                }
            }
        }
    }

    async fn select_mode(&mut self) -> Result<Mode, SessionError> {
        self.send(Seat::First, MODE_PROMPT.as_bytes()).await?;

        let mut reply = [0u8; MODE_REPLY_LEN];
        self.recv(Seat::First, &mut reply).await?;
        trace!(?reply, "mode reply");

        Ok(decode_mode(&reply)?)
    }

    /// Bad coordinates and occupied cells both consume the turn without
    /// placing anything or telling the player.
    async fn human_turn(&mut self, seat: Seat) -> Result<(), SessionError> {
        let frame = self.board.render();
        self.send(seat, frame.as_bytes()).await?;

        let mut bytes = [0u8; MOVE_LEN];
        self.recv(seat, &mut bytes).await?;

        match decode_move(bytes) {
            Ok((row, col)) => self.apply(row, col),
            Err(err) => warn!(?seat, %err, "move ignored"),
        }
        Ok(())
    }

    async fn computer_turn(&mut self) -> Result<(), SessionError> {
        let Some((row, col)) = random_empty_cell(&self.board, &mut self.rng) else {
            return Ok(());
        };
        self.apply(row, col);

        let frame = self.board.render();
        self.broadcast(frame.as_bytes()).await
    }

    /// The current mark only advances when the placement succeeds.
    fn apply(&mut self, row: usize, col: usize) {
        if self.board.place(row, col, self.current) {
            debug!(mark = %self.current, row, col, "mark placed");
            self.current = self.current.opponent();
        } else {
            debug!(row, col, "cell occupied, turn skipped");
        }
    }

    async fn send(&mut self, seat: Seat, bytes: &[u8]) -> Result<(), SessionError> {
        let stream = &mut self.players[seat.index()];
        with_timeout(self.io_timeout, async {
            stream.write_all(bytes).await?;
            stream.flush().await
        })
        .await
    }

    async fn recv(&mut self, seat: Seat, buf: &mut [u8]) -> Result<(), SessionError> {
        let stream = &mut self.players[seat.index()];
        with_timeout(self.io_timeout, stream.read_exact(buf)).await?;
        Ok(())
    }

    async fn broadcast(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        self.send(Seat::First, bytes).await?;
        self.send(Seat::Second, bytes).await
    }

    async fn close(&mut self) {
        for stream in &mut self.players {
            if let Err(err) = stream.shutdown().await {
                trace!(%err, "shutdown after game");
            }
        }
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, io: F) -> Result<T, SessionError>
where
    F: Future<Output = io::Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, io)
            .await
            .map_err(|_| SessionError::TimedOut(limit))?
            .map_err(SessionError::from),
        None => io.await.map_err(SessionError::from),
    }
}
