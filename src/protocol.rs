//! Byte-level framing shared by the server and the bundled client.
//!
//! There is no length prefix. Each message has a fixed size except the
//! board frame (always 12 bytes for a 3x3 grid) and the final result,
//! which is followed by the server closing the connection.
//!
//! | Direction        | Message      | Size            |
//! |------------------|--------------|-----------------|
//! | server → player1 | mode prompt  | [`MODE_PROMPT`] |
//! | player1 → server | mode reply   | 20 bytes        |
//! | server → player  | board frame  | 12 bytes        |
//! | player → server  | move         | 2 bytes         |
//! | server → both    | result       | until EOF       |

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::game::{BOARD_SIZE, Outcome};

pub const MODE_PROMPT: &str = "Choose mode: ";
pub const MODE_REPLY_LEN: usize = 20;
pub const MOVE_LEN: usize = 2;
pub const BOARD_FRAME_LEN: usize = BOARD_SIZE * (BOARD_SIZE + 1);

/// Mode reply that names none of the [`Mode`] literals. Holds the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized mode {0:?}")]
pub struct UnrecognizedMode(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed move bytes {0:?}")]
    MalformedMove([u8; MOVE_LEN]),
    #[error("move ({row}, {col}) is outside the board")]
    MoveOutOfRange { row: usize, col: usize },
}

/// Which connection of the pair a human turn is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

/// One sub-turn of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Human(Seat),
    Computer,
}

/// Controller pairing for a session, picked once by player 1.
///
/// The wire literal is the variant name, matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Mode {
    HumanVsHuman,
    HumanVsComputer,
    /// Player 1 still makes the first move of each round; see [`Mode::round`].
    ComputerVsComputer,
}

impl Mode {
    /// Sub-turns of one round. The board is checked for a terminal
    /// outcome after every entry.
    ///
    /// `ComputerVsComputer` opens each round with a real move read from
    /// player 1. Clients rely on this gate, so it is kept.
    pub fn round(self) -> &'static [Turn] {
        match self {
            Mode::HumanVsHuman => &[Turn::Human(Seat::First), Turn::Human(Seat::Second)],
            Mode::HumanVsComputer => &[Turn::Human(Seat::First), Turn::Computer],
            Mode::ComputerVsComputer => {
                &[Turn::Human(Seat::First), Turn::Computer, Turn::Computer]
            }
        }
    }
}

fn is_padding(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

/// Decodes the 20-byte mode reply. Whitespace and control padding
/// (including NUL) is trimmed from both ends before matching.
pub fn decode_mode(bytes: &[u8]) -> Result<Mode, UnrecognizedMode> {
    let text = String::from_utf8_lossy(bytes);
    let literal = text.trim_matches(is_padding);
    Mode::from_str(literal).map_err(|_| UnrecognizedMode(literal.to_owned()))
}

/// Space-padded mode reply, as the bundled client sends it.
pub fn encode_mode_reply(mode: Mode) -> [u8; MODE_REPLY_LEN] {
    let mut reply = [b' '; MODE_REPLY_LEN];
    let literal: &'static str = mode.into();
    reply[..literal.len()].copy_from_slice(literal.as_bytes());
    reply
}

pub fn decode_move(bytes: [u8; MOVE_LEN]) -> Result<(usize, usize), ProtocolError> {
    let [row, col] = bytes;
    if !row.is_ascii_digit() || !col.is_ascii_digit() {
        return Err(ProtocolError::MalformedMove(bytes));
    }
    let (row, col) = ((row - b'0') as usize, (col - b'0') as usize);
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return Err(ProtocolError::MoveOutOfRange { row, col });
    }
    Ok((row, col))
}

pub fn encode_move(row: usize, col: usize) -> Result<[u8; MOVE_LEN], ProtocolError> {
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return Err(ProtocolError::MoveOutOfRange { row, col });
    }
    Ok([b'0' + row as u8, b'0' + col as u8])
}

/// Final message for a terminal outcome; `None` while the game is running.
pub fn encode_result(outcome: Outcome) -> Option<String> {
    match outcome {
        Outcome::InProgress => None,
        Outcome::Win(mark) => Some(format!("{mark} won!")),
        Outcome::Draw => Some("Draw!".to_owned()),
    }
}
