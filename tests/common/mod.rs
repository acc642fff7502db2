//! Client-side helpers that speak the raw wire protocol.
#![allow(dead_code)]

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use tictactoe_host::protocol::{BOARD_FRAME_LEN, MODE_PROMPT, MODE_REPLY_LEN};

pub async fn read_prompt<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut buf = vec![0u8; MODE_PROMPT.len()];
    stream.read_exact(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

/// Sends `literal` space-padded to the 20-byte reply, valid mode or not.
pub async fn choose_mode<S: AsyncWrite + Unpin>(stream: &mut S, literal: &str) {
    let mut reply = [b' '; MODE_REPLY_LEN];
    reply[..literal.len()].copy_from_slice(literal.as_bytes());
    stream.write_all(&reply).await.unwrap();
}

pub async fn play<S: AsyncWrite + Unpin>(stream: &mut S, row: usize, col: usize) {
    send_raw(stream, &[b'0' + row as u8, b'0' + col as u8]).await;
}

pub async fn send_raw<S: AsyncWrite + Unpin>(stream: &mut S, bytes: &[u8]) {
    stream.write_all(bytes).await.unwrap();
}

/// Reads one board frame, or whatever arrives before EOF. Anything
/// shorter than a frame is the result message.
pub async fn next_message<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut buf = vec![0u8; BOARD_FRAME_LEN];
    let mut filled = 0;
    while filled < BOARD_FRAME_LEN {
        let n = stream.read(&mut buf[filled..]).await.unwrap();
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    String::from_utf8(buf).unwrap()
}

pub fn is_result(message: &str) -> bool {
    message.len() < BOARD_FRAME_LEN
}

/// Everything left on the stream until the server closes it.
pub async fn read_rest<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).await.unwrap();
    String::from_utf8(rest).unwrap()
}

pub fn first_empty(frame: &str) -> (usize, usize) {
    frame
        .lines()
        .enumerate()
        .flat_map(|(row, line)| line.chars().enumerate().map(move |(col, c)| (row, col, c)))
        .find(|&(_, _, c)| c == ' ')
        .map(|(row, col, _)| (row, col))
        .expect("frame has an empty cell")
}

pub fn count(frame: &str, mark: char) -> usize {
    frame.chars().filter(|&c| c == mark).count()
}

/// Plays player 1 by always taking the first empty cell. After each of
/// its moves, `computer_turns` board frames may follow before the next
/// turn. Returns the result and every computer frame seen.
pub async fn drive_player_one<S>(stream: &mut S, computer_turns: usize) -> (String, Vec<String>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut computer_frames = Vec::new();
    let mut message = next_message(stream).await;
    loop {
        if is_result(&message) {
            return (message, computer_frames);
        }
        let (row, col) = first_empty(&message);
        play(stream, row, col).await;

        for _ in 0..computer_turns {
            message = next_message(stream).await;
            if is_result(&message) {
                return (message, computer_frames);
            }
            computer_frames.push(message.clone());
        }
        message = next_message(stream).await;
    }
}
