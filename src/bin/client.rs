use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use tictactoe_host::Mode;
use tictactoe_host::protocol::{encode_mode_reply, encode_move};

/// Terminal client for the tic-tac-toe host.
#[derive(Parser, Debug)]
#[command(name = "client", version)]
struct Args {
    /// Server address
    #[arg(default_value = "127.0.0.1:5500")]
    addr: String,
}

/// Turns one line of user input into the bytes the server expects:
/// a mode name becomes the padded mode reply, `rc`, `r c` or `r,c`
/// becomes a move.
fn encode_line(line: &str) -> Option<Vec<u8>> {
    let line = line.trim();
    if let Ok(mode) = Mode::from_str(line) {
        return Some(encode_mode_reply(mode).to_vec());
    }

    let digits: Vec<usize> = line
        .chars()
        .filter(|c| !matches!(c, ' ' | ','))
        .map(|c| c.to_digit(10).map(|d| d as usize))
        .collect::<Option<_>>()?;
    match digits[..] {
        [row, col] => encode_move(row, col).ok().map(|m| m.to_vec()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Connecting to {}...", args.addr);
    let stream = TcpStream::connect(&args.addr)
        .await
        .with_context(|| format!("failed to connect to {}", args.addr))?;
    println!("Connected! Waiting for the game to start.");

    let (mut reader, mut writer) = stream.into_split();

    let mut printer = tokio::spawn(async move {
        let mut stdout = io::stdout();
        let mut buffer = vec![0u8; 1024];
        loop {
            match reader.read(&mut buffer).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if stdout.write_all(&buffer[..n]).await.is_err() {
                        break;
                    }
                    stdout.flush().await.ok();
                }
            }
        }
    });

    let mut lines = BufReader::new(io::stdin()).lines();
    let server_closed = loop {
        tokio::select! {
            _ = &mut printer => break true,
            line = lines.next_line() => {
                let Some(line) = line? else { break false };
                match encode_line(&line) {
                    Some(bytes) => writer.write_all(&bytes).await?,
                    None => eprintln!("Enter a mode name or a move like 11 (row, column 0-2)."),
                }
            }
        }
    };

    if !server_closed {
        printer.await.ok();
    }
    println!("\nDisconnected from server.");
    Ok(())
}
