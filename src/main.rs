fn main() {
    println!("Tic Tac Toe - 2 Player Network Game");
    println!();
    println!("Usage:");
    println!("  Start the server:   cargo run --bin server -- [--bind ADDR] [-v]");
    println!("  Connect a client:   cargo run --bin client -- [host:port]");
    println!();
    println!("The server listens on port {}.", tictactoe_host::config::DEFAULT_PORT);
    println!("The first of each two clients picks the mode:");
    println!("  HumanVsHuman, HumanVsComputer or ComputerVsComputer.");
    println!("Moves are two digits, row then column, e.g. 11 for the center.");
}
