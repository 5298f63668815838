//! Terminal chat client.
//!
//! Demonstrates:
//! - Opening the relay against a WebSocket chat server
//! - Feeding stdin lines into the relay as submissions
//! - Printing the transcript (`[you]` / `[peer]`) to stdout
//!
//! Usage:
//!   cargo run --example chat
//!   cargo run --example chat -- --url ws://localhost:3333
//!   cargo run --example chat -- --envelope --confirm-open
//!   cargo run --example chat -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use chat_relay::{
    Error, InputSource, LineInput, RelayBuilder, Result, Submitted, WriterTranscript,
};
use common::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    eprintln!("Connecting to {} ...", args.url);

    let mut relay = RelayBuilder::new()
        .address(args.url.as_str())
        .options(args.options())
        .connect(LineInput::new(), WriterTranscript::stdout())?;

    match relay.wait_open().await {
        Ok(()) => eprintln!("Connected. Type a message and press Enter (Ctrl+D to quit)."),
        // Keep going: submissions still show up, which makes the failure visible.
        Err(e) => eprintln!("[WARN] {e}"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut peer_alive = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                relay.input_mut().set(line);
                match relay.submit() {
                    Ok(Submitted::Undelivered) => eprintln!("[WARN] not delivered, connection is {}", relay.state()),
                    Ok(_) => {}
                    Err(Error::NotOpen { state }) => {
                        eprintln!("[WARN] connection is {state}, message not sent");
                        relay.input_mut().clear();
                    }
                    Err(e) => return Err(e),
                }
            }

            alive = relay.pump(), if peer_alive => {
                if !alive {
                    eprintln!("[INFO] connection closed by peer");
                    peer_alive = false;
                }
            }
        }
    }

    Ok(())
}
