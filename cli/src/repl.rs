use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub fn prompt() -> Result<(), String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "$ ").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}

/// Read stdin lines on a background task so the host loop keeps ticking
/// while waiting for input. The channel closes on EOF.
pub fn spawn_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}
