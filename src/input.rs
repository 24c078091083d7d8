// src/input.rs

use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::warn;

/// Forwards each line of `reader` to the session as one user query.
///
/// Runs on a blocking thread. Bytes that are not UTF-8 are replaced rather
/// than ending input; only EOF, a read error or a closed session stop it.
pub fn forward_lines<R: BufRead>(reader: R, queries: &mpsc::Sender<String>) {
    for line in reader.split(b'\n') {
        let mut bytes = match line {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!("Input line is not valid UTF-8, replacing invalid bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        if queries.blocking_send(line).is_err() {
            break;
        }
    }
}
