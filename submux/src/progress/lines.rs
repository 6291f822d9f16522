//! Line reassembly for the tool's diagnostic byte stream.
//!
//! ffmpeg rewrites its status line in place using bare carriage returns, so
//! the stream cannot be split on `\n` alone. A line here is a maximal run of
//! bytes containing neither CR nor LF, and any contiguous run of CR/LF bytes
//! (`\r\n`, `\r\r`, bare `\r`, ...) counts as a single delimiter.

use std::collections::VecDeque;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read size per chunk.
const CHUNK_SIZE: usize = 1024;

/// Incremental line reader over an append-only byte source.
///
/// Partial trailing data with no terminator is carried over to the next
/// chunk; no byte is dropped or duplicated across chunk boundaries. An
/// unterminated fragment still pending at end-of-stream is discarded.
pub struct LineReader<R> {
    source: R,
    /// Carry-over bytes not yet terminated by a delimiter.
    partial: Vec<u8>,
    /// Complete lines ready to be handed out.
    ready: VecDeque<Vec<u8>>,
    eof: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            partial: Vec::new(),
            ready: VecDeque::new(),
            eof: false,
        }
    }

    /// Next complete line, or `None` once the source is exhausted.
    pub async fn next_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Ok(Some(line));
            }
            if self.eof {
                return Ok(None);
            }

            let mut chunk = [0u8; CHUNK_SIZE];
            let n = self.source.read(&mut chunk).await?;
            if n == 0 {
                self.eof = true;
                // Matches the observed tool behavior: an unterminated tail
                // at end-of-stream is not yielded as a line.
                self.partial.clear();
                continue;
            }

            self.partial.extend_from_slice(&chunk[..n]);
            self.split_partial();
        }
    }

    /// Move every terminated line out of `partial`, leaving the trailing
    /// unterminated fragment (possibly empty) in place.
    fn split_partial(&mut self) {
        let buf = &self.partial;
        let mut consumed = 0;
        let mut i = 0;

        while i < buf.len() {
            if buf[i] == b'\r' || buf[i] == b'\n' {
                if i > consumed {
                    self.ready.push_back(buf[consumed..i].to_vec());
                }
                while i < buf.len() && (buf[i] == b'\r' || buf[i] == b'\n') {
                    i += 1;
                }
                consumed = i;
            } else {
                i += 1;
            }
        }

        self.partial.drain(..consumed);
    }
}
