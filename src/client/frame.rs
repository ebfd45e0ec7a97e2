//! Incremental decoder for the relay's `text/event-stream` body.
//!
//! Bytes arrive in arbitrary chunks. Only newline-terminated lines are ever
//! parsed; anything after the last newline waits for the next chunk.

use serde_json::Value;
use tracing::{debug, warn};

use crate::message::{DATA_PREFIX, DONE_SENTINEL};

/// Upper bound on text held between reads: a pushed-back line or an
/// unterminated line longer than this is dropped.
pub const DEFAULT_MAX_BUFFERED: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Incremental assistant text.
    Delta(String),
    /// The `data: [DONE]` sentinel.
    Done,
}

#[derive(Debug)]
pub struct FrameDecoder {
    /// Trailing bytes of an incomplete UTF-8 sequence.
    pending: Vec<u8>,
    buffer: String,
    max_buffered: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_buffered(DEFAULT_MAX_BUFFERED)
    }

    pub fn with_max_buffered(max_buffered: usize) -> Self {
        Self { pending: Vec::new(), buffer: String::new(), max_buffered }
    }

    /// Text received but not yet consumed as a complete line.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Decode one chunk and return the frames it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.decode(chunk);
        let frames = self.parse_lines(false);
        self.bound_unterminated_tail();
        frames
    }

    /// End of stream: drain remaining complete lines.
    ///
    /// Lines that still fail to parse are dropped, and an unterminated
    /// trailing fragment is discarded rather than parsed.
    pub fn finish(&mut self) -> Vec<Frame> {
        let frames = self.parse_lines(true);
        if !self.buffer.is_empty() || !self.pending.is_empty() {
            debug!(
                leftover = self.buffer.len() + self.pending.len(),
                "discarding unterminated data at end of stream"
            );
        }
        self.buffer.clear();
        self.pending.clear();
        frames
    }

    /// Drop the text after the last newline once it outgrows the bound.
    fn bound_unterminated_tail(&mut self) {
        let start = self.buffer.rfind('\n').map_or(0, |idx| idx + 1);
        let tail = self.buffer.len() - start;
        if tail > self.max_buffered {
            warn!(len = tail, max = self.max_buffered, "dropping oversized unterminated stream line");
            self.buffer.truncate(start);
        }
    }

    fn decode(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);

        let mut consumed = 0;
        while consumed < self.pending.len() {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    consumed = self.pending.len();
                }
                Err(e) => {
                    let valid = consumed + e.valid_up_to();
                    self.buffer.push_str(&String::from_utf8_lossy(&self.pending[consumed..valid]));
                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            consumed = valid + len;
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            consumed = valid;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..consumed);
    }

    fn parse_lines(&mut self, draining: bool) -> Vec<Frame> {
        let mut frames = Vec::new();

        while let Some(idx) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=idx).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let payload = rest.trim();

            if payload == DONE_SENTINEL {
                frames.push(Frame::Done);
                break;
            }

            match serde_json::from_str::<Value>(payload) {
                Ok(event) => {
                    if let Some(content) = delta_content(&event) {
                        frames.push(Frame::Delta(content.to_string()));
                    }
                }
                Err(e) => {
                    if draining || self.buffer.len() + line.len() + 1 > self.max_buffered {
                        warn!(error = %e, len = line.len(), "dropping unparseable stream line");
                        continue;
                    }
                    // Possibly incomplete: put it back and wait for more bytes.
                    line.push('\n');
                    self.buffer.insert_str(0, &line);
                    break;
                }
            }
        }

        frames
    }
}

/// `choices[0].delta.content`, when present and non-empty.
pub fn delta_content(event: &Value) -> Option<&str> {
    event
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
