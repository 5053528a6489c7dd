//! Shared output buffers filled by reader threads

use std::io::{ErrorKind, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use regex::bytes::Regex;

/// Maximum output retained per stream (10MB)
pub const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

const TRUNCATION_MARKER: &[u8] = b"\n[output truncated at 10MB]";

/// Outcome of looking for a pattern in the unread part of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Pattern matched; the read cursor now sits after the match
    Found,
    /// No match yet, but more output may still arrive
    Pending,
    /// No match and the stream is closed, so none will ever come
    Exhausted,
}

#[derive(Debug, Default)]
struct BufferState {
    data: Vec<u8>,
    cursor: usize,
    closed: bool,
    truncated: bool,
}

/// Append-only byte buffer with a read cursor.
///
/// Cloning yields another handle to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<BufferState>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append bytes, dropping anything beyond [`MAX_OUTPUT_SIZE`]
    pub fn append(&self, bytes: &[u8]) {
        let mut state = self.lock();
        if state.truncated {
            return;
        }
        let remaining = MAX_OUTPUT_SIZE.saturating_sub(state.data.len());
        if bytes.len() > remaining {
            state.data.extend_from_slice(&bytes[..remaining]);
            state.data.extend_from_slice(TRUNCATION_MARKER);
            state.truncated = true;
        } else {
            state.data.extend_from_slice(bytes);
        }
    }

    /// Mark the stream as finished; no more bytes will be appended
    pub fn close(&self) {
        self.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Everything captured so far, regardless of the read cursor
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock().data).to_string()
    }

    /// Captured output the cursor has not yet moved past
    pub fn unread(&self) -> String {
        let state = self.lock();
        String::from_utf8_lossy(&state.data[state.cursor..]).to_string()
    }

    /// Look for `pattern` after the cursor and advance past it on success
    pub fn consume_match(&self, pattern: &Regex) -> MatchState {
        let mut state = self.lock();
        let found = pattern
            .find(&state.data[state.cursor..])
            .map(|m| m.end());
        match found {
            Some(end) => {
                state.cursor += end;
                MatchState::Found
            }
            None if state.closed => MatchState::Exhausted,
            None => MatchState::Pending,
        }
    }
}

/// Drain `stream` into `buffer` on a background thread, closing the buffer at EOF
pub(crate) fn spawn_reader<R>(stream: R, buffer: OutputBuffer, label: &'static str) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        read_into(stream, &buffer, label);
        buffer.close();
    })
}

fn read_into<R: Read>(mut stream: R, buffer: &OutputBuffer, label: &'static str) {
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                tracing::debug!(stream = label, "{}", String::from_utf8_lossy(&chunk[..n]).trim_end());
                buffer.append(&chunk[..n]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(stream = label, error = %e, "error reading child output");
                break;
            }
        }
    }
}
