//! In-memory remote used by the upload tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use boxlift_transfer::{Chunk, ChunkProgress, ContentHasher, ProgressSink};

use crate::transport::{Failure, LinkSharer, SessionTransport, TransportFuture};
use crate::types::{CommitInfo, RemoteFile};

/// A transport call as seen by the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start { len: u64 },
    Append { offset: u64, len: u64 },
    Finish { offset: u64, len: u64 },
    Simple { len: u64 },
}

/// Scripted misbehaviour for one call.
#[derive(Debug, Clone)]
pub enum Injection {
    /// Connection drop. With `accepted` the bytes are stored first,
    /// which models a lost acknowledgement.
    Transient { accepted: bool },
    Advised { delay: Duration },
    /// Store the bytes, then cut the session back to `correct`.
    Mismatch { correct: u64 },
    Fatal(String),
    /// Return this failure untouched.
    Failure(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Create,
    ExistingOnly,
    Broken,
}

struct State {
    next_session: u32,
    sessions: HashMap<String, Vec<u8>>,
    files: HashMap<String, Vec<u8>>,
    calls: Vec<Call>,
    bytes_sent: u64,
    injections: HashMap<usize, Injection>,
    link_mode: LinkMode,
    corrupt_hash: bool,
}

pub struct MemoryRemote {
    state: Mutex<State>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_session: 0,
                sessions: HashMap::new(),
                files: HashMap::new(),
                calls: Vec::new(),
                bytes_sent: 0,
                injections: HashMap::new(),
                link_mode: LinkMode::Create,
                corrupt_hash: false,
            }),
        }
    }

    /// Scripts the 1-based transport call `call`.
    pub fn inject(&self, call: usize, injection: Injection) {
        self.state.lock().unwrap().injections.insert(call, injection);
    }

    pub fn set_link_mode(&self, mode: LinkMode) {
        self.state.lock().unwrap().link_mode = mode;
    }

    /// Makes committed files report a bogus content hash.
    pub fn corrupt_hash(&self) {
        self.state.lock().unwrap().corrupt_hash = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn bytes_sent(&self) -> u64 {
        self.state.lock().unwrap().bytes_sent
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    /// Records the call and returns its scripted injection, if any.
    fn record(&self, call: Call, len: u64) -> Option<Injection> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.bytes_sent += len;
        let number = state.calls.len();
        state.injections.remove(&number)
    }

    fn commit(&self, path: &str, data: Vec<u8>) -> RemoteFile {
        let mut state = self.state.lock().unwrap();
        let mut hasher = ContentHasher::new();
        hasher.update(&data);
        let content_hash = if state.corrupt_hash {
            "0".repeat(64)
        } else {
            hasher.finalize()
        };

        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        let file = RemoteFile {
            id: format!("id:{}", state.files.len()),
            name,
            path_lower: path.to_lowercase(),
            path_display: path.to_string(),
            size: data.len() as u64,
            rev: "015f".into(),
            content_hash: Some(content_hash),
        };
        state.files.insert(path.to_string(), data);
        file
    }

    /// Applies a session write, honouring the scripted injection.
    fn write_session(
        &self,
        session_id: &str,
        chunk: &Chunk,
        injection: Option<Injection>,
        progress: ChunkProgress<'_>,
    ) -> Result<(), Failure> {
        let mut state = self.state.lock().unwrap();
        let held = state
            .sessions
            .get(session_id)
            .map(|data| data.len() as u64)
            .ok_or_else(|| Failure::Fatal(format!("unknown session {session_id}")))?;

        let store = |state: &mut State| {
            if let Some(data) = state.sessions.get_mut(session_id) {
                data.extend_from_slice(&chunk.data);
            }
            progress.sent(chunk.len() / 2);
        };

        match injection {
            None => {}
            Some(Injection::Transient { accepted }) => {
                if accepted && held == chunk.offset {
                    store(&mut *state);
                }
                return Err(Failure::NetworkTransient("connection reset".into()));
            }
            Some(Injection::Advised { delay }) => return Err(Failure::RetryAdvised(delay)),
            Some(Injection::Mismatch { correct }) => {
                if held == chunk.offset {
                    store(&mut *state);
                }
                if let Some(data) = state.sessions.get_mut(session_id) {
                    data.truncate(correct as usize);
                }
                return Err(Failure::OffsetMismatch(correct));
            }
            Some(Injection::Fatal(msg)) => return Err(Failure::Fatal(msg)),
            Some(Injection::Failure(failure)) => return Err(failure),
        }

        if held != chunk.offset {
            return Err(Failure::OffsetMismatch(held));
        }
        store(&mut *state);
        Ok(())
    }
}

impl SessionTransport for MemoryRemote {
    fn start_session<'a>(
        &'a self,
        chunk: &'a Chunk,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, String> {
        Box::pin(async move {
            let injection = self.record(Call::Start { len: chunk.len() }, chunk.len());
            match injection {
                None => {}
                Some(Injection::Transient { .. }) => {
                    return Err(Failure::NetworkTransient("connection reset".into()));
                }
                Some(Injection::Advised { delay }) => return Err(Failure::RetryAdvised(delay)),
                Some(Injection::Mismatch { correct }) => {
                    return Err(Failure::OffsetMismatch(correct));
                }
                Some(Injection::Fatal(msg)) => return Err(Failure::Fatal(msg)),
                Some(Injection::Failure(failure)) => return Err(failure),
            }

            let mut state = self.state.lock().unwrap();
            state.next_session += 1;
            let id = format!("session-{}", state.next_session);
            state.sessions.insert(id.clone(), chunk.data.clone());
            progress.sent(chunk.len() / 2);
            Ok(id)
        })
    }

    fn append_chunk<'a>(
        &'a self,
        session_id: &'a str,
        chunk: &'a Chunk,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let call = Call::Append {
                offset: chunk.offset,
                len: chunk.len(),
            };
            let injection = self.record(call, chunk.len());
            self.write_session(session_id, chunk, injection, progress)
        })
    }

    fn finish_session<'a>(
        &'a self,
        session_id: &'a str,
        chunk: &'a Chunk,
        commit: &'a CommitInfo,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, RemoteFile> {
        Box::pin(async move {
            let call = Call::Finish {
                offset: chunk.offset,
                len: chunk.len(),
            };
            let injection = self.record(call, chunk.len());
            self.write_session(session_id, chunk, injection, progress)?;

            let data = self
                .state
                .lock()
                .unwrap()
                .sessions
                .remove(session_id)
                .unwrap_or_default();
            Ok(self.commit(&commit.path, data))
        })
    }

    fn upload_simple<'a>(
        &'a self,
        data: &'a [u8],
        commit: &'a CommitInfo,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, RemoteFile> {
        Box::pin(async move {
            let len = data.len() as u64;
            match self.record(Call::Simple { len }, len) {
                None => {}
                Some(Injection::Transient { .. }) => {
                    return Err(Failure::NetworkTransient("connection reset".into()));
                }
                Some(Injection::Advised { delay }) => return Err(Failure::RetryAdvised(delay)),
                Some(Injection::Mismatch { correct }) => {
                    return Err(Failure::OffsetMismatch(correct));
                }
                Some(Injection::Fatal(msg)) => return Err(Failure::Fatal(msg)),
                Some(Injection::Failure(failure)) => return Err(failure),
            }
            progress.sent(len / 2);
            Ok(self.commit(&commit.path, data.to_vec()))
        })
    }
}

impl LinkSharer for MemoryRemote {
    fn create_link<'a>(&'a self, remote_path: &'a str) -> TransportFuture<'a, String> {
        Box::pin(async move {
            match self.state.lock().unwrap().link_mode {
                LinkMode::Create => Ok(format!("https://share.test/s{remote_path}")),
                LinkMode::ExistingOnly => {
                    Err(Failure::Fatal("shared_link_already_exists".into()))
                }
                LinkMode::Broken => Err(Failure::Fatal("sharing disabled".into())),
            }
        })
    }

    fn list_links<'a>(&'a self, remote_path: &'a str) -> TransportFuture<'a, Vec<String>> {
        Box::pin(async move {
            match self.state.lock().unwrap().link_mode {
                LinkMode::Broken => Err(Failure::Fatal("sharing disabled".into())),
                _ => Ok(vec![format!("https://share.test/existing{remote_path}")]),
            }
        })
    }
}

/// Records every progress report.
#[derive(Default)]
pub struct RecordingProgress {
    values: Mutex<Vec<u64>>,
}

impl RecordingProgress {
    pub fn values(&self) -> Vec<u64> {
        self.values.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn on_progress(&self, bytes_so_far: u64, _total_bytes: u64) {
        self.values.lock().unwrap().push(bytes_so_far);
    }
}

/// Deterministic, non-repeating-per-chunk test content.
pub fn source_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

pub fn write_source(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
