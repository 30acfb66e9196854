//! Retry/offset controller.
//!
//! Drives a [`SessionTransport`] through the start/append/finish phases and
//! owns the retry budget. Every transport call returns a classified
//! [`Failure`]; the controller decides what it costs:
//!
//! | Failure | Attempt consumed | Offset | Delay |
//! |---|---|---|---|
//! | `NetworkTransient` | yes | unchanged | none |
//! | `RetryAdvised(d)` | yes | unchanged | sleeps `d`, cancellable |
//! | `OffsetMismatch(o)` | yes | replaced by `o` | none |
//! | `Fatal`, `Unauthorized` | no | - | aborts immediately |
//!
//! The file is re-seeked to the committed offset before every attempt,
//! since a failed call may have read bytes the service never accepted.

use std::path::Path;
use std::time::Duration;

use boxlift_transfer::{ChunkPlan, ChunkProgress, ChunkReader, ProgressSink, UploadSession};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::transport::{Failure, SessionTransport};
use crate::types::{CommitInfo, RemoteFile};

/// Default retry budget per upload.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Where a chunked upload currently stands.
///
/// A failed call moves to `Retrying`; the next attempt re-enters the phase
/// matching the committed offset. `Done` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Starting,
    Appending,
    Finishing,
    Retrying,
    Done,
    Aborted,
}

/// Retry bookkeeping for one upload invocation.
#[derive(Debug, Clone)]
pub struct RetryState {
    /// Failed attempts so far.
    pub attempts_used: u32,
    /// Bytes believed committed by the service; the next call starts here.
    pub uploaded_offset: u64,
    pub phase: Phase,
    pub last_error: Option<Failure>,
}

impl RetryState {
    fn new() -> Self {
        Self {
            attempts_used: 0,
            uploaded_offset: 0,
            phase: Phase::NotStarted,
            last_error: None,
        }
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, offset = self.uploaded_offset, "phase change");
            self.phase = phase;
        }
    }
}

/// Outcome of one pass through the phases.
enum Attempt {
    Done(RemoteFile),
    Failed(Failure),
}

/// Runs uploads against a transport with bounded retries.
pub struct RetryController<'a> {
    transport: &'a dyn SessionTransport,
    progress: &'a dyn ProgressSink,
    plan: ChunkPlan,
    max_attempts: u32,
    cancel: CancellationToken,
}

impl<'a> RetryController<'a> {
    /// Creates a controller. A budget of zero is raised to one attempt.
    pub fn new(
        transport: &'a dyn SessionTransport,
        progress: &'a dyn ProgressSink,
        plan: ChunkPlan,
        max_attempts: u32,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            progress,
            plan,
            max_attempts: max_attempts.max(1),
            cancel,
        }
    }

    /// Uploads a small file in a single request.
    ///
    /// Transient and advised failures are retried within the same budget
    /// as chunked uploads.
    pub async fn upload_simple(
        &self,
        local: &Path,
        commit: &CommitInfo,
    ) -> Result<RemoteFile, UploadError> {
        let data = tokio::fs::read(local).await?;
        let size = data.len() as u64;
        let mut state = RetryState::new();

        info!(path = %commit.path, size, "starting simple upload");

        while state.attempts_used < self.max_attempts {
            self.check_cancelled()?;
            let progress = ChunkProgress::new(self.progress, 0, size);

            match self.transport.upload_simple(&data, commit, progress).await {
                Ok(remote) => {
                    progress.sent(size);
                    info!(path = %remote.path_display, "simple upload complete");
                    return Ok(remote);
                }
                Err(Failure::OffsetMismatch(offset)) => {
                    state.enter(Phase::Aborted);
                    return Err(UploadError::Fatal(format!(
                        "unexpected offset mismatch ({offset}) on single-request upload"
                    )));
                }
                Err(failure) => self.recover(&mut state, None, failure, size).await?,
            }
        }

        Err(self.exhausted(state))
    }

    /// Uploads a file of at least one chunk through a session.
    pub async fn chunked_upload_file(
        &self,
        local: &Path,
        commit: &CommitInfo,
    ) -> Result<RemoteFile, UploadError> {
        let mut reader = ChunkReader::open(local)?;
        let size = reader.file_size();
        self.plan.check_chunked(size)?;

        let mut state = RetryState::new();
        let mut session: Option<UploadSession> = None;

        info!(
            path = %commit.path,
            size,
            chunk_size = self.plan.chunk_size(),
            "starting chunked upload"
        );

        while state.attempts_used < self.max_attempts {
            self.check_cancelled()?;
            if state.attempts_used > 0 {
                info!(
                    attempt = state.attempts_used + 1,
                    max = self.max_attempts,
                    offset = state.uploaded_offset,
                    "retrying chunked upload"
                );
            }

            match self
                .attempt(&mut reader, &mut session, &mut state, commit)
                .await?
            {
                Attempt::Done(remote) => {
                    info!(path = %remote.path_display, size, "chunked upload complete");
                    return Ok(remote);
                }
                Attempt::Failed(failure) => {
                    self.recover(&mut state, session.as_mut(), failure, size)
                        .await?
                }
            }
        }

        Err(self.exhausted(state))
    }

    /// One pass: start (if needed), append while more than a chunk
    /// remains, then finish with the tail.
    async fn attempt(
        &self,
        reader: &mut ChunkReader,
        session: &mut Option<UploadSession>,
        state: &mut RetryState,
        commit: &CommitInfo,
    ) -> Result<Attempt, UploadError> {
        let size = reader.file_size();
        let chunk_size = self.plan.chunk_size();

        // Once a session is open its committed offset is authoritative.
        let resume_at = session
            .as_ref()
            .map_or(0, UploadSession::committed_offset);
        state.uploaded_offset = resume_at;
        reader.seek_to(resume_at)?;

        let opened = match session.take() {
            Some(open) => open,
            None => {
                state.enter(Phase::Starting);
                let chunk = reader.read_chunk(chunk_size)?;
                let progress = ChunkProgress::new(self.progress, chunk.offset, size);

                let session_id = match self.transport.start_session(&chunk, progress).await {
                    Ok(id) => id,
                    Err(failure) => return Ok(Attempt::Failed(failure)),
                };
                progress.sent(chunk.len());
                let opened = UploadSession::new(session_id, chunk.len());
                state.uploaded_offset = opened.committed_offset();
                debug!(session = %opened.id(), offset = state.uploaded_offset, "session started");
                opened
            }
        };
        let active = session.insert(opened);

        while size - active.committed_offset() > chunk_size {
            self.check_cancelled()?;
            state.enter(Phase::Appending);
            let chunk = reader.read_chunk(chunk_size)?;
            let progress = ChunkProgress::new(self.progress, chunk.offset, size);

            if let Err(failure) = self
                .transport
                .append_chunk(active.id(), &chunk, progress)
                .await
            {
                return Ok(Attempt::Failed(failure));
            }
            active.advance(chunk.len());
            state.uploaded_offset = active.committed_offset();
            progress.sent(chunk.len());
        }

        self.check_cancelled()?;
        state.enter(Phase::Finishing);
        let chunk = reader.read_chunk(size - active.committed_offset())?;
        let progress = ChunkProgress::new(self.progress, chunk.offset, size);

        match self
            .transport
            .finish_session(active.id(), &chunk, commit, progress)
            .await
        {
            Ok(remote) => {
                active.advance(chunk.len());
                state.uploaded_offset = active.committed_offset();
                progress.sent(chunk.len());
                state.enter(Phase::Done);
                Ok(Attempt::Done(remote))
            }
            Err(failure) => Ok(Attempt::Failed(failure)),
        }
    }

    /// Applies the retry policy to a failed call.
    ///
    /// Returns `Ok` when another attempt may follow.
    async fn recover(
        &self,
        state: &mut RetryState,
        session: Option<&mut UploadSession>,
        failure: Failure,
        size: u64,
    ) -> Result<(), UploadError> {
        if failure.is_fatal() {
            warn!(phase = ?state.phase, error = %failure, "fatal upload failure");
            state.enter(Phase::Aborted);
            return Err(failure.into());
        }

        state.attempts_used += 1;
        warn!(
            attempt = state.attempts_used,
            max = self.max_attempts,
            phase = ?state.phase,
            error = %failure,
            "upload attempt failed"
        );

        state.enter(Phase::Retrying);

        match &failure {
            Failure::RetryAdvised(delay) => {
                if let Err(e) = self.backoff(*delay).await {
                    state.enter(Phase::Aborted);
                    return Err(e);
                }
            }
            Failure::OffsetMismatch(correct) => {
                let correct = *correct;
                if correct > size {
                    state.enter(Phase::Aborted);
                    return Err(UploadError::Fatal(format!(
                        "service reported offset {correct} beyond file size {size}"
                    )));
                }
                match session {
                    Some(session) => {
                        debug!(
                            from = state.uploaded_offset,
                            to = correct,
                            "resyncing to service offset"
                        );
                        session.resync(correct);
                        state.uploaded_offset = session.committed_offset();
                    }
                    // No session yet: a new one always starts at zero.
                    None => state.uploaded_offset = 0,
                }
            }
            Failure::NetworkTransient(_) | Failure::Fatal(_) | Failure::Unauthorized(_) => {}
        }

        state.last_error = Some(failure);
        Ok(())
    }

    /// Sleeps for an advised delay unless cancelled first.
    async fn backoff(&self, delay: Duration) -> Result<(), UploadError> {
        debug!(delay_ms = delay.as_millis() as u64, "backing off");
        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = self.cancel.cancelled() => Err(UploadError::Interrupted),
        }
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            Err(UploadError::Interrupted)
        } else {
            Ok(())
        }
    }

    fn exhausted(&self, state: RetryState) -> UploadError {
        UploadError::MaxAttemptsExhausted {
            attempts: state.attempts_used,
            last: state
                .last_error
                .unwrap_or_else(|| Failure::Fatal("no upload attempt was made".into())),
        }
    }
}
