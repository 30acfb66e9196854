use std::io::Write;

/// Receives cumulative byte counts for an upload.
///
/// Values may move backwards after the remote service asks for bytes to be
/// resent; sinks must accept that.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, bytes_so_far: u64, total_bytes: u64);
}

/// Discards all progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _bytes_so_far: u64, _total_bytes: u64) {}
}

/// Prints one line per update to stdout.
#[derive(Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn on_progress(&self, bytes_so_far: u64, total_bytes: u64) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", format_progress(bytes_so_far, total_bytes));
    }
}

/// Renders `Uploaded <done> / <total> bytes (<pct>%)`.
pub fn format_progress(bytes_so_far: u64, total_bytes: u64) -> String {
    let pct = if total_bytes == 0 {
        100.0
    } else {
        100.0 * (bytes_so_far as f64 / total_bytes as f64)
    };
    format!("Uploaded {bytes_so_far:>12} / {total_bytes:>12} bytes ({pct:>5.2}%)")
}

/// Progress handle for one transport call.
///
/// Carries the offset the call starts at, so the transport only reports
/// how many of its own bytes were sent.
#[derive(Clone, Copy)]
pub struct ChunkProgress<'a> {
    sink: &'a dyn ProgressSink,
    base: u64,
    total: u64,
}

impl<'a> ChunkProgress<'a> {
    pub fn new(sink: &'a dyn ProgressSink, base: u64, total: u64) -> Self {
        Self { sink, base, total }
    }

    /// Reports that `sent` bytes of this call have been transferred.
    pub fn sent(&self, sent: u64) {
        self.sink.on_progress(self.base + sent, self.total);
    }
}
