//! Progress reporting and cooperative cancellation for long running builds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

/// Receives human readable status messages.
///
/// Sinks are shared between build workers and must serialize their own
/// writes. Reporting is best effort: a sink that drops messages never affects
/// the build result.
pub trait StatusSink: Send + Sync {
    /// Report the current status
    fn set_status(&self, status: &str);
}

/// Forwards status messages to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn set_status(&self, status: &str) {
        log::info!("{}", status);
    }
}

/// Discards all status messages
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn set_status(&self, _status: &str) {}
}

/// Sends status messages over a channel, e.g. to a UI thread
#[derive(Debug, Clone)]
pub struct ChannelStatus {
    sender: Sender<String>,
}

impl ChannelStatus {
    /// Wrap the sending half of a channel
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl StatusSink for ChannelStatus {
    fn set_status(&self, status: &str) {
        // receiver gone: nobody is listening any more
        let _ = self.sender.send(status.to_string());
    }
}

impl<S: StatusSink + ?Sized> StatusSink for &S {
    fn set_status(&self, status: &str) {
        (**self).set_status(status)
    }
}

impl<S: StatusSink + ?Sized> StatusSink for Arc<S> {
    fn set_status(&self, status: &str) {
        (**self).set_status(status)
    }
}

/// Shared cancellation flag.
///
/// Cloning yields a handle to the same flag. Workers poll it at coarse
/// intervals; peptides already being fragmented are finished first.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    /// A flag that is not raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Lower the flag again so the handle can be reused
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}
