//! Handle to a playback running on its own thread.

use super::{CancelToken, PlaybackReport};
use crate::{AudioError, AudioResult};
use std::any::Any;
use std::thread::JoinHandle;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "playback thread panicked".to_string()
    }
}

/// A playback running on its own thread.
///
/// Dropping the handle detaches the thread; the playback still runs to
/// completion and releases its objects.
#[derive(Debug)]
pub struct PlaybackHandle {
    name: String,
    cancel: CancelToken,
    thread: JoinHandle<AudioResult<PlaybackReport>>,
}

impl PlaybackHandle {
    pub(super) fn new(
        name: String,
        cancel: CancelToken,
        thread: JoinHandle<AudioResult<PlaybackReport>>,
    ) -> Self {
        Self {
            name,
            cancel,
            thread,
        }
    }

    /// Name of the playback thread.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the playback to stop; [`join`](Self::join) then returns
    /// [`AudioError::Cancelled`] unless it had already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token controlling this playback.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Whether the thread has finished.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the playback and take its result.
    ///
    /// A panic on the playback thread is reported as
    /// [`AudioError::HardwareError`].
    pub fn join(self) -> AudioResult<PlaybackReport> {
        self.thread.join().unwrap_or_else(|payload| {
            Err(AudioError::hardware(
                "playback thread",
                panic_message(payload.as_ref()),
            ))
        })
    }
}
