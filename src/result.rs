/*
 * Created on Tue Oct 13 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    thread,
};

use futures_intrusive::channel::shared::{oneshot_channel, OneshotReceiver, OneshotSender};

use crate::error::TaskError;

/// Outcome of a submitted task, fulfilled once by the worker.
///
/// Reading consumes the handle so the value can be observed exactly once.
/// If the task is discarded by `shutdown` before it starts, the handle resolves to [`TaskError::Cancelled`].
///
/// Dropping the handle does not cancel the task, it only discards the result.
pub struct PendingResult<R: 'static> {
    receiver: OneshotReceiver<thread::Result<R>>,
}

impl<R: Send + 'static> PendingResult<R> {
    /// Wrap `f` so its outcome is written into a fresh handle when the returned closure runs
    pub(crate) fn bind<F>(f: F) -> (impl FnOnce() + Send + 'static, Self)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let (sender, receiver): (OneshotSender<thread::Result<R>>, _) = oneshot_channel();

        let call = move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f));

            if sender.send(outcome).is_err() {
                log::trace!("submitted task finished after its handle was dropped");
            }
        };

        (call, Self { receiver })
    }
}

impl<R: 'static> PendingResult<R> {
    /// Block the current thread until the task finished or was discarded
    pub fn wait(self) -> Result<R, TaskError> {
        futures_lite::future::block_on(self.get())
    }

    /// Wait for the task asynchronously
    pub async fn get(self) -> Result<R, TaskError> {
        match self.receiver.receive().await {
            Some(Ok(value)) => Ok(value),
            Some(Err(payload)) => Err(TaskError::Panicked(payload)),
            None => Err(TaskError::Cancelled),
        }
    }
}

impl<R: 'static> fmt::Debug for PendingResult<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResult").finish_non_exhaustive()
    }
}
