/*
 * Created on Mon Oct 12 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::sync::Arc;

use scoped_tls_hkt::scoped_thread_local;

use super::queue::TaskQueue;

scoped_thread_local!(static CURRENT: u64);

/// Id of the executor whose worker is running the calling code
pub fn current_id() -> Option<u64> {
    if CURRENT.is_set() {
        Some(CURRENT.with(|id| *id))
    } else {
        None
    }
}

/// Marks the queue stopped even if the loop unwinds
struct StopGuard<'a>(&'a TaskQueue);

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        self.0.mark_stopped();
    }
}

/// Worker loop. Runs jobs one by one until the queue reports termination.
pub(crate) fn run(id: u64, queue: Arc<TaskQueue>) {
    let _guard = StopGuard(&queue);
    log::trace!("executor {id}: worker started");

    CURRENT.set(&id, || {
        while let Some(job) = queue.take_or_wait() {
            job.run(id);
        }
    });

    log::trace!("executor {id}: worker stopped");
}
