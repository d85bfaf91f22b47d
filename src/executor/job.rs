/*
 * Created on Mon Oct 12 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
};

use async_task::Runnable;

use crate::error::panic_message;

/// Unit of work owned by the queue until the worker takes it
pub(crate) enum Job {
    /// Bound closure from `post` or `submit`
    Call(Box<dyn FnOnce() + Send + 'static>),

    /// Scheduled future from `spawn`
    Poll(Runnable),
}

impl Job {
    pub fn call(f: impl FnOnce() + Send + 'static) -> Self {
        Self::Call(Box::new(f))
    }

    /// Run the job to completion on the current thread.
    ///
    /// A panic is contained and logged so the worker loop keeps going.
    pub fn run(self, executor: u64) {
        let res = match self {
            Job::Call(f) => panic::catch_unwind(AssertUnwindSafe(f)),

            Job::Poll(runnable) => panic::catch_unwind(AssertUnwindSafe(move || {
                runnable.run();
            })),
        };

        if let Err(payload) = res {
            log::error!(
                "executor {executor}: task panicked: {}",
                panic_message(&payload)
            );
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Call(_) => f.write_str("Call(..)"),
            Job::Poll(runnable) => f.debug_tuple("Poll").field(runnable).finish(),
        }
    }
}
