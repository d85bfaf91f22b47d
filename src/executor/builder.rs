/*
 * Created on Tue Oct 13 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::thread;

use crate::error::ExecutorError;

use super::{next_id, Executor};

/// Builder for configuring the worker thread of an [`Executor`].
///
/// ```
/// let executor = scoped_worker::Executor::builder()
///     .name("sensor-events")
///     .stack_size(256 * 1024)
///     .build()
///     .unwrap();
///
/// executor.join().unwrap();
/// ```
#[derive(Debug, Default, Clone)]
pub struct Builder {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the worker thread. Defaults to `scoped-worker-{id}`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stack size of the worker thread in bytes
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Spawn the worker thread and create the executor.
    ///
    /// An id is consumed even if spawning fails.
    pub fn build(self) -> Result<Executor, ExecutorError> {
        let id = next_id();

        let mut thread = thread::Builder::new().name(
            self.name
                .unwrap_or_else(|| format!("scoped-worker-{id}")),
        );
        if let Some(size) = self.stack_size {
            thread = thread.stack_size(size);
        }

        Executor::start(id, thread)
    }
}
