/*
 * Created on Mon Oct 12 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

pub mod builder;
mod job;
mod queue;
mod worker;

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
    thread::{self, JoinHandle},
};

use async_task::Task;
use futures_lite::Future;
use instant::{Duration, Instant};
use parking_lot::Mutex;

use crate::{
    error::{ExecutorError, Operation},
    result::PendingResult,
};

use self::{builder::Builder, job::Job, queue::TaskQueue};

pub use queue::State;
pub use worker::current_id;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Persistent executor owning one background worker thread and a FIFO of pending tasks.
///
/// Tasks run one at a time, in the order they were accepted.
/// The executor is terminated by exactly one call to [`Executor::join`] or [`Executor::shutdown`].
/// Dropping an executor that was never terminated behaves like [`Executor::shutdown`].
///
/// `Executor` can be shared by reference between producer threads but cannot be cloned.
/// Wrap it in an [`Arc`] if several owners are needed.
#[derive(Debug)]
pub struct Executor {
    id: u64,
    queue: Arc<TaskQueue>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Executor {
    /// Create executor with default configuration.
    ///
    /// # Panics
    /// Panics if the OS fails to create the worker thread. Use [`Executor::builder`] to handle the error.
    pub fn new() -> Self {
        Builder::new()
            .build()
            .expect("failed to spawn executor worker thread")
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    fn start(id: u64, thread: thread::Builder) -> Result<Self, ExecutorError> {
        let queue = Arc::new(TaskQueue::new());

        let handle = thread.spawn({
            let queue = queue.clone();
            move || worker::run(id, queue)
        })?;

        log::debug!("executor {id}: started");

        Ok(Self {
            id,
            queue,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Process unique id, assigned in construction order starting from 1
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> State {
        self.queue.state()
    }

    /// Number of tasks waiting in the queue, not counting a running one
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue `f` to run on the worker thread.
    ///
    /// A panic inside `f` is logged and does not affect later tasks.
    pub fn post<F>(&self, f: F) -> Result<(), ExecutorError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Job::call(f), Operation::Post)
    }

    /// Queue `f` to run on the worker thread, returning a handle to its result.
    ///
    /// Does not block. A panic inside `f` is delivered through the handle as [`TaskError::Panicked`](crate::TaskError::Panicked).
    pub fn submit<F, R>(&self, f: F) -> Result<PendingResult<R>, ExecutorError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (call, result) = PendingResult::bind(f);
        self.enqueue(Job::call(call), Operation::Submit)?;

        Ok(result)
    }

    /// Spawn a future, polled on the worker thread.
    ///
    /// Every wake re-queues the future at the tail of the queue.
    /// [`Executor::join`] waits for accepted futures to complete, so a future that never completes makes it block.
    /// After [`Executor::shutdown`] wakes are rejected and the task is cancelled.
    pub fn spawn<Fut>(&self, fut: Fut) -> Result<Task<Fut::Output>, ExecutorError>
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        if !self.queue.register_future() {
            return Err(ExecutorError::NotJoinable(Operation::Spawn));
        }

        // Counted until the future completes or gets dropped, polled or not
        let live = FutureGuard(Arc::downgrade(&self.queue));
        let fut = async move {
            let _live = live;
            fut.await
        };

        let queue = Arc::downgrade(&self.queue);
        let (runnable, task) = async_task::spawn(fut, move |runnable| {
            if let Some(queue) = queue.upgrade() {
                if queue.reschedule(Job::Poll(runnable)).is_err() {
                    log::trace!("task woken after shutdown, cancelling");
                }
            }
        });

        self.queue
            .reschedule(Job::Poll(runnable))
            .map_err(|_| ExecutorError::NotJoinable(Operation::Spawn))?;

        Ok(task)
    }

    fn enqueue(&self, job: Job, op: Operation) -> Result<(), ExecutorError> {
        self.queue
            .enqueue(job)
            .map_err(|_| ExecutorError::NotJoinable(op))
    }

    /// Run every queued task, then stop the worker and wait for it.
    ///
    /// Work submitted once `join` started is rejected with [`ExecutorError::NotJoinable`].
    pub fn join(&self) -> Result<(), ExecutorError> {
        self.terminate(Operation::Join, false, None)
    }

    /// [`Executor::join`] that gives up waiting after `timeout`.
    ///
    /// On [`ExecutorError::TimedOut`] the executor stays [`State::Terminating`] and the worker keeps draining.
    /// Call [`Executor::await_termination`] to finish.
    pub fn join_timeout(&self, timeout: Duration) -> Result<(), ExecutorError> {
        self.terminate(Operation::Join, false, Some(timeout))
    }

    /// Discard every queued task, let a running task finish, then stop the worker and wait for it.
    ///
    /// Handles of discarded [`Executor::submit`] tasks resolve to [`TaskError::Cancelled`](crate::TaskError::Cancelled).
    pub fn shutdown(&self) -> Result<(), ExecutorError> {
        self.terminate(Operation::Shutdown, true, None)
    }

    /// [`Executor::shutdown`] that gives up waiting after `timeout`.
    ///
    /// See [`Executor::join_timeout`].
    pub fn shutdown_timeout(&self, timeout: Duration) -> Result<(), ExecutorError> {
        self.terminate(Operation::Shutdown, true, Some(timeout))
    }

    /// Wait until the worker stopped, then mark the executor terminated.
    ///
    /// Blocks until some caller fires `join` or `shutdown` if the executor is still active.
    pub fn await_termination(&self, timeout: Option<Duration>) -> Result<(), ExecutorError> {
        let op = Operation::AwaitTermination;
        if self.on_worker_thread() {
            return Err(ExecutorError::WorkerThread(op));
        }

        self.finish(op, timeout.map(|timeout| Instant::now() + timeout))
    }

    fn terminate(
        &self,
        op: Operation,
        discard: bool,
        timeout: Option<Duration>,
    ) -> Result<(), ExecutorError> {
        if self.on_worker_thread() {
            return Err(ExecutorError::WorkerThread(op));
        }

        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        let discarded = self
            .queue
            .terminate(discard)
            .ok_or(ExecutorError::AlreadyTerminated(op))?;

        log::debug!(
            "executor {}: {op}() requested, {} pending task(s) discarded",
            self.id,
            discarded.len()
        );
        drop(discarded);

        self.finish(op, deadline)
    }

    fn finish(&self, op: Operation, deadline: Option<Instant>) -> Result<(), ExecutorError> {
        if !self.queue.wait_stopped(deadline) {
            return Err(ExecutorError::TimedOut(op));
        }

        let mut worker = self.worker.lock();
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                log::error!("executor {}: worker thread panicked", self.id);
            }

            self.queue.mark_terminated();
            log::debug!("executor {}: terminated", self.id);
        }

        Ok(())
    }

    fn on_worker_thread(&self) -> bool {
        current_id() == Some(self.id)
    }
}

struct FutureGuard(Weak<TaskQueue>);

impl Drop for FutureGuard {
    fn drop(&mut self) {
        if let Some(queue) = self.0.upgrade() {
            queue.future_finished();
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        if self.on_worker_thread() {
            // Joining would wait on ourselves. Worker exits after the current task.
            drop(self.queue.terminate(true));
            log::warn!(
                "executor {}: dropped on its own worker thread, detaching worker",
                self.id
            );
            return;
        }

        if let Err(ExecutorError::AlreadyTerminated(_)) = self.shutdown() {
            if let Err(err) = self.await_termination(None) {
                log::error!("executor {}: failed to wait for worker on drop: {err}", self.id);
            }
        }
    }
}
