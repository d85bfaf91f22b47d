/*
 * Created on Mon Oct 12 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::{collections::VecDeque, mem};

use instant::Instant;
use parking_lot::{Condvar, Mutex};

use super::job::Job;

/// Lifecycle of an [`Executor`](super::Executor).
///
/// Transitions only move forward: `Active -> Terminating -> Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Accepting work
    Active,
    /// `join` or `shutdown` fired, worker is finishing
    Terminating,
    /// Worker thread has exited and was joined
    Terminated,
}

#[derive(Debug)]
struct Inner {
    jobs: VecDeque<Job>,
    state: State,
    discard: bool,
    futures: usize,
    stopped: bool,
}

impl Inner {
    /// Worker may exit: nothing queued and nothing accepted is still in flight
    fn finished(&self) -> bool {
        self.jobs.is_empty()
            && self.state != State::Active
            && (self.discard || self.futures == 0)
    }
}

/// FIFO of pending jobs plus the lifecycle state, behind one lock.
///
/// `work` is waited on by the worker only, `stopped` by callers waiting for the worker to exit.
#[derive(Debug)]
pub(crate) struct TaskQueue {
    inner: Mutex<Inner>,
    work: Condvar,
    stopped: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                jobs: VecDeque::new(),
                state: State::Active,
                discard: false,
                futures: 0,
                stopped: false,
            }),
            work: Condvar::new(),
            stopped: Condvar::new(),
        }
    }

    /// Append a job to the tail.
    ///
    /// Returns the job back if termination was already requested.
    pub fn enqueue(&self, job: Job) -> Result<(), Job> {
        {
            let mut inner = self.inner.lock();
            if inner.state != State::Active {
                return Err(job);
            }

            inner.jobs.push_back(job);
        }

        self.work.notify_one();
        Ok(())
    }

    /// Append a job belonging to an already accepted future.
    ///
    /// Still accepted while `join` drains, rejected after `shutdown` or once the worker stopped.
    pub fn reschedule(&self, job: Job) -> Result<(), Job> {
        {
            let mut inner = self.inner.lock();
            let draining = inner.state == State::Terminating && !inner.discard;
            if inner.stopped || !(inner.state == State::Active || draining) {
                return Err(job);
            }

            inner.jobs.push_back(job);
        }

        self.work.notify_one();
        Ok(())
    }

    /// Count a new future as in flight. Fails unless active.
    pub fn register_future(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != State::Active {
            return false;
        }

        inner.futures += 1;
        true
    }

    /// Called once a registered future completed or was dropped
    pub fn future_finished(&self) {
        let finished = {
            let mut inner = self.inner.lock();
            inner.futures -= 1;
            inner.finished()
        };

        if finished {
            self.work.notify_one();
        }
    }

    /// Block until a job is available or the worker may stop.
    ///
    /// Returns [`None`] once termination was requested, every remaining job was taken
    /// and, unless discarding, every accepted future finished.
    pub fn take_or_wait(&self) -> Option<Job> {
        let mut inner = self.inner.lock();

        loop {
            if let Some(job) = inner.jobs.pop_front() {
                return Some(job);
            }

            if inner.finished() {
                return None;
            }

            self.work.wait(&mut inner);
        }
    }

    /// Fire the one-shot `Active -> Terminating` edge.
    ///
    /// With `discard` set, every job still waiting is removed and handed back so the caller can drop them outside of the lock.
    /// Returns [`None`] if the edge already fired.
    pub fn terminate(&self, discard: bool) -> Option<VecDeque<Job>> {
        let discarded = {
            let mut inner = self.inner.lock();
            if inner.state != State::Active {
                return None;
            }

            inner.state = State::Terminating;
            inner.discard = discard;
            if discard {
                mem::take(&mut inner.jobs)
            } else {
                VecDeque::new()
            }
        };

        self.work.notify_one();
        Some(discarded)
    }

    /// Called by the worker right before its thread exits
    pub fn mark_stopped(&self) {
        self.inner.lock().stopped = true;
        self.stopped.notify_all();
    }

    /// Wait for the worker to stop, until `deadline` if given.
    ///
    /// Returns `false` if the deadline passed first.
    pub fn wait_stopped(&self, deadline: Option<Instant>) -> bool {
        let mut inner = self.inner.lock();

        while !inner.stopped {
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }

                    self.stopped.wait_for(&mut inner, deadline - now);
                }

                None => self.stopped.wait(&mut inner),
            }
        }

        true
    }

    pub fn mark_terminated(&self) {
        self.inner.lock().state = State::Terminated;
    }

    pub fn state(&self) -> State {
        self.inner.lock().state
    }

    pub fn len(&self) -> usize {
        self.inner.lock().jobs.len()
    }
}
