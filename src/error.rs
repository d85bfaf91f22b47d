/*
 * Created on Mon Oct 12 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::{any::Any, fmt, io, panic};

use thiserror::Error;

/// Operation that was rejected by an [`Executor`](crate::Executor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Post,
    Submit,
    Spawn,
    Join,
    Shutdown,
    AwaitTermination,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Post => "post",
            Operation::Submit => "submit",
            Operation::Spawn => "spawn",
            Operation::Join => "join",
            Operation::Shutdown => "shutdown",
            Operation::AwaitTermination => "await_termination",
        })
    }
}

/// Error returned by lifecycle sensitive operations of an [`Executor`](crate::Executor)
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExecutorError {
    /// Work was submitted after `join` or `shutdown` was called
    #[error("cannot call {0}() on an executor that is no longer joinable")]
    NotJoinable(Operation),

    /// `join` or `shutdown` was called after either of them already fired
    #[error("cannot call {0}() on an executor that is already terminated")]
    AlreadyTerminated(Operation),

    /// Operation would wait for the worker thread it was called on
    #[error("cannot call {0}() from the executor's own worker thread")]
    WorkerThread(Operation),

    /// Worker did not stop within the given duration
    #[error("{0}() timed out waiting for the worker to stop")]
    TimedOut(Operation),

    #[error("failed to spawn worker thread")]
    Spawn(#[from] io::Error),
}

impl ExecutorError {
    /// Operation that failed, if the error came from a lifecycle check
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ExecutorError::NotJoinable(op)
            | ExecutorError::AlreadyTerminated(op)
            | ExecutorError::WorkerThread(op)
            | ExecutorError::TimedOut(op) => Some(*op),
            ExecutorError::Spawn(_) => None,
        }
    }
}

/// Failure of a submitted task, delivered through its [`PendingResult`](crate::PendingResult)
#[derive(Error)]
pub enum TaskError {
    /// Task panicked while running. Holds the panic payload.
    #[error("task panicked: {}", panic_message(.0))]
    Panicked(Box<dyn Any + Send + 'static>),

    /// Task was discarded by `shutdown` before it started
    #[error("task was cancelled before it could run")]
    Cancelled,
}

impl TaskError {
    pub fn is_panic(&self) -> bool {
        matches!(self, TaskError::Panicked(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }

    /// Re-raise the task's panic on the current thread.
    ///
    /// # Panics
    /// Always. Cancelled tasks panic with a generic message.
    pub fn resume_unwind(self) -> ! {
        match self {
            TaskError::Panicked(payload) => panic::resume_unwind(payload),
            TaskError::Cancelled => panic!("task was cancelled before it could run"),
        }
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Panicked(payload) => f
                .debug_tuple("Panicked")
                .field(&panic_message(payload))
                .finish(),
            TaskError::Cancelled => f.write_str("Cancelled"),
        }
    }
}

#[allow(clippy::borrowed_box)]
pub(crate) fn panic_message(payload: &Box<dyn Any + Send>) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "Box<dyn Any>"
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use super::*;

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(&payload), "static");

        let payload = panic::catch_unwind(|| panic!("formatted {}", 1)).unwrap_err();
        assert_eq!(panic_message(&payload), "formatted 1");

        let payload = panic::catch_unwind(|| panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_message(&payload), "Box<dyn Any>");
    }

    #[test]
    fn errors_name_the_operation() {
        let err = ExecutorError::NotJoinable(Operation::Post);
        assert_eq!(
            err.to_string(),
            "cannot call post() on an executor that is no longer joinable"
        );
        assert_eq!(err.operation(), Some(Operation::Post));

        let err = ExecutorError::AlreadyTerminated(Operation::Shutdown);
        assert_eq!(
            err.to_string(),
            "cannot call shutdown() on an executor that is already terminated"
        );
    }
}
