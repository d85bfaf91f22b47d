/*
 * Created on Sat Aug 05 2023
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

//! Persistent single-worker task executor.
//!
//! An [`Executor`] owns one background thread and a FIFO queue.
//! Closures are queued with [`Executor::post`] or [`Executor::submit`], futures with [`Executor::spawn`].
//! The executor is stopped exactly once, by [`Executor::join`] (drain) or [`Executor::shutdown`] (discard).
//!
//! ```
//! use scoped_worker::Executor;
//!
//! let executor = Executor::new();
//!
//! executor.post(|| println!("hello from worker")).unwrap();
//! let answer = executor.submit(|| 6 * 7).unwrap();
//!
//! executor.join().unwrap();
//! assert_eq!(answer.wait().unwrap(), 42);
//! assert!(executor.post(|| {}).is_err());
//! ```

pub mod error;
pub mod executor;
pub mod result;

pub use async_task as task;

pub use error::{ExecutorError, Operation, TaskError};
pub use executor::{builder::Builder, current_id, Executor, State};
pub use result::PendingResult;
