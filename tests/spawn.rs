/*
 * Created on Fri Oct 16 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc, Mutex,
    },
    task::{Poll, Waker},
    thread,
};

use futures_lite::future::{block_on, poll_fn, yield_now};
use scoped_worker::{Executor, ExecutorError, Operation, State};

#[tokio::test]
async fn spawned_future_resolves_on_worker() {
    let executor = Executor::new();

    let task = executor
        .spawn(async { scoped_worker::current_id() })
        .unwrap();

    assert_eq!(task.await, Some(executor.id()));
    executor.join().unwrap();
}

#[tokio::test]
async fn pending_result_can_be_awaited() {
    let executor = Executor::new();

    let sum = executor.submit(|| (1..=10).sum::<u32>()).unwrap();
    assert_eq!(sum.get().await.unwrap(), 55);

    executor.join().unwrap();
}

#[test]
fn woken_future_is_requeued_at_tail() {
    let executor = Executor::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (gate_tx, gate_rx) = mpsc::channel::<()>();

    executor
        .post(move || {
            let _ = gate_rx.recv();
        })
        .unwrap();

    let task = executor
        .spawn({
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(1);
                yield_now().await;
                seen.lock().unwrap().push(3);
            }
        })
        .unwrap();
    task.detach();

    executor
        .post({
            let seen = seen.clone();
            move || seen.lock().unwrap().push(2)
        })
        .unwrap();

    drop(gate_tx);
    executor.join().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn wake_after_shutdown_cancels_task() {
    let executor = Executor::new();
    let release = Arc::new(AtomicBool::new(false));
    let (started_tx, started_rx) = mpsc::channel();

    let task = executor
        .spawn({
            let release = release.clone();
            async move {
                started_tx.send(()).unwrap();
                // Keeps re-waking itself until released
                poll_fn(|cx| {
                    if release.load(Ordering::SeqCst) {
                        Poll::Ready(())
                    } else {
                        cx.waker().wake_by_ref();
                        Poll::Pending
                    }
                })
                .await;
            }
        })
        .unwrap();

    started_rx.recv().unwrap();
    executor.shutdown().unwrap();
    release.store(true, Ordering::SeqCst);

    assert!(block_on(task.fallible()).is_none());
    assert!(matches!(
        executor.spawn(async {}),
        Err(ExecutorError::NotJoinable(Operation::Spawn))
    ));
}

#[test]
fn join_completes_accepted_futures() {
    let executor = Executor::new();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let done = Arc::new(AtomicBool::new(false));

    executor
        .post(move || {
            let _ = gate_rx.recv();
        })
        .unwrap();

    let task = executor
        .spawn({
            let done = done.clone();
            async move {
                yield_now().await;
                yield_now().await;
                done.store(true, Ordering::SeqCst);
                "finished"
            }
        })
        .unwrap();

    thread::scope(|scope| {
        scope.spawn(|| executor.join().unwrap());

        // Release the worker only once join has closed the executor
        while executor.state() == State::Active {
            thread::yield_now();
        }
        drop(gate_tx);
    });

    assert!(done.load(Ordering::SeqCst));
    assert_eq!(block_on(task), "finished");
    assert_eq!(executor.state(), State::Terminated);
}

#[test]
fn join_waits_for_future_woken_from_another_thread() {
    let executor = Executor::new();
    let (waker_tx, waker_rx) = mpsc::channel::<Waker>();
    let release = Arc::new(AtomicBool::new(false));

    let task = executor
        .spawn({
            let release = release.clone();
            let mut waker_tx = Some(waker_tx);
            poll_fn(move |cx| {
                if release.load(Ordering::SeqCst) {
                    return Poll::Ready(7);
                }

                if let Some(tx) = waker_tx.take() {
                    tx.send(cx.waker().clone()).unwrap();
                }
                Poll::Pending
            })
        })
        .unwrap();

    let waker = waker_rx.recv().unwrap();

    thread::scope(|scope| {
        scope.spawn(|| executor.join().unwrap());

        while executor.state() == State::Active {
            thread::yield_now();
        }
        release.store(true, Ordering::SeqCst);
        waker.wake();
    });

    assert_eq!(block_on(task), 7);
}
