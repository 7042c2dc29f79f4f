//! Fixed-size worker pool with FIFO dispatch and shutdown drain.
//!
//! Lifecycle: `new(n)` blocks until all `n` workers are alive and waiting;
//! `dispatch` appends to the queue and wakes one idle worker without ever
//! blocking or dropping; `shutdown` broadcasts termination, joins every
//! worker (each finishes its in-flight task first), then runs any task that
//! was queued but never picked up synchronously on the calling thread. Every
//! dispatched task therefore runs exactly once, even across shutdown.
//!
//! The pool never retries a task and never observes a handler's errors; a
//! failing handler simply returns and its worker goes back to waiting.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};

use crate::error::{Result, WordserveError};

/// A unit of work: a closure carrying its own context, consumed exactly once.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of worker threads sharing one FIFO task queue.
pub struct ThreadPool {
    task_tx: Sender<Task>,
    /// Receiver clone kept for the shutdown drain.
    task_rx: Receiver<Task>,
    /// Dropping this sender closes the kill channel, waking every worker.
    kill_tx: Option<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn exactly `num_workers` threads and block until all of them have
    /// signaled that they are alive and waiting for work.
    ///
    /// A thread-spawn failure is returned as an error; callers treat it as
    /// fatal.
    pub fn new(num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(WordserveError::invalid_argument(
                "thread pool needs at least one worker",
            ));
        }

        let (task_tx, task_rx) = unbounded::<Task>();
        let (kill_tx, kill_rx) = bounded::<()>(0);
        let (ready_tx, ready_rx) = bounded::<()>(num_workers);

        let mut workers = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            let tasks = task_rx.clone();
            let kill = kill_rx.clone();
            let ready = ready_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("wordserve-worker-{id}"))
                .spawn(move || worker_loop(id, tasks, kill, ready))
                .map_err(|e| {
                    WordserveError::internal(format!("failed to spawn worker thread: {e}"))
                })?;
            workers.push(handle);
        }
        drop(ready_tx);

        // Startup barrier: wait for every worker to report in.
        for _ in 0..num_workers {
            if ready_rx.recv().is_err() {
                return Err(WordserveError::internal(
                    "worker exited before signaling readiness",
                ));
            }
        }

        Ok(ThreadPool {
            task_tx,
            task_rx,
            kill_tx: Some(kill_tx),
            workers,
        })
    }

    /// Append a task to the queue tail and wake one idle worker (or none, if
    /// all are busy — the task waits). Never blocks the dispatcher.
    pub fn dispatch<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // The pool holds a receiver, so the channel cannot be closed here.
        if self.task_tx.send(Box::new(task)).is_err() {
            log::error!("task queue closed; task dropped");
        }
    }

    /// Broadcast termination, join every worker, then run the tasks that were
    /// enqueued but never picked up, one at a time, on this thread.
    ///
    /// Idempotent; also invoked by `Drop`.
    pub fn shutdown(&mut self) {
        let Some(kill_tx) = self.kill_tx.take() else {
            return;
        };
        drop(kill_tx);

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }

        // Drain: at-most-once, all-eventually-run for every dispatched task.
        while let Ok(task) = self.task_rx.try_recv() {
            task();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker main loop: report alive, then alternate between Idle (blocked in
/// select) and Busy (running one task) until the kill channel closes.
fn worker_loop(id: usize, tasks: Receiver<Task>, kill: Receiver<()>, ready: Sender<()>) {
    let _ = ready.send(());

    loop {
        select! {
            recv(tasks) -> msg => match msg {
                Ok(task) => task(),
                Err(_) => break,
            },
            recv(kill) -> _ => break,
        }
    }

    log::debug!("worker {id} exiting");
}
