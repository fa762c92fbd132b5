//! Cancellable periodic background tasks
//!
//! A `PeriodicTask` owns one timer thread while started. The thread sleeps
//! for the task's interval, queues a firing on the UI thread's idle queue
//! and then waits until that firing has run (or the task is cancelled)
//! before sleeping again, so firings of one task never overlap.
//!
//! The callback itself always runs on the UI thread inside
//! `Dispatcher::pump`.

use std::rc::Rc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::dispatch::{Dispatcher, Firing, IdleSender, TaskId};

#[derive(Debug, Default)]
struct SignalState {
    stopped: bool,
    /// A timed firing is queued and not yet completed
    pending: bool,
    /// Bumped on every start; firings from older runs are dropped
    generation: u64,
}

/// Thread-shared half of a periodic task.
pub struct TaskControl {
    name: String,
    interval: Duration,
    state: Mutex<SignalState>,
    wake: Condvar,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl TaskControl {
    fn new(name: String, interval: Duration) -> Self {
        Self {
            name,
            interval,
            state: Mutex::new(SignalState {
                stopped: true,
                ..Default::default()
            }),
            wake: Condvar::new(),
            thread: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True while a timer thread is alive for this task.
    pub fn is_running(&self) -> bool {
        self.thread.lock().is_some()
    }

    pub(crate) fn should_run(&self, generation: u64) -> bool {
        let state = self.state.lock();
        !state.stopped && state.generation == generation
    }

    pub(crate) fn complete(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation == generation {
            state.pending = false;
            self.wake.notify_all();
        }
    }

    /// Start the timer thread unless it is already running. Returns the
    /// generation of the new run.
    fn start(self: &Arc<Self>, id: TaskId, sender: IdleSender) -> Option<u64> {
        let mut thread = self.thread.lock();
        if thread.is_some() {
            return None;
        }

        let generation = {
            let mut state = self.state.lock();
            state.stopped = false;
            state.pending = false;
            state.generation += 1;
            state.generation
        };

        let control = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || control.run_timer(id, generation, sender));

        match spawned {
            Ok(handle) => {
                *thread = Some(handle);
                tracing::info!(task = %self.name, "Background task started");
                Some(generation)
            }
            Err(e) => {
                self.state.lock().stopped = true;
                tracing::error!(task = %self.name, "Failed to spawn timer thread: {e}");
                None
            }
        }
    }

    fn run_timer(self: Arc<Self>, id: TaskId, generation: u64, sender: IdleSender) {
        let mut state = self.state.lock();
        loop {
            let deadline = Instant::now() + self.interval;
            while !state.stopped && Instant::now() < deadline {
                self.wake.wait_until(&mut state, deadline);
            }
            if state.stopped {
                break;
            }

            state.pending = true;
            let queued = sender.fire(Firing {
                id,
                generation,
                timed: true,
                control: Arc::clone(&self),
            });
            if !queued {
                tracing::debug!(task = %self.name, "Idle queue closed");
                break;
            }

            while state.pending && !state.stopped {
                self.wake.wait(&mut state);
            }
            if state.stopped {
                break;
            }
        }
        tracing::info!(task = %self.name, "Timer thread exit");
    }

    /// Signal stop and join the timer thread. Safe to call repeatedly and
    /// before the task was ever started.
    pub fn cancel(&self) {
        {
            let mut state = self.state.lock();
            state.stopped = true;
            state.pending = false;
            self.wake.notify_all();
        }

        let handle = self.thread.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!(task = %self.name, "Timer thread panicked");
            }
        }
    }
}

/// Every live task, so teardown can stop them all.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<Mutex<Vec<Arc<TaskControl>>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self, control: Arc<TaskControl>) {
        self.tasks.lock().push(control);
    }

    fn remove(&self, control: &Arc<TaskControl>) {
        self.tasks.lock().retain(|task| !Arc::ptr_eq(task, control));
    }

    /// Number of tasks registered.
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Names of the tasks whose timer thread is alive.
    pub fn running(&self) -> Vec<String> {
        self.tasks
            .lock()
            .iter()
            .filter(|t| t.is_running())
            .map(|t| t.name().to_string())
            .collect()
    }

    /// Cancel and join every timer thread.
    pub fn cancel_all(&self) {
        let tasks: Vec<_> = self.tasks.lock().clone();
        for task in tasks {
            task.cancel();
        }
        tracing::debug!("All background tasks stopped");
    }
}

/// UI-thread handle of a periodic task.
///
/// Dropping the handle cancels the task, unregisters its callback and
/// removes it from the registry.
pub struct PeriodicTask {
    id: TaskId,
    control: Arc<TaskControl>,
    dispatcher: Rc<Dispatcher>,
    registry: TaskRegistry,
}

impl PeriodicTask {
    /// Create a stopped task. `callback` runs on the UI thread; an error it
    /// returns is logged and the task keeps running.
    pub fn new<F>(
        dispatcher: &Rc<Dispatcher>,
        registry: &TaskRegistry,
        name: impl Into<String>,
        interval: Duration,
        callback: F,
    ) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        let id = TaskId::new();
        let control = Arc::new(TaskControl::new(name.into(), interval));
        dispatcher.register(id, Rc::new(callback));
        registry.add(Arc::clone(&control));
        Self {
            id,
            control,
            dispatcher: Rc::clone(dispatcher),
            registry: registry.clone(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.control.name()
    }

    pub fn interval(&self) -> Duration {
        self.control.interval()
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Queue one immediate invocation, then arm the repeating timer.
    /// Does nothing if the task is already running.
    pub fn start(&self) {
        let sender = self.dispatcher.sender();
        if let Some(generation) = self.control.start(self.id, sender.clone()) {
            sender.fire(Firing {
                id: self.id,
                generation,
                timed: false,
                control: Arc::clone(&self.control),
            });
        }
    }

    /// Stop the timer and join its thread.
    pub fn cancel(&self) {
        self.control.cancel();
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.control.cancel();
        self.dispatcher.unregister(self.id);
        self.registry.remove(&self.control);
    }
}
