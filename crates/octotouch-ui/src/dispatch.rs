//! UI-thread dispatcher
//!
//! Background timer threads never touch UI state. They push messages onto
//! an idle queue (`IdleSender`) which the UI thread drains with
//! `Dispatcher::pump`, running task callbacks and collecting user input.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::task::TaskControl;

/// Identity of a registered periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", &self.0.to_string()[..8])
    }
}

/// Input from the user or the host, delivered through the idle queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiInput {
    /// An action button of the current panel was pressed
    Activate(String),
    /// The back button was pressed
    Back,
}

/// One queued invocation of a task callback.
pub(crate) struct Firing {
    pub id: TaskId,
    pub generation: u64,
    /// Fired by the timer thread, which waits for it to complete
    pub timed: bool,
    pub control: Arc<TaskControl>,
}

pub(crate) enum UiMessage {
    Fire(Firing),
    Input(UiInput),
    Quit,
}

/// Thread-safe handle for putting work on the UI thread's idle queue.
#[derive(Clone)]
pub struct IdleSender {
    tx: Sender<UiMessage>,
}

impl IdleSender {
    /// Queue user input. Returns false when the UI thread is gone.
    pub fn send_input(&self, input: UiInput) -> bool {
        self.tx.send(UiMessage::Input(input)).is_ok()
    }

    /// Ask the UI loop to stop.
    pub fn quit(&self) -> bool {
        self.tx.send(UiMessage::Quit).is_ok()
    }

    pub(crate) fn fire(&self, firing: Firing) -> bool {
        self.tx.send(UiMessage::Fire(firing)).is_ok()
    }
}

/// What one `pump` call did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PumpOutcome {
    /// Task callbacks that ran
    pub fired: usize,
    /// User input received, in order
    pub inputs: Vec<UiInput>,
    /// A quit request was received
    pub quit: bool,
}

impl PumpOutcome {
    pub fn is_idle(&self) -> bool {
        self.fired == 0 && self.inputs.is_empty() && !self.quit
    }
}

type TaskHandler = Rc<dyn Fn() -> anyhow::Result<()>>;

/// The UI thread's side of the idle queue.
pub struct Dispatcher {
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
    handlers: RefCell<HashMap<TaskId, TaskHandler>>,
}

impl Dispatcher {
    pub fn new() -> Rc<Self> {
        let (tx, rx) = mpsc::channel();
        Rc::new(Self {
            tx,
            rx,
            handlers: RefCell::new(HashMap::new()),
        })
    }

    /// A sender that can be moved to other threads.
    pub fn sender(&self) -> IdleSender {
        IdleSender {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn register(&self, id: TaskId, handler: TaskHandler) {
        self.handlers.borrow_mut().insert(id, handler);
    }

    pub(crate) fn unregister(&self, id: TaskId) {
        self.handlers.borrow_mut().remove(&id);
    }

    /// Number of registered task callbacks.
    pub fn registered(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Drain the idle queue, waiting up to `wait` for the first message.
    pub fn pump(&self, wait: Duration) -> PumpOutcome {
        let mut outcome = PumpOutcome::default();

        let first = if wait.is_zero() {
            self.rx.try_recv().ok()
        } else {
            match self.rx.recv_timeout(wait) {
                Ok(message) => Some(message),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
            }
        };

        let Some(first) = first else {
            return outcome;
        };
        self.handle(first, &mut outcome);
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message, &mut outcome);
        }
        outcome
    }

    fn handle(&self, message: UiMessage, outcome: &mut PumpOutcome) {
        match message {
            UiMessage::Fire(firing) => {
                if self.run(&firing) {
                    outcome.fired += 1;
                }
            }
            UiMessage::Input(input) => outcome.inputs.push(input),
            UiMessage::Quit => outcome.quit = true,
        }
    }

    fn run(&self, firing: &Firing) -> bool {
        let control = &firing.control;
        let mut ran = false;

        if control.should_run(firing.generation) {
            // Clone out so the callback may register or drop tasks.
            let handler = self.handlers.borrow().get(&firing.id).cloned();
            if let Some(handler) = handler {
                if let Err(e) = handler() {
                    tracing::warn!(task = control.name(), "Background task failed: {e:#}");
                }
                ran = true;
            }
        } else {
            tracing::trace!(task = control.name(), "Skipping stale firing");
        }

        if firing.timed {
            control.complete(firing.generation);
        }
        ran
    }
}
