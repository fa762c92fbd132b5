//! Connection monitor
//!
//! Polls the printer state on a fixed cadence and decides which root panel
//! the kiosk shows. The rules:
//!
//! | raw state bucket | next state |
//! |---|---|
//! | operational | `Idle` |
//! | printing | `Printing` |
//! | error, unrecognized | unchanged |
//! | offline | `Splash("Startup...")`, asks the server to connect |
//! | connecting | `Splash("<state>...")` |
//!
//! A failed call only moves to the splash screen once failures have lasted
//! longer than [`FAILURE_GRACE`]. Every tick spent on the splash screen
//! counts as a connection attempt; after [`MAX_ATTEMPTS`] the splash screen
//! offers Retry and polling stops until the user taps it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use octotouch_core::{
    ClientError, MacroState, PrinterClient, RawPrinterState, StateBucket, INITIALIZING_MESSAGE,
    STARTUP_MESSAGE,
};

use crate::supervisor::Supervisor;

/// Splash ticks allowed before the hold screen appears.
pub const MAX_ATTEMPTS: u32 = 8;

/// How long failures may last before the splash screen shows them.
pub const FAILURE_GRACE: Duration = Duration::from_secs(10);

/// Cadence of the `state_check` task.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Text of the splash screen while polling is on hold.
pub const HOLD_MESSAGE: &str = "Cannot connect to the printer. Tap \"Retry\" to try again.";

/// Source of monotonic time, replaceable in tests.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Connection progress shared by the monitor and the splash panel.
#[derive(Debug)]
pub struct ConnectionStatus {
    message: RefCell<String>,
    attempts: Cell<u32>,
    on_hold: Cell<bool>,
}

impl ConnectionStatus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            message: RefCell::new(INITIALIZING_MESSAGE.to_string()),
            attempts: Cell::new(0),
            on_hold: Cell::new(false),
        })
    }

    /// Status line of the splash screen.
    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }

    pub fn set_message(&self, message: impl Into<String>) {
        *self.message.borrow_mut() = message.into();
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.get()
    }

    pub fn on_hold(&self) -> bool {
        self.on_hold.get()
    }

    fn count_attempt(&self) -> u32 {
        let attempts = self.attempts.get().saturating_add(1);
        self.attempts.set(attempts);
        attempts
    }

    fn put_on_hold(&self) {
        self.on_hold.set(true);
    }

    fn reset(&self) {
        self.attempts.set(0);
        self.on_hold.set(false);
    }

    /// Leave the hold screen: polling resumes on the next tick.
    pub fn release(&self) {
        self.reset();
        self.set_message(STARTUP_MESSAGE);
    }
}

/// Outcome of classifying one successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// State after this poll; equal to the current state when unchanged
    pub next: MacroState,
    /// Splash status text for this tick
    pub message: String,
    /// Ask the server to connect to the printer
    pub reconnect: bool,
}

/// Map a raw printer state onto the next macro state.
pub fn classify(current: &MacroState, raw: &RawPrinterState) -> Verdict {
    let unchanged = || Verdict {
        next: current.clone(),
        message: INITIALIZING_MESSAGE.to_string(),
        reconnect: false,
    };

    match raw.bucket() {
        StateBucket::Operational => Verdict {
            next: MacroState::Idle,
            ..unchanged()
        },
        StateBucket::Printing => Verdict {
            next: MacroState::Printing,
            ..unchanged()
        },
        StateBucket::Error | StateBucket::Unrecognized => unchanged(),
        StateBucket::Offline => Verdict {
            next: MacroState::Splash(STARTUP_MESSAGE.to_string()),
            message: STARTUP_MESSAGE.to_string(),
            reconnect: true,
        },
        StateBucket::Connecting => {
            let message = format!("{raw}...");
            Verdict {
                next: MacroState::Splash(message.clone()),
                message,
                reconnect: false,
            }
        }
    }
}

pub struct ConnectionMonitor {
    printer: Rc<dyn PrinterClient>,
    supervisor: Rc<dyn Supervisor>,
    clock: Box<dyn Clock>,
    status: Rc<ConnectionStatus>,
    state: MacroState,
    first_failure: Option<Instant>,
}

impl ConnectionMonitor {
    pub fn new(
        printer: Rc<dyn PrinterClient>,
        supervisor: Rc<dyn Supervisor>,
        status: Rc<ConnectionStatus>,
    ) -> Self {
        Self {
            printer,
            supervisor,
            clock: Box::new(SystemClock),
            state: MacroState::Splash(status.message()),
            status,
            first_failure: None,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &MacroState {
        &self.state
    }

    pub fn status(&self) -> &Rc<ConnectionStatus> {
        &self.status
    }

    /// One poll cycle. `swap` is called with the new state whenever the
    /// root panel has to change, before the state is committed.
    pub fn tick(&mut self, swap: &mut dyn FnMut(&MacroState)) {
        self.supervisor.watchdog();

        if self.status.attempts() > MAX_ATTEMPTS {
            tracing::trace!("Connection monitor on hold");
            return;
        }

        if self.state.is_splash() {
            let attempts = self.status.count_attempt();
            if attempts == MAX_ATTEMPTS + 1 {
                tracing::warn!(attempts, "Printer unreachable, waiting for retry");
                self.status.put_on_hold();
            }
        } else {
            self.status.reset();
        }

        let (next, message) = self.poll();
        if let Some(message) = message {
            self.status.set_message(message);
        }
        self.commit(next, swap);
    }

    fn poll(&mut self) -> (MacroState, Option<String>) {
        let raw = match self.printer.state() {
            Ok(raw) => raw,
            Err(e) => return self.failed(e),
        };
        self.first_failure = None;

        let verdict = classify(&self.state, &raw);
        match raw.bucket() {
            StateBucket::Unrecognized => {
                tracing::warn!(state = %raw, "Unrecognized printer state");
            }
            StateBucket::Error => {
                tracing::debug!(state = %raw, "Printer reports an error state");
            }
            _ => {}
        }

        if verdict.reconnect {
            tracing::info!(state = %raw, "Printer offline, asking OctoPrint to connect");
            if let Err(e) = self.printer.connect() {
                return self.failed(e);
            }
        }
        (verdict.next, Some(verdict.message))
    }

    fn failed(&mut self, error: ClientError) -> (MacroState, Option<String>) {
        if error.is_remote_disconnect() {
            tracing::debug!("Remote closed the connection, retrying: {error}");
            return (self.state.clone(), None);
        }

        let now = self.clock.now();
        let first = *self.first_failure.get_or_insert(now);
        if now.duration_since(first) > FAILURE_GRACE {
            let message = error.humanize();
            tracing::error!("Cannot reach OctoPrint: {error}");
            (MacroState::Splash(message.clone()), Some(message))
        } else {
            tracing::info!("OctoPrint request failed: {error}");
            (self.state.clone(), Some(INITIALIZING_MESSAGE.to_string()))
        }
    }

    fn commit(&mut self, next: MacroState, swap: &mut dyn FnMut(&MacroState)) {
        let next = match next {
            next if next.is_splash() && self.status.on_hold() => MacroState::ErrorHold,
            MacroState::ErrorHold => MacroState::Splash(self.status.message()),
            next => next,
        };

        if !next.same_screen(&self.state) {
            tracing::info!(from = self.state.name(), to = next.name(), "Switching screen");
            swap(&next);
        }
        if self.state.is_splash() && !next.is_splash() {
            self.status.reset();
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_operational_and_printing() {
        let splash = MacroState::Splash("Connecting...".into());
        assert_eq!(
            classify(&splash, &RawPrinterState::Transfering).next,
            MacroState::Idle
        );
        assert_eq!(
            classify(&MacroState::Idle, &RawPrinterState::Paused).next,
            MacroState::Printing
        );
    }

    #[test]
    fn test_classify_offline_reconnects() {
        let verdict = classify(&MacroState::Idle, &RawPrinterState::Closed);
        assert_eq!(verdict.next, MacroState::Splash("Startup...".into()));
        assert_eq!(verdict.message, "Startup...");
        assert!(verdict.reconnect);
    }

    #[test]
    fn test_classify_connecting_message() {
        let verdict = classify(&MacroState::Idle, &RawPrinterState::Detecting);
        assert_eq!(verdict.next, MacroState::Splash("Detecting...".into()));
        assert!(!verdict.reconnect);
    }

    #[test]
    fn test_classify_error_keeps_state() {
        for current in [MacroState::Idle, MacroState::Printing, MacroState::ErrorHold] {
            let verdict = classify(&current, &RawPrinterState::Error);
            assert_eq!(verdict.next, current);
            let verdict = classify(&current, &RawPrinterState::parse("Sleeping"));
            assert_eq!(verdict.next, current);
            assert!(!verdict.reconnect);
        }
    }

    #[test]
    fn test_status_release() {
        let status = ConnectionStatus::new();
        assert_eq!(status.message(), "Initializing...");
        for _ in 0..9 {
            status.count_attempt();
        }
        status.put_on_hold();
        status.release();
        assert_eq!(status.attempts(), 0);
        assert!(!status.on_hold());
        assert_eq!(status.message(), "Startup...");
    }
}
