mod common;

use std::rc::Rc;
use std::time::Duration;

use common::{refused, ManualClock, MockPrinter, RecordingSupervisor};
use octotouch_core::{ClientError, MacroState, PrinterClient, RawPrinterState, StateBucket};
use octotouch_ui::{ConnectionMonitor, ConnectionStatus, Supervisor, MAX_ATTEMPTS};
use proptest::prelude::*;

struct Harness {
    printer: Rc<MockPrinter>,
    supervisor: Rc<RecordingSupervisor>,
    clock: ManualClock,
    monitor: ConnectionMonitor,
    swaps: Vec<MacroState>,
}

impl Harness {
    fn new() -> Self {
        let printer = MockPrinter::new();
        let supervisor = Rc::new(RecordingSupervisor::default());
        let clock = ManualClock::new();
        let client: Rc<dyn PrinterClient> = printer.clone();
        let heartbeat: Rc<dyn Supervisor> = supervisor.clone();
        let monitor = ConnectionMonitor::new(client, heartbeat, ConnectionStatus::new())
            .with_clock(Box::new(clock.clone()));
        Self {
            printer,
            supervisor,
            clock,
            monitor,
            swaps: Vec::new(),
        }
    }

    fn tick(&mut self) -> MacroState {
        let swaps = &mut self.swaps;
        self.monitor.tick(&mut |next| swaps.push(next.clone()));
        self.monitor.state().clone()
    }

    fn status(&self) -> Rc<ConnectionStatus> {
        Rc::clone(self.monitor.status())
    }
}

fn splash(message: &str) -> MacroState {
    MacroState::Splash(message.to_string())
}

#[test]
fn test_connecting_then_operational() {
    let mut h = Harness::new();
    h.printer.script_states(&[
        RawPrinterState::Connecting,
        RawPrinterState::Connecting,
        RawPrinterState::Operational,
    ]);

    let states: Vec<MacroState> = (0..3).map(|_| h.tick()).collect();

    assert_eq!(
        states,
        vec![
            splash("Connecting..."),
            splash("Connecting..."),
            MacroState::Idle
        ]
    );
    assert_eq!(h.status().attempts(), 0);
    assert_eq!(h.swaps, vec![MacroState::Idle]);
}

#[test]
fn test_closed_asks_server_to_connect() {
    let mut h = Harness::new();
    h.printer.script_states(&[RawPrinterState::Closed]);

    assert_eq!(h.tick(), splash("Startup..."));
    assert_eq!(h.printer.connect_calls.get(), 1);
    assert_eq!(h.status().message(), "Startup...");
}

#[test]
fn test_sustained_failure_leads_to_hold() {
    let mut h = Harness::new();
    h.printer.set_fallback(Err(refused()));
    let humanized = "Unable to connect to OctoPrint - is it running?";

    assert_eq!(h.tick(), splash("Initializing..."));
    assert_eq!(h.status().message(), "Initializing...");

    for tick in 2..=8 {
        h.clock.advance(Duration::from_secs(11));
        assert_eq!(h.tick(), splash(humanized), "tick {tick}");
        assert!(!h.status().on_hold(), "tick {tick}");
    }

    h.clock.advance(Duration::from_secs(11));
    assert_eq!(h.tick(), MacroState::ErrorHold);
    assert!(h.status().on_hold());
    assert_eq!(h.status().attempts(), MAX_ATTEMPTS + 1);

    h.clock.advance(Duration::from_secs(11));
    assert_eq!(h.tick(), MacroState::ErrorHold);

    assert_eq!(h.printer.state_calls.get(), 9);
    assert_eq!(h.supervisor.watchdog.get(), 10);
    assert_eq!(h.swaps, vec![MacroState::ErrorHold]);
}

#[test]
fn test_retry_resumes_polling() {
    let mut h = Harness::new();
    h.printer.set_fallback(Err(refused()));
    for _ in 0..10 {
        h.clock.advance(Duration::from_secs(11));
        h.tick();
    }
    assert_eq!(h.monitor.state(), &MacroState::ErrorHold);

    h.status().release();
    assert_eq!(h.status().message(), "Startup...");

    h.printer.set_fallback(Ok(RawPrinterState::Connecting));
    assert_eq!(h.tick(), splash("Connecting..."));
    assert_eq!(h.status().attempts(), 1);
    assert!(!h.status().on_hold());
    assert_eq!(h.printer.state_calls.get(), 10);
}

#[test]
fn test_printing_states_stay_printing() {
    let mut h = Harness::new();
    h.printer.script_states(&[
        RawPrinterState::Operational,
        RawPrinterState::Printing,
        RawPrinterState::Paused,
        RawPrinterState::Printing,
    ]);
    assert_eq!(h.tick(), MacroState::Idle);

    let states: Vec<MacroState> = (0..3).map(|_| h.tick()).collect();
    assert_eq!(states, vec![MacroState::Printing; 3]);
    assert_eq!(h.swaps, vec![MacroState::Idle, MacroState::Printing]);
}

#[test]
fn test_error_state_keeps_screen() {
    let mut h = Harness::new();
    h.printer.script_states(&[
        RawPrinterState::Operational,
        RawPrinterState::Error,
        RawPrinterState::parse("Offline after error"),
    ]);
    h.tick();
    assert_eq!(h.tick(), MacroState::Idle);
    assert_eq!(h.tick(), MacroState::Idle);
    assert_eq!(h.swaps, vec![MacroState::Idle]);
}

#[test]
fn test_failures_within_grace_keep_state() {
    let mut h = Harness::new();
    h.printer.script_states(&[RawPrinterState::Operational]);
    h.tick();

    h.printer.set_fallback(Err(refused()));
    assert_eq!(h.tick(), MacroState::Idle);
    h.clock.advance(Duration::from_secs(5));
    assert_eq!(h.tick(), MacroState::Idle);
    h.clock.advance(Duration::from_secs(6));
    assert_eq!(
        h.tick(),
        splash("Unable to connect to OctoPrint - is it running?")
    );
}

#[test]
fn test_success_resets_failure_window() {
    let mut h = Harness::new();
    h.printer.script([
        Ok(RawPrinterState::Operational),
        Err(refused()),
        Ok(RawPrinterState::Operational),
    ]);
    h.tick();
    h.tick();
    h.clock.advance(Duration::from_secs(20));
    h.tick();

    h.printer.set_fallback(Err(refused()));
    h.clock.advance(Duration::from_secs(20));
    assert_eq!(h.tick(), MacroState::Idle);
}

#[test]
fn test_remote_disconnect_is_benign() {
    let mut h = Harness::new();
    h.printer.script([
        Ok(RawPrinterState::Connecting),
        Err(ClientError::RemoteDisconnected {
            reason: "Remote end closed connection without response".into(),
        }),
    ]);
    h.tick();
    h.clock.advance(Duration::from_secs(30));
    assert_eq!(h.tick(), splash("Connecting..."));
    assert_eq!(h.status().message(), "Connecting...");

    h.printer.set_fallback(Err(refused()));
    h.clock.advance(Duration::from_secs(30));
    h.tick();
    assert_eq!(h.status().message(), "Initializing...");
}

#[test]
fn test_login_refused_message() {
    let mut h = Harness::new();
    h.printer.set_fallback(Err(ClientError::Forbidden {
        url: "http://localhost:5000/api/connection".into(),
    }));
    h.tick();
    h.clock.advance(Duration::from_secs(11));
    assert_eq!(h.tick(), splash("OctoPrint login refused - check API key"));
}

fn raw_state() -> impl Strategy<Value = RawPrinterState> {
    prop_oneof![
        proptest::sample::select(RawPrinterState::known().to_vec()),
        "[a-z]{1,8}".prop_map(|text| RawPrinterState::parse(&text)),
    ]
}

fn expected(current: &MacroState, raw: &RawPrinterState) -> MacroState {
    match raw.bucket() {
        StateBucket::Operational => MacroState::Idle,
        StateBucket::Printing => MacroState::Printing,
        StateBucket::Error | StateBucket::Unrecognized => current.clone(),
        StateBucket::Offline => MacroState::Splash("Startup...".into()),
        StateBucket::Connecting => MacroState::Splash(format!("{raw}...")),
    }
}

proptest! {
    #[test]
    fn prop_monitor_follows_transition_table(
        sequence in proptest::collection::vec(raw_state(), 1..8)
    ) {
        let mut h = Harness::new();
        h.printer.script_states(&sequence);

        let mut model = MacroState::Splash("Initializing...".into());
        let mut attempts = 0u32;
        let mut offline = 0u32;
        for raw in &sequence {
            attempts = if model.is_splash() { attempts + 1 } else { 0 };
            model = expected(&model, raw);
            if !model.is_splash() {
                attempts = 0;
            }
            if raw.bucket() == StateBucket::Offline {
                offline += 1;
            }

            prop_assert_eq!(&h.tick(), &model);
            prop_assert_eq!(h.status().attempts(), attempts);
        }
        prop_assert_eq!(h.printer.connect_calls.get(), offline);
        prop_assert_eq!(h.supervisor.watchdog.get(), sequence.len() as u32);
    }
}
