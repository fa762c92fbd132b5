mod common;

use std::rc::Rc;
use std::time::{Duration, Instant};

use common::{context, MockPrinter, RecordingSupervisor, RecordingSurface};
use octotouch_core::{FileEntry, FileKind, MacroState, PrinterStatus, RawPrinterState};
use octotouch_ui::{Shell, Supervisor, UiInput};

fn shell_with(printer: &Rc<MockPrinter>) -> (Shell, RecordingSurface, Rc<RecordingSupervisor>) {
    let ctx = context(printer);
    let surface = RecordingSurface::default();
    let supervisor = Rc::new(RecordingSupervisor::default());
    let heartbeat: Rc<dyn Supervisor> = supervisor.clone();
    let shell = Shell::new(&ctx, Box::new(surface.clone()), heartbeat);
    (shell, surface, supervisor)
}

/// Start the shell and run the first state check.
fn started(printer: &Rc<MockPrinter>) -> (Shell, RecordingSurface, Rc<RecordingSupervisor>) {
    let (shell, surface, supervisor) = shell_with(printer);
    shell.start();
    assert!(shell.run_once(Duration::from_millis(500)));
    (shell, surface, supervisor)
}

fn activate(shell: &Shell, action: &str) {
    shell.handle_input(UiInput::Activate(action.to_string()));
}

fn current(shell: &Shell) -> String {
    shell
        .current_panel()
        .map(|panel| panel.name().to_string())
        .unwrap_or_default()
}

/// Pump the shell until the monitor reaches `state`.
fn wait_for_state(shell: &Shell, state: MacroState) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while shell.macro_state() != state && Instant::now() < deadline {
        shell.run_once(Duration::from_millis(100));
    }
    assert_eq!(shell.macro_state(), state);
}

fn running(shell: &Shell) -> Vec<String> {
    let mut names = shell.context().tasks.running();
    names.sort();
    names
}

fn file(name: &str, date: i64) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        display: None,
        path: name.to_string(),
        kind: FileKind::Machinecode,
        date: Some(date),
        size: Some(1024),
    }
}

#[test]
fn test_start_shows_splash_then_idle() {
    let printer = MockPrinter::new();
    printer.script_states(&[RawPrinterState::Operational]);
    let (shell, surface, supervisor) = shell_with(&printer);

    shell.start();
    assert_eq!(current(&shell), "splash");

    assert!(shell.run_once(Duration::from_millis(500)));
    assert_eq!(shell.macro_state(), MacroState::Idle);
    assert_eq!(current(&shell), "idle_status");
    assert_eq!(surface.attached(), vec!["splash", "idle_status"]);
    assert_eq!(supervisor.watchdog.get(), 1);

    shell.notify_ready();
    shell.notify_ready();
    assert_eq!(supervisor.ready.get(), 1);
    shell.shutdown();
}

#[test]
fn test_menu_navigation_and_back() {
    let printer = MockPrinter::new();
    let (shell, _surface, _supervisor) = started(&printer);

    activate(&shell, "home");
    assert_eq!(current(&shell), "home");
    assert_eq!(shell.depth(), 1);

    activate(&shell, "home_x");
    assert_eq!(printer.calls(), vec!["home x"]);

    shell.handle_input(UiInput::Back);
    assert_eq!(current(&shell), "idle_status");
    assert_eq!(shell.depth(), 0);

    shell.handle_input(UiInput::Back);
    assert_eq!(current(&shell), "idle_status");
    shell.shutdown();
}

#[test]
fn test_submenu_opens_fan_panel() {
    let printer = MockPrinter::new();
    let (shell, _surface, _supervisor) = started(&printer);

    activate(&shell, "actions");
    assert_eq!(current(&shell), "menu");
    activate(&shell, "fan");
    assert_eq!(current(&shell), "fan");
    activate(&shell, "fan:50");
    assert_eq!(printer.calls(), vec!["gcode M106 S127"]);

    shell.handle_input(UiInput::Back);
    shell.handle_input(UiInput::Back);
    assert_eq!(current(&shell), "idle_status");
    shell.shutdown();
}

#[test]
fn test_print_file_requires_confirmation() {
    let printer = MockPrinter::new();
    *printer.files.borrow_mut() = vec![file("old.gcode", 100), file("benchy.gcode", 200)];
    let (shell, _surface, _supervisor) = started(&printer);

    activate(&shell, "files");
    assert_eq!(current(&shell), "files");

    activate(&shell, "print:0");
    assert_eq!(current(&shell), "confirm");
    let view = shell.current_view().unwrap();
    assert_eq!(view.lines, vec!["Send file to printer?\n\nbenchy.gcode".to_string()]);

    activate(&shell, "no");
    assert_eq!(current(&shell), "files");
    assert!(!printer.calls().iter().any(|c| c.starts_with("select")));

    activate(&shell, "print:0");
    activate(&shell, "yes");
    assert_eq!(current(&shell), "files");
    assert!(printer
        .calls()
        .contains(&"select local benchy.gcode true".to_string()));
    shell.shutdown();
}

#[test]
fn test_stop_print_after_confirmation() {
    let printer = MockPrinter::new();
    printer.set_fallback(Ok(RawPrinterState::Printing));
    let mut status = PrinterStatus::default();
    status.state.text = "Printing".into();
    status.state.flags.printing = true;
    *printer.status.borrow_mut() = status;

    let (shell, _surface, _supervisor) = started(&printer);
    assert_eq!(shell.macro_state(), MacroState::Printing);
    assert_eq!(current(&shell), "print_status");

    activate(&shell, "stop");
    assert_eq!(current(&shell), "confirm");
    activate(&shell, "yes");
    assert_eq!(current(&shell), "print_status");
    assert_eq!(printer.calls(), vec!["cancel"]);
    shell.shutdown();
}

#[test]
fn test_shutdown_stops_every_task() {
    let printer = MockPrinter::new();
    let (shell, _surface, _supervisor) = started(&printer);
    activate(&shell, "actions");
    activate(&shell, "temperature");
    assert_eq!(current(&shell), "temperature");
    assert!(!shell.context().tasks.running().is_empty());

    shell.shutdown();
    assert!(shell.context().tasks.running().is_empty());
}

#[test]
fn test_quit_ends_run_loop() {
    let printer = MockPrinter::new();
    let (shell, _surface, _supervisor) = started(&printer);
    shell.context().dispatcher.sender().quit();
    assert!(!shell.run_once(Duration::from_millis(100)));
    shell.shutdown();
}

#[test]
fn test_root_panel_tasks_follow_the_screen() {
    let printer = MockPrinter::new();
    printer.script_states(&[RawPrinterState::Operational, RawPrinterState::Printing]);
    let (shell, _surface, _supervisor) = started(&printer);
    assert_eq!(current(&shell), "idle_status");
    let idle = shell.current_panel().unwrap();
    assert_eq!(running(&shell), vec!["state_check", "temperature_update"]);

    wait_for_state(&shell, MacroState::Printing);
    assert_eq!(current(&shell), "print_status");
    assert_eq!(running(&shell), vec!["print_status", "state_check"]);

    wait_for_state(&shell, MacroState::Idle);
    assert!(Rc::ptr_eq(&idle, &shell.current_panel().unwrap()));
    assert_eq!(running(&shell), vec!["state_check", "temperature_update"]);
    shell.shutdown();
}

#[test]
fn test_reopened_panels_keep_their_state() {
    let printer = MockPrinter::new();
    let (shell, _surface, _supervisor) = started(&printer);

    activate(&shell, "actions");
    activate(&shell, "temperature");
    let temperature = shell.current_panel().unwrap();
    activate(&shell, "amount");
    shell.handle_input(UiInput::Back);
    shell.handle_input(UiInput::Back);
    let tasks = shell.context().tasks.len();

    for _ in 0..50 {
        activate(&shell, "actions");
        activate(&shell, "temperature");
        shell.handle_input(UiInput::Back);
        shell.handle_input(UiInput::Back);
    }
    assert_eq!(shell.context().tasks.len(), tasks);
    assert_eq!(running(&shell), vec!["state_check", "temperature_update"]);

    activate(&shell, "actions");
    activate(&shell, "extrude");
    activate(&shell, "temperature");
    assert!(Rc::ptr_eq(&temperature, &shell.current_panel().unwrap()));
    let view = shell.current_view().unwrap();
    assert_eq!(view.find_action("amount").unwrap().label, "5°C");
    shell.shutdown();
}

#[test]
fn test_actions_not_on_screen_are_ignored() {
    let printer = MockPrinter::new();
    printer.set_fallback(Ok(RawPrinterState::Connecting));
    let (shell, _surface, _supervisor) = started(&printer);
    assert_eq!(current(&shell), "splash");
    let status = shell.status();
    assert!(!status.on_hold());
    let attempts = status.attempts();
    let message = status.message();

    activate(&shell, "retry");
    assert_eq!(status.attempts(), attempts);
    assert_eq!(status.message(), message);

    activate(&shell, "home_x");
    assert_eq!(current(&shell), "splash");
    assert!(printer.calls().is_empty());
    shell.shutdown();
}
