//! Root panel while a job is active.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use octotouch_core::{filename_ellipsis, JobInfo, PrinterStatus, RawPrinterState};

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView};
use crate::task::PeriodicTask;

use super::menu::open_print_menu;
use super::{log_failure, polled};

const DAY_SECONDS: u64 = 24 * 3600;

/// `H:MM:SS`, prefixed with the day count when longer than a day.
pub fn format_duration(seconds: u64) -> String {
    let (days, rest) = (seconds / DAY_SECONDS, seconds % DAY_SECONDS);
    let clock = format!("{}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Time line and finish line for the current job.
pub fn progress_text(state: &RawPrinterState, job: &JobInfo, now: NaiveDateTime) -> (String, String) {
    let none = || "-".to_string();
    match state {
        RawPrinterState::Operational => return ("Printer is ready".to_string(), none()),
        RawPrinterState::Cancelling => return ("Print job cancelling...".to_string(), none()),
        RawPrinterState::Pausing => return ("Print job pausing...".to_string(), none()),
        _ => {}
    }

    let completion = job.progress.completion.unwrap_or(0.0) as u32;
    if completion == 100 {
        let took = job.job.last_print_time.unwrap_or(0.0).max(0.0) as u64;
        return (format!("Completed in {}", format_duration(took)), none());
    }
    if completion == 0 {
        return ("Warming up ...".to_string(), none());
    }

    let elapsed = job.progress.print_time.unwrap_or(0);
    let left = job.progress.print_time_left.unwrap_or(0);
    let mut text = format!("Elapsed: {}", format_duration(elapsed));
    if left > 0 {
        text.push_str(&format!(" / Left: {}", format_duration(left)));
    }
    let finish = i64::try_from(left)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|left| now.checked_add_signed(left))
        .map(|at| format!("Finish time: {}", at.format("%H:%M %d-%b")))
        .unwrap_or_else(none);
    (text, finish)
}

#[derive(Default)]
struct Readings {
    status: PrinterStatus,
    job: JobInfo,
}

impl Readings {
    fn state(&self) -> RawPrinterState {
        RawPrinterState::parse(&self.status.state.text)
    }
}

pub struct PrintStatusPanel {
    ctx: Rc<UiContext>,
    readings: Rc<RefCell<Readings>>,
    task: PeriodicTask,
}

impl PrintStatusPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let readings = Rc::new(RefCell::new(Readings::default()));

        let weak = Rc::downgrade(&readings);
        let printer = Rc::clone(&ctx.printer);
        let task = ctx.periodic("print_status", Duration::from_secs(1), move || {
            let Some(readings) = weak.upgrade() else {
                return Ok(());
            };
            if let Some(status) = polled(printer.printer_status(&["sd"]))? {
                readings.borrow_mut().status = status;
            }
            if let Some(job) = polled(printer.job_info())? {
                readings.borrow_mut().job = job;
            }
            Ok(())
        });

        Self {
            ctx: Rc::clone(ctx),
            readings,
            task,
        }
    }

    fn is_cancelling(&self) -> bool {
        let readings = self.readings.borrow();
        readings.state() == RawPrinterState::Cancelling || readings.status.state.flags.cancelling
    }
}

impl Panel for PrintStatusPanel {
    fn name(&self) -> &str {
        "print_status"
    }

    fn background(&self) -> Option<&PeriodicTask> {
        Some(&self.task)
    }

    fn view(&self) -> PanelView {
        let readings = self.readings.borrow();
        let status = &readings.status;
        let job = &readings.job;

        let file = match job.file_name() {
            Some(name) => filename_ellipsis(name),
            None => "File not set".to_string(),
        };
        let completion = job.progress.completion.unwrap_or(0.0).clamp(0.0, 100.0);
        let (left, finish) =
            progress_text(&readings.state(), job, chrono::Local::now().naive_local());

        let mut view = PanelView::new("Printing")
            .line(format!(
                "Extruder: {}",
                status.heater("tool0").copied().unwrap_or_default().label()
            ))
            .line(format!(
                "Bed: {}",
                status.bed().copied().unwrap_or_default().label()
            ))
            .line(file)
            .line(format!("{completion:.0}%"))
            .line(left)
            .line(finish);

        let flags = status.state.flags;
        if flags.printing || flags.paused {
            let toggle = if flags.paused { "Resume" } else { "Pause" };
            view = view
                .action(PanelAction::new("pause", toggle))
                .action(PanelAction::new("stop", "Stop").with_confirm("Stop current print job?"))
                .action(PanelAction::new("menu", "Menu"));
        } else if flags.ready {
            view = view.action(PanelAction::new("complete", "Complete"));
        }
        view
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            "pause" | "stop" if self.is_cancelling() => {
                tracing::warn!(action, "Job is cancelling");
            }
            "pause" => {
                tracing::warn!("Pausing/resuming job");
                log_failure(self.name(), action, self.ctx.printer.toggle_pause());
            }
            "stop" => {
                tracing::warn!("Stopping current job");
                log_failure(self.name(), action, self.ctx.printer.cancel());
            }
            "menu" => {
                return Navigation::Open(self.ctx.shared_panel("print_menu", open_print_menu))
            }
            "complete" => return Navigation::Back,
            _ => {}
        }
        Navigation::Stay
    }
}
