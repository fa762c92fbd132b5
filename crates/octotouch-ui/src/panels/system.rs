//! Version and host information, server power commands.

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::files::format_size;
use super::{back_action, log_failure};

const COMMANDS: [&str; 3] = ["restart", "reboot", "shutdown"];

/// The three load averages of `/proc/loadavg`.
pub fn parse_loadavg(text: &str) -> Option<[f64; 3]> {
    let mut fields = text.split_whitespace().map(str::parse::<f64>);
    Some([
        fields.next()?.ok()?,
        fields.next()?.ok()?,
        fields.next()?.ok()?,
    ])
}

/// `(total, free)` in bytes from `/proc/meminfo`.
pub fn parse_meminfo(text: &str) -> Option<(u64, u64)> {
    let field = |key: &str| {
        text.lines()
            .find_map(|line| line.strip_prefix(key))
            .and_then(|rest| rest.trim().trim_end_matches("kB").trim().parse::<u64>().ok())
            .map(|kb| kb * 1024)
    };
    Some((field("MemTotal:")?, field("MemFree:")?))
}

fn read_first_line(path: &str) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    text.lines().next().map(|line| line.trim_end().to_string())
}

#[derive(Debug, Clone, Default)]
struct HostInfo {
    octoprint: String,
    octopi: String,
    memory: String,
    load: String,
}

pub struct SystemPanel {
    ctx: Rc<UiContext>,
    info: RefCell<HostInfo>,
}

impl SystemPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let panel = Self {
            ctx: Rc::clone(ctx),
            info: RefCell::new(HostInfo::default()),
        };
        panel.reload();
        panel
    }

    fn reload(&self) {
        let octoprint = match log_failure(self.name(), "version", self.ctx.printer.version()) {
            Some(v) => format!("{} ({})", v.server, v.api),
            None => "Not connected".to_string(),
        };
        let octopi = match read_first_line("/etc/octopi_version") {
            Some(version) => format!("OctoPi version: {version}"),
            None => "OctoPi not installed".to_string(),
        };
        let memory = std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|text| parse_meminfo(&text))
            .map(|(total, free)| {
                format!(
                    "Memory Total / Free: {} / {}",
                    format_size(total),
                    format_size(free)
                )
            })
            .unwrap_or_else(|| "Memory Total / Free: -".to_string());
        let load = std::fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|text| parse_loadavg(&text))
            .map(|[one, five, fifteen]| format!("Load Average: {one:.2}, {five:.2}, {fifteen:.2}"))
            .unwrap_or_else(|| "Load Average: -".to_string());

        *self.info.borrow_mut() = HostInfo {
            octoprint,
            octopi,
            memory,
            load,
        };
    }
}

impl Panel for SystemPanel {
    fn name(&self) -> &str {
        "system"
    }

    fn show(&self) {
        self.reload();
    }

    fn view(&self) -> PanelView {
        let info = self.info.borrow();
        let build = self.ctx.build;
        let view = PanelView::new("System")
            .line(format!("OctoPrint Version: {}", info.octoprint))
            .line(info.octopi.clone())
            .line(format!(
                "OctoTouch Version: {} ({})",
                build.version, build.build_date
            ))
            .line(info.memory.clone())
            .line(info.load.clone());

        COMMANDS
            .iter()
            .fold(view, |view, name| {
                view.action(
                    PanelAction::new(*name, super::capitalize(name))
                        .with_confirm(format!("Execute {name} command?")),
                )
            })
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        if action == BACK_ACTION {
            return Navigation::Back;
        }
        if COMMANDS.iter().any(|name| *name == action) {
            tracing::warn!(command = action, "Executing server command");
            log_failure(
                self.name(),
                action,
                self.ctx.printer.execute_system_command("core", action),
            );
        }
        Navigation::Stay
    }
}
