//! Printer controls and OctoPrint custom system commands.

use std::rc::Rc;

use octotouch_core::{ellipsis_len, SystemCommand};

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::{back_action, log_failure};

/// Buttons on the panel, built-in controls included.
pub const MAX_BUTTONS: usize = 11;

const LABEL_LEN: usize = 12;

const BUILTIN: [(&str, &str); 3] = [
    ("Motors Off", "M18"),
    ("Fan On", "M106"),
    ("Fan Off", "M106 S0"),
];

/// Confirmation text sent by the server, reduced to plain text.
///
/// A tag separates words unless punctuation follows it directly.
pub fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    let mut separate = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                separate = true;
            }
            _ if in_tag => {}
            c => {
                if separate && !matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')') {
                    text.push(' ');
                }
                separate = false;
                text.push(c);
            }
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct ControlPanel {
    ctx: Rc<UiContext>,
    commands: Vec<SystemCommand>,
}

impl ControlPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        tracing::info!("Retrieving custom commands");
        let mut commands = log_failure("control", "system_commands", ctx.printer.system_commands())
            .map(|commands| commands.custom)
            .unwrap_or_default();

        let room = MAX_BUTTONS - BUILTIN.len();
        if commands.len() > room {
            tracing::warn!("More than {MAX_BUTTONS} commands, skipping remainder");
            commands.truncate(room);
        }

        Self {
            ctx: Rc::clone(ctx),
            commands,
        }
    }

    fn run_builtin(&self, index: usize) {
        if let Some((name, gcode)) = BUILTIN.get(index) {
            tracing::info!(command = name, "Executing control");
            log_failure(self.name(), name, self.ctx.printer.gcode(&[gcode.to_string()]));
        }
    }

    fn run_command(&self, index: usize) {
        if let Some(command) = self.commands.get(index) {
            tracing::info!(command = %command.name, "Executing system command");
            log_failure(
                self.name(),
                &command.name,
                self.ctx
                    .printer
                    .execute_system_command("custom", &command.action),
            );
        }
    }
}

fn index_of(action: &str, prefix: &str) -> Option<usize> {
    action.strip_prefix(prefix)?.parse().ok()
}

impl Panel for ControlPanel {
    fn name(&self) -> &str {
        "control"
    }

    fn view(&self) -> PanelView {
        let mut view = PanelView::new("Control");
        for (index, (name, _)) in BUILTIN.iter().enumerate() {
            view = view.action(PanelAction::new(format!("gcode:{index}"), *name));
        }
        for (index, command) in self.commands.iter().enumerate() {
            let mut action = PanelAction::new(
                format!("command:{index}"),
                ellipsis_len(&command.name, LABEL_LEN),
            );
            if let Some(prompt) = &command.confirm {
                action = action.with_confirm(plain_text(prompt));
            }
            view = view.action(action);
        }
        view.action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        if action == BACK_ACTION {
            return Navigation::Back;
        }
        if let Some(index) = index_of(action, "gcode:") {
            self.run_builtin(index);
        } else if let Some(index) = index_of(action, "command:") {
            self.run_command(index);
        }
        Navigation::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            plain_text("<p>Really <strong>restart</strong>?</p>"),
            "Really restart?"
        );
        assert_eq!(
            plain_text("Shut down the host.<br>This can take a while."),
            "Shut down the host. This can take a while."
        );
        assert_eq!(plain_text("<b>Reboot</b>, now"), "Reboot, now");
        assert_eq!(plain_text("No markup"), "No markup");
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of("command:3", "command:"), Some(3));
        assert_eq!(index_of("gcode:x", "gcode:"), None);
        assert_eq!(index_of("back", "gcode:"), None);
    }
}
