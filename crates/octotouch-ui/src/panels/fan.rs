//! Part-cooling fan speed.

use std::rc::Rc;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::{back_action, log_failure};

const SPEEDS: [u8; 4] = [100, 75, 50, 25];

/// `M106` for a speed in percent.
pub fn fan_gcode(percent: u8) -> String {
    let pwm = 255 * u32::from(percent.min(100)) / 100;
    format!("M106 S{pwm}")
}

pub struct FanPanel {
    ctx: Rc<UiContext>,
}

impl FanPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
        }
    }
}

impl Panel for FanPanel {
    fn name(&self) -> &str {
        "fan"
    }

    fn view(&self) -> PanelView {
        SPEEDS
            .iter()
            .fold(PanelView::new("Fan"), |view, speed| {
                view.action(PanelAction::new(format!("fan:{speed}"), format!("{speed} %")))
            })
            .action(PanelAction::new("fan:0", "Fan Off"))
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        if action == BACK_ACTION {
            return Navigation::Back;
        }
        let Some(percent) = action
            .strip_prefix("fan:")
            .and_then(|speed| speed.parse::<u8>().ok())
        else {
            return Navigation::Stay;
        };

        let command = fan_gcode(percent);
        tracing::info!(percent, "Setting fan speed");
        log_failure(self.name(), action, self.ctx.printer.gcode(&[command]));
        Navigation::Stay
    }
}
