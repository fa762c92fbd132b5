//! Homing buttons.

use std::rc::Rc;

use octotouch_core::Axis;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::{back_action, log_failure};

pub struct HomePanel {
    ctx: Rc<UiContext>,
}

impl HomePanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
        }
    }
}

impl Panel for HomePanel {
    fn name(&self) -> &str {
        "home"
    }

    fn view(&self) -> PanelView {
        PanelView::new("Home")
            .action(PanelAction::new("home_all", "Home All"))
            .action(PanelAction::new("home_x", "Home X"))
            .action(PanelAction::new("home_y", "Home Y"))
            .action(PanelAction::new("home_z", "Home Z"))
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        let axes: &[Axis] = match action {
            BACK_ACTION => return Navigation::Back,
            "home_all" => &Axis::ALL,
            "home_x" => &[Axis::X],
            "home_y" => &[Axis::Y],
            "home_z" => &[Axis::Z],
            _ => return Navigation::Stay,
        };
        tracing::info!(?axes, "Homing");
        log_failure(self.name(), action, self.ctx.printer.home(axes));
        Navigation::Stay
    }
}
