//! Menu reachable while printing.

use std::rc::Rc;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::back_action;
use super::menu::{open_fan, open_temperature};

pub struct PrintMenuPanel {
    ctx: Rc<UiContext>,
}

impl PrintMenuPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
        }
    }
}

impl Panel for PrintMenuPanel {
    fn name(&self) -> &str {
        "print_menu"
    }

    fn view(&self) -> PanelView {
        PanelView::new("Print Menu")
            .action(PanelAction::new("temperature", "Temperature"))
            .action(PanelAction::new("fan", "Fan"))
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            "temperature" => Navigation::Open(self.ctx.shared_panel("temperature", open_temperature)),
            "fan" => Navigation::Open(self.ctx.shared_panel("fan", open_fan)),
            BACK_ACTION => Navigation::Back,
            _ => Navigation::Stay,
        }
    }
}
