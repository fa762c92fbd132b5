//! Yes/no prompt in front of a destructive action.

use std::rc::Rc;

use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

/// Runs `action` on `origin` when the user answers yes.
pub struct ConfirmPanel {
    prompt: String,
    origin: Rc<dyn Panel>,
    action: String,
}

impl ConfirmPanel {
    pub fn new(prompt: impl Into<String>, origin: Rc<dyn Panel>, action: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            origin,
            action: action.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl Panel for ConfirmPanel {
    fn name(&self) -> &str {
        "confirm"
    }

    fn view(&self) -> PanelView {
        PanelView::new("Confirm")
            .line(self.prompt.clone())
            .action(PanelAction::new("yes", "Yes"))
            .action(PanelAction::new("no", "No"))
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            "yes" => {
                tracing::info!(panel = self.origin.name(), action = %self.action, "Confirmed");
                match self.origin.activate(&self.action) {
                    Navigation::Stay => Navigation::Back,
                    other => other,
                }
            }
            "no" | BACK_ACTION => Navigation::Back,
            _ => Navigation::Stay,
        }
    }
}
