//! Splash screen shown while the printer is not available.

use std::rc::Rc;

use crate::context::UiContext;
use crate::monitor::{ConnectionStatus, HOLD_MESSAGE};
use crate::panel::{Navigation, Panel, PanelAction, PanelView};

use super::menu::open_system;

pub struct SplashPanel {
    ctx: Rc<UiContext>,
    status: Rc<ConnectionStatus>,
}

impl SplashPanel {
    pub fn new(ctx: &Rc<UiContext>, status: Rc<ConnectionStatus>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
            status,
        }
    }

    /// Text under the logo.
    pub fn status_text(&self) -> String {
        if self.status.on_hold() {
            HOLD_MESSAGE.to_string()
        } else {
            self.status.message()
        }
    }
}

impl Panel for SplashPanel {
    fn name(&self) -> &str {
        "splash"
    }

    fn view(&self) -> PanelView {
        let mut view = PanelView::new("OctoPrint").line(self.status_text());
        if self.status.on_hold() {
            view = view.action(PanelAction::new("retry", "Retry"));
        }
        view.action(PanelAction::new("system", "System"))
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            "retry" => {
                tracing::info!("Retry requested, resuming connection attempts");
                self.status.release();
                Navigation::Stay
            }
            "system" => Navigation::Open(self.ctx.shared_panel("system", open_system)),
            _ => Navigation::Stay,
        }
    }
}
