//! Jog the print head.

use std::cell::RefCell;
use std::rc::Rc;

use octotouch_core::Axis;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, StepCycle, BACK_ACTION};

use super::{back_action, log_failure};

pub struct MovePanel {
    ctx: Rc<UiContext>,
    step: RefCell<StepCycle<f64>>,
}

impl MovePanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let step = StepCycle::new(vec![
            ("10mm".into(), 10.0),
            ("1mm".into(), 1.0),
            ("0.1mm".into(), 0.1),
            ("0.02mm".into(), 0.02),
        ]);
        Self {
            ctx: Rc::clone(ctx),
            step: RefCell::new(step),
        }
    }

    fn jog(&self, axis: Axis, direction: f64) {
        let distance = direction * self.step.borrow().value().unwrap_or(0.0);
        let (x, y, z) = match axis {
            Axis::X => (distance, 0.0, 0.0),
            Axis::Y => (0.0, distance, 0.0),
            Axis::Z => (0.0, 0.0, distance),
        };
        tracing::debug!(%axis, distance, "Jog");
        log_failure(self.name(), "jog", self.ctx.printer.jog(x, y, z));
    }
}

impl Panel for MovePanel {
    fn name(&self) -> &str {
        "move"
    }

    fn view(&self) -> PanelView {
        PanelView::new("Move")
            .action(PanelAction::new("x+", "X+"))
            .action(PanelAction::new("x-", "X-"))
            .action(PanelAction::new("y+", "Y+"))
            .action(PanelAction::new("y-", "Y-"))
            .action(PanelAction::new("z+", "Z+"))
            .action(PanelAction::new("z-", "Z-"))
            .action(PanelAction::new("step", self.step.borrow().label()))
            .action(PanelAction::new("home_all", "Home All"))
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            BACK_ACTION => return Navigation::Back,
            "x+" => self.jog(Axis::X, 1.0),
            "x-" => self.jog(Axis::X, -1.0),
            "y+" => self.jog(Axis::Y, 1.0),
            "y-" => self.jog(Axis::Y, -1.0),
            "z+" => self.jog(Axis::Z, 1.0),
            "z-" => self.jog(Axis::Z, -1.0),
            "step" => self.step.borrow_mut().advance(),
            "home_all" => {
                log_failure(self.name(), action, self.ctx.printer.home(&Axis::ALL));
            }
            _ => {}
        }
        Navigation::Stay
    }
}
