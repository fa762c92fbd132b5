//! Root panel while the printer is idle.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use octotouch_core::{PrinterStatus, TemperaturePreset};

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView};
use crate::task::PeriodicTask;

use super::{log_failure, polled, MenuItem};

const EXTRUDER_FALLBACK: f64 = 210.0;
const BED_FALLBACK: f64 = 60.0;

/// Heaters shown on the panel, with their labels.
const HEATERS: [(&str, &str); 2] = [("tool0", "Extruder"), ("bed", "Bed")];

/// Temperature a heater is set to when tapped while cold.
///
/// Uses the configured preset when the server has one by that name and it
/// is non-zero, otherwise 210°C for extruders and 60°C for the bed.
pub fn preset_target(presets: &[TemperaturePreset], preset: &str, heater: &str) -> f64 {
    let is_bed = heater == "bed";
    let configured = presets
        .iter()
        .find(|p| p.name == preset)
        .map(|p| if is_bed { p.bed } else { p.extruder })
        .unwrap_or(0.0);

    if configured > 0.0 {
        configured
    } else if is_bed {
        BED_FALLBACK
    } else {
        EXTRUDER_FALLBACK
    }
}

pub struct IdleStatusPanel {
    ctx: Rc<UiContext>,
    readings: Rc<RefCell<PrinterStatus>>,
    menu: Vec<MenuItem>,
    task: PeriodicTask,
}

impl IdleStatusPanel {
    pub fn new(ctx: &Rc<UiContext>, menu: Vec<MenuItem>) -> Self {
        let readings = Rc::new(RefCell::new(PrinterStatus::default()));

        let weak = Rc::downgrade(&readings);
        let printer = Rc::clone(&ctx.printer);
        let task = ctx.periodic("temperature_update", Duration::from_secs(2), move || {
            let Some(readings) = weak.upgrade() else {
                return Ok(());
            };
            if let Some(status) = polled(printer.printer_status(&["sd", "state"]))? {
                *readings.borrow_mut() = status;
            }
            Ok(())
        });

        Self {
            ctx: Rc::clone(ctx),
            readings,
            menu,
            task,
        }
    }

    fn toggle_heater(&self, heater: &str) {
        let heating = self
            .readings
            .borrow()
            .heater(heater)
            .is_some_and(|t| t.is_heating());

        let target = if heating {
            0.0
        } else {
            let presets = log_failure(self.name(), "presets", self.ctx.printer.temperature_presets())
                .unwrap_or_default();
            preset_target(&presets, &self.ctx.config.preset, heater)
        };

        tracing::info!(heater, target, "Toggling heater");
        let result = if heater == "bed" {
            self.ctx.printer.set_bed_target(target)
        } else {
            self.ctx.printer.set_tool_target(heater, target)
        };
        log_failure(self.name(), "toggle_heater", result);
    }
}

impl Panel for IdleStatusPanel {
    fn name(&self) -> &str {
        "idle_status"
    }

    fn background(&self) -> Option<&PeriodicTask> {
        Some(&self.task)
    }

    fn view(&self) -> PanelView {
        let readings = self.readings.borrow();
        let mut view = PanelView::new("Idle");
        for (heater, label) in HEATERS {
            let text = readings.heater(heater).copied().unwrap_or_default().label();
            view = view
                .line(format!("{label}: {text}"))
                .action(PanelAction::new(format!("heat:{heater}"), text));
        }
        self.menu
            .iter()
            .fold(view, |view, item| view.action(item.action()))
    }

    fn activate(&self, action: &str) -> Navigation {
        if let Some(heater) = action.strip_prefix("heat:") {
            self.toggle_heater(heater);
            return Navigation::Stay;
        }
        match self.menu.iter().find(|item| item.id() == action) {
            Some(item) => item.open(&self.ctx),
            None => Navigation::Stay,
        }
    }
}
