//! Heater targets and temperature presets.

use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use octotouch_core::{PrinterClient, TemperatureData, TemperaturePreset};

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, StepCycle, BACK_ACTION};
use crate::task::PeriodicTask;

use super::{back_action, capitalize, log_failure, polled};

/// Presets shown before the extra "Cool Down" button.
pub const MAX_PRESETS: usize = 10;

/// New target after a change, or `None` when it would drop below 0°C.
pub fn next_target(current: f64, delta: f64) -> Option<f64> {
    let target = current + delta;
    (target >= 0.0).then_some(target)
}

fn set_target(printer: &dyn PrinterClient, heater: &str, target: f64) {
    tracing::info!(heater, target, "Setting target temperature");
    let result = if heater == "bed" {
        printer.set_bed_target(target)
    } else {
        printer.set_tool_target(heater, target)
    };
    log_failure("temperature", "set_target", result);
}

#[derive(Default)]
struct HeaterReadings {
    heaters: StepCycle<String>,
    temperatures: BTreeMap<String, TemperatureData>,
}

impl HeaterReadings {
    fn record(&mut self, temperatures: BTreeMap<String, TemperatureData>) {
        for heater in temperatures.keys() {
            if !self.heaters.contains(|known| known == heater) {
                tracing::info!(heater = %heater, "Adding heater");
                self.heaters.push(capitalize(heater), heater.clone());
            }
        }
        self.temperatures = temperatures;
    }
}

pub struct TemperaturePanel {
    ctx: Rc<UiContext>,
    amount: RefCell<StepCycle<f64>>,
    readings: Rc<RefCell<HeaterReadings>>,
    presets: OnceCell<Rc<PresetPanel>>,
    task: PeriodicTask,
}

impl TemperaturePanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let readings = Rc::new(RefCell::new(HeaterReadings::default()));

        let weak = Rc::downgrade(&readings);
        let printer = Rc::clone(&ctx.printer);
        let task = ctx.periodic("tools_update", Duration::from_secs(1), move || {
            let Some(readings) = weak.upgrade() else {
                return Ok(());
            };
            if let Some(status) = polled(printer.printer_status(&["sd", "state"]))? {
                readings.borrow_mut().record(status.temperature);
            }
            Ok(())
        });

        let amount = StepCycle::new(vec![
            ("10°C".into(), 10.0),
            ("5°C".into(), 5.0),
            ("1°C".into(), 1.0),
        ]);

        Self {
            ctx: Rc::clone(ctx),
            amount: RefCell::new(amount),
            readings,
            presets: OnceCell::new(),
            task,
        }
    }

    fn selected(&self) -> Option<String> {
        self.readings.borrow().heaters.value()
    }

    fn change_target(&self, direction: f64) {
        let Some(heater) = self.selected() else {
            return;
        };

        let Some(status) = log_failure(
            self.name(),
            "current_target",
            self.ctx.printer.printer_status(&["sd", "state"]),
        ) else {
            return;
        };
        let current = status
            .heater(&heater)
            .and_then(|t| t.target)
            .unwrap_or(0.0);

        let delta = direction * self.amount.borrow().value().unwrap_or(0.0);
        match next_target(current, delta) {
            Some(target) => set_target(&*self.ctx.printer, &heater, target),
            None => tracing::debug!(heater = %heater, current, "Target already at 0°C"),
        }
    }

    fn filament(&self, command: &str) {
        tracing::info!(command, "Filament change");
        log_failure(
            self.name(),
            command,
            self.ctx.printer.gcode(&[command.to_string()]),
        );
    }
}

impl Panel for TemperaturePanel {
    fn name(&self) -> &str {
        "temperature"
    }

    fn background(&self) -> Option<&PeriodicTask> {
        Some(&self.task)
    }

    fn view(&self) -> PanelView {
        let readings = self.readings.borrow();
        let mut view = PanelView::new("Temperature");
        for (heater, data) in &readings.temperatures {
            view = view.line(format!("{}: {}", capitalize(heater), data.label()));
        }

        let selected = readings.heaters.value();
        let heater_label = match &selected {
            Some(heater) => {
                let data = readings.temperatures.get(heater).copied().unwrap_or_default();
                format!("{}: {}", capitalize(heater), data.label())
            }
            None => "Tool".to_string(),
        };

        view = view
            .action(PanelAction::new("increase", "Increase"))
            .action(PanelAction::new("decrease", "Decrease"))
            .action(PanelAction::new("amount", self.amount.borrow().label()))
            .action(PanelAction::new("tool", heater_label))
            .action(PanelAction::new("presets", "Presets"));
        if selected.as_deref() != Some("bed") {
            view = view
                .action(PanelAction::new("load", "Load"))
                .action(PanelAction::new("unload", "Unload"));
        }
        view.action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            BACK_ACTION => return Navigation::Back,
            "increase" => self.change_target(1.0),
            "decrease" => self.change_target(-1.0),
            "amount" => self.amount.borrow_mut().advance(),
            "tool" => self.readings.borrow_mut().heaters.advance(),
            "load" => self.filament("M701"),
            "unload" => self.filament("M702"),
            "presets" => {
                let heaters: Vec<String> =
                    self.readings.borrow().heaters.values().cloned().collect();
                let presets = self
                    .presets
                    .get_or_init(|| Rc::new(PresetPanel::new(&self.ctx)));
                presets.set_heaters(heaters);
                let panel: Rc<dyn Panel> = presets.clone();
                return Navigation::Open(panel);
            }
            _ => {}
        }
        Navigation::Stay
    }
}

/// Server temperature profiles plus "Cool Down".
pub struct PresetPanel {
    ctx: Rc<UiContext>,
    /// Heaters a preset applies to
    heaters: RefCell<Vec<String>>,
    presets: Vec<TemperaturePreset>,
}

impl PresetPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let mut presets =
            log_failure("presets", "load", ctx.printer.temperature_presets()).unwrap_or_default();
        if presets.len() > MAX_PRESETS {
            tracing::warn!("More than {MAX_PRESETS} presets, skipping remainder");
            presets.truncate(MAX_PRESETS);
        }
        presets.push(TemperaturePreset {
            name: "Cool Down".to_string(),
            extruder: 0.0,
            bed: 0.0,
        });

        Self {
            ctx: Rc::clone(ctx),
            heaters: RefCell::new(Vec::new()),
            presets,
        }
    }

    pub fn set_heaters(&self, heaters: Vec<String>) {
        *self.heaters.borrow_mut() = heaters;
    }

    pub fn presets(&self) -> &[TemperaturePreset] {
        &self.presets
    }

    fn apply(&self, preset: &TemperaturePreset) {
        tracing::info!(preset = %preset.name, "Applying temperature preset");
        for heater in self.heaters.borrow().iter() {
            let target = if heater == "bed" {
                preset.bed
            } else {
                preset.extruder
            };
            set_target(&*self.ctx.printer, heater, target);
        }
    }
}

impl Panel for PresetPanel {
    fn name(&self) -> &str {
        "presets"
    }

    fn view(&self) -> PanelView {
        self.presets
            .iter()
            .enumerate()
            .fold(PanelView::new("Presets"), |view, (index, preset)| {
                view.action(PanelAction::new(format!("preset:{index}"), &preset.name))
            })
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        if action == BACK_ACTION {
            return Navigation::Back;
        }
        let preset = action
            .strip_prefix("preset:")
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| self.presets.get(index));
        match preset {
            Some(preset) => {
                self.apply(preset);
                Navigation::Back
            }
            None => Navigation::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_target_never_below_zero() {
        assert_eq!(next_target(200.0, 10.0), Some(210.0));
        assert_eq!(next_target(5.0, -5.0), Some(0.0));
        assert_eq!(next_target(4.0, -5.0), None);
    }
}
