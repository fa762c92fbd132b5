//! Extrude and retract filament.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use octotouch_core::TemperatureData;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, StepCycle, BACK_ACTION};
use crate::task::PeriodicTask;

use super::menu::open_temperature;
use super::{back_action, capitalize, log_failure, polled};

/// Temperature line of one extruder. While heating, the change since the
/// previous reading is appended.
pub fn tool_line(tool: &str, data: &TemperatureData, previous: Option<&TemperatureData>) -> String {
    let actual = data.actual.unwrap_or(0.0);
    let target = data.target.unwrap_or(0.0);
    let mut line = format!("{}: {actual:.0}°C ⇒ {target:.0}°C", capitalize(tool));
    if target > 0.0 {
        if let Some(before) = previous.and_then(|p| p.actual) {
            line.push_str(&format!(" ({:.1}°C)", actual - before));
        }
    }
    line
}

#[derive(Default)]
struct ToolReadings {
    tools: StepCycle<String>,
    current: BTreeMap<String, TemperatureData>,
    previous: BTreeMap<String, TemperatureData>,
}

impl ToolReadings {
    fn record(&mut self, temperatures: BTreeMap<String, TemperatureData>) {
        for tool in temperatures.keys().filter(|name| name.starts_with("tool")) {
            if !self.tools.contains(|known| known == tool) {
                tracing::info!(tool = %tool, "Adding tool");
                self.tools.push(capitalize(tool), tool.clone());
            }
        }
        self.previous = std::mem::take(&mut self.current);
        self.current = temperatures
            .into_iter()
            .filter(|(name, _)| name.starts_with("tool"))
            .collect();
    }

    fn lines(&self) -> Vec<String> {
        self.current
            .iter()
            .map(|(tool, data)| tool_line(tool, data, self.previous.get(tool)))
            .collect()
    }
}

pub struct ExtrudePanel {
    ctx: Rc<UiContext>,
    amount: RefCell<StepCycle<f64>>,
    readings: Rc<RefCell<ToolReadings>>,
    task: PeriodicTask,
}

impl ExtrudePanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let readings = Rc::new(RefCell::new(ToolReadings::default()));

        let weak = Rc::downgrade(&readings);
        let printer = Rc::clone(&ctx.printer);
        let task = ctx.periodic("extruder_update", Duration::from_secs(5), move || {
            let Some(readings) = weak.upgrade() else {
                return Ok(());
            };
            if let Some(status) = polled(printer.printer_status(&["sd", "state"]))? {
                readings.borrow_mut().record(status.temperature);
            }
            Ok(())
        });

        let amount = StepCycle::new(vec![
            ("1mm".into(), 1.0),
            ("5mm".into(), 5.0),
            ("10mm".into(), 10.0),
        ]);

        Self {
            ctx: Rc::clone(ctx),
            amount: RefCell::new(amount),
            readings,
            task,
        }
    }

    fn extrude(&self, direction: f64) {
        let amount = direction * self.amount.borrow().value().unwrap_or(0.0);
        tracing::info!(amount, "Filament extrude");
        log_failure(self.name(), "extrude", self.ctx.printer.extrude(amount));
    }

    fn next_tool(&self) {
        let tool = {
            let mut readings = self.readings.borrow_mut();
            readings.tools.advance();
            readings.tools.value()
        };
        if let Some(tool) = tool {
            tracing::info!(tool = %tool, "Changing tool");
            log_failure(self.name(), "select_tool", self.ctx.printer.select_tool(&tool));
        }
    }
}

impl Panel for ExtrudePanel {
    fn name(&self) -> &str {
        "extrude"
    }

    fn background(&self) -> Option<&PeriodicTask> {
        Some(&self.task)
    }

    fn view(&self) -> PanelView {
        let readings = self.readings.borrow();
        let tool_label = match readings.tools.label() {
            "" => "Tool",
            label => label,
        };

        let view = readings
            .lines()
            .into_iter()
            .fold(PanelView::new("Extrude"), |view, line| view.line(line));
        view.action(PanelAction::new("extrude", "Extrude"))
            .action(PanelAction::new("retract", "Retract"))
            .action(PanelAction::new("amount", self.amount.borrow().label()))
            .action(PanelAction::new("tool", tool_label))
            .action(PanelAction::new("temperature", "Temperature"))
            .action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            BACK_ACTION => return Navigation::Back,
            "extrude" => self.extrude(1.0),
            "retract" => self.extrude(-1.0),
            "amount" => self.amount.borrow_mut().advance(),
            "tool" => self.next_tool(),
            "temperature" => {
                return Navigation::Open(self.ctx.shared_panel("temperature", open_temperature))
            }
            _ => {}
        }
        Navigation::Stay
    }
}
