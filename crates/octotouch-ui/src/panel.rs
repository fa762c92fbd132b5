//! The panel contract
//!
//! Panels are toolkit-independent view models. A surface renders their
//! `PanelView`; pressing a button comes back as `activate(action_id)`,
//! which returns where to navigate next.

use std::rc::Rc;

use crate::task::PeriodicTask;

/// Action id every surface offers for leaving a panel.
pub const BACK_ACTION: &str = "back";

/// One button of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelAction {
    pub id: String,
    pub label: String,
    /// Question to confirm before running the action
    pub confirm: Option<String>,
}

impl PanelAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            confirm: None,
        }
    }

    /// Require a yes/no confirmation first
    pub fn with_confirm(mut self, prompt: impl Into<String>) -> Self {
        self.confirm = Some(prompt.into());
        self
    }
}

/// What a panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelView {
    pub title: String,
    pub lines: Vec<String>,
    pub actions: Vec<PanelAction>,
}

impl PanelView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    pub fn action(mut self, action: PanelAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn find_action(&self, id: &str) -> Option<&PanelAction> {
        self.actions.iter().find(|a| a.id == id)
    }
}

/// Result of activating a panel action.
pub enum Navigation {
    /// Remain on the current panel
    Stay,
    /// Open a child panel; the current panel becomes its return target
    Open(Rc<dyn Panel>),
    /// Return to the previous panel
    Back,
}

impl std::fmt::Debug for Navigation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Navigation::Stay => write!(f, "Stay"),
            Navigation::Open(panel) => write!(f, "Open({})", panel.name()),
            Navigation::Back => write!(f, "Back"),
        }
    }
}

/// A screen of the kiosk.
///
/// A panel with background work exposes its `PeriodicTask` through
/// `background`; the default `show`/`hide` start and cancel it, so the task
/// runs exactly while the panel is displayed.
pub trait Panel {
    /// Stable name, used in logs.
    fn name(&self) -> &str;

    fn background(&self) -> Option<&PeriodicTask> {
        None
    }

    fn show(&self) {
        if let Some(task) = self.background() {
            task.start();
        }
    }

    fn hide(&self) {
        if let Some(task) = self.background() {
            task.cancel();
        }
    }

    fn view(&self) -> PanelView;

    fn activate(&self, action: &str) -> Navigation;
}

/// Step selector that cycles through fixed values, like the step buttons
/// of the move and temperature panels.
#[derive(Debug, Clone)]
pub struct StepCycle<T: Clone> {
    steps: Vec<(String, T)>,
    index: usize,
}

impl<T: Clone> Default for StepCycle<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone> StepCycle<T> {
    pub fn new(steps: Vec<(String, T)>) -> Self {
        Self { steps, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn label(&self) -> &str {
        self.steps
            .get(self.index)
            .map(|(label, _)| label.as_str())
            .unwrap_or("")
    }

    pub fn value(&self) -> Option<T> {
        self.steps.get(self.index).map(|(_, value)| value.clone())
    }

    /// Advance to the next step, wrapping around.
    pub fn advance(&mut self) {
        if !self.steps.is_empty() {
            self.index = (self.index + 1) % self.steps.len();
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: T) {
        self.steps.push((label.into(), value));
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.steps.iter().map(|(_, value)| value)
    }

    pub fn contains(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.steps.iter().any(|(_, v)| predicate(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_cycle_wraps() {
        let mut step = StepCycle::new(vec![("10mm".into(), 10.0), ("1mm".into(), 1.0)]);
        assert_eq!(step.label(), "10mm");
        step.advance();
        assert_eq!(step.value(), Some(1.0));
        step.advance();
        assert_eq!(step.label(), "10mm");
    }

    #[test]
    fn test_empty_step_cycle() {
        let mut step: StepCycle<String> = StepCycle::new(Vec::new());
        step.advance();
        assert_eq!(step.label(), "");
        assert_eq!(step.value(), None);
    }

    #[test]
    fn test_view_builder() {
        let view = PanelView::new("Fan")
            .line("Fan speed")
            .action(PanelAction::new("off", "Fan Off").with_confirm("Stop fan?"));
        assert_eq!(view.lines, vec!["Fan speed".to_string()]);
        assert_eq!(
            view.find_action("off").and_then(|a| a.confirm.as_deref()),
            Some("Stop fan?")
        );
        assert!(view.find_action("on").is_none());
    }
}
