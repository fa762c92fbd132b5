//! Back-traversable panel history
//!
//! History holds return targets. Position 0 is a `None` sentinel that is
//! never removed; popping it (or finding the history empty) opens the
//! default panel instead.

use std::rc::Rc;

use crate::panel::Panel;
use crate::surface::DisplaySurface;

pub struct NavigationStack {
    history: Vec<Option<Rc<dyn Panel>>>,
    current: Option<Rc<dyn Panel>>,
    surface: Box<dyn DisplaySurface>,
}

impl NavigationStack {
    pub fn new(surface: Box<dyn DisplaySurface>) -> Self {
        Self {
            history: vec![None],
            current: None,
            surface,
        }
    }

    pub fn current(&self) -> Option<Rc<dyn Panel>> {
        self.current.clone()
    }

    /// True when `panel` is the displayed panel.
    pub fn is_current(&self, panel: &Rc<dyn Panel>) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, panel))
    }

    /// Number of return targets, not counting the sentinel.
    pub fn depth(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Hide the current panel, show `panel` and mount it. `return_to` is
    /// pushed first when given.
    pub fn open(&mut self, panel: Rc<dyn Panel>, return_to: Option<Rc<dyn Panel>>) {
        if let Some(target) = return_to {
            self.history.push(Some(target));
        }

        if let Some(previous) = self.current.take() {
            previous.hide();
        }

        tracing::debug!(panel = panel.name(), depth = self.depth(), "Opening panel");
        panel.show();
        self.surface.attach(panel.name(), &panel.view());
        self.current = Some(panel);
    }

    /// Drop all return targets and open `panel` as the new root.
    pub fn open_root(&mut self, panel: Rc<dyn Panel>) {
        self.history.truncate(1);
        if self.history.is_empty() {
            self.history.push(None);
        }
        self.open(panel, None);
    }

    /// Return to the last return target, or to `default` at the sentinel.
    pub fn back<F>(&mut self, default: F)
    where
        F: FnOnce() -> Rc<dyn Panel>,
    {
        match self.history.pop() {
            Some(Some(target)) => self.open(target, None),
            Some(None) => {
                self.history.push(None);
                self.open(default(), None);
            }
            None => {
                tracing::warn!("Navigation history underflow, opening default panel");
                self.history.push(None);
                self.open(default(), None);
            }
        }
    }

    /// Re-render the current panel.
    pub fn refresh(&mut self) {
        if let Some(panel) = &self.current {
            let view = panel.view();
            self.surface.update(&view);
        }
    }

    /// Hide the current panel without opening another.
    pub fn close(&mut self) {
        if let Some(panel) = self.current.take() {
            panel.hide();
        }
    }
}
